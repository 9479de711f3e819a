//! Shared visual property groups.
//!
//! The original models mix these in per shape (`Include(ScalarLineProps)`
//! and friends); here each group is a plain struct composed into the shape
//! that carries it.

use std::fmt;

/// Simple color model; raw CSS strings pass through untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, u8),
    Raw(String),
}

impl Color {
    pub fn named(name: impl Into<String>) -> Color {
        Color::Named(name.into())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(s) | Color::Raw(s) => write!(f, "{}", s),
            Color::Rgb(r, g, b) => write!(f, "rgb({},{},{})", r, g, b),
            Color::Rgba(r, g, b, a) => write!(f, "rgba({},{},{},{})", r, g, b, a),
        }
    }
}

/// How two line segments are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Miter,
    Round,
    #[default]
    Bevel,
}

/// How a line is terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Dash pattern for stroked lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Dotdash,
    Dashdot,
    /// Explicit on/off lengths in screen units
    Custom(Vec<f64>),
}

/// Hatch fill patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HatchPattern {
    #[default]
    Blank,
    Dot,
    Ring,
    HorizontalLine,
    VerticalLine,
    Cross,
    HorizontalDash,
    VerticalDash,
    Spiral,
    RightDiagonalLine,
    LeftDiagonalLine,
    DiagonalCross,
    RightDiagonalDash,
    LeftDiagonalDash,
    HorizontalWave,
    VerticalWave,
    CrissCross,
}

/// Stroke properties for lines and path outlines.
#[derive(Debug, Clone, PartialEq)]
pub struct LineProps {
    pub color: Color,
    pub alpha: f64,
    pub width: f64,
    pub join: LineJoin,
    pub cap: LineCap,
    pub dash: LineDash,
    pub dash_offset: f64,
}

impl Default for LineProps {
    fn default() -> Self {
        Self {
            color: Color::Named("black".to_string()),
            alpha: 1.0,
            width: 1.0,
            join: LineJoin::default(),
            cap: LineCap::default(),
            dash: LineDash::default(),
            dash_offset: 0.0,
        }
    }
}

/// Fill properties for closed regions.
#[derive(Debug, Clone, PartialEq)]
pub struct FillProps {
    /// `None` paints nothing (explicit absence, distinct from unset)
    pub color: Option<Color>,
    pub alpha: f64,
}

impl Default for FillProps {
    fn default() -> Self {
        Self {
            color: Some(Color::Named("gray".to_string())),
            alpha: 1.0,
        }
    }
}

/// Hatch properties for closed regions.
#[derive(Debug, Clone, PartialEq)]
pub struct HatchProps {
    pub pattern: Option<HatchPattern>,
    pub color: Color,
    pub alpha: f64,
    pub scale: f64,
    pub weight: f64,
}

impl Default for HatchProps {
    fn default() -> Self {
        Self {
            pattern: None,
            color: Color::Named("black".to_string()),
            alpha: 1.0,
            scale: 12.0,
            weight: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_props_defaults() {
        let props = LineProps::default();
        assert_eq!(props.color, Color::Named("black".to_string()));
        assert_eq!(props.alpha, 1.0);
        assert_eq!(props.width, 1.0);
        assert_eq!(props.join, LineJoin::Bevel);
        assert_eq!(props.cap, LineCap::Butt);
        assert_eq!(props.dash, LineDash::Solid);
    }

    #[test]
    fn fill_defaults_to_gray() {
        let props = FillProps::default();
        assert_eq!(props.color, Some(Color::Named("gray".to_string())));
    }

    #[test]
    fn hatch_pattern_defaults_to_none() {
        let props = HatchProps::default();
        assert_eq!(props.pattern, None);
        assert_eq!(props.scale, 12.0);
    }

    #[test]
    fn color_display() {
        assert_eq!(Color::named("red").to_string(), "red");
        assert_eq!(Color::Rgb(1, 2, 3).to_string(), "rgb(1,2,3)");
        assert_eq!(Color::Rgba(1, 2, 3, 4).to_string(), "rgba(1,2,3,4)");
    }
}
