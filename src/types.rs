//! Numeric and geometric primitives for the shape models.
//!
//! Points live in data space as `glam::DVec2` (y-up, math convention).
//! Angles are stored as raw values whose interpretation comes from a
//! separate `AngleUnits` field on the owning shape, mirroring how the
//! models are declared and serialized.

use std::fmt;

use glam::DVec2;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when non-negative required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Units for angle-valued fields.
///
/// The unit is a sibling field on the owning shape (`angle_units`), not part
/// of the angle value itself, so one declaration covers both `start_angle`
/// and `end_angle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnits {
    /// Radians (canonical unit)
    #[default]
    Rad,
    /// Degrees
    Deg,
    /// Gradians (400 per turn)
    Grad,
    /// Full turns
    Turn,
}

impl AngleUnits {
    pub fn as_str(self) -> &'static str {
        match self {
            AngleUnits::Rad => "rad",
            AngleUnits::Deg => "deg",
            AngleUnits::Grad => "grad",
            AngleUnits::Turn => "turn",
        }
    }

    /// Convert a raw value in this unit to radians.
    #[inline]
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnits::Rad => value,
            AngleUnits::Deg => value.to_radians(),
            AngleUnits::Grad => value * std::f64::consts::PI / 200.0,
            AngleUnits::Turn => value * std::f64::consts::TAU,
        }
    }
}

impl fmt::Display for AngleUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An angle value; the unit lives in the owning shape's `angle_units` field.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Angle(pub f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    /// Interpret this angle under the given units.
    #[inline]
    pub fn in_radians(self, units: AngleUnits) -> f64 {
        units.to_radians(self.0)
    }

    /// Get the raw value
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Check if the value is finite (not NaN or infinite)
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sweep direction for arcs and wedges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Clockwise (negative angular sweep in y-up space)
    Clock,
    /// Counter-clockwise (positive angular sweep; the default)
    #[default]
    Anticlock,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Clock => "clock",
            Direction::Anticlock => "anticlock",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Axis-aligned bounding box in data space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BBox {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: DVec2::splat(f64::MAX),
            max: DVec2::splat(f64::MIN),
        }
    }

    /// Box centered on a point with the given half-extents.
    pub fn around(center: DVec2, half_w: f64, half_h: f64) -> Self {
        BBox {
            min: DVec2::new(center.x - half_w, center.y - half_h),
            max: DVec2::new(center.x + half_w, center.y + half_h),
        }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Get the center point
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== AngleUnits tests ====================

    #[test]
    fn angle_units_default_is_rad() {
        assert_eq!(AngleUnits::default(), AngleUnits::Rad);
    }

    #[test]
    fn angle_units_conversions() {
        let eps = 1e-12;
        assert!((AngleUnits::Rad.to_radians(1.5) - 1.5).abs() < eps);
        assert!((AngleUnits::Deg.to_radians(180.0) - std::f64::consts::PI).abs() < eps);
        assert!((AngleUnits::Grad.to_radians(200.0) - std::f64::consts::PI).abs() < eps);
        assert!((AngleUnits::Turn.to_radians(0.5) - std::f64::consts::PI).abs() < eps);
    }

    #[test]
    fn angle_in_radians_uses_units() {
        let a = Angle(90.0);
        assert!((a.in_radians(AngleUnits::Deg) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(Angle(2.0).in_radians(AngleUnits::Rad), 2.0);
    }

    #[test]
    fn angle_is_finite() {
        assert!(Angle(1.0).is_finite());
        assert!(!Angle(f64::INFINITY).is_finite());
        assert!(!Angle(f64::NAN).is_finite());
    }

    // ==================== Direction tests ====================

    #[test]
    fn direction_default_is_anticlock() {
        assert_eq!(Direction::default(), Direction::Anticlock);
        assert_eq!(Direction::Anticlock.as_str(), "anticlock");
        assert_eq!(Direction::Clock.as_str(), "clock");
    }

    // ==================== BBox tests ====================

    #[test]
    fn bbox_new_is_empty() {
        let bb = BBox::new();
        assert!(bb.is_empty());
    }

    #[test]
    fn bbox_expand_point() {
        let mut bb = BBox::new();
        bb.expand_point(DVec2::new(1.0, 2.0));
        bb.expand_point(DVec2::new(3.0, 4.0));

        assert!(!bb.is_empty());
        assert_eq!(bb.min, DVec2::new(1.0, 2.0));
        assert_eq!(bb.max, DVec2::new(3.0, 4.0));
    }

    #[test]
    fn bbox_width_height_center() {
        let mut bb = BBox::new();
        bb.expand_point(DVec2::new(1.0, 2.0));
        bb.expand_point(DVec2::new(5.0, 8.0));

        assert_eq!(bb.width(), 4.0);
        assert_eq!(bb.height(), 6.0);
        assert_eq!(bb.center(), DVec2::new(3.0, 5.0));
    }

    #[test]
    fn bbox_around() {
        let bb = BBox::around(DVec2::new(5.0, 5.0), 2.0, 1.0);
        assert_eq!(bb.min, DVec2::new(3.0, 4.0));
        assert_eq!(bb.max, DVec2::new(7.0, 6.0));
    }
}
