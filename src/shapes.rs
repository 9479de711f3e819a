//! The shape models.
//!
//! Each shape is a plain struct whose required fields are constructor
//! arguments and whose optional fields default and adjust through `with_*`
//! builders. Every shape kind carries a declarative [`FieldSpec`] table, and
//! path-like shapes (`Arc`, `Bezier`, `Line`) embed a lazily-bound
//! [`OpenPathNodes`] collection reachable through `nodes()`.
//!
//! Shapes implement [`NodeTarget`] by reading their *current* field values,
//! so an anchor handle created before a mutation resolves against the
//! geometry in effect at resolution time.

use std::fmt;
use std::sync::Arc;

use enum_dispatch::enum_dispatch;
use glam::DVec2;

use crate::coordinates::{Coordinate, NamedTerm, NodeTarget};
use crate::errors::{ResolveError, ValidateError};
use crate::nodes::{NodesSlot, OpenPathNodes};
use crate::resolve::{compass_point, Resolver};
use crate::schema::{validate_finite, validate_non_negative, FieldDefault, FieldSpec, FieldType};
use crate::types::{Angle, AngleUnits, BBox, Direction};
use crate::visuals::{FillProps, HatchProps, LineProps};

/// Render level (z-layer class) a shape is drawn on.
///
/// Shapes override the renderer default and sit on the annotation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderLevel {
    Image,
    Underlay,
    Glyph,
    Guide,
    #[default]
    Annotation,
    Overlay,
}

impl RenderLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderLevel::Image => "image",
            RenderLevel::Underlay => "underlay",
            RenderLevel::Glyph => "glyph",
            RenderLevel::Guide => "guide",
            RenderLevel::Annotation => "annotation",
            RenderLevel::Overlay => "overlay",
        }
    }
}

impl fmt::Display for RenderLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shape kind names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeClass {
    AnnularWedge,
    Annulus,
    Arc,
    Bezier,
    Circle,
    Line,
    Marker,
    Spline,
    Wedge,
}

impl ShapeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeClass::AnnularWedge => "annular_wedge",
            ShapeClass::Annulus => "annulus",
            ShapeClass::Arc => "arc",
            ShapeClass::Bezier => "bezier",
            ShapeClass::Circle => "circle",
            ShapeClass::Line => "line",
            ShapeClass::Marker => "marker",
            ShapeClass::Spline => "spline",
            ShapeClass::Wedge => "wedge",
        }
    }
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Marker glyph varieties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerVariety {
    Asterisk,
    Circle,
    CircleCross,
    CircleDot,
    CircleX,
    CircleY,
    Cross,
    Dash,
    Diamond,
    DiamondCross,
    DiamondDot,
    Dot,
    Hex,
    HexDot,
    InvertedTriangle,
    Plus,
    Square,
    SquareCross,
    SquareDot,
    SquarePin,
    SquareX,
    Star,
    StarDot,
    Triangle,
    TriangleDot,
    TrianglePin,
    X,
    Y,
}

impl MarkerVariety {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerVariety::Asterisk => "asterisk",
            MarkerVariety::Circle => "circle",
            MarkerVariety::CircleCross => "circle_cross",
            MarkerVariety::CircleDot => "circle_dot",
            MarkerVariety::CircleX => "circle_x",
            MarkerVariety::CircleY => "circle_y",
            MarkerVariety::Cross => "cross",
            MarkerVariety::Dash => "dash",
            MarkerVariety::Diamond => "diamond",
            MarkerVariety::DiamondCross => "diamond_cross",
            MarkerVariety::DiamondDot => "diamond_dot",
            MarkerVariety::Dot => "dot",
            MarkerVariety::Hex => "hex",
            MarkerVariety::HexDot => "hex_dot",
            MarkerVariety::InvertedTriangle => "inverted_triangle",
            MarkerVariety::Plus => "plus",
            MarkerVariety::Square => "square",
            MarkerVariety::SquareCross => "square_cross",
            MarkerVariety::SquareDot => "square_dot",
            MarkerVariety::SquarePin => "square_pin",
            MarkerVariety::SquareX => "square_x",
            MarkerVariety::Star => "star",
            MarkerVariety::StarDot => "star_dot",
            MarkerVariety::Triangle => "triangle",
            MarkerVariety::TriangleDot => "triangle_dot",
            MarkerVariety::TrianglePin => "triangle_pin",
            MarkerVariety::X => "x",
            MarkerVariety::Y => "y",
        }
    }
}

impl fmt::Display for MarkerVariety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Common behavior for all shape models
#[enum_dispatch]
pub trait Shape {
    /// The kind of shape
    fn class(&self) -> ShapeClass;

    /// Declarative field schema for this shape kind
    fn schema(&self) -> &'static [FieldSpec];

    /// Render level
    fn level(&self) -> RenderLevel;

    /// Stroke properties
    fn line_props(&self) -> &LineProps;

    /// Check the declared numeric constraints against current field values
    fn validate(&self) -> Result<(), ValidateError>;
}

/// Exhaustive tagged variant over the shape kinds
#[enum_dispatch(Shape)]
#[derive(Debug, Clone)]
pub enum ShapeEnum {
    AnnularWedge(AnnularWedgeShape),
    Annulus(AnnulusShape),
    Arc(ArcShape),
    Bezier(BezierShape),
    Circle(CircleShape),
    Line(LineShape),
    Marker(MarkerShape),
    Spline(SplineShape),
    Wedge(WedgeShape),
}

// Interpolated sweep angle in radians: direction picks which way around
// the circle the end angle is reached.
fn sweep_angle(
    start: Angle,
    end: Angle,
    units: AngleUnits,
    direction: Direction,
    t: f64,
) -> f64 {
    let a0 = start.in_radians(units);
    let a1 = end.in_radians(units);
    let mut delta = a1 - a0;
    match direction {
        Direction::Anticlock => {
            if delta < 0.0 {
                delta += std::f64::consts::TAU;
            }
        }
        Direction::Clock => {
            if delta > 0.0 {
                delta -= std::f64::consts::TAU;
            }
        }
    }
    a0 + t * delta
}

fn point_on_circle(center: DVec2, radius: f64, angle: f64) -> DVec2 {
    center + radius * DVec2::new(angle.cos(), angle.sin())
}

// ============================================================================
// Shape Types
// ============================================================================

/// A filled wedge between two radii and two angles.
#[derive(Debug, Clone)]
pub struct AnnularWedgeShape {
    pub center: Coordinate,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: Angle,
    pub end_angle: Angle,
    pub angle_units: AngleUnits,
    pub direction: Direction,
    pub line_props: LineProps,
    pub level: RenderLevel,
}

impl AnnularWedgeShape {
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("center", FieldType::Coordinate),
        FieldSpec::required("inner_radius", FieldType::Float).non_negative(),
        FieldSpec::required("outer_radius", FieldType::Float).non_negative(),
        FieldSpec::required("start_angle", FieldType::Angle),
        FieldSpec::required("end_angle", FieldType::Angle),
        FieldSpec::optional(
            "angle_units",
            FieldType::AngleUnits,
            FieldDefault::Enumerated("rad"),
        ),
        FieldSpec::optional(
            "direction",
            FieldType::Direction,
            FieldDefault::Enumerated("anticlock"),
        ),
        FieldSpec::include("line_props", FieldType::LineProps),
    ];

    pub fn new(
        center: Coordinate,
        inner_radius: f64,
        outer_radius: f64,
        start_angle: Angle,
        end_angle: Angle,
    ) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
            angle_units: AngleUnits::default(),
            direction: Direction::default(),
            line_props: LineProps::default(),
            level: RenderLevel::default(),
        }
    }

    pub fn with_angle_units(mut self, units: AngleUnits) -> Self {
        self.angle_units = units;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_line_props(mut self, line_props: LineProps) -> Self {
        self.line_props = line_props;
        self
    }

    // Conservative: full-disc extents; the angular sweep is ignored.
    fn bounds(&self, ctx: &Resolver) -> Result<BBox, ResolveError> {
        let center = ctx.coordinate(&self.center)?;
        Ok(BBox::around(center, self.outer_radius, self.outer_radius))
    }
}

impl Shape for AnnularWedgeShape {
    fn class(&self) -> ShapeClass {
        ShapeClass::AnnularWedge
    }

    fn schema(&self) -> &'static [FieldSpec] {
        Self::SCHEMA
    }

    fn level(&self) -> RenderLevel {
        self.level
    }

    fn line_props(&self) -> &LineProps {
        &self.line_props
    }

    fn validate(&self) -> Result<(), ValidateError> {
        validate_non_negative("inner_radius", self.inner_radius)?;
        validate_non_negative("outer_radius", self.outer_radius)?;
        validate_finite("start_angle", self.start_angle.raw())?;
        validate_finite("end_angle", self.end_angle.raw())
    }
}

impl NodeTarget for AnnularWedgeShape {
    fn kind(&self) -> &'static str {
        self.class().as_str()
    }

    fn named_point(&self, term: NamedTerm, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        compass_point(&self.bounds(ctx)?, term).ok_or(ResolveError::UnsupportedTerm {
            kind: self.kind(),
            term,
        })
    }
}

/// A ring between two radii.
#[derive(Debug, Clone)]
pub struct AnnulusShape {
    pub center: Coordinate,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub line_props: LineProps,
    pub level: RenderLevel,
}

impl AnnulusShape {
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("center", FieldType::Coordinate),
        FieldSpec::required("inner_radius", FieldType::Float).non_negative(),
        FieldSpec::required("outer_radius", FieldType::Float).non_negative(),
        FieldSpec::include("line_props", FieldType::LineProps),
    ];

    pub fn new(center: Coordinate, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
            line_props: LineProps::default(),
            level: RenderLevel::default(),
        }
    }

    pub fn with_line_props(mut self, line_props: LineProps) -> Self {
        self.line_props = line_props;
        self
    }

    fn bounds(&self, ctx: &Resolver) -> Result<BBox, ResolveError> {
        let center = ctx.coordinate(&self.center)?;
        Ok(BBox::around(center, self.outer_radius, self.outer_radius))
    }
}

impl Shape for AnnulusShape {
    fn class(&self) -> ShapeClass {
        ShapeClass::Annulus
    }

    fn schema(&self) -> &'static [FieldSpec] {
        Self::SCHEMA
    }

    fn level(&self) -> RenderLevel {
        self.level
    }

    fn line_props(&self) -> &LineProps {
        &self.line_props
    }

    fn validate(&self) -> Result<(), ValidateError> {
        validate_non_negative("inner_radius", self.inner_radius)?;
        validate_non_negative("outer_radius", self.outer_radius)
    }
}

impl NodeTarget for AnnulusShape {
    fn kind(&self) -> &'static str {
        self.class().as_str()
    }

    fn named_point(&self, term: NamedTerm, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        compass_point(&self.bounds(ctx)?, term).ok_or(ResolveError::UnsupportedTerm {
            kind: self.kind(),
            term,
        })
    }
}

/// A circular arc between two angles.
#[derive(Debug)]
pub struct ArcShape {
    pub center: Coordinate,
    pub radius: f64,
    pub start_angle: Angle,
    pub end_angle: Angle,
    pub angle_units: AngleUnits,
    pub direction: Direction,
    pub line_props: LineProps,
    pub level: RenderLevel,
    nodes: NodesSlot<OpenPathNodes>,
}

impl ArcShape {
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("center", FieldType::Coordinate),
        FieldSpec::required("radius", FieldType::Float).non_negative(),
        FieldSpec::required("start_angle", FieldType::Angle),
        FieldSpec::required("end_angle", FieldType::Angle),
        FieldSpec::optional(
            "angle_units",
            FieldType::AngleUnits,
            FieldDefault::Enumerated("rad"),
        ),
        FieldSpec::optional(
            "direction",
            FieldType::Direction,
            FieldDefault::Enumerated("anticlock"),
        ),
        FieldSpec::include("line_props", FieldType::LineProps),
    ];

    pub fn new(center: Coordinate, radius: f64, start_angle: Angle, end_angle: Angle) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            angle_units: AngleUnits::default(),
            direction: Direction::default(),
            line_props: LineProps::default(),
            level: RenderLevel::default(),
            nodes: NodesSlot::new(),
        }
    }

    pub fn with_angle_units(mut self, units: AngleUnits) -> Self {
        self.angle_units = units;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_line_props(mut self, line_props: LineProps) -> Self {
        self.line_props = line_props;
        self
    }

    /// The endpoint and parametric anchors of this arc.
    ///
    /// Bound to this instance on first access; the same collection is
    /// returned for the rest of the shape's life.
    pub fn nodes(this: &Arc<Self>) -> &OpenPathNodes {
        this.nodes.get_or_bind(this)
    }

    // Conservative: full-circle extents; the angular sweep is ignored.
    fn bounds(&self, ctx: &Resolver) -> Result<BBox, ResolveError> {
        let center = ctx.coordinate(&self.center)?;
        Ok(BBox::around(center, self.radius, self.radius))
    }
}

impl Clone for ArcShape {
    fn clone(&self) -> Self {
        // A clone is a distinct target; anchors re-bind on first access.
        Self {
            center: self.center.clone(),
            radius: self.radius,
            start_angle: self.start_angle,
            end_angle: self.end_angle,
            angle_units: self.angle_units,
            direction: self.direction,
            line_props: self.line_props.clone(),
            level: self.level,
            nodes: NodesSlot::new(),
        }
    }
}

impl Shape for ArcShape {
    fn class(&self) -> ShapeClass {
        ShapeClass::Arc
    }

    fn schema(&self) -> &'static [FieldSpec] {
        Self::SCHEMA
    }

    fn level(&self) -> RenderLevel {
        self.level
    }

    fn line_props(&self) -> &LineProps {
        &self.line_props
    }

    fn validate(&self) -> Result<(), ValidateError> {
        validate_non_negative("radius", self.radius)?;
        validate_finite("start_angle", self.start_angle.raw())?;
        validate_finite("end_angle", self.end_angle.raw())
    }
}

impl NodeTarget for ArcShape {
    fn kind(&self) -> &'static str {
        self.class().as_str()
    }

    fn named_point(&self, term: NamedTerm, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        match term {
            NamedTerm::Start => self.parametric_point(0.0, ctx),
            NamedTerm::End => self.parametric_point(1.0, ctx),
            _ => compass_point(&self.bounds(ctx)?, term).ok_or(ResolveError::UnsupportedTerm {
                kind: self.kind(),
                term,
            }),
        }
    }

    fn parametric_point(&self, t: f64, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        let center = ctx.coordinate(&self.center)?;
        let angle = sweep_angle(
            self.start_angle,
            self.end_angle,
            self.angle_units,
            self.direction,
            t,
        );
        Ok(point_on_circle(center, self.radius, angle))
    }
}

/// A Bezier curve between two points with one or two control points.
#[derive(Debug)]
pub struct BezierShape {
    /// The start point.
    pub p0: Coordinate,
    /// The end point.
    pub p1: Coordinate,
    /// First control point.
    pub cp0: Coordinate,
    /// Second control point. `None` makes the curve quadratic, otherwise
    /// cubic.
    pub cp1: Option<Coordinate>,
    pub line_props: LineProps,
    pub level: RenderLevel,
    nodes: NodesSlot<OpenPathNodes>,
}

impl BezierShape {
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("p0", FieldType::Coordinate),
        FieldSpec::required("p1", FieldType::Coordinate),
        FieldSpec::required("cp0", FieldType::Coordinate),
        FieldSpec::optional("cp1", FieldType::Coordinate, FieldDefault::Null).nullable(),
        FieldSpec::include("line_props", FieldType::LineProps),
    ];

    pub fn new(p0: Coordinate, p1: Coordinate, cp0: Coordinate) -> Self {
        Self {
            p0,
            p1,
            cp0,
            cp1: None,
            line_props: LineProps::default(),
            level: RenderLevel::default(),
            nodes: NodesSlot::new(),
        }
    }

    pub fn with_cp1(mut self, cp1: Coordinate) -> Self {
        self.cp1 = Some(cp1);
        self
    }

    pub fn with_line_props(mut self, line_props: LineProps) -> Self {
        self.line_props = line_props;
        self
    }

    /// The endpoint and parametric anchors of this curve.
    pub fn nodes(this: &Arc<Self>) -> &OpenPathNodes {
        this.nodes.get_or_bind(this)
    }

    /// Whether the curve is quadratic (one control point) or cubic (two).
    pub fn is_quadratic(&self) -> bool {
        self.cp1.is_none()
    }

    // Conservative: the curve lies inside the control polygon's hull.
    fn bounds(&self, ctx: &Resolver) -> Result<BBox, ResolveError> {
        let mut bb = BBox::new();
        bb.expand_point(ctx.coordinate(&self.p0)?);
        bb.expand_point(ctx.coordinate(&self.p1)?);
        bb.expand_point(ctx.coordinate(&self.cp0)?);
        if let Some(cp1) = &self.cp1 {
            bb.expand_point(ctx.coordinate(cp1)?);
        }
        Ok(bb)
    }
}

impl Clone for BezierShape {
    fn clone(&self) -> Self {
        Self {
            p0: self.p0.clone(),
            p1: self.p1.clone(),
            cp0: self.cp0.clone(),
            cp1: self.cp1.clone(),
            line_props: self.line_props.clone(),
            level: self.level,
            nodes: NodesSlot::new(),
        }
    }
}

impl Shape for BezierShape {
    fn class(&self) -> ShapeClass {
        ShapeClass::Bezier
    }

    fn schema(&self) -> &'static [FieldSpec] {
        Self::SCHEMA
    }

    fn level(&self) -> RenderLevel {
        self.level
    }

    fn line_props(&self) -> &LineProps {
        &self.line_props
    }

    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

impl NodeTarget for BezierShape {
    fn kind(&self) -> &'static str {
        self.class().as_str()
    }

    fn named_point(&self, term: NamedTerm, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        match term {
            NamedTerm::Start => self.parametric_point(0.0, ctx),
            NamedTerm::End => self.parametric_point(1.0, ctx),
            _ => compass_point(&self.bounds(ctx)?, term).ok_or(ResolveError::UnsupportedTerm {
                kind: self.kind(),
                term,
            }),
        }
    }

    fn parametric_point(&self, t: f64, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        let p0 = ctx.coordinate(&self.p0)?;
        let p1 = ctx.coordinate(&self.p1)?;
        let cp0 = ctx.coordinate(&self.cp0)?;
        let u = 1.0 - t;
        let point = match &self.cp1 {
            None => u * u * p0 + 2.0 * u * t * cp0 + t * t * p1,
            Some(cp1) => {
                let cp1 = ctx.coordinate(cp1)?;
                u * u * u * p0 + 3.0 * u * u * t * cp0 + 3.0 * u * t * t * cp1 + t * t * t * p1
            }
        };
        Ok(point)
    }
}

/// A circle.
#[derive(Debug, Clone)]
pub struct CircleShape {
    pub center: Coordinate,
    pub radius: f64,
    pub line_props: LineProps,
    pub level: RenderLevel,
}

impl CircleShape {
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("center", FieldType::Coordinate),
        FieldSpec::required("radius", FieldType::Float).non_negative(),
        FieldSpec::include("line_props", FieldType::LineProps),
    ];

    pub fn new(center: Coordinate, radius: f64) -> Self {
        Self {
            center,
            radius,
            line_props: LineProps::default(),
            level: RenderLevel::default(),
        }
    }

    pub fn with_line_props(mut self, line_props: LineProps) -> Self {
        self.line_props = line_props;
        self
    }

    fn bounds(&self, ctx: &Resolver) -> Result<BBox, ResolveError> {
        let center = ctx.coordinate(&self.center)?;
        Ok(BBox::around(center, self.radius, self.radius))
    }
}

impl Shape for CircleShape {
    fn class(&self) -> ShapeClass {
        ShapeClass::Circle
    }

    fn schema(&self) -> &'static [FieldSpec] {
        Self::SCHEMA
    }

    fn level(&self) -> RenderLevel {
        self.level
    }

    fn line_props(&self) -> &LineProps {
        &self.line_props
    }

    fn validate(&self) -> Result<(), ValidateError> {
        validate_non_negative("radius", self.radius)
    }
}

impl NodeTarget for CircleShape {
    fn kind(&self) -> &'static str {
        self.class().as_str()
    }

    fn named_point(&self, term: NamedTerm, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        compass_point(&self.bounds(ctx)?, term).ok_or(ResolveError::UnsupportedTerm {
            kind: self.kind(),
            term,
        })
    }
}

/// A straight line between two points.
#[derive(Debug)]
pub struct LineShape {
    /// The start point.
    pub p0: Coordinate,
    /// The end point.
    pub p1: Coordinate,
    pub line_props: LineProps,
    pub level: RenderLevel,
    nodes: NodesSlot<OpenPathNodes>,
}

impl LineShape {
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("p0", FieldType::Coordinate),
        FieldSpec::required("p1", FieldType::Coordinate),
        FieldSpec::include("line_props", FieldType::LineProps),
    ];

    pub fn new(p0: Coordinate, p1: Coordinate) -> Self {
        Self {
            p0,
            p1,
            line_props: LineProps::default(),
            level: RenderLevel::default(),
            nodes: NodesSlot::new(),
        }
    }

    pub fn with_line_props(mut self, line_props: LineProps) -> Self {
        self.line_props = line_props;
        self
    }

    /// The endpoint and parametric anchors of this line.
    pub fn nodes(this: &Arc<Self>) -> &OpenPathNodes {
        this.nodes.get_or_bind(this)
    }

    fn bounds(&self, ctx: &Resolver) -> Result<BBox, ResolveError> {
        let mut bb = BBox::new();
        bb.expand_point(ctx.coordinate(&self.p0)?);
        bb.expand_point(ctx.coordinate(&self.p1)?);
        Ok(bb)
    }
}

impl Clone for LineShape {
    fn clone(&self) -> Self {
        Self {
            p0: self.p0.clone(),
            p1: self.p1.clone(),
            line_props: self.line_props.clone(),
            level: self.level,
            nodes: NodesSlot::new(),
        }
    }
}

impl Shape for LineShape {
    fn class(&self) -> ShapeClass {
        ShapeClass::Line
    }

    fn schema(&self) -> &'static [FieldSpec] {
        Self::SCHEMA
    }

    fn level(&self) -> RenderLevel {
        self.level
    }

    fn line_props(&self) -> &LineProps {
        &self.line_props
    }

    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

impl NodeTarget for LineShape {
    fn kind(&self) -> &'static str {
        self.class().as_str()
    }

    fn named_point(&self, term: NamedTerm, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        match term {
            NamedTerm::Start => self.parametric_point(0.0, ctx),
            NamedTerm::End => self.parametric_point(1.0, ctx),
            _ => compass_point(&self.bounds(ctx)?, term).ok_or(ResolveError::UnsupportedTerm {
                kind: self.kind(),
                term,
            }),
        }
    }

    fn parametric_point(&self, t: f64, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        let p0 = ctx.coordinate(&self.p0)?;
        let p1 = ctx.coordinate(&self.p1)?;
        Ok(p0.lerp(p1, t))
    }
}

/// A marker glyph at a point.
#[derive(Debug, Clone)]
pub struct MarkerShape {
    pub center: Coordinate,
    pub size: f64,
    pub variety: MarkerVariety,
    pub line_props: LineProps,
    pub fill_props: FillProps,
    pub hatch_props: HatchProps,
    pub level: RenderLevel,
}

impl MarkerShape {
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("center", FieldType::Coordinate),
        FieldSpec::required("size", FieldType::Float).non_negative(),
        FieldSpec::required("variety", FieldType::MarkerVariety),
        FieldSpec::include("line_props", FieldType::LineProps),
        FieldSpec::include("fill_props", FieldType::FillProps),
        FieldSpec::include("hatch_props", FieldType::HatchProps),
    ];

    pub fn new(center: Coordinate, size: f64, variety: MarkerVariety) -> Self {
        Self {
            center,
            size,
            variety,
            line_props: LineProps::default(),
            fill_props: FillProps::default(),
            hatch_props: HatchProps::default(),
            level: RenderLevel::default(),
        }
    }

    pub fn with_line_props(mut self, line_props: LineProps) -> Self {
        self.line_props = line_props;
        self
    }

    pub fn with_fill_props(mut self, fill_props: FillProps) -> Self {
        self.fill_props = fill_props;
        self
    }

    pub fn with_hatch_props(mut self, hatch_props: HatchProps) -> Self {
        self.hatch_props = hatch_props;
        self
    }

    fn bounds(&self, ctx: &Resolver) -> Result<BBox, ResolveError> {
        let center = ctx.coordinate(&self.center)?;
        let half = self.size / 2.0;
        Ok(BBox::around(center, half, half))
    }
}

impl Shape for MarkerShape {
    fn class(&self) -> ShapeClass {
        ShapeClass::Marker
    }

    fn schema(&self) -> &'static [FieldSpec] {
        Self::SCHEMA
    }

    fn level(&self) -> RenderLevel {
        self.level
    }

    fn line_props(&self) -> &LineProps {
        &self.line_props
    }

    fn validate(&self) -> Result<(), ValidateError> {
        validate_non_negative("size", self.size)
    }
}

impl NodeTarget for MarkerShape {
    fn kind(&self) -> &'static str {
        self.class().as_str()
    }

    fn named_point(&self, term: NamedTerm, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        compass_point(&self.bounds(ctx)?, term).ok_or(ResolveError::UnsupportedTerm {
            kind: self.kind(),
            term,
        })
    }
}

/// An interpolated curve through a sequence of points.
#[derive(Debug, Clone)]
pub struct SplineShape {
    pub points: Vec<Coordinate>,
    pub tension: f64,
    pub closed: bool,
    pub line_props: LineProps,
    pub level: RenderLevel,
}

impl SplineShape {
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("points", FieldType::CoordinateList),
        FieldSpec::optional("tension", FieldType::Float, FieldDefault::Float(0.5)),
        FieldSpec::optional("closed", FieldType::Bool, FieldDefault::Bool(false)),
        FieldSpec::include("line_props", FieldType::LineProps),
    ];

    pub fn new(points: Vec<Coordinate>) -> Self {
        Self {
            points,
            tension: 0.5,
            closed: false,
            line_props: LineProps::default(),
            level: RenderLevel::default(),
        }
    }

    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn with_line_props(mut self, line_props: LineProps) -> Self {
        self.line_props = line_props;
        self
    }

    fn bounds(&self, ctx: &Resolver) -> Result<BBox, ResolveError> {
        let mut bb = BBox::new();
        for point in &self.points {
            bb.expand_point(ctx.coordinate(point)?);
        }
        if bb.is_empty() {
            return Err(ResolveError::EmptyGeometry {
                kind: ShapeClass::Spline.as_str(),
            });
        }
        Ok(bb)
    }
}

impl Shape for SplineShape {
    fn class(&self) -> ShapeClass {
        ShapeClass::Spline
    }

    fn schema(&self) -> &'static [FieldSpec] {
        Self::SCHEMA
    }

    fn level(&self) -> RenderLevel {
        self.level
    }

    fn line_props(&self) -> &LineProps {
        &self.line_props
    }

    fn validate(&self) -> Result<(), ValidateError> {
        validate_finite("tension", self.tension)
    }
}

impl NodeTarget for SplineShape {
    fn kind(&self) -> &'static str {
        self.class().as_str()
    }

    // Parametric positions stay unsupported: evaluating the tensioned
    // interpolant is renderer math, not model state.
    fn named_point(&self, term: NamedTerm, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        compass_point(&self.bounds(ctx)?, term).ok_or(ResolveError::UnsupportedTerm {
            kind: self.kind(),
            term,
        })
    }
}

/// A filled circular wedge.
#[derive(Debug, Clone)]
pub struct WedgeShape {
    pub center: Coordinate,
    pub radius: f64,
    pub start_angle: Angle,
    pub end_angle: Angle,
    pub angle_units: AngleUnits,
    pub direction: Direction,
    pub line_props: LineProps,
    pub level: RenderLevel,
}

impl WedgeShape {
    pub const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("center", FieldType::Coordinate),
        FieldSpec::required("radius", FieldType::Float).non_negative(),
        FieldSpec::required("start_angle", FieldType::Angle),
        FieldSpec::required("end_angle", FieldType::Angle),
        FieldSpec::optional(
            "angle_units",
            FieldType::AngleUnits,
            FieldDefault::Enumerated("rad"),
        ),
        FieldSpec::optional(
            "direction",
            FieldType::Direction,
            FieldDefault::Enumerated("anticlock"),
        ),
        FieldSpec::include("line_props", FieldType::LineProps),
    ];

    pub fn new(center: Coordinate, radius: f64, start_angle: Angle, end_angle: Angle) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            angle_units: AngleUnits::default(),
            direction: Direction::default(),
            line_props: LineProps::default(),
            level: RenderLevel::default(),
        }
    }

    pub fn with_angle_units(mut self, units: AngleUnits) -> Self {
        self.angle_units = units;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_line_props(mut self, line_props: LineProps) -> Self {
        self.line_props = line_props;
        self
    }

    // Conservative: full-disc extents; the angular sweep is ignored.
    fn bounds(&self, ctx: &Resolver) -> Result<BBox, ResolveError> {
        let center = ctx.coordinate(&self.center)?;
        Ok(BBox::around(center, self.radius, self.radius))
    }
}

impl Shape for WedgeShape {
    fn class(&self) -> ShapeClass {
        ShapeClass::Wedge
    }

    fn schema(&self) -> &'static [FieldSpec] {
        Self::SCHEMA
    }

    fn level(&self) -> RenderLevel {
        self.level
    }

    fn line_props(&self) -> &LineProps {
        &self.line_props
    }

    fn validate(&self) -> Result<(), ValidateError> {
        validate_non_negative("radius", self.radius)?;
        validate_finite("start_angle", self.start_angle.raw())?;
        validate_finite("end_angle", self.end_angle.raw())
    }
}

impl NodeTarget for WedgeShape {
    fn kind(&self) -> &'static str {
        self.class().as_str()
    }

    fn named_point(&self, term: NamedTerm, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        compass_point(&self.bounds(ctx)?, term).ok_or(ResolveError::UnsupportedTerm {
            kind: self.kind(),
            term,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use crate::types::NumericError;

    fn xy(x: f64, y: f64) -> Coordinate {
        Coordinate::xy(x, y)
    }

    fn assert_close(a: DVec2, b: DVec2) {
        assert!(
            (a - b).length() < 1e-9,
            "expected {:?} to be close to {:?}",
            a,
            b
        );
    }

    // ==================== schema tests ====================

    #[test]
    fn circle_declares_required_center_and_radius() {
        let circle = CircleShape::new(xy(0.0, 0.0), 1.0);
        let spec = schema::field(circle.schema(), "center").unwrap();
        assert!(spec.required);
        assert_eq!(spec.ty, FieldType::Coordinate);

        let spec = schema::field(circle.schema(), "radius").unwrap();
        assert!(spec.required);
        assert!(spec.non_negative);
    }

    #[test]
    fn bezier_cp1_is_nullable_with_null_default() {
        let spec = schema::field(BezierShape::SCHEMA, "cp1").unwrap();
        assert!(spec.nullable);
        assert!(!spec.required);
        assert_eq!(spec.default, Some(FieldDefault::Null));
    }

    #[test]
    fn angle_units_default_declared_as_rad() {
        for schema_table in [ArcShape::SCHEMA, WedgeShape::SCHEMA, AnnularWedgeShape::SCHEMA] {
            let spec = schema::field(schema_table, "angle_units").unwrap();
            assert_eq!(spec.default, Some(FieldDefault::Enumerated("rad")));
            let spec = schema::field(schema_table, "direction").unwrap();
            assert_eq!(spec.default, Some(FieldDefault::Enumerated("anticlock")));
        }
    }

    #[test]
    fn marker_includes_all_three_property_groups() {
        assert!(schema::field(MarkerShape::SCHEMA, "line_props").is_some());
        assert!(schema::field(MarkerShape::SCHEMA, "fill_props").is_some());
        assert!(schema::field(MarkerShape::SCHEMA, "hatch_props").is_some());
        // paths carry only line properties
        assert!(schema::field(LineShape::SCHEMA, "fill_props").is_none());
    }

    #[test]
    fn spline_schema_defaults() {
        let spec = schema::field(SplineShape::SCHEMA, "tension").unwrap();
        assert_eq!(spec.default, Some(FieldDefault::Float(0.5)));
        let spec = schema::field(SplineShape::SCHEMA, "closed").unwrap();
        assert_eq!(spec.default, Some(FieldDefault::Bool(false)));
    }

    // ==================== validation tests ====================

    #[test]
    fn negative_radius_fails_validation() {
        let circle = CircleShape::new(xy(0.0, 0.0), -1.0);
        let err = circle.validate().unwrap_err();
        assert_eq!(err.field, "radius");
        assert_eq!(err.source, NumericError::Negative);
    }

    #[test]
    fn nan_angle_fails_validation() {
        let arc = ArcShape::new(xy(0.0, 0.0), 1.0, Angle(f64::NAN), Angle(1.0));
        let err = arc.validate().unwrap_err();
        assert_eq!(err.field, "start_angle");
        assert_eq!(err.source, NumericError::NaN);
    }

    #[test]
    fn negative_marker_size_fails_validation() {
        let marker = MarkerShape::new(xy(0.0, 0.0), -3.0, MarkerVariety::Circle);
        assert_eq!(marker.validate().unwrap_err().field, "size");
    }

    #[test]
    fn valid_shapes_pass_validation() {
        assert!(CircleShape::new(xy(0.0, 0.0), 2.0).validate().is_ok());
        assert!(
            AnnulusShape::new(xy(0.0, 0.0), 1.0, 2.0).validate().is_ok()
        );
        assert!(
            SplineShape::new(vec![xy(0.0, 0.0), xy(1.0, 1.0)])
                .validate()
                .is_ok()
        );
    }

    // ==================== level / dispatch tests ====================

    #[test]
    fn shapes_default_to_annotation_level() {
        let line = LineShape::new(xy(0.0, 0.0), xy(1.0, 1.0));
        assert_eq!(line.level(), RenderLevel::Annotation);
    }

    #[test]
    fn shape_enum_dispatches() {
        let shape: ShapeEnum = CircleShape::new(xy(0.0, 0.0), 1.0).into();
        assert_eq!(shape.class(), ShapeClass::Circle);
        assert!(shape.validate().is_ok());

        let shape: ShapeEnum = MarkerShape::new(xy(0.0, 0.0), -1.0, MarkerVariety::X).into();
        assert_eq!(shape.class(), ShapeClass::Marker);
        assert!(shape.validate().is_err());
    }

    // ==================== nodes attachment tests ====================

    #[test]
    fn arc_nodes_collection_is_identity_stable() {
        let arc = Arc::new(ArcShape::new(xy(0.0, 0.0), 1.0, Angle(0.0), Angle(1.0)));
        let a: *const OpenPathNodes = ArcShape::nodes(&arc);
        let b: *const OpenPathNodes = ArcShape::nodes(&arc);
        assert_eq!(a, b);
    }

    #[test]
    fn clone_resets_the_nodes_slot() {
        let line = Arc::new(LineShape::new(xy(0.0, 0.0), xy(1.0, 0.0)));
        let node = LineShape::nodes(&line).start();

        let copy = Arc::new((*line).clone());
        let copy_node = LineShape::nodes(&copy).start();

        assert!(node.target().points_to(&line));
        assert!(copy_node.target().points_to(&copy));
        assert!(!node.target().points_to(&copy));
    }

    // ==================== resolution tests ====================

    #[test]
    fn line_parametric_is_linear_interpolation() {
        let line = Arc::new(LineShape::new(xy(0.0, 0.0), xy(4.0, 2.0)));
        let ctx = Resolver::new();

        let mid = LineShape::nodes(&line).parametric(0.5);
        assert_close(ctx.node(&mid).unwrap(), DVec2::new(2.0, 1.0));

        let start = LineShape::nodes(&line).start();
        assert_close(ctx.node(&start).unwrap(), DVec2::new(0.0, 0.0));
        let end = LineShape::nodes(&line).end();
        assert_close(ctx.node(&end).unwrap(), DVec2::new(4.0, 2.0));
    }

    #[test]
    fn quadratic_bezier_hits_endpoints_and_midpoint() {
        let curve = Arc::new(BezierShape::new(xy(0.0, 0.0), xy(2.0, 0.0), xy(1.0, 2.0)));
        assert!(curve.is_quadratic());
        let ctx = Resolver::new();

        let nodes = BezierShape::nodes(&curve);
        assert_close(ctx.node(&nodes.start()).unwrap(), DVec2::new(0.0, 0.0));
        assert_close(ctx.node(&nodes.end()).unwrap(), DVec2::new(2.0, 0.0));
        // B(0.5) = 0.25*p0 + 0.5*cp0 + 0.25*p1
        assert_close(
            ctx.node(&nodes.parametric(0.5)).unwrap(),
            DVec2::new(1.0, 1.0),
        );
    }

    #[test]
    fn cubic_bezier_uses_second_control_point() {
        let curve = Arc::new(
            BezierShape::new(xy(0.0, 0.0), xy(3.0, 0.0), xy(1.0, 3.0)).with_cp1(xy(2.0, 3.0)),
        );
        assert!(!curve.is_quadratic());
        let ctx = Resolver::new();

        let nodes = BezierShape::nodes(&curve);
        assert_close(ctx.node(&nodes.start()).unwrap(), DVec2::new(0.0, 0.0));
        assert_close(ctx.node(&nodes.end()).unwrap(), DVec2::new(3.0, 0.0));
        // B(0.5) = (p0 + 3*cp0 + 3*cp1 + p1) / 8
        assert_close(
            ctx.node(&nodes.parametric(0.5)).unwrap(),
            DVec2::new(1.5, 2.25),
        );
    }

    #[test]
    fn arc_start_and_end_respect_degree_units() {
        let arc = Arc::new(
            ArcShape::new(xy(0.0, 0.0), 2.0, Angle(0.0), Angle(90.0))
                .with_angle_units(AngleUnits::Deg),
        );
        let ctx = Resolver::new();

        let nodes = ArcShape::nodes(&arc);
        assert_close(ctx.node(&nodes.start()).unwrap(), DVec2::new(2.0, 0.0));
        assert_close(ctx.node(&nodes.end()).unwrap(), DVec2::new(0.0, 2.0));
        // halfway along the anticlockwise quarter turn
        let sqrt2 = std::f64::consts::SQRT_2;
        assert_close(
            ctx.node(&nodes.parametric(0.5)).unwrap(),
            DVec2::new(sqrt2, sqrt2),
        );
    }

    #[test]
    fn arc_direction_flips_the_sweep() {
        let arc = Arc::new(
            ArcShape::new(xy(0.0, 0.0), 1.0, Angle(0.0), Angle(90.0))
                .with_angle_units(AngleUnits::Deg)
                .with_direction(Direction::Clock),
        );
        let ctx = Resolver::new();

        // Clockwise from 0 to 90 goes the long way round: 270 degrees of
        // negative sweep, so halfway lands at -135 degrees.
        let halfway = ctx
            .node(&ArcShape::nodes(&arc).parametric(0.5))
            .unwrap();
        let expected = DVec2::new(
            (-135.0f64).to_radians().cos(),
            (-135.0f64).to_radians().sin(),
        );
        assert_close(halfway, expected);
    }

    #[test]
    fn circle_compass_points() {
        let circle = Arc::new(CircleShape::new(xy(1.0, 1.0), 2.0));
        let ctx = Resolver::new();

        let center = circle
            .named_point(NamedTerm::Center, &ctx)
            .unwrap();
        assert_close(center, DVec2::new(1.0, 1.0));

        let top_left = circle.named_point(NamedTerm::TopLeft, &ctx).unwrap();
        assert_close(top_left, DVec2::new(-1.0, 3.0));

        let err = circle.named_point(NamedTerm::Start, &ctx).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnsupportedTerm {
                kind: "circle",
                term: NamedTerm::Start
            }
        );
    }

    #[test]
    fn circle_has_no_parametric_positions() {
        let circle = Arc::new(CircleShape::new(xy(0.0, 0.0), 1.0));
        let ctx = Resolver::new();
        assert_eq!(
            circle.parametric_point(0.5, &ctx).unwrap_err(),
            ResolveError::NotAPath { kind: "circle" }
        );
    }

    #[test]
    fn empty_spline_has_no_geometry() {
        let spline = Arc::new(SplineShape::new(Vec::new()));
        let ctx = Resolver::new();
        assert_eq!(
            spline.named_point(NamedTerm::Center, &ctx).unwrap_err(),
            ResolveError::EmptyGeometry { kind: "spline" }
        );
    }

    #[test]
    fn spline_compass_points_from_control_points() {
        let spline = Arc::new(
            SplineShape::new(vec![xy(0.0, 0.0), xy(2.0, 4.0), xy(4.0, 0.0)]).with_tension(0.3),
        );
        let ctx = Resolver::new();
        assert_close(
            spline.named_point(NamedTerm::Center, &ctx).unwrap(),
            DVec2::new(2.0, 2.0),
        );
    }

    #[test]
    fn chained_coordinates_resolve_through_nodes() {
        // A marker centered on the midpoint of a line.
        let line = Arc::new(LineShape::new(xy(0.0, 0.0), xy(4.0, 0.0)));
        let midpoint = LineShape::nodes(&line).parametric(0.5);

        let marker = MarkerShape::new(midpoint.into(), 2.0, MarkerVariety::Diamond);
        let shared = Arc::new(marker);
        let ctx = Resolver::new();

        let top = shared.named_point(NamedTerm::TopCenter, &ctx).unwrap();
        assert_close(top, DVec2::new(2.0, 1.0));
    }
}
