//! Declarative 2D shape models with lazily-bound anchor nodes.
//!
//! Shapes (`arc`, `bezier`, `circle`, `line`, `marker`, …) are plain data
//! models carrying a declarative field schema. Path-like shapes expose
//! *anchor nodes*: handles for positions on the shape (`start`, `end`, a
//! parametric point along the path) that are created lazily, memoized per
//! shape instance, and only turned into concrete coordinates when a
//! [`resolve::Resolver`] reads the shape's current field values.
//!
//! ```
//! use std::sync::Arc;
//!
//! use plotmark::coordinates::{Coordinate, Node};
//! use plotmark::resolve::Resolver;
//! use plotmark::shapes::ArcShape;
//! use plotmark::types::{Angle, AngleUnits};
//!
//! let arc = Arc::new(
//!     ArcShape::new(Coordinate::xy(0.0, 0.0), 1.0, Angle(0.0), Angle(90.0))
//!         .with_angle_units(AngleUnits::Deg),
//! );
//!
//! // Named anchors are memoized: the identical handle every time.
//! let start = ArcShape::nodes(&arc).start();
//! assert!(Node::ptr_eq(&start, &ArcShape::nodes(&arc).start()));
//!
//! // Parametric anchors are fresh handles, resolved on demand.
//! let mid = ArcShape::nodes(&arc).parametric(0.5);
//! let point = Resolver::new().node(&mid)?;
//! assert!((point.length() - 1.0).abs() < 1e-9);
//! # Ok::<(), plotmark::errors::ResolveError>(())
//! ```

pub mod coordinates;
pub mod errors;
pub mod log;
pub mod nodes;
pub mod resolve;
pub mod schema;
pub mod shapes;
pub mod types;
pub mod visuals;

// Re-export commonly used items
pub use coordinates::{Coordinate, NamedTerm, Node, NodeKey, NodeTarget, TargetRef};
pub use nodes::{BoxNodes, NodeCollection, NodesSlot, OpenPathNodes};
pub use resolve::Resolver;
pub use shapes::{
    AnnularWedgeShape, AnnulusShape, ArcShape, BezierShape, CircleShape, LineShape, MarkerShape,
    MarkerVariety, RenderLevel, Shape, ShapeClass, ShapeEnum, SplineShape, WedgeShape,
};
pub use types::{Angle, AngleUnits, BBox, Direction};
