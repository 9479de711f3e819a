//! On-demand resolution of coordinates and anchor nodes.
//!
//! A node never caches a resolved position; the [`Resolver`] reads the
//! target's current field values every time, so anchors track mutations to
//! the shapes they are attached to. Coordinates may chain through nodes of
//! other shapes, so resolution carries a depth budget to fail cleanly on
//! reference cycles.

use std::cell::Cell;

use glam::DVec2;

use crate::coordinates::{Coordinate, NamedTerm, Node, NodeKey};
use crate::errors::ResolveError;
use crate::log::warn;
use crate::types::BBox;

/// Map a compass term onto a bounding box (y-up: `top_*` is `max.y`).
///
/// `None` for `start`/`end`, which are path anchors, not box anchors.
pub fn compass_point(bounds: &BBox, term: NamedTerm) -> Option<DVec2> {
    let c = bounds.center();
    match term {
        NamedTerm::TopLeft => Some(DVec2::new(bounds.min.x, bounds.max.y)),
        NamedTerm::TopCenter => Some(DVec2::new(c.x, bounds.max.y)),
        NamedTerm::TopRight => Some(bounds.max),
        NamedTerm::CenterLeft => Some(DVec2::new(bounds.min.x, c.y)),
        NamedTerm::Center => Some(c),
        NamedTerm::CenterRight => Some(DVec2::new(bounds.max.x, c.y)),
        NamedTerm::BottomLeft => Some(bounds.min),
        NamedTerm::BottomCenter => Some(DVec2::new(c.x, bounds.min.y)),
        NamedTerm::BottomRight => Some(DVec2::new(bounds.max.x, bounds.min.y)),
        NamedTerm::Start | NamedTerm::End => None,
    }
}

/// Resolution context.
///
/// Cheap to construct; one per resolution pass is fine. Not shared across
/// threads; each consumer makes its own.
pub struct Resolver {
    depth: Cell<u32>,
}

impl Resolver {
    /// Longest coordinate reference chain before resolution fails.
    pub const MAX_DEPTH: u32 = 32;

    pub fn new() -> Self {
        Resolver {
            depth: Cell::new(0),
        }
    }

    /// Resolve a coordinate reference to a concrete data-space point.
    pub fn coordinate(&self, coord: &Coordinate) -> Result<DVec2, ResolveError> {
        match coord {
            Coordinate::Xy(p) => {
                if p.is_finite() {
                    Ok(*p)
                } else {
                    Err(ResolveError::NonFinite)
                }
            }
            Coordinate::Node(node) => self.node(node),
        }
    }

    /// Resolve a node handle against its target's current geometry.
    pub fn node(&self, node: &Node) -> Result<DVec2, ResolveError> {
        let Some(target) = node.target().upgrade() else {
            warn!("resolving a node whose target was dropped");
            return Err(ResolveError::TargetDropped);
        };

        let _guard = self.descend()?;
        let point = match node.key() {
            NodeKey::Named(term) => target.named_point(term, self)?,
            NodeKey::Parametric(t) => target.parametric_point(t, self)?,
        };
        if point.is_finite() {
            Ok(point)
        } else {
            Err(ResolveError::NonFinite)
        }
    }

    fn descend(&self) -> Result<DepthGuard<'_>, ResolveError> {
        let depth = self.depth.get();
        if depth >= Self::MAX_DEPTH {
            return Err(ResolveError::DepthExceeded {
                max: Self::MAX_DEPTH,
            });
        }
        self.depth.set(depth + 1);
        Ok(DepthGuard { resolver: self })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

struct DepthGuard<'a> {
    resolver: &'a Resolver,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let depth = self.resolver.depth.get();
        self.resolver.depth.set(depth - 1);
    }
}
