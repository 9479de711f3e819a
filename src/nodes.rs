//! Anchor-node collections: per-shape, lazily created, memoized.
//!
//! The original models hand this to descriptor attribute magic; here it is
//! explicit get-or-init. A shape embeds a [`NodesSlot`], the slot binds one
//! collection instance on first access, and each named slot inside the
//! collection materializes its handle once. Parametric positions are the
//! deliberate exception: a continuous domain cannot be enumerated, so
//! [`OpenPathNodes::parametric`] builds a fresh handle on every call.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::coordinates::{NamedTerm, Node, NodeTarget, TargetRef};
use crate::log::{debug, trace};

/// One memoized named-node slot.
///
/// First read constructs the node and caches it; every later read returns
/// the identical handle, so downstream consumers can key identity-based
/// maps on it.
#[derive(Debug, Default)]
pub(crate) struct NodeSlot {
    cell: OnceLock<Node>,
}

impl NodeSlot {
    pub(crate) const fn new() -> Self {
        NodeSlot {
            cell: OnceLock::new(),
        }
    }

    pub(crate) fn get_or_create(&self, target: &TargetRef, term: NamedTerm) -> Node {
        self.cell
            .get_or_init(|| {
                trace!("materializing named node `{}`", term);
                Node::named(target.clone(), term)
            })
            .clone()
    }
}

/// Common behavior for anchor-node collections.
///
/// A collection is owned by exactly one shape instance and exposes a fixed,
/// non-extensible vocabulary of named terms.
pub trait NodeCollection: fmt::Display + Send + Sync + Sized {
    /// Bind a fresh collection to its owning shape.
    fn bind(target: TargetRef) -> Self;

    /// The shape this collection is bound to.
    fn target(&self) -> &TargetRef;

    /// The fixed vocabulary of named terms this collection exposes.
    fn terms() -> &'static [NamedTerm];
}

/// The nine compass-point anchors of a box-like target.
#[derive(Debug)]
pub struct BoxNodes {
    target: TargetRef,
    top_left: NodeSlot,
    top_center: NodeSlot,
    top_right: NodeSlot,
    center_left: NodeSlot,
    center: NodeSlot,
    center_right: NodeSlot,
    bottom_left: NodeSlot,
    bottom_center: NodeSlot,
    bottom_right: NodeSlot,
}

impl BoxNodes {
    pub fn top_left(&self) -> Node {
        self.top_left.get_or_create(&self.target, NamedTerm::TopLeft)
    }

    pub fn top_center(&self) -> Node {
        self.top_center.get_or_create(&self.target, NamedTerm::TopCenter)
    }

    pub fn top_right(&self) -> Node {
        self.top_right.get_or_create(&self.target, NamedTerm::TopRight)
    }

    pub fn center_left(&self) -> Node {
        self.center_left.get_or_create(&self.target, NamedTerm::CenterLeft)
    }

    pub fn center(&self) -> Node {
        self.center.get_or_create(&self.target, NamedTerm::Center)
    }

    pub fn center_right(&self) -> Node {
        self.center_right.get_or_create(&self.target, NamedTerm::CenterRight)
    }

    pub fn bottom_left(&self) -> Node {
        self.bottom_left.get_or_create(&self.target, NamedTerm::BottomLeft)
    }

    pub fn bottom_center(&self) -> Node {
        self.bottom_center.get_or_create(&self.target, NamedTerm::BottomCenter)
    }

    pub fn bottom_right(&self) -> Node {
        self.bottom_right.get_or_create(&self.target, NamedTerm::BottomRight)
    }

    /// Look a slot up by term. `None` for `Start`/`End`, which box targets
    /// do not expose.
    pub fn get(&self, term: NamedTerm) -> Option<Node> {
        match term {
            NamedTerm::TopLeft => Some(self.top_left()),
            NamedTerm::TopCenter => Some(self.top_center()),
            NamedTerm::TopRight => Some(self.top_right()),
            NamedTerm::CenterLeft => Some(self.center_left()),
            NamedTerm::Center => Some(self.center()),
            NamedTerm::CenterRight => Some(self.center_right()),
            NamedTerm::BottomLeft => Some(self.bottom_left()),
            NamedTerm::BottomCenter => Some(self.bottom_center()),
            NamedTerm::BottomRight => Some(self.bottom_right()),
            NamedTerm::Start | NamedTerm::End => None,
        }
    }
}

impl NodeCollection for BoxNodes {
    fn bind(target: TargetRef) -> Self {
        BoxNodes {
            target,
            top_left: NodeSlot::new(),
            top_center: NodeSlot::new(),
            top_right: NodeSlot::new(),
            center_left: NodeSlot::new(),
            center: NodeSlot::new(),
            center_right: NodeSlot::new(),
            bottom_left: NodeSlot::new(),
            bottom_center: NodeSlot::new(),
            bottom_right: NodeSlot::new(),
        }
    }

    fn target(&self) -> &TargetRef {
        &self.target
    }

    fn terms() -> &'static [NamedTerm] {
        &NamedTerm::COMPASS
    }
}

impl fmt::Display for BoxNodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxNodes(target={:?})", self.target)
    }
}

/// The endpoint anchors of an open path, plus parametric positions.
#[derive(Debug)]
pub struct OpenPathNodes {
    target: TargetRef,
    start: NodeSlot,
    end: NodeSlot,
}

impl OpenPathNodes {
    const TERMS: [NamedTerm; 2] = [NamedTerm::Start, NamedTerm::End];

    pub fn start(&self) -> Node {
        self.start.get_or_create(&self.target, NamedTerm::Start)
    }

    pub fn end(&self) -> Node {
        self.end.get_or_create(&self.target, NamedTerm::End)
    }

    /// A position at parameter `t` along the path, `t` conventionally in
    /// `[0, 1]`.
    ///
    /// Always a fresh handle, never memoized: parametric positions form a
    /// continuous domain, so caching by value would be unbounded.
    pub fn parametric(&self, t: f64) -> Node {
        Node::parametric(self.target.clone(), t)
    }
}

impl NodeCollection for OpenPathNodes {
    fn bind(target: TargetRef) -> Self {
        OpenPathNodes {
            target,
            start: NodeSlot::new(),
            end: NodeSlot::new(),
        }
    }

    fn target(&self) -> &TargetRef {
        &self.target
    }

    fn terms() -> &'static [NamedTerm] {
        &Self::TERMS
    }
}

impl fmt::Display for OpenPathNodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpenPathNodes(target={:?})", self.target)
    }
}

/// Lazily binds one collection instance to a shape.
///
/// Embedded in the shape struct. The first `get_or_bind` constructs the
/// collection with the shape as target; the same instance is returned for
/// the rest of the shape's life, including under concurrent first access.
pub struct NodesSlot<C> {
    cell: OnceLock<C>,
}

impl<C: NodeCollection> NodesSlot<C> {
    pub const fn new() -> Self {
        NodesSlot {
            cell: OnceLock::new(),
        }
    }

    pub fn get_or_bind<T>(&self, target: &Arc<T>) -> &C
    where
        T: NodeTarget + 'static,
    {
        self.cell.get_or_init(|| {
            debug!("binding node collection to {}", target.kind());
            C::bind(TargetRef::new(target))
        })
    }
}

impl<C: NodeCollection> Default for NodesSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for NodesSlot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.cell.get().is_some() {
            "NodesSlot(bound)"
        } else {
            "NodesSlot(unbound)"
        })
    }
}
