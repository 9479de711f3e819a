//! Coordinate references and anchor-node handles.
//!
//! A [`Node`] is a pure value-identity key over `(target, discriminant)`.
//! It carries no geometry of its own: resolving it to a concrete point
//! happens on demand against the target's *current* field values (see
//! [`crate::resolve`]), so a handle stays valid when the shape it is
//! anchored on is later mutated.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use glam::DVec2;

use crate::errors::ResolveError;
use crate::resolve::Resolver;

/// The fixed vocabulary of named anchor positions.
///
/// Box-like targets expose the nine compass-point terms; open paths expose
/// `Start` and `End`. The snake_case form from [`as_str`](NamedTerm::as_str)
/// is the canonical name used in debug output and serialized models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedTerm {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Start,
    End,
}

impl NamedTerm {
    /// The nine compass-point terms, row by row from the top left.
    pub const COMPASS: [NamedTerm; 9] = [
        NamedTerm::TopLeft,
        NamedTerm::TopCenter,
        NamedTerm::TopRight,
        NamedTerm::CenterLeft,
        NamedTerm::Center,
        NamedTerm::CenterRight,
        NamedTerm::BottomLeft,
        NamedTerm::BottomCenter,
        NamedTerm::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NamedTerm::TopLeft => "top_left",
            NamedTerm::TopCenter => "top_center",
            NamedTerm::TopRight => "top_right",
            NamedTerm::CenterLeft => "center_left",
            NamedTerm::Center => "center",
            NamedTerm::CenterRight => "center_right",
            NamedTerm::BottomLeft => "bottom_left",
            NamedTerm::BottomCenter => "bottom_center",
            NamedTerm::BottomRight => "bottom_right",
            NamedTerm::Start => "start",
            NamedTerm::End => "end",
        }
    }

    /// True for the nine box terms, false for `Start`/`End`.
    pub fn is_compass(self) -> bool {
        !matches!(self, NamedTerm::Start | NamedTerm::End)
    }
}

impl fmt::Display for NamedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Anything anchor nodes can attach to.
///
/// Implementors resolve anchors against whatever their geometry currently
/// is; the defaults reject everything, so a target only answers for the
/// terms it actually supports.
pub trait NodeTarget: Send + Sync {
    /// Short label naming the target kind, for debug output.
    fn kind(&self) -> &'static str;

    /// Current position of a named anchor.
    fn named_point(&self, term: NamedTerm, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        let _ = ctx;
        Err(ResolveError::UnsupportedTerm {
            kind: self.kind(),
            term,
        })
    }

    /// Current position at parameter `t` along the path, if path-like.
    fn parametric_point(&self, t: f64, ctx: &Resolver) -> Result<DVec2, ResolveError> {
        let _ = (t, ctx);
        Err(ResolveError::NotAPath { kind: self.kind() })
    }
}

/// Weak handle to the shape a node is anchored on.
///
/// Shapes own their node collections and collections own their node
/// handles; the back-reference here is weak, so no strong cycle exists and
/// a node can never keep its shape alive.
#[derive(Clone)]
pub struct TargetRef(Weak<dyn NodeTarget>);

impl TargetRef {
    pub fn new<T: NodeTarget + 'static>(target: &Arc<T>) -> Self {
        let strong: Arc<dyn NodeTarget> = target.clone();
        let weak: Weak<dyn NodeTarget> = Arc::downgrade(&strong);
        TargetRef(weak)
    }

    /// Upgrade to the live target, if the owning shape is still alive.
    pub fn upgrade(&self) -> Option<Arc<dyn NodeTarget>> {
        self.0.upgrade()
    }

    /// Whether this reference points at the given shape instance.
    pub fn points_to<T: NodeTarget + 'static>(&self, target: &Arc<T>) -> bool {
        self.thin_ptr() == Arc::as_ptr(target) as *const ()
    }

    /// Whether two references share the same target instance.
    pub fn same_target(&self, other: &TargetRef) -> bool {
        self.thin_ptr() == other.thin_ptr()
    }

    // Data pointer only; vtable pointers are not stable across codegen units.
    fn thin_ptr(&self) -> *const () {
        Weak::as_ptr(&self.0) as *const ()
    }
}

impl fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.upgrade() {
            Some(target) => write!(f, "{}", target.kind()),
            None => write!(f, "<dropped>"),
        }
    }
}

#[derive(Debug)]
enum NodeRepr {
    Named { target: TargetRef, term: NamedTerm },
    Parametric { target: TargetRef, t: f64 },
}

/// The discriminant of a node: which anchor on its target it identifies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKey {
    Named(NamedTerm),
    Parametric(f64),
}

/// A lazily-resolved position handle anchored on a shape.
///
/// Cloning is cheap and preserves handle identity (see [`Node::ptr_eq`]).
/// Equality and hashing are value-identity over `(target, term)` or
/// `(target, t)`, with the parameter compared bitwise, so nodes work as
/// keys in hash maps.
#[derive(Debug, Clone)]
pub struct Node(Arc<NodeRepr>);

impl Node {
    /// A named anchor: `(target, term)`.
    pub fn named(target: TargetRef, term: NamedTerm) -> Node {
        Node(Arc::new(NodeRepr::Named { target, term }))
    }

    /// A parametric anchor: `(target, t)`, `t` conventionally in `[0, 1]`.
    pub fn parametric(target: TargetRef, t: f64) -> Node {
        Node(Arc::new(NodeRepr::Parametric { target, t }))
    }

    pub fn target(&self) -> &TargetRef {
        match &*self.0 {
            NodeRepr::Named { target, .. } => target,
            NodeRepr::Parametric { target, .. } => target,
        }
    }

    /// The discriminant half of this node's `(target, discriminant)` key.
    pub fn key(&self) -> NodeKey {
        match &*self.0 {
            NodeRepr::Named { term, .. } => NodeKey::Named(*term),
            NodeRepr::Parametric { t, .. } => NodeKey::Parametric(*t),
        }
    }

    /// The term of a named node, `None` for parametric nodes.
    pub fn term(&self) -> Option<NamedTerm> {
        match &*self.0 {
            NodeRepr::Named { term, .. } => Some(*term),
            NodeRepr::Parametric { .. } => None,
        }
    }

    /// The parameter of a parametric node, `None` for named nodes.
    pub fn parameter(&self) -> Option<f64> {
        match &*self.0 {
            NodeRepr::Named { .. } => None,
            NodeRepr::Parametric { t, .. } => Some(*t),
        }
    }

    /// Handle identity: true only for clones of the same handle.
    ///
    /// Named nodes are memoized per collection, so repeated slot reads are
    /// `ptr_eq`; parametric nodes are constructed fresh on every call and
    /// never are, even for equal parameters.
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        match (&*self.0, &*other.0) {
            (
                NodeRepr::Named { target: a, term: ta },
                NodeRepr::Named { target: b, term: tb },
            ) => ta == tb && a.same_target(b),
            (
                NodeRepr::Parametric { target: a, t: x },
                NodeRepr::Parametric { target: b, t: y },
            ) => x.to_bits() == y.to_bits() && a.same_target(b),
            _ => false,
        }
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &*self.0 {
            NodeRepr::Named { target, term } => {
                state.write_u8(0);
                (target.thin_ptr() as usize).hash(state);
                term.hash(state);
            }
            NodeRepr::Parametric { target, t } => {
                state.write_u8(1);
                (target.thin_ptr() as usize).hash(state);
                t.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            NodeRepr::Named { target, term } => {
                write!(f, "Node(target={:?}, term={})", target, term)
            }
            NodeRepr::Parametric { target, t } => {
                write!(f, "Node(target={:?}, t={})", target, t)
            }
        }
    }
}

/// A point reference: either a concrete data-space value or an indirect
/// node reference resolved against another shape's live geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    /// Concrete (x, y) in data space
    Xy(DVec2),
    /// Position anchored on a shape
    Node(Node),
}

impl Coordinate {
    pub fn xy(x: f64, y: f64) -> Coordinate {
        Coordinate::Xy(DVec2::new(x, y))
    }
}

impl From<DVec2> for Coordinate {
    fn from(p: DVec2) -> Coordinate {
        Coordinate::Xy(p)
    }
}

impl From<Node> for Coordinate {
    fn from(node: Node) -> Coordinate {
        Coordinate::Node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct Dummy;

    impl NodeTarget for Dummy {
        fn kind(&self) -> &'static str {
            "dummy"
        }
    }

    #[test]
    fn compass_vocabulary_is_nine_terms() {
        assert_eq!(NamedTerm::COMPASS.len(), 9);
        for term in NamedTerm::COMPASS {
            assert!(term.is_compass());
        }
        assert!(!NamedTerm::Start.is_compass());
        assert!(!NamedTerm::End.is_compass());
    }

    #[test]
    fn term_canonical_names() {
        assert_eq!(NamedTerm::Center.as_str(), "center");
        assert_eq!(NamedTerm::TopLeft.as_str(), "top_left");
        assert_eq!(NamedTerm::BottomCenter.as_str(), "bottom_center");
        assert_eq!(NamedTerm::Start.as_str(), "start");
    }

    #[test]
    fn named_node_accessors() {
        let target = Arc::new(Dummy);
        let node = Node::named(TargetRef::new(&target), NamedTerm::Center);

        assert_eq!(node.term(), Some(NamedTerm::Center));
        assert_eq!(node.parameter(), None);
        assert!(node.target().points_to(&target));
    }

    #[test]
    fn parametric_node_accessors() {
        let target = Arc::new(Dummy);
        let node = Node::parametric(TargetRef::new(&target), 0.25);

        assert_eq!(node.term(), None);
        assert_eq!(node.parameter(), Some(0.25));
        assert!(node.target().points_to(&target));
    }

    #[test]
    fn node_value_equality() {
        let target = Arc::new(Dummy);
        let a = Node::named(TargetRef::new(&target), NamedTerm::Start);
        let b = Node::named(TargetRef::new(&target), NamedTerm::Start);
        let c = Node::named(TargetRef::new(&target), NamedTerm::End);

        // Distinct handles, same (target, term) key.
        assert!(!Node::ptr_eq(&a, &b));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let other = Arc::new(Dummy);
        let d = Node::named(TargetRef::new(&other), NamedTerm::Start);
        assert_ne!(a, d);
    }

    #[test]
    fn parametric_equality_is_bitwise_on_t() {
        let target = Arc::new(Dummy);
        let a = Node::parametric(TargetRef::new(&target), 0.5);
        let b = Node::parametric(TargetRef::new(&target), 0.5);
        let c = Node::parametric(TargetRef::new(&target), 0.75);

        assert!(!Node::ptr_eq(&a, &b));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let named = Node::named(TargetRef::new(&target), NamedTerm::Start);
        assert_ne!(a, named);
    }

    #[test]
    fn node_clone_preserves_identity() {
        let target = Arc::new(Dummy);
        let a = Node::named(TargetRef::new(&target), NamedTerm::Center);
        let b = a.clone();
        assert!(Node::ptr_eq(&a, &b));
    }

    #[test]
    fn nodes_work_as_hash_keys() {
        let target = Arc::new(Dummy);
        let mut map = HashMap::new();
        map.insert(Node::named(TargetRef::new(&target), NamedTerm::Start), 1);

        // Value identity: an equal key constructed separately finds the entry.
        let probe = Node::named(TargetRef::new(&target), NamedTerm::Start);
        assert_eq!(map.get(&probe), Some(&1));
    }

    #[test]
    fn target_ref_survives_drop_without_panicking() {
        let target = Arc::new(Dummy);
        let node = Node::named(TargetRef::new(&target), NamedTerm::Center);
        drop(target);

        assert!(node.target().upgrade().is_none());
        assert_eq!(format!("{:?}", node.target()), "<dropped>");
    }

    #[test]
    fn coordinate_from_conversions() {
        let c = Coordinate::xy(1.0, 2.0);
        assert_eq!(c, Coordinate::Xy(DVec2::new(1.0, 2.0)));

        let target = Arc::new(Dummy);
        let node = Node::named(TargetRef::new(&target), NamedTerm::Center);
        let c: Coordinate = node.clone().into();
        assert_eq!(c, Coordinate::Node(node));
    }
}
