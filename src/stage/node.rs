use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::stage::{AttrValue, NodeHandle};
use crate::tokens::Symbol;

/// The typed kind of a scene node.
///
/// Kinds drive traversal decisions in binding resolution: non-imageable
/// subtrees are pruned outright, and only boundable nodes can carry a skin
/// binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A binding root: delimits one independent resolution scope.
    SkelRoot,
    /// A plain transform node.
    Transform,
    /// A grouping node with no geometry of its own.
    Scope,
    /// Boundable geometry.
    Mesh,
    /// A skeleton: joint hierarchy plus rest pose.
    Skeleton,
    /// A source of time-varying joint transforms.
    AnimSource,
    /// Shading content; never renderable geometry.
    Shader,
}

impl NodeKind {
    /// Whether nodes of this kind participate in imaging, and therefore in
    /// binding resolution.
    #[inline]
    #[must_use]
    pub fn is_imageable(self) -> bool {
        !matches!(self, Self::Shader)
    }

    /// Whether nodes of this kind can carry a skin binding.
    #[inline]
    #[must_use]
    pub fn is_boundable(self) -> bool {
        matches!(self, Self::Mesh)
    }
}

/// A scene-graph node: hierarchy links plus authored properties.
///
/// Relationship targets are stored as authored path symbols, in authoring
/// order; resolution to live nodes happens at read time so that dead
/// targets can be reported instead of silently dropped.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: Symbol,
    pub(crate) path: Symbol,
    pub(crate) kind: NodeKind,
    pub(crate) active: bool,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    /// For instance proxies: the prototype node this one stands in for.
    pub(crate) prototype: Option<NodeHandle>,
    pub(crate) attributes: FxHashMap<Symbol, AttrValue>,
    pub(crate) relationships: FxHashMap<Symbol, SmallVec<[Symbol; 1]>>,
}

impl Node {
    pub(crate) fn new(name: Symbol, path: Symbol, kind: NodeKind) -> Self {
        Self {
            name,
            path,
            kind,
            active: true,
            parent: None,
            children: Vec::new(),
            prototype: None,
            attributes: FxHashMap::default(),
            relationships: FxHashMap::default(),
        }
    }

    /// The node's own name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Symbol {
        self.name
    }

    /// The node's absolute path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Symbol {
        self.path
    }

    /// The node's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Whether the node is active.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Child node handles, in authoring order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// The prototype this node stands in for, if it is an instance proxy.
    #[inline]
    #[must_use]
    pub fn prototype(&self) -> Option<NodeHandle> {
        self.prototype
    }
}
