use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::stage::{AttrValue, AttributeId, Node, NodeHandle, NodeKind};
use crate::tokens::{self, Symbol};

/// An in-memory scene graph.
///
/// Nodes are addressed by [`NodeHandle`] and by absolute path
/// (`/Root/Character/Mesh`). The binding cache reads the stage through the
/// accessors here and never writes back; the mutating methods exist to
/// author scenes for callers and tests.
pub struct Stage {
    nodes: SlotMap<NodeHandle, Node>,
    paths: FxHashMap<Symbol, NodeHandle>,
    roots: Vec<NodeHandle>,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    /// Creates an empty stage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            paths: FxHashMap::default(),
            roots: Vec::new(),
        }
    }

    // ── Authoring ────────────────────────────────────────────────────────────

    /// Defines a top-level node.
    ///
    /// If a node already exists at that path, the existing node is returned
    /// unchanged.
    pub fn define_root(&mut self, name: &str, kind: NodeKind) -> NodeHandle {
        let path = tokens::intern(&format!("/{name}"));
        if let Some(&existing) = self.paths.get(&path) {
            log::warn!("<{}> is already defined", tokens::resolve(path));
            return existing;
        }
        let handle = self
            .nodes
            .insert(Node::new(tokens::intern(name), path, kind));
        self.paths.insert(path, handle);
        self.roots.push(handle);
        handle
    }

    /// Defines a child of `parent`.
    ///
    /// If a node already exists at the resulting path, the existing node is
    /// returned unchanged.
    pub fn define(&mut self, parent: NodeHandle, name: &str, kind: NodeKind) -> NodeHandle {
        let parent_path = self.nodes[parent].path;
        let path = tokens::intern(&format!("{}/{name}", tokens::resolve(parent_path)));
        if let Some(&existing) = self.paths.get(&path) {
            log::warn!("<{}> is already defined", tokens::resolve(path));
            return existing;
        }
        let handle = self
            .nodes
            .insert(Node::new(tokens::intern(name), path, kind));
        self.nodes[handle].parent = Some(parent);
        self.nodes[parent].children.push(handle);
        self.paths.insert(path, handle);
        handle
    }

    /// Defines an instance proxy under `parent` standing in for
    /// `prototype`'s subtree.
    ///
    /// The proxy reports the prototype's kind; traversal and cache keys
    /// redirect through [`Stage::canonical`] so that every instance of one
    /// prototype shares a single cache entry.
    pub fn define_instance(
        &mut self,
        parent: NodeHandle,
        name: &str,
        prototype: NodeHandle,
    ) -> NodeHandle {
        let kind = self.nodes[prototype].kind;
        let handle = self.define(parent, name, kind);
        self.nodes[handle].prototype = Some(prototype);
        handle
    }

    /// Activates or deactivates a node.
    pub fn set_active(&mut self, node: NodeHandle, active: bool) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.active = active;
        }
    }

    /// Authors an attribute value on a node.
    pub fn set_attr(&mut self, node: NodeHandle, name: Symbol, value: AttrValue) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.attributes.insert(name, value);
        }
    }

    /// Authors a relationship's target paths on a node, in order.
    pub fn set_relationship(&mut self, node: NodeHandle, name: Symbol, targets: &[&str]) {
        if let Some(data) = self.nodes.get_mut(node) {
            let targets: SmallVec<[Symbol; 1]> =
                targets.iter().map(|t| tokens::intern(t)).collect();
            data.relationships.insert(name, targets);
        }
    }

    // ── Node access ──────────────────────────────────────────────────────────

    /// The node behind a handle, if it is live.
    #[inline]
    #[must_use]
    pub fn get(&self, node: NodeHandle) -> Option<&Node> {
        self.nodes.get(node)
    }

    /// Whether `node` refers to a live, active node.
    #[inline]
    #[must_use]
    pub fn is_active(&self, node: NodeHandle) -> bool {
        self.nodes.get(node).is_some_and(|n| n.active)
    }

    /// Whether `node` is an instance proxy for a prototype subtree.
    #[inline]
    #[must_use]
    pub fn is_instance_proxy(&self, node: NodeHandle) -> bool {
        self.nodes.get(node).is_some_and(|n| n.prototype.is_some())
    }

    /// The prototype a proxy stands in for, if `node` is one.
    #[inline]
    #[must_use]
    pub fn prototype_of(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node).and_then(|n| n.prototype)
    }

    /// Redirects an instance proxy to its prototype's canonical node.
    ///
    /// Chases chained proxies to a fixed point; a non-proxy node maps to
    /// itself. Every cache-key construction site goes through here.
    #[must_use]
    pub fn canonical(&self, node: NodeHandle) -> NodeHandle {
        let mut current = node;
        while let Some(proto) = self.prototype_of(current) {
            current = proto;
        }
        current
    }

    /// The node's kind, if the handle is live.
    #[inline]
    #[must_use]
    pub fn kind(&self, node: NodeHandle) -> Option<NodeKind> {
        self.nodes.get(node).map(|n| n.kind)
    }

    /// The node's absolute path, or `"<expired>"` for a dead handle.
    #[must_use]
    pub fn path(&self, node: NodeHandle) -> &'static str {
        self.nodes
            .get(node)
            .map_or("<expired>", |n| tokens::resolve(n.path))
    }

    /// The parent of a node.
    #[inline]
    #[must_use]
    pub fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    /// The children of a node, in authoring order.
    #[inline]
    #[must_use]
    pub fn children(&self, node: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(node).map_or(&[], |n| n.children.as_slice())
    }

    /// Looks up a node by absolute path symbol.
    #[inline]
    #[must_use]
    pub fn node_at_path(&self, path: Symbol) -> Option<NodeHandle> {
        self.paths.get(&path).copied()
    }

    /// Looks up a node by absolute path string.
    #[must_use]
    pub fn node_at(&self, path: &str) -> Option<NodeHandle> {
        tokens::get(path).and_then(|p| self.node_at_path(p))
    }

    /// Whether `node` lies in the subtree rooted at `ancestor`, inclusive.
    #[must_use]
    pub fn is_descendant_of(&self, node: NodeHandle, ancestor: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    // ── Attribute / relationship reads ───────────────────────────────────────

    /// The identity of an attribute, if it is authored on `node`.
    #[must_use]
    pub fn attr(&self, node: NodeHandle, name: Symbol) -> Option<AttributeId> {
        let data = self.nodes.get(node)?;
        data.attributes
            .contains_key(&name)
            .then_some(AttributeId { node, name })
    }

    /// The value behind an attribute identity.
    #[must_use]
    pub fn attr_value(&self, id: AttributeId) -> Option<&AttrValue> {
        self.nodes.get(id.node)?.attributes.get(&id.name)
    }

    /// The authored target paths of a relationship, or `None` if the
    /// relationship was never authored. An authored-but-empty relationship
    /// returns `Some(&[])`.
    #[must_use]
    pub fn relationship_targets(&self, node: NodeHandle, name: Symbol) -> Option<&[Symbol]> {
        self.nodes
            .get(node)?
            .relationships
            .get(&name)
            .map(|targets| targets.as_slice())
    }

    /// Top-level nodes, in authoring order.
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    /// Number of live nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the stage holds no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
