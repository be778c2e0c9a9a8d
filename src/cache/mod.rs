//! The binding cache and its access scopes.
//!
//! [`BindingCache`] owns five concurrent maps holding every derived query
//! object for the current cache generation. Access goes through scopes:
//! any number of [`ReadScope`]s may look up and populate concurrently,
//! while a [`WriteScope`] is exclusive and is the only way to invalidate.
//! The scope lock guards *generation* boundaries (create vs. clear); the
//! maps provide their own per-key concurrency underneath it.

pub mod sharded_map;

mod populate;

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::binding::BindingKey;
use crate::cache::sharded_map::ShardedMap;
use crate::query::{AnimQuery, SkeletonDefinition, SkeletonQuery, SkinningQuery};
use crate::stage::{NodeHandle, NodeKind, Stage};

/// The persistent state: five insert-or-lookup maps.
///
/// Skeleton definitions cache negatively (`None`) so a malformed skeleton
/// is parsed at most once per generation.
pub(crate) struct CacheStore {
    pub(crate) definitions: ShardedMap<NodeHandle, Option<Arc<SkeletonDefinition>>>,
    pub(crate) anim_queries: ShardedMap<NodeHandle, AnimQuery>,
    pub(crate) skel_queries: ShardedMap<NodeHandle, SkeletonQuery>,
    pub(crate) skinning_queries: ShardedMap<NodeHandle, SkinningQuery>,
    pub(crate) skinning_by_key: ShardedMap<BindingKey, SkinningQuery>,
}

impl CacheStore {
    fn new() -> Self {
        Self {
            definitions: ShardedMap::new(),
            anim_queries: ShardedMap::new(),
            skel_queries: ShardedMap::new(),
            skinning_queries: ShardedMap::new(),
            skinning_by_key: ShardedMap::new(),
        }
    }
}

/// Memoizes skeleton-to-geometry bindings across a scene graph.
///
/// The cache does not watch the scene for edits; after a mutation that can
/// affect bindings, take a [`WriteScope`], [`clear`](WriteScope::clear) and
/// re-populate.
pub struct BindingCache {
    generation: RwLock<()>,
    store: CacheStore,
}

impl Default for BindingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: RwLock::new(()),
            store: CacheStore::new(),
        }
    }

    /// Opens a shared scope for lookups and population against `stage`.
    ///
    /// Blocks while a [`WriteScope`] is active.
    #[must_use]
    pub fn read<'a>(&'a self, stage: &'a Stage) -> ReadScope<'a> {
        ReadScope {
            stage,
            store: &self.store,
            _guard: self.generation.read(),
        }
    }

    /// Opens an exclusive scope.
    ///
    /// Blocks until every [`ReadScope`] is released.
    #[must_use]
    pub fn write(&self) -> WriteScope<'_> {
        WriteScope {
            store: &self.store,
            _guard: self.generation.write(),
        }
    }
}

/// Exclusive handle used to invalidate the cache.
///
/// Released on drop, on every exit path.
pub struct WriteScope<'a> {
    store: &'a CacheStore,
    _guard: RwLockWriteGuard<'a, ()>,
}

impl WriteScope<'_> {
    /// Empties all five maps.
    ///
    /// Readers are excluded for the scope's whole lifetime, so no reader
    /// can observe a partially-cleared cache.
    pub fn clear(&mut self) {
        log::debug!("clearing binding cache");
        self.store.definitions.clear();
        self.store.anim_queries.clear();
        self.store.skel_queries.clear();
        self.store.skinning_queries.clear();
        self.store.skinning_by_key.clear();
    }
}

/// Shared handle exposing lookups and the populate operation.
///
/// Released on drop. Any number of read scopes may be live at once.
pub struct ReadScope<'a> {
    pub(crate) stage: &'a Stage,
    pub(crate) store: &'a CacheStore,
    _guard: RwLockReadGuard<'a, ()>,
}

impl ReadScope<'_> {
    /// The skeleton definition for a skeleton node, parsing it on first
    /// access.
    ///
    /// Instance proxies redirect to their prototype. Returns `None` for a
    /// dead or inactive node, a node that is not a skeleton, or a skeleton
    /// whose data fails to parse.
    pub fn find_or_create_skeleton_definition(
        &self,
        node: NodeHandle,
    ) -> Option<Arc<SkeletonDefinition>> {
        if !self.stage.is_active(node) {
            return None;
        }
        let node = self.stage.canonical(node);
        if !self.stage.is_active(node) || self.stage.kind(node) != Some(NodeKind::Skeleton) {
            return None;
        }
        let (definition, _) = self
            .store
            .definitions
            .find_or_create(node, || SkeletonDefinition::parse(self.stage, node).map(Arc::new));
        definition
    }

    /// The animation query for an animation-source node, constructing it
    /// on first access.
    ///
    /// Instance proxies redirect to their prototype. Returns `None` for a
    /// dead or inactive node or a node that is not an animation source.
    pub fn find_or_create_anim_query(&self, node: NodeHandle) -> Option<AnimQuery> {
        if !self.stage.is_active(node) {
            return None;
        }
        let node = self.stage.canonical(node);
        if !self.stage.is_active(node) || self.stage.kind(node) != Some(NodeKind::AnimSource) {
            return None;
        }
        let (query, _) = self
            .store
            .anim_queries
            .find_or_create(node, || AnimQuery::new(self.stage, node));
        Some(query)
    }

    /// The skinning query previously populated for a skinned node.
    ///
    /// Pure lookup; `None` if the node's subtree was never populated or
    /// the node is not skinned.
    #[must_use]
    pub fn skinning_query(&self, node: NodeHandle) -> Option<SkinningQuery> {
        self.store.skinning_queries.get(&node)
    }

    /// The skeleton query previously populated for a binding site.
    ///
    /// Pure lookup; `None` if nothing was bound at `node`.
    #[must_use]
    pub fn skeleton_query(&self, node: NodeHandle) -> Option<SkeletonQuery> {
        self.store.skel_queries.get(&node)
    }

    /// The nearest enclosing skeleton binding for `node`.
    ///
    /// Walks from `node` up through its ancestors, stopping at (and
    /// including) the nearest enclosing binding root.
    #[must_use]
    pub fn inherited_skeleton_query(&self, node: NodeHandle) -> Option<SkeletonQuery> {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(query) = self.store.skel_queries.get(&n) {
                return Some(query);
            }
            if self.stage.kind(n) == Some(NodeKind::SkelRoot) {
                break;
            }
            current = self.stage.parent(n);
        }
        None
    }
}
