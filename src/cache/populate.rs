//! The two-pass binding resolution algorithm.
//!
//! Pass 1 walks the subtree pre-order, accumulating inherited binding
//! state by value: every recursive call gets its own copy of the
//! accumulator, so an override on one node reaches its descendants but
//! never its siblings. Bindings that cannot be resolved in traversal order
//! — instance bindings pointing at sites declared elsewhere in the
//! subtree, and skinning queries that need those sites' skeleton queries —
//! are deferred to pass 2.

use crate::binding::BindingKey;
use crate::binding::api::{SkelBinding, first_target};
use crate::cache::ReadScope;
use crate::errors::{Result, SkelBindError};
use crate::query::{AnimQuery, SkeletonQuery, SkinningQuery};
use crate::stage::{NodeHandle, NodeKind};
use crate::tokens::TOKENS;

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

impl ReadScope<'_> {
    /// Discovers and caches every binding in the subtree rooted at
    /// `binding_root`.
    ///
    /// Must be called once per binding-root subtree before lookups below
    /// that root succeed. Malformed bindings warn and degrade to unbound;
    /// only a dead, inactive, or wrongly-kinded root fails the call, and
    /// it fails before the cache is touched.
    pub fn populate(&self, binding_root: NodeHandle) -> Result<()> {
        let root_node = self
            .stage
            .get(binding_root)
            .ok_or(SkelBindError::MissingBindingRoot)?;
        if !root_node.is_active() {
            return Err(SkelBindError::InactiveBindingRoot {
                path: self.stage.path(binding_root).to_string(),
            });
        }
        if root_node.kind() != NodeKind::SkelRoot {
            return Err(SkelBindError::NotABindingRoot {
                path: self.stage.path(binding_root).to_string(),
                kind: root_node.kind(),
            });
        }

        log::debug!("populating bindings beneath <{}>", self.stage.path(binding_root));

        // Indirect instance bindings can only be mapped once every direct
        // binding in the subtree is known, and skinning queries consume
        // the skeleton queries those bindings alias, so both are deferred.
        let mut instance_bindings: Vec<(NodeHandle, NodeHandle)> = Vec::new();
        let mut skin_bindings: Vec<(NodeHandle, BindingKey)> = Vec::new();

        self.populate_recursive(
            binding_root,
            binding_root,
            BindingKey::default(),
            None,
            &mut instance_bindings,
            &mut skin_bindings,
            1,
        );

        if !instance_bindings.is_empty() {
            log::debug!(
                "applying {} indirect skeleton instance bindings beneath <{}>",
                instance_bindings.len(),
                self.stage.path(binding_root)
            );
            for (source, target) in instance_bindings {
                debug_assert_ne!(source, target);
                if let Some(query) = self.skeleton_query(target) {
                    self.store.skel_queries.find_or_create(source, || query);
                } else {
                    log::warn!(
                        "instance binding on <{}> targets <{}>, which has no skeleton bound: \
                         ignoring",
                        self.stage.path(source),
                        self.stage.path(target)
                    );
                }
            }
        }

        if !skin_bindings.is_empty() {
            log::debug!(
                "applying {} skin bindings beneath <{}>",
                skin_bindings.len(),
                self.stage.path(binding_root)
            );
            for (node, key) in skin_bindings {
                let query = self.find_or_create_skinning_query(node, key);
                log::debug!("bound skinning query to <{}>", self.stage.path(node));
                self.store.skinning_queries.find_or_create(node, || query);
            }
        }

        Ok(())
    }

    fn populate_recursive(
        &self,
        binding_root: NodeHandle,
        node: NodeHandle,
        mut key: BindingKey,
        mut anim: Option<AnimQuery>,
        instance_bindings: &mut Vec<(NodeHandle, NodeHandle)>,
        skin_bindings: &mut Vec<(NodeHandle, BindingKey)>,
        depth: usize,
    ) {
        let Some(kind) = self.stage.kind(node) else {
            return;
        };
        if !kind.is_imageable() {
            log::debug!(
                "{}pruning traversal at <{}> (kind is not imageable)",
                indent(depth),
                self.stage.path(node)
            );
            return;
        }

        log::trace!("{}visiting <{}>", indent(depth), self.stage.path(node));

        let binding = SkelBinding::new(self.stage, node);

        // An authored animation source overrides the inherited one, even
        // when its target fails to resolve.
        if let Some(targets) = binding.animation_source_targets() {
            anim = first_target(self.stage, node, TOKENS.animation_source, targets)
                .and_then(|target| self.find_or_create_anim_query(target));
        }

        if let Some(targets) = binding.skeleton_instance_targets() {
            key.skel_instance_node =
                first_target(self.stage, node, TOKENS.skeleton_instance, targets);
            if let Some(target) = key.skel_instance_node {
                if !self.stage.is_descendant_of(target, binding_root) {
                    log::warn!(
                        "target <{}> of <{}> is outside of the enclosing binding root <{}>: \
                         ignoring",
                        self.stage.path(target),
                        self.stage.path(node),
                        self.stage.path(binding_root)
                    );
                    key.skel_instance_node = None;
                } else if target != node {
                    // Resolved in pass 2, once the target's own binding
                    // has been mapped.
                    instance_bindings.push((node, target));
                }
            }
        }

        if let Some(targets) = binding.skeleton_targets() {
            let definition = first_target(self.stage, node, TOKENS.skeleton, targets)
                .and_then(|target| self.find_or_create_skeleton_definition(target));
            if let Some(definition) = definition {
                let anim = anim.clone();
                let (_, is_first) = self.store.skel_queries.find_or_create(node, || {
                    SkeletonQuery::new(node, definition, anim)
                });
                if is_first {
                    log::debug!(
                        "{}new skeleton bound at <{}>",
                        indent(depth),
                        self.stage.path(node)
                    );
                }
            } else {
                log::warn!(
                    "skeleton relationship on <{}> does not resolve to a skeleton",
                    self.stage.path(node)
                );
            }
            // Even an unresolvable direct binding shadows any inherited
            // skeleton instance for the subtree below.
            key.skel_instance_node = Some(node);
        }

        if let Some(attr) = binding.joint_indices_attr() {
            key.joint_indices_attr = Some(attr);
        }
        if let Some(attr) = binding.joint_weights_attr() {
            key.joint_weights_attr = Some(attr);
        }
        if let Some(attr) = binding.geom_bind_transform_attr() {
            key.geom_bind_transform_attr = Some(attr);
        }
        if let Some(order) = binding.joint_order() {
            key.joint_order = Some(order);
        }

        if kind.is_boundable()
            && key.joint_indices_attr.is_some()
            && key.joint_weights_attr.is_some()
        {
            log::debug!(
                "{}skin binding found at <{}>",
                indent(depth),
                self.stage.path(node)
            );
            skin_bindings.push((node, key));
            // Skinned nodes cannot be nested.
            return;
        }

        for &child in self.stage.children(node) {
            let child = self.stage.canonical(child);
            self.populate_recursive(
                binding_root,
                child,
                key.clone(),
                anim.clone(),
                instance_bindings,
                skin_bindings,
                depth + 1,
            );
        }
    }

    /// The skinning query for `key`, shared across every node whose
    /// accumulated binding state is identical.
    fn find_or_create_skinning_query(
        &self,
        skinned_node: NodeHandle,
        key: BindingKey,
    ) -> SkinningQuery {
        let (query, _) = self.store.skinning_by_key.find_or_create(key.clone(), || {
            let skel_query = key
                .skel_instance_node
                .and_then(|instance| self.skeleton_query(instance));
            SkinningQuery::new(skinned_node, &key, skel_query.as_ref())
        });
        query
    }
}
