use crate::stage::{AttributeId, NodeHandle, Stage};
use crate::tokens::{self, Symbol, TOKENS};

/// Borrowed accessor for the skeletal-binding properties authored on one
/// node.
///
/// All reads are identity- or value-level lookups against the stage; a
/// property that was never authored reads as `None`.
#[derive(Clone, Copy)]
pub struct SkelBinding<'a> {
    stage: &'a Stage,
    node: NodeHandle,
}

impl<'a> SkelBinding<'a> {
    /// Wraps a node for binding-property reads.
    #[inline]
    #[must_use]
    pub fn new(stage: &'a Stage, node: NodeHandle) -> Self {
        Self { stage, node }
    }

    /// Authored targets of the animation-source relationship.
    #[must_use]
    pub fn animation_source_targets(&self) -> Option<&'a [Symbol]> {
        self.stage
            .relationship_targets(self.node, TOKENS.animation_source)
    }

    /// Authored targets of the direct skeleton relationship.
    #[must_use]
    pub fn skeleton_targets(&self) -> Option<&'a [Symbol]> {
        self.stage.relationship_targets(self.node, TOKENS.skeleton)
    }

    /// Authored targets of the skeleton-instance relationship.
    #[must_use]
    pub fn skeleton_instance_targets(&self) -> Option<&'a [Symbol]> {
        self.stage
            .relationship_targets(self.node, TOKENS.skeleton_instance)
    }

    /// Identity of the authored joint-index attribute.
    #[must_use]
    pub fn joint_indices_attr(&self) -> Option<AttributeId> {
        self.stage.attr(self.node, TOKENS.joint_indices)
    }

    /// Identity of the authored joint-weight attribute.
    #[must_use]
    pub fn joint_weights_attr(&self) -> Option<AttributeId> {
        self.stage.attr(self.node, TOKENS.joint_weights)
    }

    /// Identity of the authored geometry-bind-transform attribute.
    #[must_use]
    pub fn geom_bind_transform_attr(&self) -> Option<AttributeId> {
        self.stage.attr(self.node, TOKENS.geom_bind_transform)
    }

    /// The authored joint-order override, decoded.
    #[must_use]
    pub fn joint_order(&self) -> Option<Vec<Symbol>> {
        let id = self.stage.attr(self.node, TOKENS.joint_order)?;
        self.stage
            .attr_value(id)?
            .as_token_array()
            .map(<[Symbol]>::to_vec)
    }
}

/// Resolves the first target of a relationship's authored target list.
///
/// More than one target warns and uses only the first; a target path that
/// does not resolve to a live node warns and reads as absent.
pub(crate) fn first_target(
    stage: &Stage,
    owner: NodeHandle,
    rel: Symbol,
    targets: &[Symbol],
) -> Option<NodeHandle> {
    let first = *targets.first()?;
    if targets.len() > 1 {
        log::warn!(
            "<{}>.{} has more than one target; only the first will be used",
            stage.path(owner),
            tokens::resolve(rel)
        );
    }
    let node = stage.node_at_path(first);
    if node.is_none() {
        log::warn!(
            "<{}>.{} -- invalid target <{}>",
            stage.path(owner),
            tokens::resolve(rel),
            tokens::resolve(first)
        );
    }
    node
}
