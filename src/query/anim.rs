use std::sync::Arc;

use crate::stage::{AttributeId, NodeHandle, Stage};
use crate::tokens::{Symbol, TOKENS};

/// A shared wrapper over an animation-source node.
///
/// Records the animation's own joint order and the identities of its
/// channel attributes. Cloning is cheap; all clones share one inner.
#[derive(Debug, Clone)]
pub struct AnimQuery {
    inner: Arc<AnimQueryInner>,
}

#[derive(Debug)]
struct AnimQueryInner {
    node: NodeHandle,
    joint_order: Vec<Symbol>,
    translations_attr: Option<AttributeId>,
    rotations_attr: Option<AttributeId>,
    scales_attr: Option<AttributeId>,
}

impl AnimQuery {
    pub(crate) fn new(stage: &Stage, node: NodeHandle) -> Self {
        let joint_order = stage
            .attr(node, TOKENS.joints)
            .and_then(|id| stage.attr_value(id))
            .and_then(|v| v.as_token_array().map(<[Symbol]>::to_vec))
            .unwrap_or_default();

        Self {
            inner: Arc::new(AnimQueryInner {
                node,
                joint_order,
                translations_attr: stage.attr(node, TOKENS.translations),
                rotations_attr: stage.attr(node, TOKENS.rotations),
                scales_attr: stage.attr(node, TOKENS.scales),
            }),
        }
    }

    /// The animation-source node.
    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.inner.node
    }

    /// The joint order the animation authors its channels in.
    #[inline]
    #[must_use]
    pub fn joint_order(&self) -> &[Symbol] {
        &self.inner.joint_order
    }

    /// Identity of the joint translation channels, if authored.
    #[inline]
    #[must_use]
    pub fn translations_attr(&self) -> Option<AttributeId> {
        self.inner.translations_attr
    }

    /// Identity of the joint rotation channels, if authored.
    #[inline]
    #[must_use]
    pub fn rotations_attr(&self) -> Option<AttributeId> {
        self.inner.rotations_attr
    }

    /// Identity of the joint scale channels, if authored.
    #[inline]
    #[must_use]
    pub fn scales_attr(&self) -> Option<AttributeId> {
        self.inner.scales_attr
    }

    /// Whether two queries share one underlying object.
    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}
