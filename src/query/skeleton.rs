use std::sync::Arc;

use crate::query::{AnimQuery, SkeletonDefinition};
use crate::stage::NodeHandle;
use crate::tokens::Symbol;

/// A skeleton definition bound at a particular instance node, together
/// with the animation source in effect there.
///
/// Keyed in the cache by the *instance* node — the node where the binding
/// was declared — not by the skeleton node itself. Distinct instance nodes
/// referencing the same skeleton and animation deliberately get distinct
/// query objects; callers may compare queries by identity with
/// [`SkeletonQuery::ptr_eq`].
#[derive(Debug, Clone)]
pub struct SkeletonQuery {
    inner: Arc<SkeletonQueryInner>,
}

#[derive(Debug)]
struct SkeletonQueryInner {
    instance_node: NodeHandle,
    definition: Arc<SkeletonDefinition>,
    anim: Option<AnimQuery>,
}

impl SkeletonQuery {
    pub(crate) fn new(
        instance_node: NodeHandle,
        definition: Arc<SkeletonDefinition>,
        anim: Option<AnimQuery>,
    ) -> Self {
        Self {
            inner: Arc::new(SkeletonQueryInner {
                instance_node,
                definition,
                anim,
            }),
        }
    }

    /// The node at which this skeleton binding was declared.
    #[inline]
    #[must_use]
    pub fn instance_node(&self) -> NodeHandle {
        self.inner.instance_node
    }

    /// The skeleton node backing this binding.
    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> NodeHandle {
        self.inner.definition.skeleton()
    }

    /// The shared skeleton definition.
    #[inline]
    #[must_use]
    pub fn definition(&self) -> &Arc<SkeletonDefinition> {
        &self.inner.definition
    }

    /// The animation source in effect at the binding site, if any.
    #[inline]
    #[must_use]
    pub fn anim_query(&self) -> Option<&AnimQuery> {
        self.inner.anim.as_ref()
    }

    /// The skeleton's native joint order.
    #[inline]
    #[must_use]
    pub fn joint_order(&self) -> &[Symbol] {
        self.inner.definition.joint_order()
    }

    /// Whether two queries share one underlying object.
    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}
