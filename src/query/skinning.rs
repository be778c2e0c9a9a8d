use std::sync::Arc;

use glam::Mat4;

use crate::binding::BindingKey;
use crate::query::SkeletonQuery;
use crate::stage::{AttributeId, NodeHandle, Stage};
use crate::tokens::Symbol;

/// The resolved skinning configuration a deformer evaluates against.
///
/// One query exists per distinct [`BindingKey`]; every skinned node whose
/// accumulated binding state hashes to the same key shares the same query
/// object. Identity is observable through [`SkinningQuery::ptr_eq`].
///
/// Attribute values are read lazily off the stage; the query itself only
/// holds identities.
#[derive(Debug, Clone)]
pub struct SkinningQuery {
    inner: Arc<SkinningQueryInner>,
}

#[derive(Debug)]
struct SkinningQueryInner {
    node: NodeHandle,
    skel_instance_node: Option<NodeHandle>,
    joint_indices_attr: Option<AttributeId>,
    joint_weights_attr: Option<AttributeId>,
    geom_bind_transform_attr: Option<AttributeId>,
    joint_order: Vec<Symbol>,
    explicit_joint_order: bool,
}

impl SkinningQuery {
    /// Builds the query for `key`, taking the joint order from the key's
    /// explicit override when present and from the resolved skeleton query
    /// otherwise.
    pub(crate) fn new(
        node: NodeHandle,
        key: &BindingKey,
        skel_query: Option<&SkeletonQuery>,
    ) -> Self {
        let (joint_order, explicit_joint_order) = match &key.joint_order {
            Some(order) => (order.clone(), true),
            None => (
                skel_query.map(|q| q.joint_order().to_vec()).unwrap_or_default(),
                false,
            ),
        };

        Self {
            inner: Arc::new(SkinningQueryInner {
                node,
                skel_instance_node: key.skel_instance_node,
                joint_indices_attr: key.joint_indices_attr,
                joint_weights_attr: key.joint_weights_attr,
                geom_bind_transform_attr: key.geom_bind_transform_attr,
                joint_order,
                explicit_joint_order,
            }),
        }
    }

    /// The first skinned node this query was constructed for.
    ///
    /// Purely informational: other nodes sharing the same binding key
    /// share this query object.
    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.inner.node
    }

    /// The node at which the effective skeleton binding was declared.
    #[inline]
    #[must_use]
    pub fn skel_instance_node(&self) -> Option<NodeHandle> {
        self.inner.skel_instance_node
    }

    /// Identity of the joint-index attribute.
    #[inline]
    #[must_use]
    pub fn joint_indices_attr(&self) -> Option<AttributeId> {
        self.inner.joint_indices_attr
    }

    /// Identity of the joint-weight attribute.
    #[inline]
    #[must_use]
    pub fn joint_weights_attr(&self) -> Option<AttributeId> {
        self.inner.joint_weights_attr
    }

    /// Identity of the geometry-bind-transform attribute.
    #[inline]
    #[must_use]
    pub fn geom_bind_transform_attr(&self) -> Option<AttributeId> {
        self.inner.geom_bind_transform_attr
    }

    /// The joint order skin weights are expressed in.
    #[inline]
    #[must_use]
    pub fn joint_order(&self) -> &[Symbol] {
        &self.inner.joint_order
    }

    /// Whether the joint order came from an explicit override rather than
    /// the bound skeleton.
    #[inline]
    #[must_use]
    pub fn has_joint_order_override(&self) -> bool {
        self.inner.explicit_joint_order
    }

    /// Decodes the joint indices off the stage.
    #[must_use]
    pub fn joint_indices(&self, stage: &Stage) -> Option<Vec<i32>> {
        let id = self.inner.joint_indices_attr?;
        stage
            .attr_value(id)?
            .as_int_array()
            .map(<[i32]>::to_vec)
    }

    /// Decodes the joint weights off the stage.
    #[must_use]
    pub fn joint_weights(&self, stage: &Stage) -> Option<Vec<f32>> {
        let id = self.inner.joint_weights_attr?;
        stage
            .attr_value(id)?
            .as_float_array()
            .map(<[f32]>::to_vec)
    }

    /// Decodes the geometry bind transform off the stage.
    #[must_use]
    pub fn geom_bind_transform(&self, stage: &Stage) -> Option<Mat4> {
        let id = self.inner.geom_bind_transform_attr?;
        stage.attr_value(id)?.as_matrix()
    }

    /// Whether two queries share one underlying object.
    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}
