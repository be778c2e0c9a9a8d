use crate::stage::{AttributeId, NodeHandle};
use crate::tokens::Symbol;

/// Everything that makes two skinning configurations interchangeable.
///
/// Skinning queries are deduplicated by this key: two skinned nodes whose
/// accumulated binding state matches field-for-field share one query
/// object. Equality and hash are structural over all five fields; `None`
/// is a distinct, stable value for each.
///
/// During traversal the key doubles as the inherited-state accumulator:
/// each recursive call receives its own copy, so an override on one node
/// is visible to its descendants but never to its siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BindingKey {
    /// Identity of the joint-index attribute in effect.
    pub joint_indices_attr: Option<AttributeId>,
    /// Identity of the joint-weight attribute in effect.
    pub joint_weights_attr: Option<AttributeId>,
    /// Identity of the geometry-bind-transform attribute in effect.
    pub geom_bind_transform_attr: Option<AttributeId>,
    /// The node at which the effective skeleton binding was declared.
    pub skel_instance_node: Option<NodeHandle>,
    /// Explicit joint-order override, replacing the skeleton's native
    /// order.
    pub joint_order: Option<Vec<Symbol>>,
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use slotmap::SlotMap;

    use super::*;
    use crate::tokens;

    fn hash_of(key: &BindingKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn two_handles() -> (NodeHandle, NodeHandle) {
        let mut arena: SlotMap<NodeHandle, ()> = SlotMap::with_key();
        (arena.insert(()), arena.insert(()))
    }

    #[test]
    fn default_keys_are_equal() {
        assert_eq!(BindingKey::default(), BindingKey::default());
        assert_eq!(hash_of(&BindingKey::default()), hash_of(&BindingKey::default()));
    }

    #[test]
    fn any_single_field_distinguishes() {
        let (a, b) = two_handles();
        let name = tokens::intern("primvars:skel:jointIndices");

        let base = BindingKey {
            joint_indices_attr: Some(AttributeId { node: a, name }),
            skel_instance_node: Some(a),
            ..BindingKey::default()
        };

        let other_attr = BindingKey {
            joint_indices_attr: Some(AttributeId { node: b, name }),
            ..base.clone()
        };
        let other_instance = BindingKey {
            skel_instance_node: Some(b),
            ..base.clone()
        };
        let with_order = BindingKey {
            joint_order: Some(vec![tokens::intern("Hips")]),
            ..base.clone()
        };

        assert_ne!(base, other_attr);
        assert_ne!(base, other_instance);
        assert_ne!(base, with_order);
        assert_eq!(base, base.clone());
    }

    #[test]
    fn absent_differs_from_present() {
        let (a, _) = two_handles();
        let with_instance = BindingKey {
            skel_instance_node: Some(a),
            ..BindingKey::default()
        };
        assert_ne!(BindingKey::default(), with_instance);
    }
}
