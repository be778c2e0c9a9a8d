//! Global string interner and well-known property names.
//!
//! Node names, node paths, joint tokens and property names are interned
//! into compact [`Symbol`]s so that binding keys hash and compare as plain
//! integers. The set of well-known names in [`BindingTokens`] is resolved
//! once and reused at every binding site.

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// A compact, copyable identifier for an interned string.
pub type Symbol = Spur;

/// Interns a string, returning its [`Symbol`].
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Returns the [`Symbol`] of an already-interned string, if any.
///
/// Never allocates.
#[inline]
#[must_use]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a [`Symbol`] back to its string.
#[inline]
#[must_use]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}

/// The property names the binding resolver recognizes on scene nodes.
pub struct BindingTokens {
    /// Relationship naming the animation source for a subtree.
    pub animation_source: Symbol,
    /// Relationship binding a skeleton directly at the declaring node.
    pub skeleton: Symbol,
    /// Relationship pointing at another node's skeleton binding.
    pub skeleton_instance: Symbol,
    /// Per-vertex joint index attribute.
    pub joint_indices: Symbol,
    /// Per-vertex joint weight attribute.
    pub joint_weights: Symbol,
    /// Geometry bind-pose transform attribute.
    pub geom_bind_transform: Symbol,
    /// Joint-order override attribute authored at a binding site.
    pub joint_order: Symbol,
    /// Joint token array on skeleton and animation-source nodes.
    pub joints: Symbol,
    /// Rest-pose transforms on a skeleton node.
    pub rest_transforms: Symbol,
    /// Bind-pose transforms on a skeleton node.
    pub bind_transforms: Symbol,
    /// Joint translation channels on an animation-source node.
    pub translations: Symbol,
    /// Joint rotation channels on an animation-source node.
    pub rotations: Symbol,
    /// Joint scale channels on an animation-source node.
    pub scales: Symbol,
}

/// Well-known binding property names, interned once.
pub static TOKENS: LazyLock<BindingTokens> = LazyLock::new(|| BindingTokens {
    animation_source: intern("skel:animationSource"),
    skeleton: intern("skel:skeleton"),
    skeleton_instance: intern("skel:skeletonInstance"),
    joint_indices: intern("primvars:skel:jointIndices"),
    joint_weights: intern("primvars:skel:jointWeights"),
    geom_bind_transform: intern("primvars:skel:geomBindTransform"),
    joint_order: intern("skel:joints"),
    joints: intern("joints"),
    rest_transforms: intern("restTransforms"),
    bind_transforms: intern("bindTransforms"),
    translations: intern("translations"),
    rotations: intern("rotations"),
    scales: intern("scales"),
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_and_resolve() {
        let a = intern("Hips/Spine");
        let b = intern("Hips/Spine");
        let c = intern("Hips/Neck");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(resolve(a), "Hips/Spine");
    }

    #[test]
    fn get_does_not_intern() {
        let _ = intern("present");
        assert!(get("present").is_some());
        assert!(get("definitely-not-interned-anywhere").is_none());
    }

    #[test]
    fn well_known_names_are_distinct() {
        assert_ne!(TOKENS.joint_indices, TOKENS.joint_weights);
        assert_ne!(TOKENS.joint_order, TOKENS.joints);
        assert_ne!(TOKENS.skeleton, TOKENS.skeleton_instance);
    }
}
