//! Derived query objects.
//!
//! Each type here is parsed or composed once per cache generation and
//! shared read-only between every binding that references it:
//!
//! - [`SkeletonDefinition`] — a skeleton node's joint order, topology and
//!   rest/bind poses, parsed once.
//! - [`AnimQuery`] — a wrapper over an animation-source node.
//! - [`SkeletonQuery`] — a skeleton definition bound at a particular
//!   instance node, with its effective animation source.
//! - [`SkinningQuery`] — the per-binding-key skinning configuration a
//!   deformer evaluates against.

pub mod anim;
pub mod definition;
pub mod skeleton;
pub mod skinning;

pub use anim::AnimQuery;
pub use definition::SkeletonDefinition;
pub use skeleton::SkeletonQuery;
pub use skinning::SkinningQuery;
