//! Skeletal binding resolution cache for hierarchical scene graphs.
//!
//! Given a subtree rooted at a *binding root* node, [`ReadScope::populate`]
//! walks the hierarchy once, resolves every skeleton, animation-source and
//! per-node skinning binding (including inherited and indirect instance
//! bindings), and memoizes the derived query objects so that skinning
//! evaluation never re-walks the scene graph.
//!
//! The cache itself is concurrency-friendly: any number of [`ReadScope`]s
//! may resolve and look up bindings in parallel, while a [`WriteScope`]
//! takes exclusive access to invalidate a whole cache generation.
//!
//! [`ReadScope::populate`]: cache::ReadScope::populate
//! [`ReadScope`]: cache::ReadScope
//! [`WriteScope`]: cache::WriteScope

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod binding;
pub mod cache;
pub mod errors;
pub mod query;
pub mod stage;
pub mod tokens;

pub use binding::BindingKey;
pub use cache::{BindingCache, ReadScope, WriteScope};
pub use errors::{Result, SkelBindError};
pub use query::{AnimQuery, SkeletonDefinition, SkeletonQuery, SkinningQuery};
pub use stage::{AttrValue, AttributeId, Node, NodeHandle, NodeKind, Stage};
pub use tokens::Symbol;
