//! Minimal hierarchical scene graph.
//!
//! This is the read-only collaborator the binding cache resolves against:
//! a tree of typed nodes carrying attributes (typed values) and
//! relationships (ordered target-path lists), with prototype-based
//! instancing. The cache never mutates anything in here.

pub mod attribute;
pub mod node;
#[allow(clippy::module_inception)]
pub mod stage;

pub use attribute::{AttrValue, AttributeId};
pub use node::{Node, NodeKind};
pub use stage::Stage;

use slotmap::new_key_type;

new_key_type! {
    /// Opaque, comparable, hashable handle to a scene-graph node.
    pub struct NodeHandle;
}
