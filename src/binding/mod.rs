//! Binding declarations authored on scene nodes.
//!
//! [`SkelBinding`] reads the well-known skeletal-binding properties off a
//! node; [`BindingKey`] captures the resolved, inheritable state those
//! properties accumulate to during traversal.

pub mod api;
pub mod key;

pub use api::SkelBinding;
pub use key::BindingKey;
