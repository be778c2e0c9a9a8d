//! Error Types
//!
//! The cache reports exactly one class of hard failure: a precondition
//! violation on the binding root handed to `populate`. Everything else —
//! malformed relationship targets, unresolvable paths, mis-authored
//! skeleton data — degrades to a warning on the `log` channel and leaves
//! the affected field unbound, so a single bad binding never aborts
//! resolution of the rest of the subtree. Lookups that miss simply return
//! `None`; "not bound" is an expected outcome, not an error.

use thiserror::Error;

use crate::stage::NodeKind;

/// Failure modes of the binding cache.
#[derive(Error, Debug)]
pub enum SkelBindError {
    /// The binding root handle does not refer to a live node.
    #[error("binding root does not refer to a live node")]
    MissingBindingRoot,

    /// The binding root exists but is inactive.
    #[error("binding root <{path}> is inactive")]
    InactiveBindingRoot {
        /// Absolute path of the offending node.
        path: String,
    },

    /// The binding root is not a binding-root kind of node.
    #[error("<{path}> is not a binding root (kind is {kind:?})")]
    NotABindingRoot {
        /// Absolute path of the offending node.
        path: String,
        /// The node's actual kind.
        kind: NodeKind,
    },
}

/// Alias for `Result<T, SkelBindError>`.
pub type Result<T> = std::result::Result<T, SkelBindError>;
