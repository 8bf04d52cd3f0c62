use thiserror::Error;

use crate::types::Side;

/// Errors that can occur while driving a fragment through its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    /// The operation is only valid in another lifecycle phase, e.g. subscribing
    /// after the fragment was attached, or attaching it a second time
    #[error("Fragment '{fragment}' cannot {operation} in its current lifecycle state")]
    InvalidLifecycleState {
        fragment: &'static str,
        operation: &'static str,
    },

    /// A side-restricted operation was invoked on the wrong side
    #[error("Fragment '{fragment}' invoked on the wrong side: expected {expected}, running on {actual}")]
    WrongSideInvocation {
        fragment: &'static str,
        expected: Side,
        actual: Side,
    },

    /// The operation needs the fragment to be bound to a container first
    #[error("Fragment '{fragment}' must be attached to a container before it can {operation}")]
    NotAttached {
        fragment: &'static str,
        operation: &'static str,
    },
}

/// Errors that can occur while cloning a fragment from a prototype
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloneError {
    /// Construction or field copy failed; no instance was produced
    #[error("Unexpected error copying fragment of type {type_name} at field '{field}': {reason}")]
    CloneFailed {
        type_name: &'static str,
        field: String,
        reason: String,
    },
}
