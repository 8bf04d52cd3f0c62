use thiserror::Error;

use crate::{
    events::ContainerError,
    schema::{SchemaError, StateBlobError},
    types::{OwnerKey, Side},
};

/// Errors that can occur while materializing, persisting or restoring fragments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No fragment type is registered under this name, or the name belongs to another type
    #[error("No fragment type registered under the name '{name}'")]
    FragmentNotRegistered { name: String },

    /// The store holds no owner with this key
    #[error("{owner} is not held by this store")]
    OwnerNotFound { owner: OwnerKey },

    /// The owner was already inserted
    #[error("{owner} is already held by this store")]
    OwnerAlreadyExists { owner: OwnerKey },

    /// A side-restricted operation was invoked on the wrong side
    #[error("{operation} on {owner} must run on the {expected} side, not {actual}")]
    WrongSideInvocation {
        owner: OwnerKey,
        operation: &'static str,
        expected: Side,
        actual: Side,
    },

    /// Saved or received state could not be written into the fragment
    #[error("Cannot restore '{fragment}' of {owner}: {source}")]
    Restore {
        owner: OwnerKey,
        fragment: String,
        source: SchemaError,
    },

    /// A snapshot could not be encoded or decoded
    #[error(transparent)]
    Snapshot(#[from] StateBlobError),

    #[error(transparent)]
    Container(#[from] ContainerError),
}
