use thiserror::Error;

use tether_shared::{OwnerKey, StoreError, SyncError, TransportError};

/// Errors surfaced by the authoritative server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TetherServerError {
    /// The owner has not been spawned on this server
    #[error("{owner} has not been spawned on this server")]
    OwnerNotFound { owner: OwnerKey },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
