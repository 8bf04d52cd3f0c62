use thiserror::Error;

use tether_shared::{OwnerKey, StoreError, SyncError, TransportError};

/// Errors surfaced by the mirror client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TetherClientError {
    /// The owner is not tracked by this client
    #[error("{owner} is not tracked by this client")]
    OwnerNotFound { owner: OwnerKey },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
