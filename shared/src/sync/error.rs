use thiserror::Error;

use crate::{
    store::StoreError,
    types::{OwnerKey, Peer, Side},
};

/// Errors that can occur while delivering a sync message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The peer is not connected
    #[error("{peer} is not reachable")]
    PeerUnavailable { peer: Peer },

    /// The transport was shut down
    #[error("Transport is closed")]
    Closed,

    /// The transport could not serialize the message
    #[error("Transport failed to encode message: {0}")]
    Encode(String),
}

/// Errors that can occur while producing or applying sync messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The message is not newer than the last one applied for this fragment
    /// from this peer and was dropped
    #[error("Discarded stale sync of '{fragment}' for {owner}: version {version} is not newer than {last_applied}")]
    StaleSyncDiscarded {
        owner: OwnerKey,
        fragment: String,
        version: u16,
        last_applied: u16,
    },

    /// The message kind is not valid on the receiving side
    #[error("Sync {operation} must be handled on the {expected} side, not {actual}")]
    WrongSideInvocation {
        operation: &'static str,
        expected: Side,
        actual: Side,
    },

    #[error("Failed to encode sync message: {0}")]
    Encode(String),

    #[error("Failed to decode sync message: {0}")]
    Decode(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
