use crate::types::Peer;

use super::{error::TransportError, sync_message::SyncMessage};

/// Carries sync messages to a peer. Delivery may be delayed or reordered;
/// receivers discard stale state by version.
pub trait SyncTransport: Send {
    fn send(&mut self, to: Peer, message: &SyncMessage) -> Result<(), TransportError>;
}
