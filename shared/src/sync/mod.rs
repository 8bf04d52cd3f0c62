mod error;
mod sync_message;
mod sync_receiver;
mod sync_sender;
mod sync_transport;
mod sync_version;

pub use error::{SyncError, TransportError};
pub use sync_message::{SyncBody, SyncMessage};
pub use sync_receiver::{SyncOutcome, SyncReceiver};
pub use sync_sender::SyncSender;
pub use sync_transport::SyncTransport;
pub use sync_version::SyncVersion;
