//! # Tether Client
//! The mirror side: holds local copies of the fragments of the owners it
//! tracks, queries the authority until each one is synced, and pushes local
//! changes back on request.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tether_shared::{
        Event, EventContext, FieldAccess, FieldDescriptor, Fragment, FragmentBase, FragmentType,
        HandlerError, OwnerKey, Peer, Protocol, SchemaError, StateBlob, SyncMessage, SyncOutcome,
        SyncTransport, TransportError, Value, ValueKind,
    };
}

mod client;
mod error;

pub use client::{Client, ClientConfig};
pub use error::TetherClientError;
