//! # Tether Server
//! The authoritative side: owns every owner's fragments, persists and resets
//! them, answers mirror queries, and pushes fragment state to the mirrors
//! observing each owner.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tether_shared::{
        Event, EventContext, FieldAccess, FieldDescriptor, Fragment, FragmentBase, FragmentType,
        HandlerError, MirrorKey, OwnerKey, OwnerSnapshot, Peer, Protocol, SchemaError, StateBlob,
        SyncMessage, SyncOutcome, SyncTransport, TransportError, Value, ValueKind,
    };
}

mod error;
mod server;

pub use error::TetherServerError;
pub use server::{Server, ServerConfig};
