//! # Tether Shared
//! Fragments, event dispatch, field schemas and state sync shared between
//! tether-server & tether-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod events;
mod fragment;
mod protocol;
mod schema;
mod store;
mod sync;
mod types;
mod wrapping_number;

pub use events::{
    Container, ContainerError, DispatchConfig, DispatchError, Event, EventContext, EventKind,
    HandlerError, HandlerId, RegistryError, SubscriberInfo, SubscriptionRegistry,
};
pub use fragment::{
    CloneError, DynFragment, Fragment, FragmentBase, FragmentBaseBuilder, FragmentError,
    FragmentKind, FragmentKinds, FragmentType, PrototypeCloner,
};
pub use protocol::{Protocol, ProtocolError, ProtocolPlugin};
pub use schema::{
    ExclusionReason, FieldAccess, FieldDescriptor, FieldSchema, FromValue, SchemaCache,
    SchemaError, StateBlob, StateBlobError, Value, ValueKind,
};
pub use store::{ApplyOutcome, FragmentStore, OwnerData, OwnerSnapshot, StoreError};
pub use sync::{
    SyncBody, SyncError, SyncMessage, SyncOutcome, SyncReceiver, SyncSender, SyncTransport,
    SyncVersion, TransportError,
};
pub use types::{ContainerId, FragmentId, MirrorKey, OwnerKey, Peer, Side};
pub use wrapping_number::{sequence_greater_than, sequence_less_than};
