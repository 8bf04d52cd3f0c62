use thiserror::Error;

use crate::{fragment::FragmentError, types::FragmentId};

use super::handler::HandlerId;

/// Returned by event handlers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler could not process the event
    #[error("{0}")]
    Failed(String),

    /// The registry routed the call to a fragment of another type
    #[error("Handler expected fragment type {expected}")]
    FragmentTypeMismatch { expected: &'static str },

    /// The registry routed the call with an event of another type
    #[error("Handler expected event type {expected}")]
    EventTypeMismatch { expected: &'static str },
}

impl HandlerError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// Errors recorded while dispatching events. Dispatch continues past them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A handler returned an error; the remaining handlers still ran
    #[error("Handler of '{fragment}' failed on {event}: {source}")]
    HandlerFailed {
        event: &'static str,
        fragment: &'static str,
        source: HandlerError,
    },

    /// An event was posted deeper than the configured maximum and was dropped
    #[error("Event {event} dropped: nested dispatch exceeded max depth {max_depth}")]
    DepthExceeded {
        event: &'static str,
        max_depth: usize,
    },
}

/// Errors that can occur while maintaining the subscription registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The same handler of the same fragment was registered twice for one event kind
    #[error("Handler {handler:?} of fragment {fragment:?} is already subscribed to {event}")]
    DuplicateHandler {
        fragment: FragmentId,
        handler: HandlerId,
        event: &'static str,
    },
}

/// Errors that can occur during container operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// A fragment with this name is already attached
    #[error("Container already holds a fragment named '{name}'")]
    DuplicateName { name: &'static str },

    /// No fragment with this name is attached
    #[error("Container holds no fragment named '{name}'")]
    FragmentNotFound { name: String },

    #[error(transparent)]
    Fragment(#[from] FragmentError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
