use std::{
    any::{type_name, Any},
    fmt,
    marker::PhantomData,
    sync::Arc,
};

use crate::fragment::{DynFragment, Fragment};

use super::{
    context::EventContext,
    error::HandlerError,
    event::{short_type_name, Event, EventKind},
};

/// Identity of a handler within the fragment that registered it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u16);

impl HandlerId {
    pub(crate) fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn to_u16(&self) -> u16 {
        self.0
    }
}

/// A handler with its fragment and event types erased
pub(crate) trait ErasedHandler: Send + Sync {
    fn call(
        &self,
        fragment: &mut dyn Fragment,
        context: &mut EventContext,
        event: &dyn Any,
    ) -> Result<(), HandlerError>;
}

struct TypedHandler<T, E, F> {
    handler: F,
    phantom: PhantomData<fn(&mut T, &E)>,
}

impl<T, E, F> ErasedHandler for TypedHandler<T, E, F>
where
    T: Fragment,
    E: Event,
    F: Fn(&mut T, &mut EventContext, &E) -> Result<(), HandlerError> + Send + Sync,
{
    fn call(
        &self,
        fragment: &mut dyn Fragment,
        context: &mut EventContext,
        event: &dyn Any,
    ) -> Result<(), HandlerError> {
        let Some(fragment) = fragment.as_any_mut().downcast_mut::<T>() else {
            return Err(HandlerError::FragmentTypeMismatch {
                expected: type_name::<T>(),
            });
        };
        let Some(event) = event.downcast_ref::<E>() else {
            return Err(HandlerError::EventTypeMismatch {
                expected: type_name::<E>(),
            });
        };
        (self.handler)(fragment, context, event)
    }
}

/// A handler recorded during fragment construction, registered on attach
#[derive(Clone)]
pub struct PendingSubscription {
    pub(crate) kind: EventKind,
    pub(crate) event_name: &'static str,
    pub(crate) handler_id: HandlerId,
    pub(crate) priority: i32,
    pub(crate) handler: Arc<dyn ErasedHandler>,
}

impl PendingSubscription {
    pub(crate) fn new<T, E, F>(handler_id: HandlerId, priority: i32, handler: F) -> Self
    where
        T: Fragment,
        E: Event,
        F: Fn(&mut T, &mut EventContext, &E) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self {
            kind: EventKind::of::<E>(),
            event_name: short_type_name::<E>(),
            handler_id,
            priority,
            handler: Arc::new(TypedHandler::<T, E, F> {
                handler,
                phantom: PhantomData,
            }),
        }
    }

    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }
}

impl fmt::Debug for PendingSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSubscription")
            .field("event", &self.event_name)
            .field("handler_id", &self.handler_id)
            .field("priority", &self.priority)
            .finish()
    }
}
