use std::any::{Any, TypeId};

/// A typed message delivered to subscribed fragments of one container
pub trait Event: Any + Send {}

/// Type tag of a concrete event type
#[derive(Eq, Hash, Copy, Clone, PartialEq, Debug)]
pub struct EventKind {
    type_id: TypeId,
}

impl From<TypeId> for EventKind {
    fn from(type_id: TypeId) -> Self {
        Self { type_id }
    }
}

impl EventKind {
    pub fn of<E: Event>() -> Self {
        Self::from(TypeId::of::<E>())
    }
}

/// Last path segment of a type name, for logs and errors
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(index) => &full[index + 2..],
        None => full,
    }
}

/// An event waiting to be dispatched
pub(crate) struct PostedEvent {
    pub(crate) kind: EventKind,
    pub(crate) name: &'static str,
    pub(crate) payload: Box<dyn Any + Send>,
}

impl PostedEvent {
    pub(crate) fn new<E: Event>(event: E) -> Self {
        Self {
            kind: EventKind::of::<E>(),
            name: short_type_name::<E>(),
            payload: Box::new(event),
        }
    }
}
