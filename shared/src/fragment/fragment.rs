use std::{any::Any, sync::Arc};

use crate::{
    events::EventContext,
    schema::{FieldAccess, FieldDescriptor, FieldSchema, SchemaCache, SchemaError, StateBlob},
};

use super::{
    cloner::PrototypeCloner, error::CloneError, fragment_base::FragmentBase,
    fragment_kind::FragmentKind,
};

/// A unit of behavior and state attached to a container.
///
/// Implementors embed a `FragmentBase` built in their `Default` impl, where
/// they also register their event handlers. Every hook has a default, so a
/// plain data fragment only needs `base`/`base_mut` and `FieldAccess`.
pub trait Fragment: FieldAccess + DynFragment + Send {
    fn base(&self) -> &FragmentBase;

    fn base_mut(&mut self) -> &mut FragmentBase;

    /// Called once after the fragment is bound and its handlers are registered
    fn on_attach(&mut self) {}

    /// Called once after the fragment's handlers are removed
    fn on_detach(&mut self) {}

    /// Called once per host tick while the fragment is ticking. Work that does
    /// not fit in one tick should be split across ticks or posted as an event.
    fn tick(&mut self, _context: &mut EventContext) {}

    /// Whether `persist_state` should be consulted when the owner is saved
    fn can_store(&self) -> bool {
        true
    }

    /// State written when the owner is saved. `None` stores nothing.
    fn persist_state(&self) -> Option<StateBlob> {
        Some(self.schema().encode(self))
    }

    fn restore_state(&mut self, state: &StateBlob) -> Result<(), SchemaError> {
        self.schema().decode(self, state)
    }

    /// State pushed to the other side. Defaults to the persisted form.
    fn encode_sync(&self) -> Option<StateBlob> {
        self.persist_state()
    }

    fn decode_sync(&mut self, state: &StateBlob) -> Result<(), SchemaError> {
        self.restore_state(state)
    }
}

/// A concrete fragment type that can be registered, built by name, and cloned
pub trait FragmentType: Fragment + Default {
    /// Registry name, unique per protocol
    const NAME: &'static str;

    /// Declared fields in declaration order
    fn fields() -> Vec<FieldDescriptor> {
        Vec::new()
    }
}

/// Object-safe access to a fragment's concrete type. Implemented for every
/// `FragmentType`; not meant to be implemented by hand.
pub trait DynFragment: Any {
    fn kind(&self) -> FragmentKind;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Arc<FieldSchema>;

    fn clone_boxed(&self) -> Result<Box<dyn Fragment>, CloneError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: FragmentType> DynFragment for T {
    fn kind(&self) -> FragmentKind {
        FragmentKind::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn schema(&self) -> Arc<FieldSchema> {
        SchemaCache::global().schema_of::<T>()
    }

    fn clone_boxed(&self) -> Result<Box<dyn Fragment>, CloneError> {
        let clone = PrototypeCloner::clone_typed(self)?;
        Ok(Box::new(clone))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Constructor stored by the protocol for building fragments by name
pub(crate) fn build_fragment<T: FragmentType>() -> Box<dyn Fragment> {
    Box::new(T::default())
}
