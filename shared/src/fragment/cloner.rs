use log::error;

use crate::schema::SchemaCache;

use super::{
    error::CloneError,
    fragment::{DynFragment, Fragment, FragmentType},
};

/// Produces independent copies of fragments from a prototype.
///
/// A clone is a freshly constructed instance with every eligible field deep
/// copied from the source. It is enabled, unbound, and carries the handlers
/// its constructor registers, not the source's binding.
pub struct PrototypeCloner;

impl PrototypeCloner {
    pub fn clone_typed<T: FragmentType>(source: &T) -> Result<T, CloneError> {
        let schema = SchemaCache::global().schema_of::<T>();
        let mut clone = T::default();

        if let Err((field, err)) = schema.copy_fields(source, &mut clone) {
            let err = CloneError::CloneFailed {
                type_name: T::NAME,
                field,
                reason: err.to_string(),
            };
            error!("PrototypeCloner: {}", err);
            return Err(err);
        }

        clone.base_mut().set_enabled(true);
        Ok(clone)
    }

    pub fn clone_dyn(source: &dyn Fragment) -> Result<Box<dyn Fragment>, CloneError> {
        source.clone_boxed()
    }
}
