use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

use log::info;

use crate::fragment::{FragmentKind, FragmentType};

use super::{field::FieldDescriptor, field_schema::FieldSchema};

static GLOBAL_SCHEMA_CACHE: OnceLock<SchemaCache> = OnceLock::new();

/// Memoizes one `FieldSchema` per fragment type.
///
/// Lookups take a shared lock. A miss takes the exclusive lock and checks again
/// before building, so concurrent first requests for one type build it once and
/// all callers observe the same `Arc`.
///
/// The field declaration closure runs while the exclusive lock is held and must
/// not call back into the cache.
pub struct SchemaCache {
    schemas: RwLock<HashMap<FragmentKind, Arc<FieldSchema>>>,
    builds: AtomicUsize,
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaCache {
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
            builds: AtomicUsize::new(0),
        }
    }

    /// The process-wide cache used by fragments, the cloner and the protocol
    pub fn global() -> &'static SchemaCache {
        GLOBAL_SCHEMA_CACHE.get_or_init(SchemaCache::new)
    }

    pub fn schema_of<T: FragmentType>(&self) -> Arc<FieldSchema> {
        self.get_or_build(FragmentKind::of::<T>(), T::NAME, T::fields)
    }

    pub fn get_or_build(
        &self,
        kind: FragmentKind,
        type_name: &'static str,
        declare: impl FnOnce() -> Vec<FieldDescriptor>,
    ) -> Arc<FieldSchema> {
        if let Some(schema) = self.read().get(&kind) {
            return schema.clone();
        }

        let mut schemas = self.write();
        if let Some(schema) = schemas.get(&kind) {
            return schema.clone();
        }

        let schema = Arc::new(FieldSchema::build(type_name, declare()));
        self.builds.fetch_add(1, Ordering::Relaxed);
        info!(
            "SchemaCache: built schema for {} ({} eligible, {} excluded)",
            type_name,
            schema.fields().len(),
            schema.excluded().len()
        );
        schemas.insert(kind, schema.clone());
        schema
    }

    pub fn get(&self, kind: &FragmentKind) -> Option<Arc<FieldSchema>> {
        self.read().get(kind).cloned()
    }

    pub fn contains(&self, kind: &FragmentKind) -> bool {
        self.read().contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Number of schemas built since creation or the last `reset`
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Drops every cached schema. Schemas already handed out stay valid.
    #[doc(hidden)]
    pub fn reset(&self) {
        self.write().clear();
        self.builds.store(0, Ordering::Relaxed);
    }

    // A panic inside a declaration closure poisons the lock but cannot leave a
    // half-inserted entry behind, so the map is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<FragmentKind, Arc<FieldSchema>>> {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<FragmentKind, Arc<FieldSchema>>> {
        self.schemas.write().unwrap_or_else(PoisonError::into_inner)
    }
}
