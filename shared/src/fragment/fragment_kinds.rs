use std::{collections::HashMap, sync::Arc};

use log::{debug, info};

use crate::{
    protocol::ProtocolError,
    schema::{FieldSchema, SchemaCache},
};

use super::{
    fragment::{build_fragment, Fragment, FragmentType},
    fragment_kind::FragmentKind,
};

struct FragmentRecord {
    name: &'static str,
    build: fn() -> Box<dyn Fragment>,
    schema: Arc<FieldSchema>,
}

/// Registered fragment types, addressable by kind or by name
#[derive(Default)]
pub struct FragmentKinds {
    records: HashMap<FragmentKind, FragmentRecord>,
    names: HashMap<&'static str, FragmentKind>,
}

impl FragmentKinds {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add<T: FragmentType>(&mut self) -> Result<(), ProtocolError> {
        let kind = FragmentKind::of::<T>();
        if self.records.contains_key(&kind) {
            debug!("FragmentKinds: {} already registered", T::NAME);
            return Ok(());
        }
        if self.names.contains_key(T::NAME) {
            return Err(ProtocolError::DuplicateFragmentName { name: T::NAME });
        }

        let schema = SchemaCache::global().schema_of::<T>();
        info!(
            "FragmentKinds: registered {} with {} synced fields",
            T::NAME,
            schema.fields().len()
        );
        self.records.insert(
            kind,
            FragmentRecord {
                name: T::NAME,
                build: build_fragment::<T>,
                schema,
            },
        );
        self.names.insert(T::NAME, kind);
        Ok(())
    }

    pub fn kind_of_name(&self, name: &str) -> Option<FragmentKind> {
        self.names.get(name).copied()
    }

    pub fn name_of(&self, kind: &FragmentKind) -> Option<&'static str> {
        self.records.get(kind).map(|record| record.name)
    }

    pub fn schema(&self, kind: &FragmentKind) -> Option<Arc<FieldSchema>> {
        self.records.get(kind).map(|record| record.schema.clone())
    }

    pub fn build(&self, kind: &FragmentKind) -> Option<Box<dyn Fragment>> {
        self.records.get(kind).map(|record| (record.build)())
    }

    pub fn build_by_name(&self, name: &str) -> Option<Box<dyn Fragment>> {
        self.kind_of_name(name).and_then(|kind| self.build(&kind))
    }

    pub fn contains(&self, kind: &FragmentKind) -> bool {
        self.records.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.keys().copied()
    }
}
