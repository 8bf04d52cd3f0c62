use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::schema::{StateBlob, StateBlobError};

/// Persisted state of one owner: fragment name to state blob
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerSnapshot {
    fragments: BTreeMap<String, StateBlob>,
}

impl OwnerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, state: StateBlob) -> Option<StateBlob> {
        self.fragments.insert(name.into(), state)
    }

    pub fn get(&self, name: &str) -> Option<&StateBlob> {
        self.fragments.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, StateBlob> {
        self.fragments.iter()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StateBlobError> {
        rmp_serde::to_vec_named(self).map_err(|err| StateBlobError::Encode(err.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateBlobError> {
        rmp_serde::from_slice(bytes).map_err(|err| StateBlobError::Decode(err.to_string()))
    }
}

impl IntoIterator for OwnerSnapshot {
    type Item = (String, StateBlob);
    type IntoIter = btree_map::IntoIter<String, StateBlob>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.into_iter()
    }
}
