use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Serialize};

use super::{error::StateBlobError, value::Value};

/// Serialized state of one fragment: an ordered, string-keyed map of values.
/// Produced by schema-driven encoding or by a fragment's own persist/sync hooks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateBlob {
    entries: BTreeMap<String, Value>,
}

impl StateBlob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(Value::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(Value::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(Value::Float(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StateBlobError> {
        rmp_serde::to_vec_named(self).map_err(|err| StateBlobError::Encode(err.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateBlobError> {
        rmp_serde::from_slice(bytes).map_err(|err| StateBlobError::Decode(err.to_string()))
    }
}

impl<'a> IntoIterator for &'a StateBlob {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
