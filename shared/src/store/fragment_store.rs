use std::{
    collections::{hash_map, HashMap},
    sync::Arc,
};

use log::info;

use crate::{
    protocol::Protocol,
    types::{OwnerKey, Side},
};

use super::{error::StoreError, owner_data::OwnerData};

/// Every owner's fragments on one side
pub struct FragmentStore {
    side: Side,
    protocol: Arc<Protocol>,
    owners: HashMap<OwnerKey, OwnerData>,
}

impl FragmentStore {
    pub fn new(side: Side, protocol: Arc<Protocol>) -> Self {
        Self {
            side,
            protocol,
            owners: HashMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn protocol(&self) -> &Arc<Protocol> {
        &self.protocol
    }

    pub fn insert_owner(&mut self, key: OwnerKey) -> Result<&mut OwnerData, StoreError> {
        match self.owners.entry(key) {
            hash_map::Entry::Occupied(_) => Err(StoreError::OwnerAlreadyExists { owner: key }),
            hash_map::Entry::Vacant(entry) => {
                info!("FragmentStore: tracking {} on the {} side", key, self.side);
                Ok(entry.insert(OwnerData::new(key, self.side, self.protocol.clone())))
            }
        }
    }

    /// Stops tracking the owner and detaches its fragments
    pub fn remove_owner(&mut self, key: &OwnerKey) -> Option<OwnerData> {
        let mut owner = self.owners.remove(key)?;
        owner.container_mut().clear();
        info!("FragmentStore: dropped {}", key);
        Some(owner)
    }

    pub fn contains_owner(&self, key: &OwnerKey) -> bool {
        self.owners.contains_key(key)
    }

    pub fn owner(&self, key: &OwnerKey) -> Option<&OwnerData> {
        self.owners.get(key)
    }

    pub fn owner_mut(&mut self, key: &OwnerKey) -> Option<&mut OwnerData> {
        self.owners.get_mut(key)
    }

    pub fn try_owner_mut(&mut self, key: &OwnerKey) -> Result<&mut OwnerData, StoreError> {
        self.owners
            .get_mut(key)
            .ok_or(StoreError::OwnerNotFound { owner: *key })
    }

    pub fn owner_keys(&self) -> Vec<OwnerKey> {
        self.owners.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn iter_mut(&mut self) -> hash_map::IterMut<'_, OwnerKey, OwnerData> {
        self.owners.iter_mut()
    }

    pub fn reset_owner(&mut self, key: &OwnerKey) -> Result<Vec<&'static str>, StoreError> {
        Ok(self.try_owner_mut(key)?.reset())
    }

    pub fn tick(&mut self) {
        for owner in self.owners.values_mut() {
            owner.tick();
        }
    }
}
