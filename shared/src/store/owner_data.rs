use std::{collections::HashMap, sync::Arc};

use log::{debug, info, warn};

use crate::{
    events::{Container, Event},
    fragment::{DynFragment, Fragment, FragmentKind, FragmentType},
    protocol::Protocol,
    schema::StateBlob,
    types::{OwnerKey, Side},
};

use super::{error::StoreError, owner_snapshot::OwnerSnapshot};

/// Result of writing received state into a fragment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The fragment is local-only and kept its own state
    LocalOnly,
}

/// The fragments of one owner on one side.
///
/// A fragment is created the first time it is asked for, by type or by
/// registered name, and lives until the owner is reset (if it is cleared on
/// reset) or dropped. Saved state for fragments that have not been asked for
/// yet is held back and applied when they materialize.
pub struct OwnerData {
    key: OwnerKey,
    side: Side,
    protocol: Arc<Protocol>,
    container: Container,
    saved: HashMap<String, StateBlob>,
    initial_pushes: Vec<FragmentKind>,
    query_timers: HashMap<FragmentKind, u16>,
}

impl OwnerData {
    pub fn new(key: OwnerKey, side: Side, protocol: Arc<Protocol>) -> Self {
        let container = Container::with_side(side, protocol.dispatch);
        Self {
            key,
            side,
            protocol,
            container,
            saved: HashMap::new(),
            initial_pushes: Vec::new(),
            query_timers: HashMap::new(),
        }
    }

    pub fn key(&self) -> OwnerKey {
        self.key
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    pub fn try_assert_side(&self, expected: Side, operation: &'static str) -> Result<(), StoreError> {
        if self.side != expected {
            return Err(StoreError::WrongSideInvocation {
                owner: self.key,
                operation,
                expected,
                actual: self.side,
            });
        }
        Ok(())
    }

    // Access

    /// The owner's fragment of type `T`, created on first access
    pub fn get<T: FragmentType>(&mut self) -> Result<&mut T, StoreError> {
        let kind = FragmentKind::of::<T>();
        if self.protocol.fragment_kinds.kind_of_name(T::NAME) != Some(kind) {
            return Err(StoreError::FragmentNotRegistered {
                name: T::NAME.to_string(),
            });
        }
        if !self.container.contains_kind(&kind) {
            self.materialize(kind)?;
        }
        self.container
            .get_mut::<T>()
            .ok_or_else(|| StoreError::FragmentNotRegistered {
                name: T::NAME.to_string(),
            })
    }

    /// The owner's fragment registered under `name`, created on first access
    pub fn get_by_name(&mut self, name: &str) -> Result<&mut dyn Fragment, StoreError> {
        let kind = self.kind_of(name)?;
        if !self.container.contains_kind(&kind) {
            self.materialize(kind)?;
        }
        self.container
            .lookup_kind_mut(&kind)
            .ok_or_else(|| StoreError::FragmentNotRegistered {
                name: name.to_string(),
            })
    }

    /// Like `get`, without creating the fragment
    pub fn peek<T: FragmentType>(&self) -> Option<&T> {
        self.container.get::<T>()
    }

    pub fn peek_by_name(&self, name: &str) -> Option<&dyn Fragment> {
        let kind = self.protocol.fragment_kinds.kind_of_name(name)?;
        self.container.lookup_kind(&kind)
    }

    pub fn is_materialized(&self, name: &str) -> bool {
        self.peek_by_name(name).is_some()
    }

    /// Registered names of the materialized fragments, in creation order
    pub fn fragment_names(&self) -> Vec<&'static str> {
        self.container
            .iter()
            .filter_map(|fragment| self.protocol.fragment_kinds.name_of(&fragment.kind()))
            .collect()
    }

    fn kind_of(&self, name: &str) -> Result<FragmentKind, StoreError> {
        self.protocol
            .fragment_kinds
            .kind_of_name(name)
            .ok_or_else(|| StoreError::FragmentNotRegistered {
                name: name.to_string(),
            })
    }

    fn materialize(&mut self, kind: FragmentKind) -> Result<(), StoreError> {
        let protocol = self.protocol.clone();
        let kinds = &protocol.fragment_kinds;
        let (Some(name), Some(fragment)) = (kinds.name_of(&kind), kinds.build(&kind)) else {
            return Err(StoreError::FragmentNotRegistered {
                name: format!("{:?}", kind),
            });
        };

        let local_only = fragment.base().is_local_only();
        self.container.attach(fragment)?;

        if let Some(state) = self.saved.remove(name) {
            if let Some(fragment) = self.container.lookup_kind_mut(&kind) {
                if let Err(err) = fragment.restore_state(&state) {
                    warn!(
                        "OwnerData {}: saved state for '{}' not restored, keeping defaults: {}",
                        self.key, name, err
                    );
                }
            }
        }

        if !local_only {
            match self.side {
                Side::Authoritative => self.initial_pushes.push(kind),
                Side::Mirror => {
                    self.query_timers.insert(kind, 0);
                }
            }
        }

        info!(
            "OwnerData {}: materialized '{}' on the {} side",
            self.key, name, self.side
        );
        Ok(())
    }

    // Events

    pub fn post<E: Event>(&mut self, event: E) -> usize {
        self.container.post(event)
    }

    pub fn tick(&mut self) {
        self.container.tick();
    }

    // Reset

    /// Drops every fragment that is cleared on reset. Returns their names.
    /// They are recreated fresh on next access.
    pub fn reset(&mut self) -> Vec<&'static str> {
        let cleared: Vec<&'static str> = self
            .container
            .iter()
            .filter(|fragment| !fragment.base().keeps_across_reset())
            .map(|fragment| fragment.base().name())
            .collect();

        for name in &cleared {
            if let Some(fragment) = self.container.detach(name) {
                let kind = fragment.kind();
                self.initial_pushes.retain(|pending| *pending != kind);
                self.query_timers.remove(&kind);
            }
        }

        info!(
            "OwnerData {}: reset cleared {} fragments",
            self.key,
            cleared.len()
        );
        cleared
    }

    // Persistence

    /// State of every storable fragment, plus held-back state of fragments
    /// that have not materialized yet
    pub fn save(&self) -> OwnerSnapshot {
        let mut snapshot = OwnerSnapshot::new();
        for (name, state) in &self.saved {
            snapshot.insert(name.clone(), state.clone());
        }
        for fragment in self.container.iter() {
            if !fragment.can_store() {
                continue;
            }
            let Some(name) = self.protocol.fragment_kinds.name_of(&fragment.kind()) else {
                continue;
            };
            if let Some(state) = fragment.persist_state() {
                snapshot.insert(name, state);
            }
        }
        snapshot
    }

    /// Restores materialized fragments now and holds back the rest
    pub fn load(&mut self, snapshot: OwnerSnapshot) -> Result<(), StoreError> {
        for (name, state) in snapshot {
            let Some(kind) = self.protocol.fragment_kinds.kind_of_name(&name) else {
                debug!(
                    "OwnerData {}: keeping state for unregistered fragment '{}'",
                    self.key, name
                );
                self.saved.insert(name, state);
                continue;
            };
            match self.container.lookup_kind_mut(&kind) {
                Some(fragment) => {
                    fragment
                        .restore_state(&state)
                        .map_err(|source| StoreError::Restore {
                            owner: self.key,
                            fragment: name.clone(),
                            source,
                        })?;
                }
                None => {
                    self.saved.insert(name, state);
                }
            }
        }
        Ok(())
    }

    pub fn has_saved_state(&self, name: &str) -> bool {
        self.saved.contains_key(name)
    }

    // Sync

    /// State to push for the fragment, or `None` if it is local-only or
    /// has nothing to send. Materializes the fragment if needed.
    pub fn encode_for_sync(&mut self, name: &str) -> Result<Option<StateBlob>, StoreError> {
        let fragment = self.get_by_name(name)?;
        if fragment.base().is_local_only() {
            return Ok(None);
        }
        Ok(fragment.encode_sync())
    }

    /// Writes received state into the fragment, materializing it if needed
    pub fn apply_sync(&mut self, name: &str, state: &StateBlob) -> Result<ApplyOutcome, StoreError> {
        let owner = self.key;
        let fragment = self.get_by_name(name)?;
        if fragment.base().is_local_only() {
            warn!(
                "OwnerData {}: ignoring received state for local-only '{}'",
                owner, name
            );
            return Ok(ApplyOutcome::LocalOnly);
        }
        fragment
            .decode_sync(state)
            .map_err(|source| StoreError::Restore {
                owner,
                fragment: name.to_string(),
                source,
            })?;
        fragment.base_mut().mark_synced();
        Ok(ApplyOutcome::Applied)
    }

    /// Fragments created on the authoritative side since the last call
    pub fn take_initial_pushes(&mut self) -> Vec<&'static str> {
        let pending = std::mem::take(&mut self.initial_pushes);
        pending
            .into_iter()
            .filter(|kind| self.container.contains_kind(kind))
            .filter_map(|kind| self.protocol.fragment_kinds.name_of(&kind))
            .collect()
    }

    /// Fragments that called `request_sync` since the last call
    pub fn take_sync_requests(&mut self) -> Vec<&'static str> {
        let mut requested = Vec::new();
        for name in self.container.names() {
            let Some(fragment) = self.container.lookup_mut(name) else {
                continue;
            };
            if fragment.base_mut().take_sync_request() {
                if let Some(registered) = self.protocol.fragment_kinds.name_of(&fragment.kind()) {
                    requested.push(registered);
                }
            }
        }
        requested
    }

    /// Mirror side: fragments still waiting for authoritative state whose
    /// query countdown ran out this tick. The countdown restarts at
    /// `interval` ticks after each query.
    pub fn due_queries(&mut self, interval: u16) -> Vec<&'static str> {
        if self.side != Side::Mirror {
            return Vec::new();
        }
        let mut due = Vec::new();
        let container = &self.container;
        let kinds = &self.protocol.fragment_kinds;
        self.query_timers.retain(|kind, remaining| {
            let Some(fragment) = container.lookup_kind(kind) else {
                return false;
            };
            if fragment.base().is_synced() {
                return false;
            }
            if *remaining == 0 {
                if let Some(name) = kinds.name_of(kind) {
                    due.push(name);
                }
                *remaining = interval.saturating_sub(1);
            } else {
                *remaining -= 1;
            }
            true
        });
        due
    }
}
