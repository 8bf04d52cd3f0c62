use std::collections::HashMap;

use log::debug;

use crate::{
    store::{ApplyOutcome, FragmentStore},
    types::{OwnerKey, Peer, Side},
};

use super::{
    error::SyncError,
    sync_message::{SyncBody, SyncMessage},
    sync_version::SyncVersion,
};

/// What receiving a message did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// State was written into the fragment
    Applied,
    /// The fragment is local-only and ignored the state
    LocalOnly,
    /// The owner is not tracked on this side; nothing happened
    OwnerMissing,
    /// A mirror asked for this fragment's state; the caller should push it
    Requested,
}

/// Applies incoming state in version order, per peer and fragment
#[derive(Default)]
pub struct SyncReceiver {
    applied: HashMap<(Peer, OwnerKey, String), SyncVersion>,
}

impl SyncReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receive(
        &mut self,
        from: Peer,
        message: &SyncMessage,
        store: &mut FragmentStore,
    ) -> Result<SyncOutcome, SyncError> {
        let state = match message.body() {
            SyncBody::Request => {
                if store.side() != Side::Authoritative {
                    return Err(SyncError::WrongSideInvocation {
                        operation: "request",
                        expected: Side::Authoritative,
                        actual: store.side(),
                    });
                }
                if !store.contains_owner(&message.owner()) {
                    return Ok(SyncOutcome::OwnerMissing);
                }
                return Ok(SyncOutcome::Requested);
            }
            SyncBody::State(state) => state,
        };

        let Some(owner) = store.owner_mut(&message.owner()) else {
            debug!(
                "SyncReceiver: no {} for '{}', dropping state",
                message.owner(),
                message.fragment()
            );
            return Ok(SyncOutcome::OwnerMissing);
        };

        let key = (from, message.owner(), message.fragment().to_string());
        if let Some(last_applied) = self.applied.get(&key) {
            if !message.version().is_newer_than(last_applied) {
                let err = SyncError::StaleSyncDiscarded {
                    owner: message.owner(),
                    fragment: message.fragment().to_string(),
                    version: message.version().to_u16(),
                    last_applied: last_applied.to_u16(),
                };
                debug!("SyncReceiver: {}", err);
                return Err(err);
            }
        }

        let outcome = match owner.apply_sync(message.fragment(), state)? {
            ApplyOutcome::Applied => SyncOutcome::Applied,
            ApplyOutcome::LocalOnly => SyncOutcome::LocalOnly,
        };
        self.applied.insert(key, message.version());
        Ok(outcome)
    }

    pub fn last_applied(&self, from: Peer, owner: OwnerKey, fragment: &str) -> Option<SyncVersion> {
        self.applied
            .get(&(from, owner, fragment.to_string()))
            .copied()
    }

    pub fn forget_owner(&mut self, owner: &OwnerKey) {
        self.applied.retain(|(_, key, _), _| key != owner);
    }

    pub fn forget_peer(&mut self, peer: &Peer) {
        self.applied.retain(|(from, _, _), _| from != peer);
    }
}
