use std::collections::HashMap;

use crate::{store::OwnerData, types::OwnerKey};

use super::{error::SyncError, sync_message::SyncMessage, sync_version::SyncVersion};

/// Stamps outgoing state with a per-fragment version.
///
/// Counters are never reset, not even when an owner is despawned or
/// untracked. The receiving side may still remember the last version it
/// applied for that owner, and a respawned owner must keep counting past it.
#[derive(Default)]
pub struct SyncSender {
    versions: HashMap<(OwnerKey, String), SyncVersion>,
}

impl SyncSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// The version for the next state of this fragment. The first is 1.
    pub fn next_version(&mut self, owner: OwnerKey, fragment: &str) -> SyncVersion {
        let version = self
            .versions
            .entry((owner, fragment.to_string()))
            .or_default();
        *version = version.next();
        *version
    }

    /// Encodes the fragment's current state into a versioned message.
    /// `None` if the fragment does not sync.
    pub fn state_message(
        &mut self,
        owner: &mut OwnerData,
        fragment: &str,
    ) -> Result<Option<SyncMessage>, SyncError> {
        let Some(state) = owner.encode_for_sync(fragment)? else {
            return Ok(None);
        };
        let version = self.next_version(owner.key(), fragment);
        Ok(Some(SyncMessage::state(owner.key(), fragment, version, state)))
    }
}
