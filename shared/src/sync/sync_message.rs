use serde::{Deserialize, Serialize};

use crate::{schema::StateBlob, types::OwnerKey};

use super::{error::SyncError, sync_version::SyncVersion};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SyncBody {
    /// Full encoded state of the fragment
    State(StateBlob),
    /// Mirror asks the authority to push the fragment's state
    Request,
}

/// One fragment's sync traffic between the authority and a mirror
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncMessage {
    owner: OwnerKey,
    fragment: String,
    version: SyncVersion,
    body: SyncBody,
}

impl SyncMessage {
    pub fn state(owner: OwnerKey, fragment: &str, version: SyncVersion, state: StateBlob) -> Self {
        Self {
            owner,
            fragment: fragment.to_string(),
            version,
            body: SyncBody::State(state),
        }
    }

    pub fn request(owner: OwnerKey, fragment: &str) -> Self {
        Self {
            owner,
            fragment: fragment.to_string(),
            version: SyncVersion::default(),
            body: SyncBody::Request,
        }
    }

    pub fn owner(&self) -> OwnerKey {
        self.owner
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn version(&self) -> SyncVersion {
        self.version
    }

    pub fn body(&self) -> &SyncBody {
        &self.body
    }

    pub fn is_request(&self) -> bool {
        matches!(self.body, SyncBody::Request)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SyncError> {
        rmp_serde::to_vec_named(self).map_err(|err| SyncError::Encode(err.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SyncError> {
        rmp_serde::from_slice(bytes).map_err(|err| SyncError::Decode(err.to_string()))
    }
}
