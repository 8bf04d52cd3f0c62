use serde::{Deserialize, Serialize};

use crate::wrapping_number::sequence_greater_than;

/// Per-fragment send counter. Wraps around; compared with half-range
/// sequence arithmetic so ordering survives the wrap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncVersion(u16);

impl SyncVersion {
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn to_u16(&self) -> u16 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn is_newer_than(&self, other: &SyncVersion) -> bool {
        sequence_greater_than(self.0, other.0)
    }
}
