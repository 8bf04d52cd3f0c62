use std::fmt;

use serde::{Deserialize, Serialize};

/// Which execution context a store or container lives in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Owns the ground-truth state of every fragment
    Authoritative,
    /// Holds a replicated view of the authoritative state
    Mirror,
}

impl Side {
    pub fn invert(self) -> Self {
        match self {
            Side::Authoritative => Side::Mirror,
            Side::Mirror => Side::Authoritative,
        }
    }

    pub fn is_mirror(self) -> bool {
        self == Side::Mirror
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Authoritative => write!(f, "Authoritative"),
            Side::Mirror => write!(f, "Mirror"),
        }
    }
}

/// Identity of a long-lived owner (an entity, a player) that fragments attach to.
/// Stable across resets, and the same value on every side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerKey(u64);

impl OwnerKey {
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Owner({})", self.0)
    }
}

/// Identity of one mirror context, as seen from the authoritative side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MirrorKey(u64);

impl MirrorKey {
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MirrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mirror({})", self.0)
    }
}

/// The counterpart a sync message is addressed to, or was received from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Peer {
    Authority,
    Mirror(MirrorKey),
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Peer::Authority => write!(f, "Authority"),
            Peer::Mirror(key) => write!(f, "{}", key),
        }
    }
}

/// Process-unique identity of a `Container`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContainerId(u64);

impl ContainerId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

/// Identity of a fragment within its container, increasing in attach order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(u32);

impl FragmentId {
    pub(crate) fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn to_u32(&self) -> u32 {
        self.0
    }
}
