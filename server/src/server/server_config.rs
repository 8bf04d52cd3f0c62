use std::default::Default;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Push a fragment's state to every observer as soon as it materializes,
    /// and push all materialized state to a mirror when it starts observing
    pub initial_sync: bool,
    /// Forward state received from one mirror to the owner's other observers
    pub rebroadcast_mirror_updates: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            initial_sync: true,
            rebroadcast_mirror_updates: false,
        }
    }
}
