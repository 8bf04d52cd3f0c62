use std::default::Default;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Ticks between repeated queries for a fragment that has not received
    /// authoritative state yet. The first query goes out on the first tick
    /// after the fragment materializes.
    pub query_interval_ticks: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            query_interval_ticks: 20,
        }
    }
}
