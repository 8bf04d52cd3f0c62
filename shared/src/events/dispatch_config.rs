/// Contains config properties which will be used by every container's event dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Maximum nesting of events posted from within handlers or ticks. A
    /// top-level post is depth 0; an event posted past this depth is dropped
    /// and reported as `DispatchError::DepthExceeded`.
    pub max_depth: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}
