use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. Protocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// Two distinct fragment types were registered under one name
    #[error("A different fragment type is already registered under the name '{name}'")]
    DuplicateFragmentName { name: &'static str },
}
