use crate::{
    events::DispatchConfig,
    fragment::{FragmentKinds, FragmentType},
};

pub mod error;
pub use error::ProtocolError;

// Protocol Plugin
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut Protocol);
}

// Protocol
pub struct Protocol {
    pub fragment_kinds: FragmentKinds,
    /// Limits applied to every container's event dispatch
    pub dispatch: DispatchConfig,
    locked: bool,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            fragment_kinds: FragmentKinds::new(),
            dispatch: DispatchConfig::default(),
            locked: false,
        }
    }
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> &mut Self {
        self.check_lock();
        plugin.build(self);
        self
    }

    pub fn dispatch_config(&mut self, config: DispatchConfig) -> &mut Self {
        self.check_lock();
        self.dispatch = config;
        self
    }

    /// Registers a fragment type under `T::NAME` and builds its schema.
    /// Registering the same type twice is a no-op.
    pub fn add_fragment<T: FragmentType>(&mut self) -> &mut Self {
        self.try_add_fragment::<T>()
            .unwrap_or_else(|err| panic!("{}", err))
    }

    // Non-panicking builder methods

    pub fn try_add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        plugin.build(self);
        Ok(self)
    }

    pub fn try_dispatch_config(&mut self, config: DispatchConfig) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.dispatch = config;
        Ok(self)
    }

    pub fn try_add_fragment<T: FragmentType>(&mut self) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.fragment_kinds.add::<T>()?;
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Checks if protocol is locked without panicking
    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
