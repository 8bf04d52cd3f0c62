use std::collections::{BTreeSet, HashMap};

use log::{info, warn};

use tether_shared::{
    FragmentStore, FragmentType, MirrorKey, OwnerData, OwnerKey, OwnerSnapshot, Peer, Protocol,
    Side, SyncMessage, SyncOutcome, SyncReceiver, SyncSender, SyncTransport,
};

use crate::{ServerConfig, TetherServerError};

/// The authoritative side. Owns the canonical fragments of every spawned
/// owner and keeps the mirrors observing each owner up to date.
pub struct Server {
    config: ServerConfig,
    store: FragmentStore,
    observers: HashMap<OwnerKey, BTreeSet<MirrorKey>>,
    sender: SyncSender,
    receiver: SyncReceiver,
    transport: Box<dyn SyncTransport>,
    errors: Vec<TetherServerError>,
}

impl Server {
    /// Create a new Server
    pub fn new<P: Into<Protocol>>(
        config: ServerConfig,
        protocol: P,
        transport: Box<dyn SyncTransport>,
    ) -> Self {
        let mut protocol: Protocol = protocol.into();
        if !protocol.is_locked() {
            protocol.lock();
        }

        Self {
            config,
            store: FragmentStore::new(Side::Authoritative, protocol.into()),
            observers: HashMap::new(),
            sender: SyncSender::new(),
            receiver: SyncReceiver::new(),
            transport,
            errors: Vec::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    // Owners

    pub fn spawn_owner(&mut self, owner: OwnerKey) -> Result<(), TetherServerError> {
        self.store.insert_owner(owner)?;
        self.observers.entry(owner).or_default();
        Ok(())
    }

    /// Drops the owner with all of its fragments and sync bookkeeping
    pub fn despawn_owner(&mut self, owner: &OwnerKey) -> bool {
        let removed = self.store.remove_owner(owner).is_some();
        self.observers.remove(owner);
        self.receiver.forget_owner(owner);
        removed
    }

    pub fn owner(&self, owner: &OwnerKey) -> Option<&OwnerData> {
        self.store.owner(owner)
    }

    pub fn owner_mut(&mut self, owner: &OwnerKey) -> Option<&mut OwnerData> {
        self.store.owner_mut(owner)
    }

    pub fn store(&self) -> &FragmentStore {
        &self.store
    }

    /// The owner's fragment of type `T`, created on first access
    pub fn fragment_mut<T: FragmentType>(
        &mut self,
        owner: &OwnerKey,
    ) -> Result<&mut T, TetherServerError> {
        let data = self
            .store
            .owner_mut(owner)
            .ok_or(TetherServerError::OwnerNotFound { owner: *owner })?;
        Ok(data.get::<T>()?)
    }

    // Observers

    /// Starts pushing the owner's state to `mirror`
    pub fn add_observer(&mut self, owner: OwnerKey, mirror: MirrorKey) -> Result<(), TetherServerError> {
        let Some(observers) = self.observers.get_mut(&owner) else {
            return Err(TetherServerError::OwnerNotFound { owner });
        };
        if !observers.insert(mirror) {
            return Ok(());
        }
        info!("Server: {} now observes {}", mirror, owner);

        if self.config.initial_sync {
            let names = self
                .store
                .owner(&owner)
                .map(|data| data.fragment_names())
                .unwrap_or_default();
            for name in names {
                self.send_state(owner, name, &[mirror])?;
            }
        }
        Ok(())
    }

    pub fn remove_observer(&mut self, owner: &OwnerKey, mirror: &MirrorKey) -> bool {
        self.observers
            .get_mut(owner)
            .map(|observers| observers.remove(mirror))
            .unwrap_or(false)
    }

    /// Forgets a mirror entirely, e.g. when it disconnects
    pub fn remove_mirror(&mut self, mirror: &MirrorKey) {
        for observers in self.observers.values_mut() {
            observers.remove(mirror);
        }
        self.receiver.forget_peer(&Peer::Mirror(*mirror));
        info!("Server: removed {}", mirror);
    }

    pub fn observers(&self, owner: &OwnerKey) -> Vec<MirrorKey> {
        self.observers
            .get(owner)
            .map(|observers| observers.iter().copied().collect())
            .unwrap_or_default()
    }

    // Sync

    /// Pushes the fragment's current state to every observer of the owner.
    /// Returns the number of mirrors it was delivered to.
    pub fn sync<T: FragmentType>(&mut self, owner: &OwnerKey) -> Result<usize, TetherServerError> {
        self.sync_by_name(owner, T::NAME)
    }

    pub fn sync_by_name(&mut self, owner: &OwnerKey, fragment: &str) -> Result<usize, TetherServerError> {
        let targets = self.observers(owner);
        self.send_state(*owner, fragment, &targets)
    }

    /// Handles one message from a mirror. Requests are answered immediately.
    pub fn receive(
        &mut self,
        from: MirrorKey,
        message: &SyncMessage,
    ) -> Result<SyncOutcome, TetherServerError> {
        let outcome = self
            .receiver
            .receive(Peer::Mirror(from), message, &mut self.store)?;

        match outcome {
            SyncOutcome::Requested => {
                self.send_state(message.owner(), message.fragment(), &[from])?;
            }
            SyncOutcome::Applied if self.config.rebroadcast_mirror_updates => {
                let others: Vec<MirrorKey> = self
                    .observers(&message.owner())
                    .into_iter()
                    .filter(|mirror| *mirror != from)
                    .collect();
                self.send_state(message.owner(), message.fragment(), &others)?;
            }
            _ => {}
        }
        Ok(outcome)
    }

    pub fn receive_bytes(&mut self, from: MirrorKey, bytes: &[u8]) -> Result<SyncOutcome, TetherServerError> {
        let message = SyncMessage::from_bytes(bytes)?;
        self.receive(from, &message)
    }

    // Lifecycle

    /// Ticks every owner, then pushes newly materialized fragments and
    /// fragments that requested a sync
    pub fn tick(&mut self) {
        self.store.tick();
        self.flush();
    }

    /// Pushes pending state without ticking
    pub fn flush(&mut self) {
        for owner in self.store.owner_keys() {
            let Some(data) = self.store.owner_mut(&owner) else {
                continue;
            };
            let mut pending = data.take_initial_pushes();
            if !self.config.initial_sync {
                pending.clear();
            }
            for name in data.take_sync_requests() {
                if !pending.contains(&name) {
                    pending.push(name);
                }
            }

            let targets = self.observers(&owner);
            for name in pending {
                if let Err(err) = self.send_state(owner, name, &targets) {
                    self.push_error(err);
                }
            }
        }
    }

    pub fn reset_owner(&mut self, owner: &OwnerKey) -> Result<Vec<&'static str>, TetherServerError> {
        Ok(self.store.reset_owner(owner)?)
    }

    pub fn save_owner(&self, owner: &OwnerKey) -> Result<OwnerSnapshot, TetherServerError> {
        let data = self
            .store
            .owner(owner)
            .ok_or(TetherServerError::OwnerNotFound { owner: *owner })?;
        Ok(data.save())
    }

    pub fn load_owner(&mut self, owner: &OwnerKey, snapshot: OwnerSnapshot) -> Result<(), TetherServerError> {
        let data = self
            .store
            .owner_mut(owner)
            .ok_or(TetherServerError::OwnerNotFound { owner: *owner })?;
        Ok(data.load(snapshot)?)
    }

    // Errors

    pub fn take_errors(&mut self) -> Vec<TetherServerError> {
        std::mem::take(&mut self.errors)
    }

    fn push_error(&mut self, err: TetherServerError) {
        warn!("Server: {}", err);
        self.errors.push(err);
    }

    fn send_state(
        &mut self,
        owner: OwnerKey,
        fragment: &str,
        targets: &[MirrorKey],
    ) -> Result<usize, TetherServerError> {
        if targets.is_empty() {
            return Ok(0);
        }
        let data = self
            .store
            .owner_mut(&owner)
            .ok_or(TetherServerError::OwnerNotFound { owner })?;
        let Some(message) = self.sender.state_message(data, fragment)? else {
            return Ok(0);
        };

        let mut delivered = 0;
        for mirror in targets {
            match self.transport.send(Peer::Mirror(*mirror), &message) {
                Ok(()) => delivered += 1,
                Err(err) => self.push_error(err.into()),
            }
        }
        Ok(delivered)
    }
}
