use log::{info, warn};

use tether_shared::{
    FragmentStore, FragmentType, OwnerData, OwnerKey, Peer, Protocol, Side, SyncMessage,
    SyncOutcome, SyncReceiver, SyncSender, SyncTransport,
};

use crate::{ClientConfig, TetherClientError};

/// A mirror. Fragments it materializes start unsynced and are queried from
/// the authority every `query_interval_ticks` until state arrives.
pub struct Client {
    config: ClientConfig,
    store: FragmentStore,
    sender: SyncSender,
    receiver: SyncReceiver,
    transport: Box<dyn SyncTransport>,
    errors: Vec<TetherClientError>,
}

impl Client {
    /// Create a new Client
    pub fn new<P: Into<Protocol>>(
        config: ClientConfig,
        protocol: P,
        transport: Box<dyn SyncTransport>,
    ) -> Self {
        let mut protocol: Protocol = protocol.into();
        if !protocol.is_locked() {
            protocol.lock();
        }

        Self {
            config,
            store: FragmentStore::new(Side::Mirror, protocol.into()),
            sender: SyncSender::new(),
            receiver: SyncReceiver::new(),
            transport,
            errors: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // Owners

    pub fn track_owner(&mut self, owner: OwnerKey) -> Result<(), TetherClientError> {
        self.store.insert_owner(owner)?;
        Ok(())
    }

    pub fn untrack_owner(&mut self, owner: &OwnerKey) -> bool {
        self.receiver.forget_owner(owner);
        self.store.remove_owner(owner).is_some()
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

    /// The owner's fragment of type `T`, created unsynced on first access
    pub fn fragment_mut<T: FragmentType>(
        &mut self,
        owner: &OwnerKey,
    ) -> Result<&mut T, TetherClientError> {
        let data = self
            .store
            .owner_mut(owner)
            .ok_or(TetherClientError::OwnerNotFound { owner: *owner })?;
        Ok(data.get::<T>()?)
    }

    /// Whether the fragment has received authoritative state. A fragment that
    /// has not materialized is not synced.
    pub fn is_synced<T: FragmentType>(&self, owner: &OwnerKey) -> bool {
        self.store
            .owner(owner)
            .and_then(|data| data.peek::<T>())
            .map(|fragment| fragment.base().is_synced())
            .unwrap_or(false)
    }

    // Sync

    /// Pushes the fragment's local state to the authority. Returns false if
    /// the fragment is local-only.
    pub fn sync<T: FragmentType>(&mut self, owner: &OwnerKey) -> Result<bool, TetherClientError> {
        self.sync_by_name(owner, T::NAME)
    }

    pub fn sync_by_name(&mut self, owner: &OwnerKey, fragment: &str) -> Result<bool, TetherClientError> {
        let data = self
            .store
            .owner_mut(owner)
            .ok_or(TetherClientError::OwnerNotFound { owner: *owner })?;
        let Some(message) = self.sender.state_message(data, fragment)? else {
            return Ok(false);
        };
        self.transport.send(Peer::Authority, &message)?;
        Ok(true)
    }

    /// Asks the authority for the fragment's state right away
    pub fn request<T: FragmentType>(&mut self, owner: &OwnerKey) -> Result<(), TetherClientError> {
        let message = SyncMessage::request(*owner, T::NAME);
        self.transport.send(Peer::Authority, &message)?;
        Ok(())
    }

    pub fn receive(&mut self, message: &SyncMessage) -> Result<SyncOutcome, TetherClientError> {
        Ok(self
            .receiver
            .receive(Peer::Authority, message, &mut self.store)?)
    }

    pub fn receive_bytes(&mut self, bytes: &[u8]) -> Result<SyncOutcome, TetherClientError> {
        let message = SyncMessage::from_bytes(bytes)?;
        self.receive(&message)
    }

    // Lifecycle

    /// Ticks every owner, queries the authority for unsynced fragments whose
    /// countdown ran out, and pushes fragments that requested a sync
    pub fn tick(&mut self) {
        self.store.tick();

        let interval = self.config.query_interval_ticks;
        let mut outgoing = Vec::new();
        for (owner, data) in self.store.iter_mut() {
            for name in data.due_queries(interval) {
                outgoing.push(SyncMessage::request(*owner, name));
            }
            for name in data.take_sync_requests() {
                match self.sender.state_message(data, name) {
                    Ok(Some(message)) => outgoing.push(message),
                    Ok(None) => {}
                    Err(err) => {
                        warn!("Client: cannot encode '{}' of {}: {}", name, owner, err);
                        self.errors.push(err.into());
                    }
                }
            }
        }

        for message in outgoing {
            if let Err(err) = self.transport.send(Peer::Authority, &message) {
                warn!("Client: {}", err);
                self.errors.push(err.into());
            }
        }
    }

    pub fn reset_owner(&mut self, owner: &OwnerKey) -> Result<Vec<&'static str>, TetherClientError> {
        let cleared = self.store.reset_owner(owner)?;
        info!("Client: reset {} ({} fragments cleared)", owner, cleared.len());
        Ok(cleared)
    }

    // Errors

    pub fn take_errors(&mut self) -> Vec<TetherClientError> {
        std::mem::take(&mut self.errors)
    }
}
