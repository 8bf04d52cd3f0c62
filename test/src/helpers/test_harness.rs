use std::collections::BTreeMap;

use tether_client::{Client, ClientConfig};
use tether_server::{Server, ServerConfig};
use tether_shared::{FragmentType, MirrorKey, OwnerKey};

use crate::{local_transport::LocalNetwork, test_protocol::protocol};

use super::message_exchange::{self, ExchangeReport};

/// One server and its clients wired through a `LocalNetwork`
pub struct TestHarness {
    pub network: LocalNetwork,
    pub server: Server,
    clients: BTreeMap<MirrorKey, Client>,
    client_config: ClientConfig,
    next_mirror: u64,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new(ServerConfig::default(), ClientConfig::default())
    }
}

impl TestHarness {
    pub fn new(server_config: ServerConfig, client_config: ClientConfig) -> Self {
        super::init_logging();
        let network = LocalNetwork::new();
        let server = Server::new(server_config, protocol(), network.server_transport());
        Self {
            network,
            server,
            clients: BTreeMap::new(),
            client_config,
            next_mirror: 1,
        }
    }

    /// Connects a new client
    pub fn add_client(&mut self) -> MirrorKey {
        let mirror = MirrorKey::from_u64(self.next_mirror);
        self.next_mirror += 1;
        let client = Client::new(
            self.client_config.clone(),
            protocol(),
            self.network.client_transport(mirror),
        );
        self.clients.insert(mirror, client);
        mirror
    }

    pub fn client(&self, mirror: &MirrorKey) -> &Client {
        self.clients
            .get(mirror)
            .unwrap_or_else(|| panic!("no client for {}", mirror))
    }

    pub fn client_mut(&mut self, mirror: &MirrorKey) -> &mut Client {
        self.clients
            .get_mut(mirror)
            .unwrap_or_else(|| panic!("no client for {}", mirror))
    }

    pub fn clients_mut(&mut self) -> impl Iterator<Item = (&MirrorKey, &mut Client)> {
        self.clients.iter_mut()
    }

    pub fn mirrors(&self) -> Vec<MirrorKey> {
        self.clients.keys().copied().collect()
    }

    /// Spawns `owner` on the server and has every client track and observe it
    pub fn spawn_shared_owner(&mut self, id: u64) -> OwnerKey {
        let owner = OwnerKey::from_u64(id);
        self.server
            .spawn_owner(owner)
            .unwrap_or_else(|err| panic!("spawn {}: {}", owner, err));
        for (mirror, client) in self.clients.iter_mut() {
            client
                .track_owner(owner)
                .unwrap_or_else(|err| panic!("track {}: {}", owner, err));
            self.server
                .add_observer(owner, *mirror)
                .unwrap_or_else(|err| panic!("observe {}: {}", owner, err));
        }
        owner
    }

    /// The server's copy of the owner's `T`
    pub fn server_fragment<T: FragmentType>(&mut self, owner: &OwnerKey) -> &mut T {
        self.server
            .fragment_mut::<T>(owner)
            .unwrap_or_else(|err| panic!("server {} of {}: {}", T::NAME, owner, err))
    }

    /// A client's copy of the owner's `T`
    pub fn client_fragment<T: FragmentType>(&mut self, mirror: &MirrorKey, owner: &OwnerKey) -> &mut T {
        self.client_mut(mirror)
            .fragment_mut::<T>(owner)
            .unwrap_or_else(|err| panic!("{} {} of {}: {}", mirror, T::NAME, owner, err))
    }

    pub fn exchange(&mut self) -> ExchangeReport {
        message_exchange::exchange_messages(&self.network, &mut self.server, &mut self.clients)
    }

    pub fn tick_and_exchange(&mut self) -> ExchangeReport {
        message_exchange::tick_and_exchange(&self.network, &mut self.server, &mut self.clients)
    }

    pub fn tick_and_exchange_n(&mut self, n: usize) -> ExchangeReport {
        let mut report = ExchangeReport::default();
        for _ in 0..n {
            report.merge(self.tick_and_exchange());
        }
        report
    }
}
