/// In-memory transport for E2E testing
/// Routes sync messages between the server and its clients without network I/O

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tether_shared::{MirrorKey, Peer, SyncMessage, SyncTransport, TransportError};

#[derive(Default)]
struct NetworkState {
    to_server: VecDeque<(MirrorKey, Vec<u8>)>,
    to_clients: HashMap<MirrorKey, VecDeque<Vec<u8>>>,
    connected: HashSet<MirrorKey>,
    sent: usize,
    closed: bool,
}

/// Shared queues between one server and any number of clients. Messages are
/// encoded on send and stay queued until the test drains them, so tests
/// control delivery order, duplication and loss.
#[derive(Clone, Default)]
pub struct LocalNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl LocalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport the server sends through
    pub fn server_transport(&self) -> Box<dyn SyncTransport> {
        Box::new(LocalTransport {
            from: Peer::Authority,
            network: self.clone(),
        })
    }

    /// Connects `mirror` and returns the transport its client sends through
    pub fn client_transport(&self, mirror: MirrorKey) -> Box<dyn SyncTransport> {
        {
            let mut state = self.state();
            state.connected.insert(mirror);
            state.to_clients.entry(mirror).or_default();
        }
        Box::new(LocalTransport {
            from: Peer::Mirror(mirror),
            network: self.clone(),
        })
    }

    /// Messages in flight to `mirror` are dropped
    pub fn disconnect(&self, mirror: &MirrorKey) {
        let mut state = self.state();
        state.connected.remove(mirror);
        state.to_clients.remove(mirror);
        state.to_server.retain(|(from, _)| from != mirror);
    }

    pub fn reconnect(&self, mirror: MirrorKey) {
        let mut state = self.state();
        state.connected.insert(mirror);
        state.to_clients.entry(mirror).or_default();
    }

    pub fn is_connected(&self, mirror: &MirrorKey) -> bool {
        self.state().connected.contains(mirror)
    }

    /// Every send after this fails with `TransportError::Closed`
    pub fn close(&self) {
        self.state().closed = true;
    }

    pub fn mirrors(&self) -> Vec<MirrorKey> {
        let mut mirrors: Vec<MirrorKey> = self.state().to_clients.keys().copied().collect();
        mirrors.sort();
        mirrors
    }

    // Delivery

    pub fn drain_to_server(&self) -> Vec<(MirrorKey, Vec<u8>)> {
        self.state().to_server.drain(..).collect()
    }

    pub fn drain_to_client(&self, mirror: &MirrorKey) -> Vec<Vec<u8>> {
        self.state()
            .to_clients
            .get_mut(mirror)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn pending_to_server(&self) -> usize {
        self.state().to_server.len()
    }

    pub fn pending_to_client(&self, mirror: &MirrorKey) -> usize {
        self.state()
            .to_clients
            .get(mirror)
            .map(|queue| queue.len())
            .unwrap_or(0)
    }

    pub fn is_idle(&self) -> bool {
        let state = self.state();
        state.to_server.is_empty() && state.to_clients.values().all(|queue| queue.is_empty())
    }

    /// Total number of messages accepted since creation
    pub fn sent_count(&self) -> usize {
        self.state().sent
    }

    // Fault injection

    /// Queues a second copy of every message waiting for `mirror`
    pub fn duplicate_to_client(&self, mirror: &MirrorKey) {
        if let Some(queue) = self.state().to_clients.get_mut(mirror) {
            let copies: Vec<Vec<u8>> = queue.iter().cloned().collect();
            queue.extend(copies);
        }
    }

    pub fn reverse_to_client(&self, mirror: &MirrorKey) {
        if let Some(queue) = self.state().to_clients.get_mut(mirror) {
            queue.make_contiguous().reverse();
        }
    }

    pub fn shuffle_to_client(&self, mirror: &MirrorKey, rng: &fastrand::Rng) {
        if let Some(queue) = self.state().to_clients.get_mut(mirror) {
            rng.shuffle(queue.make_contiguous());
        }
    }

    /// Drops every message waiting for `mirror`, returning how many were lost
    pub fn drop_to_client(&self, mirror: &MirrorKey) -> usize {
        self.state()
            .to_clients
            .get_mut(mirror)
            .map(|queue| queue.drain(..).count())
            .unwrap_or(0)
    }

    fn state(&self) -> MutexGuard<'_, NetworkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct LocalTransport {
    from: Peer,
    network: LocalNetwork,
}

impl SyncTransport for LocalTransport {
    fn send(&mut self, to: Peer, message: &SyncMessage) -> Result<(), TransportError> {
        let bytes = message
            .to_bytes()
            .map_err(|err| TransportError::Encode(err.to_string()))?;

        let mut state = self.network.state();
        if state.closed {
            return Err(TransportError::Closed);
        }

        match (self.from, to) {
            (Peer::Mirror(from), Peer::Authority) => {
                if !state.connected.contains(&from) {
                    return Err(TransportError::PeerUnavailable { peer: to });
                }
                state.to_server.push_back((from, bytes));
            }
            (Peer::Authority, Peer::Mirror(mirror)) => {
                if !state.connected.contains(&mirror) {
                    return Err(TransportError::PeerUnavailable { peer: to });
                }
                state.to_clients.entry(mirror).or_default().push_back(bytes);
            }
            _ => return Err(TransportError::PeerUnavailable { peer: to }),
        }
        state.sent += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_shared::OwnerKey;

    fn request() -> SyncMessage {
        SyncMessage::request(OwnerKey::from_u64(1), "health")
    }

    #[test]
    fn routes_between_peers() {
        let network = LocalNetwork::new();
        let mirror = MirrorKey::from_u64(7);
        let mut server = network.server_transport();
        let mut client = network.client_transport(mirror);

        client.send(Peer::Authority, &request()).unwrap();
        server.send(Peer::Mirror(mirror), &request()).unwrap();

        let inbound = network.drain_to_server();
        assert_eq!(inbound.len(), 1);
        assert_eq!(inbound[0].0, mirror);
        assert_eq!(SyncMessage::from_bytes(&inbound[0].1).unwrap(), request());
        assert_eq!(network.drain_to_client(&mirror).len(), 1);
        assert_eq!(network.sent_count(), 2);
        assert!(network.is_idle());
    }

    #[test]
    fn disconnected_mirror_is_unavailable() {
        let network = LocalNetwork::new();
        let mirror = MirrorKey::from_u64(1);
        let mut server = network.server_transport();
        let _client = network.client_transport(mirror);

        network.disconnect(&mirror);
        assert_eq!(
            server.send(Peer::Mirror(mirror), &request()),
            Err(TransportError::PeerUnavailable {
                peer: Peer::Mirror(mirror)
            })
        );

        network.reconnect(mirror);
        assert!(server.send(Peer::Mirror(mirror), &request()).is_ok());
    }

    #[test]
    fn closed_network_rejects_sends() {
        let network = LocalNetwork::new();
        let mut server = network.server_transport();
        network.close();
        assert_eq!(
            server.send(Peer::Mirror(MirrorKey::from_u64(1)), &request()),
            Err(TransportError::Closed)
        );
    }
}
