//! Peer Pool
//!
//! The peer registry of one node: the hash ring over every known peer plus an
//! [`HttpGetter`] for each of them. The whole peer set is replaced at once by
//! [`PeerPool::set_peers`]; nothing is patched incrementally.

use super::client::HttpGetter;
use super::picker::{PeerGetter, PeerPicker};
use super::protocol::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS, normalize_base_path, normalize_peer_url};
use crate::ring::HashRing;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_millis(500);
const DEFAULT_PEER_ATTEMPTS: usize = 2;

struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

pub struct PeerPool {
    /// This node's own base URL, e.g. `http://10.0.0.1:8001`.
    self_url: String,
    base_path: String,
    replicas: usize,
    timeout: Duration,
    attempts: usize,
    http_client: reqwest::Client,
    state: Mutex<PoolState>,
}

impl PeerPool {
    pub fn new(self_url: &str) -> Self {
        Self {
            self_url: normalize_peer_url(self_url),
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            timeout: DEFAULT_PEER_TIMEOUT,
            attempts: DEFAULT_PEER_ATTEMPTS,
            http_client: reqwest::Client::new(),
            state: Mutex::new(PoolState {
                ring: HashRing::new(DEFAULT_REPLICAS),
                getters: HashMap::new(),
            }),
        }
    }

    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }

    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self.state.get_mut().ring = HashRing::new(replicas);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Replaces the peer set. The list should include this node itself so
    /// that it receives its share of the keys.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|peer| normalize_peer_url(peer.as_ref()))
            .collect();

        let mut ring = HashRing::new(self.replicas);
        ring.add(&peers);

        let getters: HashMap<String, Arc<HttpGetter>> = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(
                    peer.clone(),
                    self.base_path.clone(),
                    self.http_client.clone(),
                    self.timeout,
                    self.attempts,
                );
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        let mut state = self.state.lock();
        state.ring = ring;
        state.getters = getters;

        tracing::info!(node = %self.self_url, peers = peers.len(), "peer set updated");
    }

    /// Peers currently on the ring, sorted.
    pub fn peers(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut peers: Vec<String> = state.getters.keys().cloned().collect();
        peers.sort();
        peers
    }

    /// The ring owner of `key`, including this node itself.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        self.state.lock().ring.get(key).map(str::to_string)
    }
}

impl PeerPicker for PeerPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let peer = state.ring.get(key)?;
        if peer == self.self_url {
            return None;
        }
        let getter: Arc<dyn PeerGetter> = state.getters.get(peer)?.clone();
        drop(state);

        tracing::debug!(node = %self.self_url, peer = getter.peer(), "pick peer");
        Some(getter)
    }
}
