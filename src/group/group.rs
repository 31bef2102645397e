use super::loader::LoaderFn;
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker, PeerRequest};
use crate::store::{BoundedCacheStore, ByteView, EvictionCallback, StoreStats};

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// What a group does when the owning peer cannot be reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemoteFailurePolicy {
    /// Load the key from the origin locally and cache it here.
    #[default]
    FallbackToOrigin,
    /// Return the peer error to the caller.
    Propagate,
}

/// Counters kept by every group.
#[derive(Debug, Default)]
struct Counters {
    gets: AtomicU64,
    cache_hits: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    loads: AtomicU64,
    load_errors: AtomicU64,
    server_requests: AtomicU64,
}

/// Snapshot of a group's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    /// Lookups made through `get`, including those served to peers.
    pub gets: u64,
    /// Lookups answered by the local store.
    pub cache_hits: u64,
    /// Values fetched from a remote owner.
    pub peer_loads: u64,
    pub peer_errors: u64,
    /// Origin loader invocations.
    pub loads: u64,
    pub load_errors: u64,
    /// Requests answered on behalf of other peers.
    pub server_requests: u64,
    pub store: StoreStats,
}

/// A named cache namespace.
pub struct Group {
    name: String,
    loader: LoaderFn,
    main_cache: BoundedCacheStore,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    remote_failure_policy: RemoteFailurePolicy,
    counters: Counters,
}

impl Group {
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remote_failure_policy(&self) -> RemoteFailurePolicy {
        self.remote_failure_policy
    }

    /// Attaches the peers sharing this group's key space. Allowed once.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| CacheError::PeersAlreadyRegistered(self.name.clone()))
    }

    /// Returns the value for `key`, asking its owning peer or the origin on a miss.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        self.counters.gets.fetch_add(1, Ordering::Relaxed);

        if let Some(value) = self.lookup_cache(key) {
            return Ok(value);
        }

        self.load(key).await
    }

    /// Returns the value for `key` as its owner: from the local store or the
    /// origin, never from another peer.
    pub async fn get_as_owner(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        self.counters.gets.fetch_add(1, Ordering::Relaxed);
        self.counters.server_requests.fetch_add(1, Ordering::Relaxed);

        if let Some(value) = self.lookup_cache(key) {
            return Ok(value);
        }

        self.get_locally(key).await
    }

    fn lookup_cache(&self, key: &str) -> Option<ByteView> {
        let value = self.main_cache.get(key)?;
        self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(group = %self.name, key, "cache hit");
        Some(value)
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        // The picker hands back an owned getter; no lock is held across the fetch.
        if let Some(picker) = self.peers.get()
            && let Some(peer) = picker.pick_peer(key)
        {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    self.counters.peer_errors.fetch_add(1, Ordering::Relaxed);
                    match self.remote_failure_policy {
                        RemoteFailurePolicy::Propagate => return Err(err),
                        RemoteFailurePolicy::FallbackToOrigin => {
                            tracing::warn!(
                                group = %self.name,
                                peer = peer.peer(),
                                "failed to get from peer, loading locally: {}",
                                err
                            );
                        }
                    }
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let request = PeerRequest::new(self.name.as_str(), key);
        let bytes = peer.get(&request).await?;
        self.counters.peer_loads.fetch_add(1, Ordering::Relaxed);

        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        self.counters.loads.fetch_add(1, Ordering::Relaxed);

        let bytes = (self.loader)(key.to_string()).await.map_err(|e| {
            self.counters.load_errors.fetch_add(1, Ordering::Relaxed);
            CacheError::Loader(e)
        })?;
        tracing::debug!(group = %self.name, key, "loaded from origin");

        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    pub fn stats(&self) -> GroupStats {
        let c = &self.counters;
        GroupStats {
            gets: c.gets.load(Ordering::Relaxed),
            cache_hits: c.cache_hits.load(Ordering::Relaxed),
            peer_loads: c.peer_loads.load(Ordering::Relaxed),
            peer_errors: c.peer_errors.load(Ordering::Relaxed),
            loads: c.loads.load(Ordering::Relaxed),
            load_errors: c.load_errors.load(Ordering::Relaxed),
            server_requests: c.server_requests.load(Ordering::Relaxed),
            store: self.main_cache.stats(),
        }
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("peers", &self.peers.get().is_some())
            .field("remote_failure_policy", &self.remote_failure_policy)
            .finish()
    }
}

/// Builds a [`Group`]. The loader is mandatory.
pub struct GroupBuilder {
    name: String,
    max_bytes: u64,
    loader: Option<LoaderFn>,
    remote_failure_policy: RemoteFailurePolicy,
    on_evicted: Option<EvictionCallback>,
}

impl GroupBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_bytes: 0,
            loader: None,
            remote_failure_policy: RemoteFailurePolicy::default(),
            on_evicted: None,
        }
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn loader(mut self, loader: LoaderFn) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn remote_failure_policy(mut self, policy: RemoteFailurePolicy) -> Self {
        self.remote_failure_policy = policy;
        self
    }

    pub fn on_evicted(mut self, on_evicted: EvictionCallback) -> Self {
        self.on_evicted = Some(on_evicted);
        self
    }

    pub fn build(self) -> Result<Group> {
        let loader = self
            .loader
            .ok_or_else(|| CacheError::MissingLoader(self.name.clone()))?;

        let main_cache = match self.on_evicted {
            Some(on_evicted) => BoundedCacheStore::with_eviction_callback(self.max_bytes, on_evicted),
            None => BoundedCacheStore::new(self.max_bytes),
        };

        Ok(Group {
            name: self.name,
            loader,
            main_cache,
            peers: OnceLock::new(),
            remote_failure_policy: self.remote_failure_policy,
            counters: Counters::default(),
        })
    }
}
