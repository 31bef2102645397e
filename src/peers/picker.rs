//! Seams between a group and the peers it can ask.

use super::protocol::PeerRequest;
use crate::error::Result;

use async_trait::async_trait;
use std::sync::Arc;

/// Fetches values from one remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    /// Identifier of the peer this getter talks to.
    fn peer(&self) -> &str;

    async fn get(&self, request: &PeerRequest) -> Result<Vec<u8>>;
}

/// Resolves the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer, or `None` when this node should serve the key
    /// itself (it owns the key, or there are no peers).
    ///
    /// Implementations must not hold internal locks once they return.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}
