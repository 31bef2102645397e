//! Peer Network Protocol
//!
//! Defines the messages exchanged between nodes and how a request maps onto
//! an HTTP path.
//!
//! The request travels in the URL; the response body is a bincode-encoded
//! [`PeerResponse`]. There is no version field.

use crate::error::{CacheError, Result};
use serde::{Deserialize, Serialize};

// --- Defaults ---

/// Path prefix reserved for node-to-node traffic.
pub const DEFAULT_BASE_PATH: &str = "/_peercache/";
/// Virtual replicas placed on the ring per peer.
pub const DEFAULT_REPLICAS: usize = 50;
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

// --- Data Transfer Objects ---

/// Asks the owning peer for one key of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRequest {
    pub group: String,
    pub key: String,
}

/// The raw value bytes of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerResponse {
    pub value: Vec<u8>,
}

impl PeerRequest {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }

    /// Renders `<base_path><group>/<key>` with both segments percent-encoded.
    pub fn to_path(&self, base_path: &str) -> String {
        format!(
            "{}{}/{}",
            base_path,
            urlencoding::encode(&self.group),
            urlencoding::encode(&self.key)
        )
    }

    /// Parses a raw (still percent-encoded) request path.
    ///
    /// The group is everything up to the first `/` after the base path; the
    /// key is the rest, so a key may contain `/` if it arrives unencoded.
    pub fn from_path(base_path: &str, path: &str) -> Result<Self> {
        let rest = path
            .strip_prefix(base_path)
            .ok_or_else(|| CacheError::BadRequest(format!("unexpected path: {}", path)))?;

        let Some((group, key)) = rest.split_once('/') else {
            return Err(CacheError::BadRequest(format!(
                "expected {}<group>/<key>, got {}",
                base_path, path
            )));
        };

        let group = urlencoding::decode(group)
            .map_err(|e| CacheError::BadRequest(format!("invalid group encoding: {}", e)))?;
        let key = urlencoding::decode(key)
            .map_err(|e| CacheError::BadRequest(format!("invalid key encoding: {}", e)))?;

        Ok(Self::new(group.into_owned(), key.into_owned()))
    }
}

impl PeerResponse {
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

// --- Address normalization ---

/// Normalizes a base path to start and end with `/`.
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Normalizes a peer address to `scheme://host[:port]` without a trailing `/`.
///
/// Peers and the local node must agree on the exact string, otherwise the
/// pool no longer recognizes itself on the ring.
pub fn normalize_peer_url(addr: &str) -> String {
    let trimmed = addr.trim();
    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    normalized.trim_end_matches('/').to_string()
}
