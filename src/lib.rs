//! Distributed In-Process Cache Library
//!
//! A node embeds named cache groups and shares their key space with its peers, so each key is
//! loaded from the origin once per owner and served from memory afterwards.
//!
//! ## Architecture Modules
//! - **`ring`**: Consistent hashing with virtual replicas. Decides which peer owns a key.
//! - **`store`**: The byte-budgeted LRU store holding a group's values, and the immutable
//!   `ByteView` handed to callers.
//! - **`peers`**: The node-to-node HTTP protocol: wire messages, client, server handler, and the
//!   `PeerPool` that maps keys to peers.
//! - **`group`**: Named cache namespaces, their origin loaders, and the registry that the
//!   HTTP handlers resolve them from.

pub mod config;
pub mod error;
pub mod group;
pub mod peers;
pub mod ring;
pub mod store;

pub use error::{CacheError, Result};
