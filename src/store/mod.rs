//! Local Cache Storage Module
//!
//! Holds the values a node serves from memory.
//!
//! ## Core Concepts
//! - **ByteView**: Read-only bytes handed to callers; the cache never shares a mutable buffer.
//! - **Byte Budget**: Every entry weighs `len(key) + len(value)`; the store never stays above
//!   its configured maximum once a mutation returns.
//! - **Recency**: Reads promote entries; eviction removes the least recently used first.

pub mod byteview;
pub mod bounded;

pub use byteview::ByteView;
pub use bounded::{BoundedCacheStore, EvictionCallback, StoreStats};
