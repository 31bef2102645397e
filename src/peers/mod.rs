//! Peer Protocol Module
//!
//! Lets a node fetch a key from whichever peer the hash ring names as its owner.
//!
//! ## Core Concepts
//! - **Wire Format**: `GET <base-path><group>/<key>` (both segments percent-encoded); the
//!   body of a successful answer is a bincode-encoded `PeerResponse`. Failures are carried by
//!   the HTTP status alone.
//! - **Peer Pool**: Owns the ring and one HTTP client per peer; resolves a key to a remote
//!   peer or to "serve it yourself".
//! - **Authoritative Answers**: The server side only consults its own store and loader,
//!   never its peers, so requests cannot bounce between nodes.

pub mod client;
pub mod handlers;
pub mod picker;
pub mod pool;
pub mod protocol;

pub use client::HttpGetter;
pub use picker::{PeerGetter, PeerPicker};
pub use pool::PeerPool;
pub use protocol::{PeerRequest, PeerResponse};
