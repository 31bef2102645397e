//! Cache Group Module
//!
//! A group is a named cache namespace: a bounded local store, the origin loader that fills
//! it, and optionally the peers that share its key space.
//!
//! ## Lookup Flow
//! 1. **Local store**: A hit returns immediately without touching the loader or any peer.
//! 2. **Owner resolution**: On a miss, the peer picker decides whether a remote peer owns the key.
//! 3. **Remote fetch**: The owner is asked over HTTP; on failure the group either falls back to
//!    its loader or reports the error, depending on its `RemoteFailurePolicy`.
//! 4. **Origin load**: Otherwise the loader produces the value locally.
//!
//! Every value obtained on a miss is stored locally before it is returned.

pub mod group;
pub mod handlers;
pub mod loader;
pub mod registry;

pub use group::{Group, GroupBuilder, GroupStats, RemoteFailurePolicy};
pub use loader::{LoaderFn, loader_fn};
pub use registry::GroupRegistry;
