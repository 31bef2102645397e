//! Consistent Hashing Module
//!
//! Maps keys onto the set of cluster nodes so that each key has exactly one owner.
//!
//! ## Core Concepts
//! - **Ring Positions**: Every node is hashed onto a circular `u32` number line.
//! - **Virtual Replicas**: Each node occupies `R` positions, which evens out load when
//!   the physical node set is small.
//! - **Lookup**: A key belongs to the first position clockwise from its own hash.
//!   Adding or removing one node only remaps the keys adjacent to its positions.

pub mod hash_ring;

pub use hash_ring::{HashFn, HashRing};

#[cfg(test)]
mod tests;
