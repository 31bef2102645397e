use std::collections::HashMap;
use std::fmt;

/// Hash function placing replica identifiers and keys on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// A consistent-hash ring of node identifiers.
///
/// Positions are kept sorted so lookups are a binary search. Adding the same
/// node twice is not deduplicated: it places a second copy of each of its
/// replicas, which resolves to the same node.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    positions: Vec<u32>,
    owners: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring hashing with CRC-32 (IEEE).
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32fast::hash)
    }

    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            positions: Vec::new(),
            owners: HashMap::new(),
        }
    }

    fn replica_position(&self, replica: usize, node: &str) -> u32 {
        (self.hash)(format!("{}{}", replica, node).as_bytes())
    }

    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for replica in 0..self.replicas {
                let position = self.replica_position(replica, node);
                self.positions.push(position);
                self.owners.insert(position, node.to_string());
            }
        }
        self.positions.sort_unstable();
    }

    /// Returns the node owning `key`, or `None` when the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&position| position < hash);
        let position = self.positions[idx % self.positions.len()];
        self.owners.get(&position).map(String::as_str)
    }

    /// Removes every replica position of `node`.
    ///
    /// All positions are verified before any is deleted. Returns `false` and
    /// leaves the ring untouched if one of them is missing or owned by another
    /// node.
    pub fn remove(&mut self, node: &str) -> bool {
        // Replicas of one node may collide on the same position, so each
        // position is removed as many times as the node placed it.
        let mut wanted: HashMap<u32, usize> = HashMap::new();
        for replica in 0..self.replicas {
            *wanted.entry(self.replica_position(replica, node)).or_insert(0) += 1;
        }

        for (&position, &count) in &wanted {
            let (start, end) = self.span(position);
            if end - start < count || self.owner_at(position) != Some(node) {
                tracing::warn!(node, position, "ring position missing on remove");
                return false;
            }
        }

        for (position, count) in wanted {
            let (start, end) = self.span(position);
            self.positions.drain(start..start + count);
            if end - start == count {
                self.owners.remove(&position);
            }
        }
        true
    }

    /// Index range holding `position` in the sorted list.
    fn span(&self, position: u32) -> (usize, usize) {
        let start = self.positions.partition_point(|&p| p < position);
        let end = self.positions.partition_point(|&p| p <= position);
        (start, end)
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Sorted ring positions, one per virtual replica.
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    pub fn owner_at(&self, position: u32) -> Option<&str> {
        self.owners.get(&position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("positions", &self.positions.len())
            .finish()
    }
}
