//! Hash Ring Tests
//!
//! ## Test Scopes
//! - **Lookup**: Clockwise search, wrap-around and determinism.
//! - **Membership changes**: Add/remove symmetry and bounded key remapping.

#[cfg(test)]
mod tests {
    use crate::ring::HashRing;
    use std::collections::HashMap;

    /// Interprets the bytes as a decimal number so positions are predictable.
    fn decimal_hash(data: &[u8]) -> u32 {
        std::str::from_utf8(data).unwrap().parse().unwrap()
    }

    // ============================================================
    // LOOKUP
    // ============================================================

    #[test]
    fn test_empty_ring_has_no_owner() {
        let ring = HashRing::new(50);
        assert!(ring.is_empty());
        assert_eq!(ring.get("Tom"), None);
    }

    #[test]
    fn test_lookup_walks_clockwise_and_wraps() {
        let mut ring = HashRing::with_hasher(3, decimal_hash);

        // Positions: 2, 4, 6, 12, 14, 16, 22, 24, 26
        ring.add(["6", "4", "2"]);
        assert_eq!(ring.len(), 9);

        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")];
        for (key, node) in cases {
            assert_eq!(ring.get(key), Some(node), "key {} should map to {}", key, node);
        }

        // Adds 8, 18, 28: "27" now lands on 28 instead of wrapping.
        ring.add(["8"]);
        assert_eq!(ring.get("27"), Some("8"));
    }

    #[test]
    fn test_lookup_is_deterministic_across_rebuilds() {
        let nodes = ["http://10.0.0.1:8001", "http://10.0.0.2:8001", "http://10.0.0.3:8001"];

        let mut first = HashRing::new(50);
        first.add(nodes);
        let mut second = HashRing::new(50);
        second.add(nodes);

        for i in 0..1000 {
            let key = format!("key-{}", i);
            let owner = first.get(&key);
            assert_eq!(owner, first.get(&key));
            assert_eq!(owner, second.get(&key));
        }
    }

    #[test]
    fn test_positions_are_sorted() {
        let mut ring = HashRing::new(50);
        ring.add(["a", "b", "c"]);
        assert!(ring.positions().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ring.len(), 150);
    }

    // ============================================================
    // MEMBERSHIP CHANGES
    // ============================================================

    #[test]
    fn test_remove_restores_previous_ring() {
        let mut ring = HashRing::new(50);
        ring.add(["node-a", "node-b"]);
        let before: Vec<u32> = ring.positions().to_vec();
        let owners_before: Vec<Option<String>> = before
            .iter()
            .map(|p| ring.owner_at(*p).map(str::to_string))
            .collect();

        ring.add(["node-c"]);
        assert!(ring.remove("node-c"));

        assert_eq!(ring.positions(), before.as_slice());
        let owners_after: Vec<Option<String>> = before
            .iter()
            .map(|p| ring.owner_at(*p).map(str::to_string))
            .collect();
        assert_eq!(owners_before, owners_after);
    }

    #[test]
    fn test_remove_unknown_node_leaves_ring_untouched() {
        let mut ring = HashRing::with_hasher(3, decimal_hash);
        ring.add(["6", "4", "2"]);

        assert!(!ring.remove("9"));
        assert_eq!(ring.len(), 9);
        assert_eq!(ring.get("27"), Some("2"));
    }

    #[test]
    fn test_remove_on_empty_ring_fails() {
        let mut ring = HashRing::new(50);
        assert!(!ring.remove("node-a"));
    }

    #[test]
    fn test_duplicate_add_needs_two_removes() {
        let mut ring = HashRing::with_hasher(3, decimal_hash);
        ring.add(["2"]);
        ring.add(["2"]);
        assert_eq!(ring.len(), 6);

        assert!(ring.remove("2"));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.get("5"), Some("2"));

        assert!(ring.remove("2"));
        assert!(ring.is_empty());
        assert!(!ring.remove("2"));
    }

    #[test]
    fn test_adding_node_remaps_bounded_fraction() {
        let base = ["node-0", "node-1", "node-2", "node-3"];
        let mut ring = HashRing::new(50);
        ring.add(base);

        let keys: Vec<String> = (0..10_000).map(|i| format!("user:{}", i)).collect();
        let before: HashMap<&str, String> = keys
            .iter()
            .map(|k| (k.as_str(), ring.get(k).unwrap().to_string()))
            .collect();

        ring.add(["node-4"]);

        let mut moved = 0;
        for key in &keys {
            let owner = ring.get(key).unwrap();
            if owner != before[key.as_str()] {
                // Keys only ever move onto the new node.
                assert_eq!(owner, "node-4");
                moved += 1;
            }
        }

        // Expectation is 1/5 of the keys; allow generous variance.
        assert!(moved > 0, "new node should take over some keys");
        assert!(
            moved < keys.len() / 2,
            "moved {} of {} keys",
            moved,
            keys.len()
        );
    }

    #[test]
    fn test_replicas_spread_load() {
        let mut ring = HashRing::new(50);
        ring.add(["node-0", "node-1", "node-2"]);

        let mut counts: HashMap<String, usize> = HashMap::new();
        for i in 0..9_000 {
            let owner = ring.get(&format!("book_{}", i)).unwrap();
            *counts.entry(owner.to_string()).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 3, "every node should own some keys");
        for (node, count) in counts {
            assert!(count > 500, "{} only owns {} keys", node, count);
        }
    }
}
