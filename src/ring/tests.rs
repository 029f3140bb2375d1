//! Ring Module Tests
//!
//! ## Test Scopes
//! - **Placement**: hand-checkable placement with a numeric hash.
//! - **Stability**: determinism and limited movement when a peer joins.

#[cfg(test)]
mod tests {
    use crate::ring::HashRing;

    // Interprets the input as a decimal number so positions can be checked by hand.
    fn numeric_hash(data: &[u8]) -> u32 {
        std::str::from_utf8(data)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    #[test]
    fn test_empty_ring_has_no_owner() {
        let ring = HashRing::new(50);

        assert!(ring.is_empty());
        assert_eq!(ring.get("Tom"), None);
    }

    #[test]
    fn test_placement_with_numeric_hash() {
        // ARRANGE: positions 2,4,6,12,14,16,22,24,26
        let mut ring = HashRing::with_hasher(3, numeric_hash);
        ring.add(["6", "4", "2"]);
        assert_eq!(ring.len(), 9);

        // ASSERT
        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")];
        for (key, owner) in cases {
            assert_eq!(ring.get(key), Some(owner), "asking for {}", key);
        }

        // ACT: 8, 18, 28 join
        ring.add(["8"]);

        // ASSERT: 27 now lands on 28 instead of wrapping around
        assert_eq!(ring.get("27"), Some("8"));
        assert_eq!(ring.get("23"), Some("4"));
    }

    #[test]
    fn test_re_adding_a_peer_duplicates_positions() {
        let mut ring = HashRing::with_hasher(3, numeric_hash);
        ring.add(["6", "4", "2"]);

        ring.add(["4"]);

        assert_eq!(ring.len(), 12);
        for (key, owner) in [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")] {
            assert_eq!(ring.get(key), Some(owner), "asking for {}", key);
        }
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let mut ring = HashRing::new(50);
        ring.add([
            "http://localhost:8001",
            "http://localhost:8002",
            "http://localhost:8003",
        ]);

        for i in 0..200 {
            let key = format!("key-{}", i);
            assert_eq!(ring.get(&key), ring.get(&key));
        }
    }

    #[test]
    fn test_identical_rings_agree() {
        let peers = ["http://a:1", "http://b:2", "http://c:3"];
        let mut left = HashRing::new(50);
        let mut right = HashRing::new(50);
        left.add(peers);
        right.add(peers.iter().rev());

        for i in 0..500 {
            let key = format!("book_{}", i);
            assert_eq!(left.get(&key), right.get(&key));
        }
    }

    #[test]
    fn test_adding_peer_moves_minority_of_keys() {
        let mut before = HashRing::new(50);
        before.add(["http://a:1", "http://b:2", "http://c:3"]);
        let mut after = HashRing::new(50);
        after.add(["http://a:1", "http://b:2", "http://c:3", "http://d:4"]);

        let moved = (0..1000)
            .map(|i| format!("key-{}", i))
            .filter(|key| before.get(key) != after.get(key))
            .count();

        assert!(moved < 500, "{} of 1000 keys moved", moved);
        assert!(moved > 0, "new peer should take over some keys");
    }

    #[test]
    fn test_moved_keys_go_to_new_peer() {
        let mut before = HashRing::new(50);
        before.add(["http://a:1", "http://b:2"]);
        let mut after = HashRing::new(50);
        after.add(["http://a:1", "http://b:2", "http://c:3"]);

        for i in 0..1000 {
            let key = format!("key-{}", i);
            if before.get(&key) != after.get(&key) {
                assert_eq!(after.get(&key), Some("http://c:3"));
            }
        }
    }

    #[test]
    fn test_every_peer_owns_some_keys() {
        let peers = ["http://a:1", "http://b:2", "http://c:3"];
        let mut ring = HashRing::new(50);
        ring.add(peers);

        let mut counts = std::collections::HashMap::new();
        for i in 0..3000 {
            let owner = ring.get(&format!("key-{}", i)).unwrap().to_string();
            *counts.entry(owner).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 3);
        for (peer, count) in counts {
            assert!(count > 300, "{} owns only {} keys", peer, count);
        }
    }
}
