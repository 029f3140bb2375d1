use std::collections::HashMap;
use twox_hash::XxHash32;

/// Maps bytes to a ring position.
pub type HashFn = fn(&[u8]) -> u32;

/// Default ring hash: 32-bit xxHash with a zero seed.
pub fn default_hash(data: &[u8]) -> u32 {
    XxHash32::oneshot(0, data)
}

/// Consistent hash ring over a fixed peer set.
///
/// Every peer occupies `replicas` positions, the hash of `"{i}{peer}"` for each
/// replica index `i`. Membership changes rebuild the ring; there is no removal.
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    positions: Vec<u32>,
    owners: HashMap<u32, String>,
}

impl HashRing {
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, default_hash)
    }

    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            positions: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Places every replica of every peer on the ring. Adding a peer twice places its
    /// replicas twice; rebuild the ring instead of re-adding on membership change.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.positions.push(position);
                self.owners.insert(position, peer.to_string());
            }
        }
        self.positions.sort_unstable();
    }

    /// Returns the peer owning `key`: the first position clockwise from `hash(key)`.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&position| position < hash);
        let position = self.positions[idx % self.positions.len()];

        self.owners.get(&position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of positions on the ring.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}
