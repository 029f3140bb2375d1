//! Consistent Hashing
//!
//! Assigns keys to peers so that every node in the cluster agrees on the owner
//! without coordination.
//!
//! ## Core Concepts
//! - **Virtual nodes**: each peer is hashed `replicas` times to smooth out the load.
//! - **Lookup**: binary search for the first position at or after `hash(key)`, wrapping
//!   around to the first position.
//! - **Rebuild, don't patch**: adding a peer twice duplicates nothing useful and there is
//!   no removal; owners of the ring rebuild it from the full peer list instead.

pub mod hash_ring;

pub use hash_ring::{HashFn, HashRing, default_hash};

#[cfg(test)]
mod tests;
