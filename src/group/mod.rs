//! Cache Groups
//!
//! A group is a named namespace combining the local LRU partition, single-flight
//! deduplication, the peer picker and the loader.
//!
//! ## Request Flow
//! 1. **Local hit**: served from this node's LRU.
//! 2. **Peer round**: for client requests, every other node is asked once, in address
//!    order. Unreachable or misbehaving peers are logged and skipped.
//! 3. **Loader**: if no peer has the key (or the request was relayed by a peer), the loader
//!    runs and its value is cached locally.
//!
//! Overlapping misses for one key share a single pass through steps 2 and 3.
//!
//! ## Submodules
//! - **`cache_group`**: the `CacheGroup` operations (get, add, delete, update).
//! - **`registry`**: name → group lookup shared by the HTTP handlers.
//! - **`loader`**: the backing-store capability consulted on a miss.
//! - **`types`**: request origin and lookup results.

pub mod cache_group;
pub mod loader;
pub mod registry;
pub mod types;

pub use cache_group::CacheGroup;
pub use loader::{Loader, LoaderFn};
pub use registry::Registry;
pub use types::{AddOutcome, Location, Lookup, RequestOrigin};
