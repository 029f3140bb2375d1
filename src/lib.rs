//! Distributed Key/Value Cache Library
//!
//! Each process holds a bounded local partition of every cache group and cooperates with
//! a fixed set of peers over HTTP to locate, fetch, update and delete keys held elsewhere.
//! Concurrent misses for the same key collapse into one origin fetch.
//!
//! ## Architecture Modules
//! - **`cache`**: the byte-budgeted LRU engine and the immutable `ByteView` it stores.
//! - **`ring`**: consistent hashing with virtual nodes, used to pick peers.
//! - **`flight`**: single-flight deduplication of overlapping loads.
//! - **`group`**: `CacheGroup` orchestration (local vs remote routing) and the `Registry`.
//! - **`transport`**: the HTTP peer pool, peer client and axum handlers.
//! - **`config`** / **`error`**: node configuration and the error taxonomy.

pub mod cache;
pub mod config;
pub mod error;
pub mod flight;
pub mod group;
pub mod ring;
pub mod transport;

pub use cache::ByteView;
pub use error::CacheError;
pub use group::{CacheGroup, Loader, LoaderFn, Registry, RequestOrigin};
pub use transport::HttpPool;
