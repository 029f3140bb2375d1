//! Peer Transport
//!
//! How nodes find and talk to each other.
//!
//! ## Core Concepts
//! - **Selection**: `HttpPool` maps an address to its owner on the consistent hash ring and
//!   never resolves to itself.
//! - **Wire protocol**: `HttpPeerClient` issues GET/DELETE/POST against another node, every
//!   request marked `local=true` and bounded by a timeout.
//! - **Serving**: `handlers` exposes the same protocol through axum, plus the `/api`
//!   front-end.
//!
//! ## Submodules
//! - **`peers`**: the `PeerPicker` and `PeerClient` capabilities.
//! - **`pool`**: the HTTP-backed picker.
//! - **`client`**: the HTTP-backed client.
//! - **`protocol`**: routes, query flags and DTOs.
//! - **`handlers`**: axum handlers and routers.

pub mod client;
pub mod handlers;
pub mod peers;
pub mod pool;
pub mod protocol;

pub use client::HttpPeerClient;
pub use handlers::{NodeState, api_router, router};
pub use peers::{PeerClient, PeerPicker, PickedPeer};
pub use pool::HttpPool;
