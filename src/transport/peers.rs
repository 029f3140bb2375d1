//! Peer capabilities
//!
//! `PeerPicker` decides which node to talk to; `PeerClient` talks to it. `CacheGroup` only
//! depends on these two traits, so it can be driven by the HTTP pool in production and by
//! an in-memory double in tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::ByteView;
use crate::error::Result;

/// Issues the peer protocol against a single remote node.
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// Base address of the remote node.
    fn addr(&self) -> &str;

    /// Fetches `key` from the remote node's `group`, marked as a relayed request.
    async fn get(&self, group: &str, key: &str) -> Result<ByteView>;

    /// Deletes `key` on the remote node; `true` if it held the key.
    async fn delete(&self, group: &str, key: &str) -> Result<bool>;

    /// Sends a raw JSON `{key: value}` write to the remote node.
    async fn update(&self, group: &str, payload: &str) -> Result<()>;
}

/// A remote node chosen by a `PeerPicker`.
#[derive(Clone)]
pub struct PickedPeer {
    pub addr: String,
    pub client: Arc<dyn PeerClient>,
}

impl std::fmt::Debug for PickedPeer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickedPeer").field("addr", &self.addr).finish()
    }
}

pub trait PeerPicker: Send + Sync {
    /// Resolves the ring owner of `key`. `None` if the ring is empty or the owner is
    /// this node, so a node never routes to itself.
    fn pick_peer(&self, key: &str) -> Option<PickedPeer>;

    /// Every configured peer address, sorted, this node included.
    fn peers(&self) -> Vec<String>;

    /// Client for the peer at exactly `addr`, bypassing the ring.
    fn peer(&self, addr: &str) -> Option<Arc<dyn PeerClient>>;
}
