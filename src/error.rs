//! Cache Error Taxonomy
//!
//! Every fallible cache operation reports a `CacheError`. The variants fall into the
//! four categories the node distinguishes when deciding what to do next:
//!
//! - **Validation**: `EmptyKey`. Rejected before touching the cache or the network.
//! - **Not found**: `Loader`, `NoSuchGroup`. Returned to the caller unchanged.
//! - **Peer unreachable**: `UnknownPeer`, `PeerUnreachable`, `PeerStatus`. Swallowed during
//!   a fan-out, the next candidate is tried instead.
//! - **Decode**: `Decode`, `MissingKey`. A peer answered with something unusable; handled
//!   like an unreachable peer.
//!
//! The type is `Clone` because a single-flight result is handed to every waiter.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("key is required")]
    EmptyKey,

    /// The loader could not produce a value. The message is the loader's own.
    #[error("{0}")]
    Loader(String),

    #[error("no such group: {0}")]
    NoSuchGroup(String),

    #[error("unknown peer: {0}")]
    UnknownPeer(String),

    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    #[error("peer {peer} returned {status}")]
    PeerStatus { peer: String, status: u16 },

    #[error("decoding response from {peer}: {reason}")]
    Decode { peer: String, reason: String },

    #[error("key '{key}' not found in the response from {peer}")]
    MissingKey { peer: String, key: String },
}

impl CacheError {
    /// Errors caused by talking to another node. These never abort a fan-out.
    pub fn is_peer_failure(&self) -> bool {
        matches!(
            self,
            CacheError::UnknownPeer(_)
                | CacheError::PeerUnreachable { .. }
                | CacheError::PeerStatus { .. }
                | CacheError::Decode { .. }
                | CacheError::MissingKey { .. }
        )
    }

    /// Errors meaning the key or group does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::Loader(_) | CacheError::NoSuchGroup(_))
    }
}

impl From<anyhow::Error> for CacheError {
    fn from(err: anyhow::Error) -> Self {
        CacheError::Loader(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
