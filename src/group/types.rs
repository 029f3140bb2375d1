use crate::cache::ByteView;

/// Where a request came from.
///
/// Requests relayed by another node must never be relayed again, otherwise two nodes
/// missing the same key would forward it back and forth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestOrigin {
    /// An end caller; misses may be forwarded to peers.
    Client,
    /// Another node relaying a request; misses are resolved locally.
    Peer,
}

impl RequestOrigin {
    /// Maps the wire flag `local=true` to `Peer`.
    pub fn from_local_flag(local: bool) -> Self {
        if local {
            RequestOrigin::Peer
        } else {
            RequestOrigin::Client
        }
    }

    pub fn is_peer(self) -> bool {
        self == RequestOrigin::Peer
    }

    fn tag(self) -> &'static str {
        match self {
            RequestOrigin::Client => "client",
            RequestOrigin::Peer => "peer",
        }
    }

    /// Single-flight key. Relayed and client lookups of one key resolve differently, so
    /// they are deduplicated separately.
    pub(crate) fn flight_key(self, key: &str) -> String {
        format!("{}:{}", self.tag(), key)
    }
}

/// Which node produced a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// This node's cache or loader.
    Local,
    /// The peer at this address.
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub value: ByteView,
    pub location: Location,
}

impl Lookup {
    pub fn local(value: ByteView) -> Self {
        Self {
            value,
            location: Location::Local,
        }
    }

    pub fn remote(value: ByteView, peer: impl Into<String>) -> Self {
        Self {
            value,
            location: Location::Remote(peer.into()),
        }
    }
}

/// What `CacheGroup::add` did with a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Written into this node's cache.
    Stored,
    /// The key already lives on this peer; the write was sent there.
    Forwarded(String),
}
