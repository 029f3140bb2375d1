use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::client::HttpPeerClient;
use super::peers::{PeerClient, PeerPicker, PickedPeer};
use crate::config::{DEFAULT_BASE_PATH, DEFAULT_PEER_TIMEOUT, DEFAULT_REPLICAS};
use crate::ring::HashRing;

/// HTTP-backed peer picker.
///
/// Holds the consistent hash ring over the configured peers and one client per peer.
/// `set` rebuilds both wholesale; readers never see a half-built ring.
pub struct HttpPool {
    self_addr: String,
    base_path: String,
    replicas: usize,
    timeout: Duration,
    http_client: reqwest::Client,
    state: Mutex<PoolState>,
}

struct PoolState {
    ring: HashRing,
    clients: HashMap<String, Arc<HttpPeerClient>>,
    addrs: Vec<String>,
}

impl HttpPool {
    /// `self_addr` is this node's address as it appears in the peer list,
    /// e.g. `http://localhost:8001`.
    pub fn new(self_addr: &str) -> Self {
        Self::with_options(self_addr, DEFAULT_BASE_PATH, DEFAULT_REPLICAS, DEFAULT_PEER_TIMEOUT)
    }

    pub fn with_options(self_addr: &str, base_path: &str, replicas: usize, timeout: Duration) -> Self {
        Self {
            self_addr: self_addr.trim_end_matches('/').to_string(),
            base_path: normalize_base_path(base_path),
            replicas,
            timeout,
            http_client: reqwest::Client::new(),
            state: Mutex::new(PoolState {
                ring: HashRing::new(replicas),
                clients: HashMap::new(),
                addrs: Vec::new(),
            }),
        }
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Replaces the peer list. The ring and client map are rebuilt from scratch.
    pub fn set<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut addrs: Vec<String> = peers
            .into_iter()
            .map(|peer| peer.as_ref().trim_end_matches('/').to_string())
            .collect();
        addrs.sort();
        addrs.dedup();

        let mut ring = HashRing::new(self.replicas);
        ring.add(&addrs);

        let clients = addrs
            .iter()
            .map(|addr| {
                let client = HttpPeerClient::new(
                    addr,
                    format!("{}{}", addr, self.base_path),
                    self.http_client.clone(),
                    self.timeout,
                );
                (addr.clone(), Arc::new(client))
            })
            .collect();

        tracing::info!("[Server {}] Setting peers: {:?}", self.self_addr, addrs);

        let mut state = self.state.lock();
        state.ring = ring;
        state.clients = clients;
        state.addrs = addrs;
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<PickedPeer> {
        let state = self.state.lock();
        let owner = state.ring.get(key)?;
        if owner == self.self_addr {
            return None;
        }

        let client: Arc<dyn PeerClient> = state.clients.get(owner)?.clone();
        tracing::debug!("[Server {}] Pick peer {}", self.self_addr, owner);
        Some(PickedPeer {
            addr: owner.to_string(),
            client,
        })
    }

    fn peers(&self) -> Vec<String> {
        self.state.lock().addrs.clone()
    }

    fn peer(&self, addr: &str) -> Option<Arc<dyn PeerClient>> {
        let addr = addr.trim_end_matches('/');
        let client: Arc<dyn PeerClient> = self.state.lock().clients.get(addr)?.clone();
        Some(client)
    }
}

/// Ensures the base path starts and ends with exactly one `/`.
fn normalize_base_path(base_path: &str) -> String {
    let cleaned = base_path.trim_matches('/');
    if cleaned.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path(""), "/");
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path("cache"), "/cache/");
        assert_eq!(normalize_base_path("/cache/"), "/cache/");
    }
}
