use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use super::loader::Loader;
use super::types::{AddOutcome, Location, Lookup, RequestOrigin};
use crate::cache::{ByteView, SharedCache};
use crate::error::{CacheError, Result};
use crate::flight::FlightGroup;
use crate::transport::peers::{PeerPicker, PickedPeer};

/// A named cache namespace spread over the cluster.
///
/// Each node holds its own bounded partition of the group. A miss is first looked up on
/// the other nodes and only then handed to the loader; the node that loads a value keeps
/// it, nodes that merely relay it do not.
pub struct CacheGroup {
    name: String,
    loader: Arc<dyn Loader>,
    main_cache: SharedCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    flights: FlightGroup<Result<Lookup>>,
}

impl CacheGroup {
    pub fn new(name: &str, cache_bytes: usize, loader: Arc<dyn Loader>) -> Self {
        Self::with_cache(name, SharedCache::new(cache_bytes), loader)
    }

    /// Builds a group around a preconfigured cache, e.g. one with an eviction callback.
    pub fn with_cache(name: &str, main_cache: SharedCache, loader: Arc<dyn Loader>) -> Self {
        Self {
            name: name.to_string(),
            loader,
            main_cache,
            peers: OnceLock::new(),
            flights: FlightGroup::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the peer picker. Only the first registration takes effect.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> bool {
        if self.peers.set(peers).is_err() {
            tracing::warn!("[{}] peers already registered, ignoring", self.name);
            return false;
        }
        true
    }

    pub fn cached_entries(&self) -> usize {
        self.main_cache.len()
    }

    pub fn cached_bytes(&self) -> usize {
        self.main_cache.used_bytes()
    }

    /// Looks `key` up in the local cache, then on the other nodes, then in the loader.
    ///
    /// `origin_addr` is the address of the node serving the request; it is never asked.
    /// Relayed requests (`RequestOrigin::Peer`) skip the peer round and go to the loader.
    pub async fn get(&self, key: &str, origin_addr: &str, origin: RequestOrigin) -> Result<Lookup> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(value) = self.main_cache.get(key) {
            tracing::debug!("[{}] GET: hit {}", self.name, key);
            return Ok(Lookup::local(value));
        }

        self.flights
            .run(&origin.flight_key(key), || self.load(key, origin_addr, origin))
            .await
    }

    /// Writes `key` unless it already lives on another node, in which case `payload`
    /// (a JSON `{key: value}` object) is sent to that node instead.
    ///
    /// Two concurrent adds of a brand new key on different nodes can both miss the
    /// existence check and both store locally; the copies converge only once one of them
    /// is evicted or deleted.
    pub async fn add(
        &self,
        key: &str,
        value: ByteView,
        origin_addr: &str,
        origin: RequestOrigin,
        payload: &str,
    ) -> Result<AddOutcome> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        match self.get(key, origin_addr, origin).await {
            Ok(Lookup {
                location: Location::Remote(owner),
                ..
            }) => {
                tracing::info!("[{}] ADD: {} already lives on {}, updating there", self.name, key, owner);
                self.update(&owner, payload).await?;
                Ok(AddOutcome::Forwarded(owner))
            }
            Ok(_) => {
                self.main_cache.add(key, value);
                Ok(AddOutcome::Stored)
            }
            Err(e) => {
                tracing::debug!("[{}] ADD: {} is new ({}), storing locally", self.name, key, e);
                self.main_cache.add(key, value);
                Ok(AddOutcome::Stored)
            }
        }
    }

    /// Removes `key` from this node, or, for client requests, from the first other node
    /// that holds it. Returns the number of entries removed (0 or 1).
    pub async fn delete(&self, key: &str, origin_addr: &str, origin: RequestOrigin) -> Result<usize> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if self.main_cache.remove(key) {
            tracing::debug!("[{}] DELETE: removed {} locally", self.name, key);
            return Ok(1);
        }
        if origin.is_peer() {
            return Ok(0);
        }

        for peer in self.candidates(origin_addr) {
            match peer.client.delete(&self.name, key).await {
                Ok(true) => {
                    tracing::info!("[{}] DELETE: removed {} on {}", self.name, key, peer.addr);
                    return Ok(1);
                }
                Ok(false) => {}
                Err(e) => tracing::warn!("[{}] DELETE: peer {} failed: {}", self.name, peer.addr, e),
            }
        }

        Ok(0)
    }

    /// Sends a raw write to the node at `addr`.
    pub async fn update(&self, addr: &str, payload: &str) -> Result<()> {
        let client = self
            .peers
            .get()
            .and_then(|peers| peers.peer(addr))
            .ok_or_else(|| CacheError::UnknownPeer(addr.to_string()))?;

        client.update(&self.name, payload).await
    }

    async fn load(&self, key: &str, origin_addr: &str, origin: RequestOrigin) -> Result<Lookup> {
        if !origin.is_peer() {
            for peer in self.candidates(origin_addr) {
                match peer.client.get(&self.name, key).await {
                    Ok(value) => {
                        tracing::debug!("[{}] GET: {} found on {}", self.name, key, peer.addr);
                        return Ok(Lookup::remote(value, peer.addr));
                    }
                    Err(e) => {
                        tracing::warn!("[{}] GET: failed to get {} from {}: {}", self.name, key, peer.addr, e)
                    }
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_locally(&self, key: &str) -> Result<Lookup> {
        tracing::info!("[{}] GET: loading {}", self.name, key);
        let bytes = self.loader.load(key).await?;
        let value = ByteView::from(bytes);
        self.main_cache.add(key, value.clone());
        Ok(Lookup::local(value))
    }

    /// Remote nodes to try, in address order: each configured peer other than the origin,
    /// resolved through the picker, each resolved node at most once.
    fn candidates(&self, origin_addr: &str) -> Vec<PickedPeer> {
        let Some(picker) = self.peers.get() else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        picker
            .peers()
            .into_iter()
            .filter(|addr| addr != origin_addr)
            .filter_map(|addr| picker.pick_peer(&addr))
            .filter(|peer| peer.addr != origin_addr && seen.insert(peer.addr.clone()))
            .collect()
    }
}
