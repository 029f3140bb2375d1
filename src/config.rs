//! Node Configuration
//!
//! Defaults shared by the library, plus the command-line surface of the `cache-node`
//! binary. The peer list is fixed for the lifetime of the process.

use anyhow::{Context, bail};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Virtual nodes per peer on the hash ring.
pub const DEFAULT_REPLICAS: usize = 50;
/// Path prefix under which the peer protocol is served.
pub const DEFAULT_BASE_PATH: &str = "/";
/// Upper bound for a single peer RPC.
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_millis(500);
/// Group served when a request does not name one.
pub const DEFAULT_GROUP: &str = "scores";
/// Byte budget of the binary's group.
pub const DEFAULT_CACHE_BYTES: usize = 2 << 10;

#[derive(Debug, Clone, Parser)]
#[command(name = "cache-node", about = "Distributed in-process key/value cache node")]
pub struct NodeArgs {
    /// Port of this cache node.
    #[arg(long, default_value_t = 8001)]
    pub port: u16,

    /// Also start the API front-end.
    #[arg(long, default_value_t = false)]
    pub api: bool,

    /// Listen address of the API front-end.
    #[arg(long, default_value = "127.0.0.1:9999")]
    pub api_addr: SocketAddr,

    /// Address of this node as written in `--peers`. Defaults to the entry on `--port`.
    #[arg(long)]
    pub self_addr: Option<String>,

    /// Every cache node in the cluster, this one included.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "http://localhost:8001,http://localhost:8002,http://localhost:8003"
    )]
    pub peers: Vec<String>,

    /// Group served by `POST /`.
    #[arg(long, default_value = DEFAULT_GROUP)]
    pub group: String,

    /// Byte budget of the group's LRU (0 = unbounded).
    #[arg(long, default_value_t = DEFAULT_CACHE_BYTES)]
    pub cache_bytes: usize,

    /// Virtual nodes per peer on the hash ring.
    #[arg(long, default_value_t = DEFAULT_REPLICAS)]
    pub replicas: usize,

    /// Timeout of a single peer request, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_PEER_TIMEOUT.as_millis() as u64)]
    pub peer_timeout_ms: u64,
}

impl NodeArgs {
    /// Address this node is known by in the peer list.
    ///
    /// Fails unless the address is one of `--peers`: a node missing from its own list
    /// would route keys to itself over HTTP.
    pub fn self_addr(&self) -> anyhow::Result<String> {
        let peers: Vec<&str> = self.peers.iter().map(|p| p.trim_end_matches('/')).collect();

        if let Some(addr) = &self.self_addr {
            let addr = addr.trim_end_matches('/');
            if !peers.contains(&addr) {
                bail!("--self-addr {} is not one of --peers {:?}", addr, peers);
            }
            return Ok(addr.to_string());
        }

        let mut on_port = Vec::new();
        for peer in &peers {
            let url = reqwest::Url::parse(peer)
                .with_context(|| format!("invalid peer address {}", peer))?;
            if url.port_or_known_default() == Some(self.port) {
                on_port.push(*peer);
            }
        }

        match on_port.as_slice() {
            [addr] => Ok(addr.to_string()),
            [] => bail!(
                "no entry of --peers {:?} uses port {}; pass --self-addr",
                peers,
                self.port
            ),
            _ => bail!(
                "several --peers entries use port {}: {:?}; pass --self-addr",
                self.port,
                on_port
            ),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_millis(self.peer_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_three_node_cluster() {
        let args = NodeArgs::parse_from(["cache-node"]);

        assert_eq!(args.port, 8001);
        assert!(!args.api);
        assert_eq!(args.peers.len(), 3);
        assert_eq!(args.self_addr().unwrap(), "http://localhost:8001");
        assert_eq!(args.peer_timeout(), DEFAULT_PEER_TIMEOUT);
    }

    #[test]
    fn test_peers_are_comma_separated() {
        let args = NodeArgs::parse_from([
            "cache-node",
            "--port",
            "9002",
            "--api",
            "--peers",
            "http://a:9001,http://b:9002",
        ]);

        assert!(args.api);
        assert_eq!(args.peers, vec!["http://a:9001", "http://b:9002"]);
        assert_eq!(args.listen_addr().port(), 9002);
    }

    #[test]
    fn test_self_addr_follows_the_peer_list_host() {
        let args = NodeArgs::parse_from([
            "cache-node",
            "--port",
            "8001",
            "--peers",
            "http://127.0.0.1:8001,http://127.0.0.1:8002,http://127.0.0.1:8003",
        ]);

        assert_eq!(args.self_addr().unwrap(), "http://127.0.0.1:8001");
    }

    #[test]
    fn test_self_addr_must_be_a_peer() {
        let missing = NodeArgs::parse_from(["cache-node", "--port", "7000"]);
        assert!(missing.self_addr().is_err());

        let foreign = NodeArgs::parse_from(["cache-node", "--self-addr", "http://elsewhere:8001"]);
        assert!(foreign.self_addr().is_err());

        let explicit = NodeArgs::parse_from(["cache-node", "--self-addr", "http://localhost:8002/"]);
        assert_eq!(explicit.self_addr().unwrap(), "http://localhost:8002");
    }

    #[test]
    fn test_shared_port_needs_explicit_self_addr() {
        let args = NodeArgs::parse_from(["cache-node", "--peers", "http://a:8001,http://b:8001"]);
        assert!(args.self_addr().is_err());

        let args = NodeArgs::parse_from([
            "cache-node",
            "--self-addr",
            "http://b:8001",
            "--peers",
            "http://a:8001,http://b:8001",
        ]);
        assert_eq!(args.self_addr().unwrap(), "http://b:8001");
    }

    #[test]
    fn test_peer_timeout_default_matches_library_default() {
        let args = NodeArgs::parse_from(["cache-node"]);

        assert_eq!(args.peer_timeout_ms, DEFAULT_PEER_TIMEOUT.as_millis() as u64);
    }
}
