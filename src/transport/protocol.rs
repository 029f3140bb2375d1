//! Peer Network Protocol
//!
//! One HTTP route per verb; the path names the group and key. The query flag
//! `local=true` marks a request relayed by another node, which the receiver must resolve
//! without forwarding it again.
//!
//! | Verb | Path | Body | Response |
//! |---|---|---|---|
//! | GET | `/{group}/{key}` | - | `{"<key>": "<value>"}`, 200 / 404 |
//! | POST | `/` or `/{group}` | `{key: value, ...}` | 200 / 400 |
//! | DELETE | `/{group}/{key}` | - | `"1"` or `"0"`, 200 / 404 |

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- Routes ---

/// Bulk write into the default group.
pub const ROUTE_DEFAULT_GROUP: &str = "/";
/// Bulk write into a named group.
pub const ROUTE_GROUP: &str = "/:group";
/// Single-key read and delete.
pub const ROUTE_KEY: &str = "/:group/:key";
/// Front-end lookup, served on the API listener.
pub const ENDPOINT_API: &str = "/api";

/// Query parameter marking a relayed request.
pub const QUERY_LOCAL: &str = "local";

// --- Data Transfer Objects ---

/// Body of a successful GET: the key mapped to its value.
pub type KeyValueBody = HashMap<String, String>;

/// Query string of every peer-protocol request.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PeerParams {
    #[serde(default)]
    pub local: bool,
}

/// Query string of the front-end lookup.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ApiParams {
    #[serde(default)]
    pub key: String,
}

/// Front-end lookup result.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub key: String,
    pub value: String,
}

/// Body of a DELETE response.
pub fn deleted_body(count: usize) -> String {
    count.to_string()
}
