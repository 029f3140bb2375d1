use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::protocol::{
    ApiParams, ApiResponse, ENDPOINT_API, KeyValueBody, PeerParams, ROUTE_DEFAULT_GROUP,
    ROUTE_GROUP, ROUTE_KEY, deleted_body,
};
use crate::cache::ByteView;
use crate::error::CacheError;
use crate::group::{AddOutcome, CacheGroup, Registry, RequestOrigin};

/// Everything a cache node's handlers need.
pub struct NodeState {
    pub registry: Arc<Registry>,
    /// This node's address in the peer list; passed as the origin of every operation.
    pub self_addr: String,
    /// Group served by `POST /`.
    pub default_group: String,
}

type ErrorResponse = (StatusCode, String);

/// Router for the peer protocol.
pub fn router(node: Arc<NodeState>) -> Router {
    Router::new()
        .route(ROUTE_DEFAULT_GROUP, post(handle_post_default))
        .route(ROUTE_GROUP, post(handle_post))
        .route(ROUTE_KEY, get(handle_get).delete(handle_delete))
        .layer(Extension(node))
}

/// Router for the API front-end, bound to a single group.
pub fn api_router(group: Arc<CacheGroup>, self_addr: String) -> Router {
    Router::new()
        .route(ENDPOINT_API, get(handle_api))
        .layer(Extension(Arc::new(ApiState { group, self_addr })))
}

pub fn error_status(err: &CacheError) -> StatusCode {
    if *err == CacheError::EmptyKey {
        StatusCode::BAD_REQUEST
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_GATEWAY
    }
}

fn error_response(err: CacheError) -> ErrorResponse {
    (error_status(&err), err.to_string())
}

fn lookup_group(node: &NodeState, name: &str) -> Result<Arc<CacheGroup>, ErrorResponse> {
    node.registry
        .get_group(name)
        .ok_or_else(|| error_response(CacheError::NoSuchGroup(name.to_string())))
}

pub async fn handle_get(
    Extension(node): Extension<Arc<NodeState>>,
    Path((group_name, key)): Path<(String, String)>,
    Query(params): Query<PeerParams>,
) -> Result<Json<KeyValueBody>, ErrorResponse> {
    tracing::debug!("[Server {}] GET /{}/{} local={}", node.self_addr, group_name, key, params.local);
    let group = lookup_group(&node, &group_name)?;

    let lookup = group
        .get(&key, &node.self_addr, RequestOrigin::from_local_flag(params.local))
        .await
        .map_err(error_response)?;

    let mut body = KeyValueBody::new();
    body.insert(key, lookup.value.to_string());
    Ok(Json(body))
}

pub async fn handle_delete(
    Extension(node): Extension<Arc<NodeState>>,
    Path((group_name, key)): Path<(String, String)>,
    Query(params): Query<PeerParams>,
) -> Result<String, ErrorResponse> {
    tracing::debug!("[Server {}] DELETE /{}/{} local={}", node.self_addr, group_name, key, params.local);
    let group = lookup_group(&node, &group_name)?;

    let deleted = group
        .delete(&key, &node.self_addr, RequestOrigin::from_local_flag(params.local))
        .await
        .map_err(error_response)?;

    Ok(deleted_body(deleted))
}

pub async fn handle_post_default(
    Extension(node): Extension<Arc<NodeState>>,
    Query(params): Query<PeerParams>,
    body: String,
) -> (StatusCode, String) {
    let group_name = node.default_group.clone();
    add_pairs(&node, &group_name, params.local, &body).await
}

pub async fn handle_post(
    Extension(node): Extension<Arc<NodeState>>,
    Path(group_name): Path<String>,
    Query(params): Query<PeerParams>,
    body: String,
) -> (StatusCode, String) {
    add_pairs(&node, &group_name, params.local, &body).await
}

/// Applies every pair of a JSON object body through `CacheGroup::add`.
async fn add_pairs(node: &NodeState, group_name: &str, local: bool, body: &str) -> (StatusCode, String) {
    tracing::debug!("[Server {}] POST /{} local={} body={}", node.self_addr, group_name, local, body);

    let group = match lookup_group(node, group_name) {
        Ok(group) => group,
        Err(response) => return response,
    };

    let pairs: Map<String, Value> = match serde_json::from_str(body) {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::error!("Failed to parse POST body: {}", e);
            return (StatusCode::BAD_REQUEST, "bad request".to_string());
        }
    };

    let origin = RequestOrigin::from_local_flag(local);
    let mut failed = 0;
    for (key, value) in pairs {
        let text = match &value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let mut single = Map::new();
        single.insert(key.clone(), value);
        let payload = Value::Object(single).to_string();

        match group
            .add(&key, ByteView::from(text), &node.self_addr, origin, &payload)
            .await
        {
            Ok(AddOutcome::Stored) => tracing::debug!("Stored {} locally", key),
            Ok(AddOutcome::Forwarded(peer)) => tracing::debug!("Forwarded {} to {}", key, peer),
            Err(CacheError::EmptyKey) => {
                return (StatusCode::BAD_REQUEST, CacheError::EmptyKey.to_string());
            }
            Err(e) => {
                tracing::error!("Failed to add {}: {}", key, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return (StatusCode::BAD_GATEWAY, format!("{} writes failed", failed));
    }
    (StatusCode::OK, String::new())
}

struct ApiState {
    group: Arc<CacheGroup>,
    self_addr: String,
}

async fn handle_api(
    Extension(api): Extension<Arc<ApiState>>,
    Query(params): Query<ApiParams>,
) -> Result<Json<ApiResponse>, ErrorResponse> {
    let lookup = api
        .group
        .get(&params.key, &api.self_addr, RequestOrigin::Client)
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving key {}: {}", params.key, e);
            error_response(e)
        })?;

    tracing::info!("Retrieved key {}: {}", params.key, lookup.value);
    Ok(Json(ApiResponse {
        key: params.key,
        value: lookup.value.to_string(),
    }))
}
