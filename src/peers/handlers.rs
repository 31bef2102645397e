use super::protocol::{CONTENT_TYPE_OCTET_STREAM, PeerRequest, PeerResponse};
use crate::error::CacheError;
use crate::group::registry::GroupRegistry;

use axum::{
    Extension, Router,
    http::{Method, StatusCode, Uri, header},
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;

/// Identity of the node answering peer requests.
#[derive(Debug, Clone)]
pub struct PeerEndpoint {
    pub self_url: String,
    pub base_path: String,
}

/// Routes `<base_path>` and `<base_path>*` to [`handle_peer_get`].
pub fn peer_router(registry: Arc<GroupRegistry>, endpoint: PeerEndpoint) -> Router {
    let route = format!("{}*rest", endpoint.base_path);
    Router::new()
        // The wildcard does not match an empty tail; the bare prefix is a bad request.
        .route(&endpoint.base_path, get(handle_peer_get))
        .route(&route, get(handle_peer_get))
        .layer(Extension(registry))
        .layer(Extension(Arc::new(endpoint)))
}

/// Answers a peer's `GET <base_path><group>/<key>` from this node's own data.
pub async fn handle_peer_get(
    Extension(registry): Extension<Arc<GroupRegistry>>,
    Extension(endpoint): Extension<Arc<PeerEndpoint>>,
    method: Method,
    uri: Uri,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let path = uri.path();
    tracing::debug!(node = %endpoint.self_url, %method, path, "peer request");

    let request = PeerRequest::from_path(&endpoint.base_path, path).map_err(reject)?;

    let group = registry
        .get_group(&request.group)
        .ok_or_else(|| reject(CacheError::GroupNotFound(request.group.clone())))?;

    let view = group.get_as_owner(&request.key).await.map_err(reject)?;

    let body = PeerResponse {
        value: view.byte_slice(),
    }
    .encode()
    .map_err(reject)?;

    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)], body))
}

fn reject(err: CacheError) -> (StatusCode, String) {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("peer request failed: {}", err);
    } else {
        tracing::debug!("peer request rejected: {}", err);
    }
    (status, err.to_string())
}
