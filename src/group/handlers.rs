use super::group::GroupStats;
use super::registry::GroupRegistry;
use crate::error::CacheError;
use crate::peers::protocol::CONTENT_TYPE_OCTET_STREAM;

use axum::{
    Extension, Json, Router,
    extract::Path,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;

pub const ENDPOINT_API_STATS: &str = "/api/stats";
pub const ENDPOINT_API_GET: &str = "/api/:group/:key";

#[derive(Debug, Serialize)]
pub struct GroupReport {
    pub name: String,
    pub stats: GroupStats,
}

/// Client-facing routes: full lookups (peers included) and statistics.
pub fn api_router(registry: Arc<GroupRegistry>) -> Router {
    Router::new()
        .route(ENDPOINT_API_STATS, get(handle_stats))
        .route(ENDPOINT_API_GET, get(handle_get))
        .layer(Extension(registry))
}

pub async fn handle_get(
    Extension(registry): Extension<Arc<GroupRegistry>>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let group = registry.get_group(&group_name).ok_or_else(|| {
        let err = CacheError::GroupNotFound(group_name.clone());
        (err.status_code(), err.to_string())
    })?;

    match group.get(&key).await {
        Ok(view) => Ok((
            [(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)],
            view.byte_slice(),
        )),
        Err(e) => {
            tracing::error!("Failed to get {}/{}: {}", group_name, key, e);
            Err((e.status_code(), e.to_string()))
        }
    }
}

pub async fn handle_stats(
    Extension(registry): Extension<Arc<GroupRegistry>>,
) -> Json<Vec<GroupReport>> {
    let reports = registry
        .groups()
        .into_iter()
        .map(|group| GroupReport {
            name: group.name().to_string(),
            stats: group.stats(),
        })
        .collect();

    Json(reports)
}
