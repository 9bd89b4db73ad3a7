use crate::fence::{FenceCatalog, GeoFence};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Shared state for fence catalog API
pub struct FenceAppState {
    pub catalog: Arc<FenceCatalog>,
}

/// Query parameters for fence listing
#[derive(Deserialize)]
pub struct FenceParams {
    /// Filter to active fences applying to this entity
    pub entity: Option<String>,
}

/// Response for fence upsert
#[derive(Serialize)]
struct UpsertResponse {
    id: String,
}

/// Response for fence deletion
#[derive(Serialize)]
struct DeleteFenceResponse {
    id: String,
    deleted: bool,
}

/// Create fence catalog router
pub fn create_fence_router(state: Arc<FenceAppState>) -> Router {
    Router::new()
        .route("/api/fences", get(list_fences).put(upsert_fence))
        .route("/api/fences/:id", get(get_fence).delete(delete_fence))
        .with_state(state)
}

/// GET /api/fences?entity=X
///
/// With `entity`: active fences applying to that entity, in catalog
/// order. Without: every fence, active or not (the fence editor view).
async fn list_fences(
    State(state): State<Arc<FenceAppState>>,
    Query(params): Query<FenceParams>,
) -> Json<Vec<GeoFence>> {
    let fences = match params.entity {
        Some(entity) => state.catalog.applicable_to(&entity),
        None => state.catalog.all(),
    };
    Json(fences)
}

/// GET /api/fences/:id
async fn get_fence(
    State(state): State<Arc<FenceAppState>>,
    Path(id): Path<String>,
) -> Result<Json<GeoFence>, FenceError> {
    state
        .catalog
        .get(&id)
        .map(Json)
        .ok_or(FenceError::NotFound(id))
}

/// PUT /api/fences - Insert or replace a fence
async fn upsert_fence(
    State(state): State<Arc<FenceAppState>>,
    Json(fence): Json<GeoFence>,
) -> Result<Json<UpsertResponse>, FenceError> {
    if fence.id.is_empty() {
        return Err(FenceError::InvalidFence("fence id is required".to_string()));
    }

    let id = fence.id.clone();
    info!(fence_id = %id, name = %fence.name, "Upserting geo-fence");
    state.catalog.upsert(fence);

    Ok(Json(UpsertResponse { id }))
}

/// DELETE /api/fences/:id - Remove a fence (absent id is a no-op)
async fn delete_fence(
    State(state): State<Arc<FenceAppState>>,
    Path(id): Path<String>,
) -> Json<DeleteFenceResponse> {
    let deleted = state.catalog.delete(&id).is_some();
    if deleted {
        info!(fence_id = %id, "Deleted geo-fence");
    }
    Json(DeleteFenceResponse { id, deleted })
}

/// Fence API errors
#[derive(Debug)]
pub enum FenceError {
    NotFound(String),
    InvalidFence(String),
}

impl IntoResponse for FenceError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            FenceError::NotFound(id) => {
                (StatusCode::NOT_FOUND, format!("no fence with id '{}'", id))
            }
            FenceError::InvalidFence(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
