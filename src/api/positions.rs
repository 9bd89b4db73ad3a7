use crate::history::HistoryStore;
use crate::report::PositionReport;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for position query API
pub struct PositionAppState {
    pub history: Arc<HistoryStore>,
}

/// Query parameters for position queries
#[derive(Deserialize)]
pub struct PositionParams {
    /// Entity ID (required for history, optional for current)
    pub entity: Option<String>,
    /// Max reports to return (default: 100, max: 500)
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create position query router
pub fn create_position_router(state: Arc<PositionAppState>) -> Router {
    Router::new()
        .route("/api/positions/current", get(get_current))
        .route("/api/positions/history", get(get_history))
        .with_state(state)
}

/// GET /api/positions/current?entity=X
///
/// With `entity`: that entity's most recent report, or 404 if it has no
/// history yet. Without: the most recent report of every known entity
/// (the dashboard's current-locations view).
async fn get_current(
    State(state): State<Arc<PositionAppState>>,
    Query(params): Query<PositionParams>,
) -> Response {
    match params.entity {
        Some(entity) => match state.history.latest(&entity) {
            Some(report) => Json(report).into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("no position history for entity '{}'", entity),
                }),
            )
                .into_response(),
        },
        None => {
            let mut current: Vec<PositionReport> = state
                .history
                .entity_ids()
                .iter()
                .filter_map(|id| state.history.latest(id))
                .collect();
            current.sort_by(|a, b| a.user_id.cmp(&b.user_id));
            Json(current).into_response()
        }
    }
}

/// GET /api/positions/history?entity=X&limit=N
///
/// Returns stored reports for an entity, newest first.
async fn get_history(
    State(state): State<Arc<PositionAppState>>,
    Query(params): Query<PositionParams>,
) -> Response {
    let entity = match params.entity {
        Some(e) => e,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "entity parameter is required".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Clamp limit to 1..=500
    let limit = params.limit.unwrap_or(100).min(500).max(1);

    let mut reports = state.history.history_for(&entity);
    reports.truncate(limit);

    Json(reports).into_response()
}
