use crate::engine::EvaluationEngine;
use crate::report::PositionReport;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EvaluationEngine>,
    pub body_size_limit_single_bytes: usize,
    pub body_size_limit_batch_bytes: usize,
}

impl AppState {
    pub fn new(engine: Arc<EvaluationEngine>) -> Self {
        Self {
            engine,
            body_size_limit_single_bytes: 1_048_576,   // 1 MB
            body_size_limit_batch_bytes: 10_485_760,   // 10 MB
        }
    }
}

/// Success response for position ingestion
#[derive(Serialize)]
struct PositionResponse {
    id: String,
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(rename = "notificationsEmitted")]
    notifications_emitted: usize,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Batch request
#[derive(Deserialize)]
struct BatchRequest {
    positions: Vec<PositionReport>,
}

/// Batch response
#[derive(Serialize)]
struct BatchResponse {
    successful: usize,
    failed: usize,
    results: Vec<BatchResult>,
}

#[derive(Serialize)]
struct BatchResult {
    id: Option<String>,
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "notificationsEmitted")]
    notifications_emitted: usize,
    error: Option<String>,
}

/// Create API router with ingestion endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/positions", post(submit_position))
        .route("/api/positions/batch", post(submit_batch))
        .with_state(Arc::new(state))
}

/// POST /api/positions - Submit single position report
async fn submit_position(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PositionResponse>, AppError> {
    if body.len() > state.body_size_limit_single_bytes {
        return Err(AppError::PayloadTooLarge);
    }

    // Deserialize from checked bytes
    let mut report: PositionReport = serde_json::from_slice(&body)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    // Prepare here so the response can echo the generated id
    report
        .validate_and_prepare()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let id = report.id.clone().unwrap_or_default();
    let user_id = report.user_id.clone();

    info!(
        user_id = %user_id,
        latitude = report.latitude,
        longitude = report.longitude,
        "Ingesting position report"
    );

    let emitted = state
        .engine
        .submit_position(report)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    Ok(Json(PositionResponse {
        id,
        user_id,
        notifications_emitted: emitted.len(),
    }))
}

/// POST /api/positions/batch - Submit multiple position reports
async fn submit_batch(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<BatchResponse>, AppError> {
    if body.len() > state.body_size_limit_batch_bytes {
        return Err(AppError::PayloadTooLarge);
    }

    let request: BatchRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    if request.positions.is_empty() {
        return Err(AppError::ValidationError(
            "Batch request must contain at least one position".to_string(),
        ));
    }

    info!(count = request.positions.len(), "Ingesting position batch");

    let mut results = Vec::new();
    let mut successful = 0;
    let mut failed = 0;

    for mut report in request.positions {
        // Prepare up front so the result row can echo the generated id
        if let Err(e) = report.validate_and_prepare() {
            failed += 1;
            results.push(BatchResult {
                id: None,
                user_id: Some(report.user_id.clone()),
                notifications_emitted: 0,
                error: Some(format!("validation failed: {}", e)),
            });
            continue;
        }

        let id = report.id.clone();
        let user_id = report.user_id.clone();
        match state.engine.submit_position(report) {
            Ok(emitted) => {
                successful += 1;
                results.push(BatchResult {
                    id,
                    user_id: Some(user_id),
                    notifications_emitted: emitted.len(),
                    error: None,
                });
            }
            Err(e) => {
                failed += 1;
                results.push(BatchResult {
                    id,
                    user_id: Some(user_id),
                    notifications_emitted: 0,
                    error: Some(format!("submission failed: {}", e)),
                });
            }
        }
    }

    Ok(Json(BatchResponse {
        successful,
        failed,
        results,
    }))
}

/// Application error types
enum AppError {
    ValidationError(String),
    PayloadTooLarge,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload too large".to_string())
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
        });
        (status, body).into_response()
    }
}
