use crate::notify::{Notification, NotificationSink};
use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for notification API
pub struct NotificationAppState {
    pub sink: Arc<NotificationSink>,
}

/// Response for dismissal
#[derive(Serialize)]
struct DismissResponse {
    id: String,
    dismissed: bool,
}

/// Response for mark-all-read
#[derive(Serialize)]
struct MarkReadResponse {
    unread: usize,
}

/// Create notification router
pub fn create_notification_router(state: Arc<NotificationAppState>) -> Router {
    Router::new()
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/:id", delete(dismiss_notification))
        .route("/api/notifications/read", post(mark_all_read))
        .with_state(state)
}

/// GET /api/notifications - All notifications, newest first
async fn list_notifications(
    State(state): State<Arc<NotificationAppState>>,
) -> Json<Vec<Notification>> {
    Json(state.sink.list())
}

/// DELETE /api/notifications/:id - Dismiss one notification.
/// An absent id is a no-op, not an error.
async fn dismiss_notification(
    State(state): State<Arc<NotificationAppState>>,
    Path(id): Path<String>,
) -> Json<DismissResponse> {
    let dismissed = state.sink.dismiss(&id);
    Json(DismissResponse { id, dismissed })
}

/// POST /api/notifications/read - Mark every notification read
async fn mark_all_read(
    State(state): State<Arc<NotificationAppState>>,
) -> Json<MarkReadResponse> {
    state.sink.mark_all_read();
    Json(MarkReadResponse {
        unread: state.sink.unread_count(),
    })
}
