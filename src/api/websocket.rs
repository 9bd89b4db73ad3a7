use crate::engine::EvaluationEngine;
use crate::notify::Notification;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Client → Server message types
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum ClientMessage {
    /// Limit the stream to notifications for one entity
    #[serde(rename = "subscribe")]
    Subscribe {
        #[serde(rename = "userId")]
        user_id: String,
    },
    #[serde(rename = "unsubscribe")]
    Unsubscribe {
        #[serde(rename = "userId")]
        user_id: String,
    },
}

/// Shared application state for WebSocket handler
#[derive(Clone)]
pub struct WsAppState {
    pub engine: Arc<EvaluationEngine>,
}

/// GET /api/ws - WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<WsAppState>>,
) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Create WebSocket router
pub fn create_ws_router(state: Arc<WsAppState>) -> Router {
    Router::new()
        .route("/api/ws", get(ws_handler))
        .with_state(state)
}

/// Handle WebSocket connection: push each emitted notification as one
/// JSON message, filtered by the client's entity subscriptions (none
/// means everything).
async fn handle_socket(mut socket: WebSocket, state: Arc<WsAppState>) {
    let mut notification_rx = state.engine.subscribe();
    let mut subscriptions: HashSet<String> = HashSet::new();

    info!("WebSocket connection established");

    loop {
        tokio::select! {
            // Handle incoming client messages
            Some(msg) = socket.recv() => {
                match msg {
                    Ok(Message::Text(text)) => {
                        handle_client_message(&mut subscriptions, &text);
                    }
                    Ok(Message::Close(_)) => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Ok(Message::Ping(data)) => {
                        if let Err(e) = socket.send(Message::Pong(data)).await {
                            error!(error = %e, "Failed to send pong");
                            break;
                        }
                    }
                    Ok(_) => {
                        // Ignore binary, pong messages
                    }
                    Err(e) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                }
            }

            // Forward notifications from the broadcast channel
            result = notification_rx.recv() => {
                match result {
                    Ok(notification) => {
                        if should_forward(&subscriptions, &notification) {
                            if let Err(e) = send_notification(&mut socket, &notification).await {
                                error!(error = %e, "Failed to send notification");
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped = skipped, "WebSocket lagged, skipped notifications");
                        // Continue processing
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        error!("Notification broadcast channel closed");
                        break;
                    }
                }
            }

            else => {
                break;
            }
        }
    }

    info!("WebSocket connection closed");
}

/// Apply a subscribe/unsubscribe message; malformed messages are logged
/// and ignored.
fn handle_client_message(subscriptions: &mut HashSet<String>, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Subscribe { user_id }) => {
            info!(user_id = %user_id, "Client subscribed to entity");
            subscriptions.insert(user_id);
        }
        Ok(ClientMessage::Unsubscribe { user_id }) => {
            info!(user_id = %user_id, "Client unsubscribed from entity");
            subscriptions.remove(&user_id);
        }
        Err(e) => {
            warn!(error = %e, "Ignoring malformed client message");
        }
    }
}

/// With no subscriptions, forward everything. With subscriptions,
/// forward matching entities plus system notifications that carry no
/// entity at all.
fn should_forward(subscriptions: &HashSet<String>, notification: &Notification) -> bool {
    if subscriptions.is_empty() {
        return true;
    }
    match &notification.user_id {
        Some(user_id) => subscriptions.contains(user_id),
        None => true,
    }
}

async fn send_notification(
    socket: &mut WebSocket,
    notification: &Notification,
) -> anyhow::Result<()> {
    let json = serde_json::to_string(notification)?;
    socket.send(Message::Text(json)).await?;
    Ok(())
}
