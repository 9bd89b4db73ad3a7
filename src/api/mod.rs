// HTTP and WebSocket APIs

mod ingestion;
pub mod fences;
pub mod notifications;
pub mod positions;
pub mod websocket;

pub use fences::{create_fence_router, FenceAppState};
pub use ingestion::{create_router, AppState};
pub use notifications::{create_notification_router, NotificationAppState};
pub use positions::{create_position_router, PositionAppState};
pub use websocket::{create_ws_router, ws_handler, WsAppState};
