use anyhow::{Context, Result};
use fenceline::api::{
    create_fence_router, create_notification_router, create_position_router, create_router,
    create_ws_router, AppState, FenceAppState, NotificationAppState, PositionAppState, WsAppState,
};
use fenceline::config::{load_config, FencelineConfig};
use fenceline::engine::EvaluationEngine;
use fenceline::fence::FenceCatalog;
use fenceline::history::HistoryStore;
use fenceline::notify::NotificationSink;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fenceline=info".into()),
        )
        .init();

    info!("Fenceline starting...");

    // Load config (first CLI arg or ./fenceline.toml); a missing file
    // falls back to defaults so the service runs out of the box
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fenceline.toml".to_string());
    let config = match load_config(&config_path) {
        Ok(config) => {
            info!(path = %config_path, "Loaded configuration");
            config
        }
        Err(e) => {
            info!(path = %config_path, error = %e, "No config file, using defaults");
            FencelineConfig::default()
        }
    };

    // Shared stores and engine
    let history = Arc::new(HistoryStore::new());
    let catalog = Arc::new(FenceCatalog::new());
    let sink = Arc::new(NotificationSink::new());
    let engine = Arc::new(EvaluationEngine::new(
        Arc::clone(&history),
        Arc::clone(&catalog),
        Arc::clone(&sink),
    ));

    // Seed bootstrap fences from config
    for fence in config.bootstrap_fences {
        info!(fence_id = %fence.id, name = %fence.name, "Seeding bootstrap fence");
        catalog.upsert(fence);
    }

    info!(
        latitude = config.map.default_center_latitude,
        longitude = config.map.default_center_longitude,
        zoom = config.map.default_zoom,
        "Map defaults configured"
    );

    // Assemble routers
    let app = create_router(AppState::new(Arc::clone(&engine)))
        .merge(create_position_router(Arc::new(PositionAppState {
            history: Arc::clone(&history),
        })))
        .merge(create_fence_router(Arc::new(FenceAppState {
            catalog: Arc::clone(&catalog),
        })))
        .merge(create_notification_router(Arc::new(NotificationAppState {
            sink: Arc::clone(&sink),
        })))
        .merge(create_ws_router(Arc::new(WsAppState {
            engine: Arc::clone(&engine),
        })))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "Listening");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
