// Integration tests for position query endpoints (current + history).

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use fenceline::api::{create_position_router, PositionAppState};
use fenceline::history::HistoryStore;
use fenceline::report::PositionReport;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Router, Arc<HistoryStore>) {
    let history = Arc::new(HistoryStore::new());
    let app = create_position_router(Arc::new(PositionAppState {
        history: Arc::clone(&history),
    }));
    (app, history)
}

fn report_at(user_id: &str, secs: u32, latitude: f64) -> PositionReport {
    PositionReport {
        id: Some(format!("r-{}", secs)),
        user_id: user_id.to_string(),
        latitude,
        longitude: 0.0,
        accuracy: 5.0,
        timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, secs).unwrap(),
        battery_level: None,
        address: None,
    }
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_current_position_for_entity() {
    let (app, history) = test_app();
    history.append(report_at("child-1", 0, 1.0));
    history.append(report_at("child-1", 10, 2.0));

    let (status, report) = get_json(&app, "/api/positions/current?entity=child-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["latitude"], 2.0);
    assert_eq!(report["userId"], "child-1");
}

#[tokio::test]
async fn test_current_position_absent_entity_returns_404() {
    let (app, _history) = test_app();

    let (status, body) = get_json(&app, "/api/positions/current?entity=nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nobody"));
}

#[tokio::test]
async fn test_current_positions_for_all_entities() {
    let (app, history) = test_app();
    history.append(report_at("child-1", 0, 1.0));
    history.append(report_at("child-2", 10, 2.0));
    history.append(report_at("child-2", 20, 3.0));

    let (status, list) = get_json(&app, "/api/positions/current").await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap().clone();
    assert_eq!(list.len(), 2);
    // One latest report per entity, sorted by entity id
    assert_eq!(list[0]["userId"], "child-1");
    assert_eq!(list[0]["latitude"], 1.0);
    assert_eq!(list[1]["userId"], "child-2");
    assert_eq!(list[1]["latitude"], 3.0);
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let (app, history) = test_app();
    history.append(report_at("child-1", 10, 1.0));
    history.append(report_at("child-1", 30, 3.0));
    history.append(report_at("child-1", 20, 2.0));

    let (status, list) = get_json(&app, "/api/positions/history?entity=child-1").await;
    assert_eq!(status, StatusCode::OK);
    let lats: Vec<f64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["latitude"].as_f64().unwrap())
        .collect();
    assert_eq!(lats, vec![3.0, 2.0, 1.0]);
}

#[tokio::test]
async fn test_history_respects_limit() {
    let (app, history) = test_app();
    for secs in 0..10 {
        history.append(report_at("child-1", secs, f64::from(secs)));
    }

    let (status, list) = get_json(&app, "/api/positions/history?entity=child-1&limit=3").await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap().clone();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["latitude"], 9.0); // newest kept
}

#[tokio::test]
async fn test_history_requires_entity() {
    let (app, _history) = test_app();

    let (status, body) = get_json(&app, "/api/positions/history").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("entity"));
}

#[tokio::test]
async fn test_history_for_unknown_entity_is_empty() {
    let (app, _history) = test_app();

    let (status, list) = get_json(&app, "/api/positions/history?entity=nobody").await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}
