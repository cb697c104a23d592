//! Integration tests for the HTTP render feed

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use specter::core::{create_router, EngineConfig, Session};
use specter::types::UserSettings;
use tower::ServiceExt;

fn create_test_router() -> axum::Router {
    let config = EngineConfig {
        seed: Some(42),
        ..EngineConfig::default()
    };
    create_router(Session::new(&config, UserSettings::default()).unwrap())
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["instruments_running"], 0);
}

#[tokio::test]
async fn test_list_instruments() {
    let app = create_test_router();

    let response = app
        .oneshot(Request::builder().uri("/instruments").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["instruments"].as_array().unwrap().len(), 3);
    assert_eq!(json["premium_locked"], true);
    assert!(json["tab"].is_null());
}

#[tokio::test]
async fn test_unknown_instrument_is_404() {
    let app = create_test_router();

    let response = app
        .oneshot(Request::builder().uri("/instruments/ouija").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_then_read_frame() {
    let app = create_test_router();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/instruments/emf/start")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["instrument"], "emf");
    assert_eq!(json["running"], true);

    let response = app
        .oneshot(Request::builder().uri("/instruments/emf").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let value = json["value"].as_f64().unwrap();
    assert!((0.0..=300.0).contains(&value));
}

#[tokio::test]
async fn test_stop_radar_returns_empty_frame() {
    let app = create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/instruments/radar/stop")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["instrument"], "radar");
    assert_eq!(json["dots"].as_array().unwrap().len(), 0);
    assert_eq!(json["active"], false);
}

#[tokio::test]
async fn test_set_sensitivity() {
    let app = create_test_router();

    let response = app
        .oneshot(json_request("PUT", "/settings/sensitivity", r#"{"value": 0.8}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["radar_sensitivity"], 0.8);
}

#[tokio::test]
async fn test_bad_sensitivity_is_400() {
    let app = create_test_router();

    let response = app
        .oneshot(json_request("PUT", "/settings/sensitivity", r#"{"value": 1.7}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_switch_tab() {
    let app = create_test_router();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/tab", r#"{"tab": "spirit-box"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["tab"], "spirit-box");
    assert_eq!(json["audio"], "spirit");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["instruments_running"], 1);
}

#[tokio::test]
async fn test_unknown_tab_is_400() {
    let app = create_test_router();

    let response = app
        .oneshot(json_request("POST", "/tab", r#"{"tab": "kitchen"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_feed_is_404() {
    let app = create_test_router();

    let response = app
        .oneshot(Request::builder().uri("/ws/ouija").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feed_without_upgrade_is_426() {
    let app = create_test_router();

    let response = app
        .oneshot(Request::builder().uri("/ws/radar").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UPGRADE_REQUIRED);
}
