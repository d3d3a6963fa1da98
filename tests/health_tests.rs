//! Operational endpoints

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::ConnectInfo,
    http::{HeaderName, Request, StatusCode},
};
use tower::ServiceExt;

use common::{body_json, body_string, empty, offline_state};
use weight_tracker::app::{build_app, configure_cors};
use weight_tracker::middleware::{RateLimitState, RateLimiter};
use weight_tracker::routes::api_routes;

#[tokio::test]
async fn test_unreachable_database_reports_503_without_details() {
    let app = api_routes(offline_state());

    let request = Request::builder()
        .uri("/health")
        .header("x-wt-api-key", "ops-key")
        .body(empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_string(response).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["database"], "disconnected");
    assert!(!body.contains("127.0.0.1"));
    assert!(!body.to_lowercase().contains("error"));
}

#[tokio::test]
async fn test_ip_falls_back_to_socket_address() {
    let app = api_routes(offline_state());

    let mut request = Request::builder().uri("/ip").body(empty()).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 10], 54321))));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ip"], "192.0.2.10");
}

#[tokio::test]
async fn test_custom_client_header_keys_the_whole_stack() {
    let app = build_app(
        offline_state(),
        RateLimitState {
            limiter: RateLimiter::new(Duration::from_secs(60), 1),
            client_header: HeaderName::from_static("x-forwarded-for"),
        },
        configure_cors(None),
    );

    let request = || {
        Request::builder()
            .uri("/ip")
            .header("x-forwarded-for", "198.51.100.4")
            .body(empty())
            .unwrap()
    };

    let response = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
