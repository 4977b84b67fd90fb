//! Health endpoint tests.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;
use edge_gateway::routing::RewriteMode;
use edge_gateway::HttpServer;

#[tokio::test]
async fn health_is_up_while_every_backend_is_down() {
    let closed = closed_port().await;
    let gateway = spawn_gateway(gateway_config(vec![
        route("users", "/api/users", closed, RewriteMode::WildcardCapture),
        route("web", "/", closed, RewriteMode::PassThrough),
    ]))
    .await;

    let response = client().get(gateway.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "service": "API Gateway", "status": "UP" }));

    // The root route still catches everything else.
    let response = client().get(gateway.url("/healthz")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn health_path_and_service_name_are_configurable() {
    let mut config = gateway_config(vec![]);
    config.health.path = "/status".to_string();
    config.health.service_name = "Edge".to_string();
    let gateway = spawn_gateway(config).await;

    let response = client().get(gateway.url("/status")).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["service"], "Edge");

    // With no routes, anything else is unmatched.
    let response = client().get(gateway.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_answers_in_process_with_request_id() {
    let server = HttpServer::new(gateway_config(vec![])).unwrap();

    let response = server
        .router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn health_rejects_other_methods() {
    let server = HttpServer::new(gateway_config(vec![])).unwrap();

    let response = server
        .router()
        .oneshot(Request::post("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
