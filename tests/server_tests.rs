//! # Server Tests
//!
//! Router-level tests: the streaming endpoint pipes relay output into the
//! response body, and upstream failures map to gateway errors.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use stream_relay::{create_router, AppState, Config};
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const SSE_BODY: &str = concat!(
    "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
    "data: [DONE]\n\n",
);

fn app_for(upstream: String) -> axum::Router {
    let mut config = Config::for_test();
    config.upstream_url = upstream;
    create_router(AppState::new(config).unwrap())
}

fn chat_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/chat/stream")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = app_for("http://localhost:8000".to_string());

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_chat_stream_pipes_text_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SSE_BODY, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(server.uri());
    let response = app
        .oneshot(chat_request(json!({
            "messages": [{"role": "user", "content": "Say hello"}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Hello");
}

#[tokio::test]
async fn test_request_model_and_prompt_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SSE_BODY, "text/event-stream"))
        .mount(&server)
        .await;

    let app = app_for(server.uri());
    let response = app
        .oneshot(chat_request(json!({
            "model": "gpt-4",
            "prompt": "Be terse.",
            "messages": [{"role": "user", "content": "hi"}]
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let outbound = &server.received_requests().await.unwrap()[0];
    let envelope: serde_json::Value = serde_json::from_slice(&outbound.body).unwrap();
    assert_eq!(envelope["model"], "gpt-4");
    assert_eq!(envelope["messages"][0]["role"], "system");
    assert_eq!(envelope["messages"][0]["content"], "Be terse.");
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = app_for(server.uri());
    let response = app
        .oneshot(chat_request(json!({
            "messages": [{"role": "user", "content": "hi"}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"]["type"], "upstream_status_error");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = app_for("http://localhost:8000".to_string());

    let request = Request::builder()
        .method("GET")
        .uri("/v1/nope")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
