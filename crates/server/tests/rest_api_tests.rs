//! Integration tests for REST API endpoints
//!
//! Requests are driven through the router with `oneshot`; the engine is the
//! in-memory mock and no drain worker runs, so saved batches stay queued.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use searchgate_core::{EngineConfig, Error};
use searchgate_engine::{
    ClientFactory, EngineClient, EngineClientAccessor, EngineError, MockEngineClient,
};
use searchgate_server::{build_router, ApiError, AppState};
use searchgate_write_queue::{create_write_queue, WriteQueue, WriteQueueReceiver};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    queue: WriteQueue,
    mock: Arc<MockEngineClient>,
    _receiver: WriteQueueReceiver,
}

fn test_app() -> TestApp {
    let mock = Arc::new(MockEngineClient::new());
    let accessor = Arc::new(EngineClientAccessor::with_client(mock.clone()));
    let (queue, receiver) = create_write_queue(8).expect("queue");
    let router = build_router(AppState::new(queue.clone(), accessor));
    TestApp {
        router,
        queue,
        mock,
        _receiver: receiver,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = test_app();
    let (status, body) = send(&app.router, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Server is running!!!"));
    let random_num = body["random_num"].as_u64().expect("random_num is a number");
    assert!(random_num < 1000);
}

#[tokio::test]
async fn test_save_acknowledges_and_queues_batch() {
    let app = test_app();
    let payload = r#"[{"index":"items","id":"1","doc":{"name":"apple"}},
                      {"index":"items","id":"2","doc":{"name":"pear"}}]"#;

    let (status, body) = send(&app.router, post_json("/save", payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"res": "OK", "status": true}));
    assert_eq!(app.queue.len(), 1);
    assert!(app.mock.writes().is_empty());
}

#[tokio::test]
async fn test_save_accepts_any_content_type() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/save")
        .header("content-type", "text/plain")
        .body(Body::from(r#"[{"index":"items","id":"1","doc":{}}]"#))
        .expect("request");

    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.queue.len(), 1);
}

#[tokio::test]
async fn test_save_non_array_body_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        post_json("/save", r#"{"index":"items","id":"1","doc":{}}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], json!(true));
    assert!(body["msg"]
        .as_str()
        .expect("msg")
        .starts_with("json parse err"));
    assert!(app.queue.is_empty());
}

#[tokio::test]
async fn test_save_empty_index_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        post_json("/save", r#"[{"index":"","id":"9","doc":{"a":1}}]"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].as_str().expect("msg").contains('9'));
    assert!(app.queue.is_empty());
}

#[tokio::test]
async fn test_save_empty_batch_is_acknowledged_without_queueing() {
    let app = test_app();
    let (status, body) = send(&app.router, post_json("/save", "[]")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"res": "OK", "status": true}));
    assert!(app.queue.is_empty());
}

#[tokio::test]
async fn test_save_after_worker_stopped_is_unavailable() {
    let mock = Arc::new(MockEngineClient::new());
    let accessor = Arc::new(EngineClientAccessor::with_client(mock));
    let (queue, receiver) = create_write_queue(4).expect("queue");
    drop(receiver);
    let router = build_router(AppState::new(queue, accessor));

    let (status, body) = send(
        &router,
        post_json("/save", r#"[{"index":"items","id":"1","doc":{}}]"#),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], json!(true));
}

#[tokio::test]
async fn test_search_flat_body_returns_documents() {
    let app = test_app();
    app.mock
        .index_document("items", "1", br#"{"name":"apple"}"#.to_vec())
        .await
        .expect("seed");

    let (status, body) = send(
        &app.router,
        post_json(
            "/search",
            r#"{"index":"items","field":"name","value":"aple"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"res": [{"name": "apple"}], "status": true}));
}

#[tokio::test]
async fn test_search_dsl_body_returns_documents() {
    let app = test_app();
    app.mock.create_collection("items");

    let (status, body) = send(
        &app.router,
        post_json("/search", r#"{"index":"items","query":{"match_all":{}}}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"res": [], "status": true}));
}

#[tokio::test]
async fn test_search_missing_index_surfaces_engine_message() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        post_json("/search", r#"{"index":"ghost","query":{"match_all":{}}}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], json!(true));
    assert!(body["msg"]
        .as_str()
        .expect("msg")
        .contains("no such index [ghost]"));
}

#[tokio::test]
async fn test_search_malformed_body_is_rejected() {
    let app = test_app();
    let (status, body) = send(&app.router, post_json("/search", "not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"]
        .as_str()
        .expect("msg")
        .starts_with("json parse err"));
}

#[tokio::test]
async fn test_do_conn_returns_engine_banner() {
    let app = test_app();
    let (status, body) = send(&app.router, get("/do-conn")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tagline"], json!("You Know, for Search"));
}

#[tokio::test]
async fn test_do_conn_unreachable_engine() {
    let app = test_app();
    app.mock.set_unreachable(true);

    let (status, body) = send(&app.router, get("/do-conn")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].as_str().expect("msg").contains("unreachable"));
}

#[tokio::test]
async fn test_do_conn_client_construction_failure() {
    let factory: ClientFactory = Arc::new(|_: &EngineConfig| {
        Err::<Arc<dyn EngineClient>, _>(EngineError::ClientInit("bad address".to_string()))
    });
    let accessor = Arc::new(EngineClientAccessor::with_factory(
        EngineConfig::default(),
        factory,
    ));
    let (queue, _receiver) = create_write_queue(4).expect("queue");
    let router = build_router(AppState::new(queue, accessor));

    let (status, body) = send(&router, get("/do-conn")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].as_str().expect("msg").contains("bad address"));
}

#[test]
fn test_core_errors_map_to_api_errors() {
    assert!(matches!(
        ApiError::from(Error::invalid_input("x")),
        ApiError::InvalidRequest(_)
    ));
    assert!(matches!(
        ApiError::from(Error::engine("x")),
        ApiError::Engine(_)
    ));
    assert!(matches!(
        ApiError::from(Error::queue("x")),
        ApiError::ServiceUnavailable(_)
    ));
    assert!(matches!(
        ApiError::from(Error::config("x")),
        ApiError::Internal(_)
    ));
}
