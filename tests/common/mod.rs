#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::ServiceExt;

use ethxpose::{api::create_router, app_state::AppState, config::Config, page::PageStatus};

pub const QUERIED: &str = "0x0a888f0f0b772e17a2adfd62d3f15cec72c8d42f";

pub fn sample_result() -> Value {
    serde_json::from_str(include_str!("../fixtures/sample_result.json")).unwrap()
}

/// What the fake inference service answers with.
#[derive(Clone)]
pub enum Upstream {
    Answer(Value),
    Status(StatusCode),
    NotJson,
}

#[derive(Clone)]
pub struct FakeUpstream {
    pub url: String,
    pub received: Arc<Mutex<Vec<Value>>>,
}

async fn fake_classify(
    State((behaviour, received)): State<(Upstream, Arc<Mutex<Vec<Value>>>)>,
    Json(body): Json<Value>,
) -> Response {
    received.lock().await.push(body);
    match behaviour {
        Upstream::Answer(value) => Json(value).into_response(),
        Upstream::Status(status) => (status, "upstream exploded").into_response(),
        Upstream::NotJson => "<html>sleeping</html>".into_response(),
    }
}

pub async fn spawn_upstream(behaviour: Upstream) -> FakeUpstream {
    let received = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/api/py/classify", post(fake_classify))
        .with_state((behaviour, received.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    FakeUpstream {
        url: format!("http://{}/api/py/classify", addr),
        received,
    }
}

/// A URL nothing listens on.
pub async fn dead_upstream_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/py/classify", addr)
}

pub fn app(upstream_url: &str) -> (Router, AppState) {
    let mut config = Config::default();
    config.classifier.url = upstream_url.to_string();
    config.layout.tick_interval_ms = 1;
    let state = AppState::new(config).unwrap();
    (create_router(state.clone()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn form_request(address: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/classify")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(format!("wallet_address={}", address)))
        .unwrap()
}

/// Poll until the page has left the loading state.
pub async fn wait_for_outcome(state: &AppState) {
    for _ in 0..500 {
        let view = state.page.view(None).await;
        if !matches!(view.status, PageStatus::Loading) {
            state.page.settle().await;
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("classification never completed");
}
