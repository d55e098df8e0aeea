// HTTP API - classification proxy, graph interaction endpoints and the router

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, instrument};

use crate::{
    app_state::AppState,
    error::AppResult,
    graph::{DragPhase, LayoutSnapshot, Viewport},
    web,
};

#[derive(Debug, Deserialize)]
pub struct DragRequest {
    pub node_id: String,
    pub phase: DragPhase,
    pub x: f64,
    pub y: f64,
}

/// Relay the body to the inference service and its answer back, untouched.
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn classify_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let wallet_address = body
        .get("wallet_address")
        .and_then(Value::as_str)
        .unwrap_or("<missing>");
    info!("Proxying classification for {}", wallet_address);
    let answer = state.classifier.forward(&body).await?;
    Ok(Json(answer))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "EthXpose",
        "timestamp": chrono::Utc::now().timestamp_millis()
    }))
}

pub async fn layout_handler(State(state): State<AppState>) -> AppResult<Json<LayoutSnapshot>> {
    Ok(Json(state.page.layout_snapshot().await?))
}

pub async fn drag_handler(
    State(state): State<AppState>,
    Json(req): Json<DragRequest>,
) -> AppResult<Json<Value>> {
    state.page.drag(&req.node_id, req.phase, req.x, req.y).await?;
    Ok(Json(json!({ "node_id": req.node_id, "phase": req.phase })))
}

pub async fn viewport_handler(
    State(state): State<AppState>,
    Json(viewport): Json<Viewport>,
) -> AppResult<Json<Viewport>> {
    state.page.resize(viewport).await?;
    Ok(Json(viewport))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Page
        .route("/", get(web::index_handler))
        .route("/classify", post(web::classify_form_handler))
        .route("/graph.svg", get(web::graph_svg_handler))

        // Proxy
        .route("/api/classify", post(classify_handler))

        // Graph interaction
        .route("/api/graph/layout", get(layout_handler))
        .route("/api/graph/drag", post(drag_handler))
        .route("/api/graph/viewport", post(viewport_handler))

        .route("/api/health", get(health_check))
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
