// Web surface - server-rendered page, graph drawing and form submission

pub mod html;

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::warn;

use crate::app_state::AppState;
use crate::error::{AppError, AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct FocusQuery {
    pub focus: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyForm {
    pub wallet_address: String,
}

pub async fn index_handler(
    State(state): State<AppState>,
    Query(query): Query<FocusQuery>,
) -> Html<String> {
    let view = state.page.view(query.focus.as_deref()).await;
    Html(html::render_page(&view))
}

pub async fn classify_form_handler(
    State(state): State<AppState>,
    Form(form): Form<ClassifyForm>,
) -> Redirect {
    // An invalid address leaves the page as it was; the redirect shows it.
    if let Err(e) = state.page.submit(form.wallet_address).await {
        warn!("Submission refused: {}", e);
    }
    Redirect::to("/")
}

pub async fn graph_svg_handler(
    State(state): State<AppState>,
    Query(query): Query<FocusQuery>,
) -> AppResult<Response> {
    let view = state.page.view(query.focus.as_deref()).await;
    let scene = view
        .scene
        .ok_or_else(|| AppError::NotFound("no graph is displayed".to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], scene.to_svg()).into_response())
}
