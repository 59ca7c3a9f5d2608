/**
 * Routes Module
 * Public page and admin route handlers
 */
pub mod admin_blog;
pub mod auth;
pub mod content;
pub mod dashboard;
pub mod gallery;
pub mod public;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::AppState;

/// Success/error flags carried on redirects and rendered as banners by the
/// presentation layer.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Hand a view name and its data mapping to the rendering collaborator.
pub fn page(state: &AppState, view: &str, layout: Option<&str>, data: Value) -> Html<String> {
    Html(state.renderer.render(view, &data, layout))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("Page not found".to_string())).into_response()
}
