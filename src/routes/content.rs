/**
 * Admin Content Routes
 * Read and upsert the key/value content store
 */
use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form,
};
use serde_json::json;

use crate::db::store;
use crate::routes::{page, FlashQuery};
use crate::AppState;

/// GET /admin/content - the editable content map.
pub async fn edit_form(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Html<String> {
    let content = store::all_content(&state.pool).await;
    page(
        &state,
        "admin/content-sidebar",
        Some("admin/layout-sidebar"),
        json!({
            "title": "Edit Content",
            "content": content,
            "success": flash.success,
            "error": flash.error,
            "active": "content",
        }),
    )
}

/// POST /admin/content - upsert every posted key/value pair.
pub async fn save(
    State(state): State<AppState>,
    Form(entries): Form<HashMap<String, String>>,
) -> Redirect {
    match store::save_content(&state.pool, &entries).await {
        Ok(()) => Redirect::to("/admin/content?success=1"),
        Err(e) => {
            tracing::error!("Save content error: {}", e);
            Redirect::to("/admin/content?error=1")
        }
    }
}
