/**
 * Admin Blog Routes
 * Post management; validation and slug failures bounce back to the form with
 * an error flag instead of failing hard
 */
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde_json::json;

use crate::db::{models::BlogPostForm, store};
use crate::error::AppError;
use crate::routes::{page, FlashQuery};
use crate::AppState;

/// GET /admin/blog - every post, any status.
pub async fn list(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<Html<String>, AppError> {
    let posts = store::all_posts(&state.pool).await?;
    Ok(page(
        &state,
        "admin/blog",
        Some("admin/layout-sidebar"),
        json!({
            "title": "Blog Management",
            "posts": posts,
            "success": flash.success,
            "error": flash.error,
            "active": "blog",
        }),
    ))
}

/// GET /admin/blog/new
pub async fn new_form(State(state): State<AppState>, Query(flash): Query<FlashQuery>) -> Html<String> {
    page(
        &state,
        "admin/blog-new",
        Some("admin/layout-sidebar"),
        json!({
            "title": "New Blog Post - Admin",
            "error": flash.error,
            "active": "blog",
        }),
    )
}

/// POST /admin/blog/create
pub async fn create(State(state): State<AppState>, Form(form): Form<BlogPostForm>) -> Redirect {
    match store::create_post(&state.pool, &form).await {
        Ok(post) => {
            tracing::info!("Blog post created: {}", post.slug);
            Redirect::to("/admin/blog?success=Post+created+successfully!")
        }
        Err(AppError::Validation(_)) => {
            Redirect::to("/admin/blog/new?error=Title,+Author,+and+Content+are+required")
        }
        Err(AppError::SlugConflict) => Redirect::to(
            "/admin/blog/new?error=Slug+already+exists.+Please+use+a+different+title.",
        ),
        Err(e) => {
            tracing::error!("Error creating blog post: {}", e);
            Redirect::to("/admin/blog/new?error=Error+creating+post")
        }
    }
}

/// GET /admin/blog/edit/{id}
pub async fn edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match store::post_by_id(&state.pool, id).await {
        Ok(Some(post)) => page(
            &state,
            "admin/blog-edit",
            Some("admin/layout-sidebar"),
            json!({
                "title": "Edit Blog Post - Admin",
                "post": post,
                "active": "blog",
            }),
        )
        .into_response(),
        Ok(None) => Redirect::to("/admin/blog?error=Post+not+found").into_response(),
        Err(e) => {
            tracing::error!("Error loading edit blog page: {}", e);
            Redirect::to("/admin/blog?error=Cannot+load+edit+form").into_response()
        }
    }
}

/// POST /admin/blog/update/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<BlogPostForm>,
) -> Redirect {
    match store::update_post(&state.pool, id, &form).await {
        Ok(()) => Redirect::to("/admin/blog?success=Post+updated+successfully!"),
        Err(AppError::SlugConflict) => Redirect::to(&format!(
            "/admin/blog/edit/{id}?error=Slug+already+exists.+Please+use+a+different+title."
        )),
        Err(AppError::Validation(_)) => Redirect::to(&format!(
            "/admin/blog/edit/{id}?error=Title+and+Content+are+required"
        )),
        Err(e) => {
            tracing::error!("Error updating blog post: {}", e);
            Redirect::to(&format!("/admin/blog/edit/{id}?error=Error+updating+post"))
        }
    }
}

/// POST /admin/blog/delete/{id} - idempotent delete.
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    match store::delete_post(&state.pool, id).await {
        Ok(()) => Redirect::to("/admin/blog?success=Post+deleted+successfully!"),
        Err(e) => {
            tracing::error!("Error deleting blog post: {}", e);
            Redirect::to("/admin/blog?error=Error+deleting+post")
        }
    }
}
