/**
 * Public Routes
 * Marketing pages rendered from database-stored content
 */
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use serde_json::json;

use crate::db::store;
use crate::error::AppError;
use crate::routes::page;
use crate::AppState;

/// GET / - home page: content, 6 latest gallery images, 3 latest posts,
/// section images.
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let content = store::all_content(&state.pool).await;
    let gallery_images = store::gallery_images(&state.pool, Some(6)).await?;
    let blog_posts = store::published_posts(&state.pool, Some(3)).await?;
    let images_by_section = store::section_images_by_section(&state.pool).await;

    Ok(page(
        &state,
        "index",
        Some("layout"),
        json!({
            "content": content,
            "galleryImages": gallery_images,
            "blogPosts": blog_posts,
            "imagesBySection": images_by_section,
            "active": "home",
        }),
    ))
}

/// GET /gallery - every gallery image, newest first.
pub async fn gallery(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let content = store::all_content(&state.pool).await;
    let images = store::gallery_images(&state.pool, None).await?;

    Ok(page(
        &state,
        "gallery",
        Some("layout"),
        json!({
            "content": content,
            "images": images,
            "active": "gallery",
        }),
    ))
}

/// GET /blog - all published posts.
pub async fn blog_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let content = store::all_content(&state.pool).await;
    let posts = store::published_posts(&state.pool, None).await?;
    let images_by_section = store::section_images_by_section(&state.pool).await;

    Ok(page(
        &state,
        "blog",
        Some("layout"),
        json!({
            "content": content,
            "posts": posts,
            "imagesBySection": images_by_section,
            "active": "blog",
        }),
    ))
}

/// GET /blog/{slug} - single published post; drafts are invisible here.
pub async fn blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let post = store::published_post_by_slug(&state.pool, &slug)
        .await?
        .ok_or(AppError::NotFound)?;
    let content = store::all_content(&state.pool).await;

    Ok(page(
        &state,
        "blog-post",
        Some("layout"),
        json!({
            "content": content,
            "post": post,
            "active": "blog",
        }),
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// POST /contact - record a contact submission and bounce back to the
/// contact section with a success or error flag.
pub async fn contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Redirect {
    let result = store::record_contact(
        &state.pool,
        form.name.as_deref().unwrap_or(""),
        form.email.as_deref().unwrap_or(""),
        form.phone.as_deref().unwrap_or(""),
        form.message.as_deref().unwrap_or(""),
    )
    .await;

    match result {
        Ok(()) => Redirect::to("/#contact?success=1"),
        Err(e) => {
            tracing::error!("Contact form error: {}", e);
            Redirect::to("/#contact?error=1")
        }
    }
}
