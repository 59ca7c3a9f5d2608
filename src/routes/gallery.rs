/**
 * Admin Image Routes
 * Gallery and section-image management, including multipart uploads
 */
use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    response::{Html, Redirect},
};
use serde_json::json;

use crate::db::store;
use crate::error::AppError;
use crate::routes::{page, FlashQuery};
use crate::AppState;

/// Parsed multipart upload form: at most one file plus plain text fields.
struct UploadForm {
    file: Option<(String, Bytes)>,
    fields: HashMap<String, String>,
}

async fn read_multipart(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm {
        file: None,
        fields: HashMap::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart data: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "image" {
            let filename = field.file_name().unwrap_or("unknown").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file data: {e}")))?;
            form.file = Some((filename, bytes));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid form field: {e}")))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// GET /admin/gallery
pub async fn admin_page(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<Html<String>, AppError> {
    let images = store::gallery_images(&state.pool, None).await?;
    Ok(page(
        &state,
        "admin/gallery-sidebar",
        Some("admin/layout-sidebar"),
        json!({
            "title": "Gallery Management",
            "images": images,
            "success": flash.success,
            "error": flash.error,
            "active": "gallery",
        }),
    ))
}

async fn save_gallery_upload(state: &AppState, multipart: &mut Multipart) -> Result<(), AppError> {
    let form = read_multipart(multipart).await?;
    // An upload without a file is ignored, matching the form's optional field.
    if let Some((original_name, bytes)) = form.file {
        let stored = state.uploads.store(&original_name, &bytes).await?;
        let caption = form.fields.get("caption").map(String::as_str).unwrap_or("");
        store::create_gallery_image(&state.pool, &stored, caption).await?;
    }
    Ok(())
}

/// POST /admin/gallery/upload
pub async fn upload_gallery_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Redirect {
    match save_gallery_upload(&state, &mut multipart).await {
        Ok(()) => Redirect::to("/admin/gallery?success=1"),
        Err(e) => {
            tracing::error!("Gallery upload error: {}", e);
            Redirect::to("/admin/gallery?error=Upload+failed")
        }
    }
}

/// POST /admin/gallery/delete/{id} - idempotent delete.
pub async fn delete_gallery_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Redirect {
    match store::delete_gallery_image(&state.pool, id).await {
        Ok(()) => Redirect::to("/admin/gallery?success=1"),
        Err(e) => {
            tracing::error!("Gallery delete error: {}", e);
            Redirect::to("/admin/gallery?error=Delete+failed")
        }
    }
}

/// GET /admin/section-images
pub async fn section_images_page(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Html<String> {
    let images_by_section = store::section_images_by_section(&state.pool).await;
    page(
        &state,
        "admin/section-images-sidebar",
        Some("admin/layout-sidebar"),
        json!({
            "title": "Section Images Management",
            "imagesBySection": images_by_section,
            "success": flash.success,
            "error": flash.error,
            "active": "section-images",
        }),
    )
}

async fn save_section_upload(state: &AppState, multipart: &mut Multipart) -> Result<(), AppError> {
    let form = read_multipart(multipart).await?;
    let section = form.fields.get("section").map(String::as_str).unwrap_or("");
    // Both a file and a target section are needed; anything less is a no-op.
    if let Some((original_name, bytes)) = form.file {
        if !section.is_empty() {
            let stored = state.uploads.store(&original_name, &bytes).await?;
            let caption = form.fields.get("caption").map(String::as_str).unwrap_or("");
            store::create_section_image(&state.pool, section, &stored, caption).await?;
        }
    }
    Ok(())
}

/// POST /admin/section-images/upload
pub async fn upload_section_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Redirect {
    match save_section_upload(&state, &mut multipart).await {
        Ok(()) => Redirect::to("/admin/section-images?success=1"),
        Err(e) => {
            tracing::error!("Section image upload error: {}", e);
            Redirect::to("/admin/section-images?error=1")
        }
    }
}
