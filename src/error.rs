use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Application error taxonomy. Reads that are allowed to degrade to an empty
/// result never construct one of these; everything else funnels through here.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("slug already exists")]
    SlugConflict,

    #[error("storage fault: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("upload failed: {0}")]
    Upload(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Html("Page not found".to_string())).into_response()
            }
            // Validation and slug conflicts are normally turned into a
            // redirect-with-error-flag by the route that owns the form; this
            // fallback only fires when a handler bubbles them up directly.
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::SlugConflict => {
                (StatusCode::BAD_REQUEST, "Slug already exists".to_string()).into_response()
            }
            AppError::Storage(_) | AppError::Upload(_) => {
                // Logged server-side only; no detail leaks to the client.
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("Internal server error".to_string()),
                )
                    .into_response()
            }
        }
    }
}
