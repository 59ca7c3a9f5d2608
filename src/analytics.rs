//! Visit-recording middleware.
//!
//! Every qualifying request appends one row to `site_visits` before the inner
//! service runs. Recording is best-effort: a storage fault is logged and the
//! request proceeds normally.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header::{REFERER, USER_AGENT},
    middleware::Next,
    response::Response,
};

use crate::{db::store, AppState};

/// Admin and asset paths are not counted as visits.
fn is_tracked(path: &str) -> bool {
    !(path.starts_with("/admin")
        || path.starts_with("/css")
        || path.starts_with("/js")
        || path.starts_with("/uploads"))
}

pub async fn record_visit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !is_tracked(&path) {
        return next.run(request).await;
    }

    let headers = request.headers();
    // Proxy header wins; fall back to the socket peer address when present.
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_default();
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let referrer = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    store::record_visit(&state.pool, &ip, &user_agent, &path, &referrer).await;

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_pages_are_tracked() {
        assert!(is_tracked("/"));
        assert!(is_tracked("/gallery"));
        assert!(is_tracked("/blog/eye-care"));
        assert!(is_tracked("/contact"));
    }

    #[test]
    fn test_admin_and_assets_are_not_tracked() {
        assert!(!is_tracked("/admin/dashboard"));
        assert!(!is_tracked("/admin/login"));
        assert!(!is_tracked("/css/site.css"));
        assert!(!is_tracked("/js/app.js"));
        assert!(!is_tracked("/uploads/photo.png"));
    }
}
