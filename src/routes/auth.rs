/**
 * Admin Auth Routes
 * Password login, session cookie issuance, and the admin route guard
 */
use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;

use crate::auth::SESSION_COOKIE;
use crate::routes::{page, FlashQuery};
use crate::AppState;

async fn has_valid_session(state: &AppState, jar: &CookieJar) -> bool {
    match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.sessions.validate(cookie.value()).await,
        None => false,
    }
}

/// Route-layer guard for the admin area. Requests without a valid session are
/// redirected to the login page; the wrapped handler never runs.
pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if has_valid_session(&state, &jar).await {
        return next.run(request).await;
    }
    Redirect::to("/admin/login").into_response()
}

/// GET /admin/login - already authenticated sessions skip straight to the
/// dashboard.
pub async fn login_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(flash): Query<FlashQuery>,
) -> Response {
    if has_valid_session(&state, &jar).await {
        return Redirect::to("/admin/dashboard").into_response();
    }
    page(&state, "admin/login", None, json!({ "error": flash.error })).into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: Option<String>,
}

/// POST /admin/login - check the shared password, issue a session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if form.password.as_deref() == Some(state.config.admin_password.as_str()) {
        let token = state.sessions.create(state.config.session_ttl_hours).await;
        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        tracing::info!("Admin login succeeded");
        return (jar.add(cookie), Redirect::to("/admin/dashboard")).into_response();
    }

    tracing::warn!("Admin login failed: invalid password");
    page(
        &state,
        "admin/login",
        None,
        json!({ "error": "Invalid password" }),
    )
    .into_response()
}

/// POST /admin/logout - revoke the presented session only.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.revoke(cookie.value()).await;
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, Redirect::to("/admin/login")).into_response()
}
