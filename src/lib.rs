//! Clinic website backend - library for app logic and testing

pub mod analytics;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod render;
pub mod routes;
pub mod slug;
pub mod uploads;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::auth::Sessions;
use crate::config::Config;
use crate::render::{HtmlShell, Renderer};
use crate::uploads::UploadStore;

/// Shared per-request state: pool, session store and the collaborator seams.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sessions: Sessions,
    pub renderer: Arc<dyn Renderer>,
    pub uploads: Arc<UploadStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let uploads = Arc::new(UploadStore::new(config.upload_dir.clone()));
        Self {
            pool,
            sessions: Sessions::default(),
            renderer: Arc::new(HtmlShell),
            uploads,
            config: Arc::new(config),
        }
    }
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let admin = Router::new()
        .route("/admin/dashboard", get(routes::dashboard::show))
        .route(
            "/admin/content",
            get(routes::content::edit_form).post(routes::content::save),
        )
        .route(
            "/admin/section-images",
            get(routes::gallery::section_images_page),
        )
        .route(
            "/admin/section-images/upload",
            post(routes::gallery::upload_section_image),
        )
        .route("/admin/gallery", get(routes::gallery::admin_page))
        .route(
            "/admin/gallery/upload",
            post(routes::gallery::upload_gallery_image),
        )
        .route(
            "/admin/gallery/delete/{id}",
            post(routes::gallery::delete_gallery_image),
        )
        .route("/admin/blog", get(routes::admin_blog::list))
        .route("/admin/blog/new", get(routes::admin_blog::new_form))
        .route("/admin/blog/create", post(routes::admin_blog::create))
        .route("/admin/blog/edit/{id}", get(routes::admin_blog::edit_form))
        .route("/admin/blog/update/{id}", post(routes::admin_blog::update))
        .route("/admin/blog/delete/{id}", post(routes::admin_blog::delete))
        // The guard runs before any admin handler; logged-out requests are
        // redirected without executing handler side effects.
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::require_admin,
        ));

    Router::new()
        .route("/", get(routes::public::home))
        .route("/gallery", get(routes::public::gallery))
        .route("/blog", get(routes::public::blog_index))
        .route("/blog/{slug}", get(routes::public::blog_post))
        .route("/contact", post(routes::public::contact))
        .route(
            "/admin/login",
            get(routes::auth::login_form).post(routes::auth::login),
        )
        .route("/admin/logout", post(routes::auth::logout))
        .merge(admin)
        .fallback(routes::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            analytics::record_visit,
        ))
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // Upload files are capped at 5 MiB; the extra headroom covers
        // multipart framing and ordinary form bodies.
        .layer(RequestBodyLimitLayer::new(6 * 1024 * 1024))
        .with_state(state)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init();

    let config = Config::load();

    let pool = db::connect(&config)
        .await
        .expect("Failed to open database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    if let Err(e) = db::seed_defaults(&pool).await {
        tracing::error!("Failed to seed default data: {}", e);
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT configuration");

    let app = create_app(AppState::new(pool, config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
