/**
 * Admin Dashboard Route
 */
use axum::{extract::State, response::Html};
use serde_json::json;

use crate::db::store;
use crate::error::AppError;
use crate::routes::page;
use crate::AppState;

/// GET /admin/dashboard - content counts, visit totals, recent activity.
pub async fn show(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let stats = store::dashboard_stats(&state.pool).await?;

    Ok(page(
        &state,
        "admin/dashboard-sidebar",
        Some("admin/layout-sidebar"),
        json!({
            "title": "Dashboard",
            "counts": {
                "posts": stats.posts,
                "images": stats.images,
                "visits": stats.total_visits,
                "todayVisits": stats.today_visits,
                "contacts": stats.contacts,
            },
            "recentImages": stats.recent_images,
            "recentContacts": stats.recent_contacts,
            "active": "dashboard",
        }),
    ))
}
