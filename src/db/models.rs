//! Database models - structs representing database tables (used by sqlx/serde).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Editable page copy: one row per key.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContentEntry {
    pub key: String,
    pub value: String,
}

/// Gallery image reference; the file itself lives with the upload store.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: i64,
    pub filename: String,
    pub caption: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Image attached to a named page section (hero, about, ...).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SectionImage {
    pub id: i64,
    pub section: String,
    pub filename: String,
    pub caption: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Blog post model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub author: String,
    pub status: String,
    pub featured_image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields accepted when creating or updating a blog post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogPostForm {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub status: Option<String>,
}

/// Append-only page visit record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SiteVisit {
    pub id: i64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub page_visited: Option<String>,
    pub referrer: Option<String>,
    pub visit_date: NaiveDateTime,
}

/// Append-only contact form submission.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub submission_date: NaiveDateTime,
}

/// Counters and recent activity shown on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub posts: i64,
    pub images: i64,
    pub total_visits: i64,
    pub today_visits: i64,
    pub contacts: i64,
    pub recent_images: Vec<GalleryImage>,
    pub recent_contacts: Vec<ContactSubmission>,
}
