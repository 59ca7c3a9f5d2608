pub mod models;
pub mod store;

use std::time::Duration;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::config::Config;

/// Open (creating if missing) the SQLite database named by the config.
pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = config.database_path.parent() {
        // Matches the original deployment layout: ./data is created on demand.
        std::fs::create_dir_all(parent).ok();
    }

    tracing::info!("Opening database at {}", config.database_path.display());

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::info!("Database connection pool initialized successfully");

    Ok(pool)
}

/// Create the schema. Every statement is idempotent, so this runs on every
/// startup.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content (
            key TEXT PRIMARY KEY,
            value TEXT
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gallery_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            filename TEXT NOT NULL,
            caption TEXT,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS section_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            section TEXT NOT NULL,
            filename TEXT NOT NULL,
            caption TEXT,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            content TEXT NOT NULL,
            excerpt TEXT,
            author TEXT NOT NULL DEFAULT 'Admin',
            status TEXT NOT NULL DEFAULT 'published',
            featured_image TEXT,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS site_visits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ip_address TEXT,
            user_agent TEXT,
            page_visited TEXT,
            referrer TEXT,
            visit_date DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contact_submissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            email TEXT,
            phone TEXT,
            message TEXT,
            submission_date DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");

    Ok(())
}

/// Baseline page copy inserted on first startup.
const DEFAULT_CONTENT: &[(&str, &str)] = &[
    ("hero_kicker", "Level 3 • Kapsoya, Ainabkoi · Uasin Gishu"),
    (
        "hero_title",
        "Healthcare that feels personal—delivered with precision.",
    ),
    (
        "hero_intro",
        "JediCare Medical centre is a trusted Level 3 clinic serving families and professionals in Kapsoya. We combine experienced clinicians with modern diagnostics and patient-first service. Our optician desk helps you see better—with frames you will love.",
    ),
    ("hero_badge1", "Open and fully operational"),
    ("hero_badge2", "Modern diagnostics & imaging"),
    ("hero_badge3", "Optician services & prescription glasses"),
    ("hero_badge4", "Powered by EasyClinic operations"),
    ("why_title", "Why patients choose Jedi"),
    ("why_card1_title", "Experienced Team"),
    (
        "why_card1_body",
        "Clinicians with broad hands-on experience, focused on practical, effective care.",
    ),
    ("why_card2_title", "Modern Equipment"),
    (
        "why_card2_body",
        "From labs to imaging, we invest in tools that improve accuracy and outcomes.",
    ),
    ("why_card3_title", "Clean & Safe"),
    (
        "why_card3_body",
        "Strict hygiene protocols for a calm, safe environment at every visit.",
    ),
    ("about_title", "About Jedi Medical"),
    (
        "about_body1",
        "JediCare Medical centre is a Level 3 clinic recognized for precise, patient-centered care. We serve the Kapsoya ward in Ainabkoi constituency, Uasin Gishu, with an experienced team and a calm, well-kept facility. Our approach blends practical medicine with modern diagnostics—so you feel informed and supported at every step.",
    ),
    (
        "about_body2",
        "With EasyClinic helping streamline operations, we stay focused on what matters most: your care, your comfort, and dependable outcomes.",
    ),
    ("contact_title", "Book an Appointment"),
    (
        "contact_intro",
        "Looking for a reliable private clinic near you in Uasin Gishu? JediCare Medical centre is open and ready to help. Reach out and our team will guide you to the right service, including our in-house optician desk for prescriptions and glasses.",
    ),
    (
        "contact_note",
        "Prefer a call? Add your phone number—we will get back promptly.",
    ),
];

/// Starter posts inserted only when the blog is empty.
const STARTER_POSTS: &[(&str, &str, &str, &str)] = &[
    (
        "Preventive healthcare",
        "preventive-healthcare",
        "5 Essential Preventive Health Checks",
        "Discover key health screenings for early detection and better health. Regular preventive care is the foundation of long-term wellness and can catch potential health issues before they become serious problems.",
    ),
    (
        "Eye care",
        "eye-care",
        "Protecting Your Vision",
        "Learn strategies to reduce digital eye strain and maintain healthy vision. In today's digital world, protecting your eyes is more important than ever. Our comprehensive eye care services help you maintain optimal vision health.",
    ),
    (
        "Child health",
        "child-health",
        "Children's Health Foundation",
        "Essential healthcare tips for children's development and wellbeing. From vaccinations to growth monitoring, we provide comprehensive pediatric care to ensure your children grow up healthy and strong.",
    ),
];

/// Seed baseline data so a fresh deployment has usable content.
///
/// Safe to run on every startup: content rows use INSERT OR IGNORE, and the
/// starter posts are only inserted while the blog table is completely empty.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for (key, value) in DEFAULT_CONTENT {
        sqlx::query("INSERT OR IGNORE INTO content (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
    }

    let (post_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM blog_posts")
        .fetch_one(pool)
        .await?;

    if post_count == 0 {
        for (title, slug, excerpt, content) in STARTER_POSTS {
            sqlx::query(
                r#"
                INSERT INTO blog_posts (title, slug, excerpt, content, author, status)
                VALUES (?, ?, ?, ?, 'Admin', 'published')
                "#,
            )
            .bind(title)
            .bind(slug)
            .bind(excerpt)
            .bind(content)
            .execute(pool)
            .await?;
        }
        tracing::info!("Seeded {} starter blog posts", STARTER_POSTS.len());
    }

    Ok(())
}

/// Fresh in-memory database with schema applied, for tests.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new().in_memory(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = test_pool().await;
        run_migrations(&pool).await.expect("second run");
    }

    #[tokio::test]
    async fn test_seed_defaults_is_idempotent() {
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();
        seed_defaults(&pool).await.unwrap();

        let (content_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM content")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(content_rows, DEFAULT_CONTENT.len() as i64);

        let (posts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM blog_posts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(posts, 3);
    }

    #[tokio::test]
    async fn test_seed_does_not_restore_deleted_posts() {
        // Emptiness check only fires on a truly empty table; an admin who
        // deletes two of the three starters keeps the remaining one.
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();

        sqlx::query("DELETE FROM blog_posts WHERE slug != 'eye-care'")
            .execute(&pool)
            .await
            .unwrap();
        seed_defaults(&pool).await.unwrap();

        let (posts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM blog_posts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(posts, 1);
    }
}
