//! Content/catalog access layer: the sole mediator between route handlers and
//! the database. Every read re-queries the store; nothing is cached across
//! requests.

use std::collections::{BTreeMap, HashMap};

use sqlx::SqlitePool;

use crate::db::models::{
    BlogPost, BlogPostForm, ContactSubmission, ContentEntry, DashboardStats, GalleryImage,
    SectionImage,
};
use crate::error::AppError;
use crate::slug;

// ============================================================================
// Content store
// ============================================================================

/// Every content row as a key → value map.
///
/// Degrades to an empty map on a storage fault so a transient database error
/// cannot take down public page delivery; the fault is logged server-side.
pub async fn all_content(pool: &SqlitePool) -> HashMap<String, String> {
    match sqlx::query_as::<_, ContentEntry>("SELECT key, value FROM content")
        .fetch_all(pool)
        .await
    {
        Ok(rows) => rows.into_iter().map(|r| (r.key, r.value)).collect(),
        Err(e) => {
            tracing::error!("Failed to load content: {}", e);
            HashMap::new()
        }
    }
}

/// Upsert each posted key/value pair. Atomic per key, not across the batch.
pub async fn save_content(
    pool: &SqlitePool,
    entries: &HashMap<String, String>,
) -> Result<(), AppError> {
    for (key, value) in entries {
        sqlx::query("INSERT OR REPLACE INTO content (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
    }
    Ok(())
}

// ============================================================================
// Section images
// ============================================================================

/// All section images grouped by section, newest first within each section.
/// Degrades to an empty map on a storage fault.
pub async fn section_images_by_section(pool: &SqlitePool) -> BTreeMap<String, Vec<SectionImage>> {
    let rows = match sqlx::query_as::<_, SectionImage>(
        "SELECT id, section, filename, caption, created_at \
         FROM section_images ORDER BY section, created_at DESC",
    )
    .fetch_all(pool)
    .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to load section images: {}", e);
            return BTreeMap::new();
        }
    };

    let mut by_section: BTreeMap<String, Vec<SectionImage>> = BTreeMap::new();
    for image in rows {
        by_section.entry(image.section.clone()).or_default().push(image);
    }
    by_section
}

pub async fn create_section_image(
    pool: &SqlitePool,
    section: &str,
    filename: &str,
    caption: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO section_images (section, filename, caption) VALUES (?, ?, ?)")
        .bind(section)
        .bind(filename)
        .bind(caption)
        .execute(pool)
        .await?;
    Ok(())
}

// ============================================================================
// Gallery
// ============================================================================

/// Gallery images newest first; `limit` bounds the result (home page uses 6).
pub async fn gallery_images(
    pool: &SqlitePool,
    limit: Option<i64>,
) -> Result<Vec<GalleryImage>, AppError> {
    let images = match limit {
        Some(n) => {
            sqlx::query_as::<_, GalleryImage>(
                "SELECT id, filename, caption, created_at FROM gallery_images \
                 ORDER BY created_at DESC, id ASC LIMIT ?",
            )
            .bind(n)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, GalleryImage>(
                "SELECT id, filename, caption, created_at FROM gallery_images \
                 ORDER BY created_at DESC, id ASC",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(images)
}

pub async fn create_gallery_image(
    pool: &SqlitePool,
    filename: &str,
    caption: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO gallery_images (filename, caption) VALUES (?, ?)")
        .bind(filename)
        .bind(caption)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete by id. Idempotent: deleting a missing id is not an error.
pub async fn delete_gallery_image(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM gallery_images WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ============================================================================
// Blog
// ============================================================================

const POST_COLUMNS: &str = "id, title, slug, content, excerpt, author, status, \
                            featured_image, created_at, updated_at";

/// Published posts newest first, id ascending as the stable tiebreak.
pub async fn published_posts(
    pool: &SqlitePool,
    limit: Option<i64>,
) -> Result<Vec<BlogPost>, AppError> {
    let sql = format!(
        "SELECT {POST_COLUMNS} FROM blog_posts WHERE status = 'published' \
         ORDER BY created_at DESC, id ASC"
    );
    let posts = match limit {
        Some(n) => {
            sqlx::query_as::<_, BlogPost>(&format!("{sql} LIMIT ?"))
                .bind(n)
                .fetch_all(pool)
                .await?
        }
        None => sqlx::query_as::<_, BlogPost>(&sql).fetch_all(pool).await?,
    };
    Ok(posts)
}

/// Every post regardless of status, for the admin listing.
pub async fn all_posts(pool: &SqlitePool) -> Result<Vec<BlogPost>, AppError> {
    let posts = sqlx::query_as::<_, BlogPost>(&format!(
        "SELECT {POST_COLUMNS} FROM blog_posts ORDER BY created_at DESC, id ASC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(posts)
}

/// Public lookup: the slug must match AND the post must be published. A draft
/// with a matching slug is treated as absent.
pub async fn published_post_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<BlogPost>, AppError> {
    let post = sqlx::query_as::<_, BlogPost>(&format!(
        "SELECT {POST_COLUMNS} FROM blog_posts WHERE slug = ? AND status = 'published'"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(post)
}

/// Admin lookup by id, any status.
pub async fn post_by_id(pool: &SqlitePool, id: i64) -> Result<Option<BlogPost>, AppError> {
    let post = sqlx::query_as::<_, BlogPost>(&format!(
        "SELECT {POST_COLUMNS} FROM blog_posts WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(post)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Resolve the slug for a create/update: an explicit slug wins, a blank one is
/// derived from the title.
fn resolve_slug(form: &BlogPostForm, title: &str) -> String {
    match non_blank(&form.slug) {
        Some(slug) => slug.to_string(),
        None => slug::derive(title),
    }
}

async fn slug_taken(
    pool: &SqlitePool,
    slug: &str,
    excluding_id: Option<i64>,
) -> Result<bool, AppError> {
    let existing: Option<(i64,)> = match excluding_id {
        Some(id) => {
            sqlx::query_as("SELECT id FROM blog_posts WHERE slug = ? AND id != ?")
                .bind(slug)
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        None => {
            sqlx::query_as("SELECT id FROM blog_posts WHERE slug = ?")
                .bind(slug)
                .fetch_optional(pool)
                .await?
        }
    };
    Ok(existing.is_some())
}

/// Create a blog post. Title, author and content are required; a blank slug is
/// derived from the title. Fails with `SlugConflict` when the slug is already
/// taken — the caller re-prompts, the slug is never auto-suffixed.
///
/// The check-then-insert pair is not atomic; two concurrent creates with the
/// same derived slug can both pass the check. Accepted for single-admin usage.
pub async fn create_post(pool: &SqlitePool, form: &BlogPostForm) -> Result<BlogPost, AppError> {
    let (title, author, content) = match (
        non_blank(&form.title),
        non_blank(&form.author),
        non_blank(&form.content),
    ) {
        (Some(t), Some(a), Some(c)) => (t, a, c),
        _ => {
            return Err(AppError::Validation(
                "Title, Author, and Content are required".to_string(),
            ))
        }
    };

    let post_slug = resolve_slug(form, title);
    if slug_taken(pool, &post_slug, None).await? {
        return Err(AppError::SlugConflict);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO blog_posts (title, slug, excerpt, content, author, status, featured_image)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(title)
    .bind(&post_slug)
    .bind(&form.excerpt)
    .bind(content)
    .bind(author)
    .bind(form.status.as_deref().unwrap_or("published"))
    .bind(&form.featured_image)
    .execute(pool)
    .await?;

    post_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or(AppError::NotFound)
}

/// Update a post. The blank-slug derivation rule from `create_post` applies;
/// slug uniqueness is re-checked against all other rows, and `updated_at` is
/// refreshed. Updating a missing id is a no-op.
pub async fn update_post(
    pool: &SqlitePool,
    id: i64,
    form: &BlogPostForm,
) -> Result<(), AppError> {
    let (title, content) = match (non_blank(&form.title), non_blank(&form.content)) {
        (Some(t), Some(c)) => (t, c),
        _ => {
            return Err(AppError::Validation(
                "Title and Content are required".to_string(),
            ))
        }
    };

    let post_slug = resolve_slug(form, title);
    if slug_taken(pool, &post_slug, Some(id)).await? {
        return Err(AppError::SlugConflict);
    }

    sqlx::query(
        r#"
        UPDATE blog_posts
        SET title = ?, slug = ?, excerpt = ?, content = ?, author = ?, status = ?,
            featured_image = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(title)
    .bind(&post_slug)
    .bind(&form.excerpt)
    .bind(content)
    .bind(form.author.as_deref().unwrap_or("Admin"))
    .bind(form.status.as_deref().unwrap_or("published"))
    .bind(&form.featured_image)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete by id. Idempotent: deleting a missing id is not an error.
pub async fn delete_post(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM blog_posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ============================================================================
// Analytics
// ============================================================================

/// Append a visit row. Best-effort: failures are logged, never surfaced.
pub async fn record_visit(
    pool: &SqlitePool,
    ip: &str,
    user_agent: &str,
    path: &str,
    referrer: &str,
) {
    if let Err(e) = sqlx::query(
        "INSERT INTO site_visits (ip_address, user_agent, page_visited, referrer) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(ip)
    .bind(user_agent)
    .bind(path)
    .bind(referrer)
    .execute(pool)
    .await
    {
        tracing::warn!("Failed to record visit for {}: {}", path, e);
    }
}

/// Append a contact submission. The caller maps failure to an error flag on
/// the redirect; nothing stronger is promised.
pub async fn record_contact(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    phone: &str,
    message: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO contact_submissions (name, email, phone, message) VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(message)
    .execute(pool)
    .await?;
    Ok(())
}

// ============================================================================
// Dashboard
// ============================================================================

async fn count(pool: &SqlitePool, sql: &str) -> Result<i64, AppError> {
    let (n,): (i64,) = sqlx::query_as(sql).fetch_one(pool).await?;
    Ok(n)
}

pub async fn dashboard_stats(pool: &SqlitePool) -> Result<DashboardStats, AppError> {
    let posts = count(pool, "SELECT COUNT(*) FROM blog_posts").await?;
    let images = count(pool, "SELECT COUNT(*) FROM gallery_images").await?;
    let total_visits = count(pool, "SELECT COUNT(*) FROM site_visits").await?;
    let today_visits = count(
        pool,
        "SELECT COUNT(*) FROM site_visits WHERE DATE(visit_date) = DATE('now')",
    )
    .await?;
    let contacts = count(pool, "SELECT COUNT(*) FROM contact_submissions").await?;

    let recent_images = sqlx::query_as::<_, GalleryImage>(
        "SELECT id, filename, caption, created_at FROM gallery_images \
         ORDER BY created_at DESC, id DESC LIMIT 5",
    )
    .fetch_all(pool)
    .await?;

    let recent_contacts = sqlx::query_as::<_, ContactSubmission>(
        "SELECT id, name, email, phone, message, submission_date FROM contact_submissions \
         ORDER BY submission_date DESC, id DESC LIMIT 5",
    )
    .fetch_all(pool)
    .await?;

    Ok(DashboardStats {
        posts,
        images,
        total_visits,
        today_visits,
        contacts,
        recent_images,
        recent_contacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed_defaults, test_pool};

    fn post_form(title: &str, slug: Option<&str>) -> BlogPostForm {
        BlogPostForm {
            title: Some(title.to_string()),
            slug: slug.map(str::to_string),
            author: Some("Admin".to_string()),
            excerpt: Some("excerpt".to_string()),
            content: Some("content".to_string()),
            featured_image: None,
            status: Some("published".to_string()),
        }
    }

    #[tokio::test]
    async fn test_save_content_upserts() {
        let pool = test_pool().await;

        let mut entries = HashMap::new();
        entries.insert("hero_title".to_string(), "First".to_string());
        save_content(&pool, &entries).await.unwrap();

        entries.insert("hero_title".to_string(), "X".to_string());
        save_content(&pool, &entries).await.unwrap();

        let content = all_content(&pool).await;
        assert_eq!(content.get("hero_title").map(String::as_str), Some("X"));

        let (rows,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM content WHERE key = 'hero_title'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_all_content_empty_on_fresh_db() {
        let pool = test_pool().await;
        assert!(all_content(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_section_images_grouped_by_section() {
        let pool = test_pool().await;
        create_section_image(&pool, "hero", "a.jpg", "").await.unwrap();
        create_section_image(&pool, "about", "b.jpg", "team").await.unwrap();
        create_section_image(&pool, "hero", "c.jpg", "").await.unwrap();

        let grouped = section_images_by_section(&pool).await;
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["hero"].len(), 2);
        assert_eq!(grouped["about"].len(), 1);
        assert_eq!(grouped["about"][0].filename, "b.jpg");
    }

    #[tokio::test]
    async fn test_gallery_limit_bounds_result() {
        let pool = test_pool().await;
        for i in 0..8 {
            create_gallery_image(&pool, &format!("img{i}.jpg"), "").await.unwrap();
        }
        let preview = gallery_images(&pool, Some(6)).await.unwrap();
        assert_eq!(preview.len(), 6);
        let all = gallery_images(&pool, None).await.unwrap();
        assert_eq!(all.len(), 8);
    }

    #[tokio::test]
    async fn test_delete_gallery_image_is_idempotent() {
        let pool = test_pool().await;
        create_gallery_image(&pool, "only.jpg", "").await.unwrap();
        let id = gallery_images(&pool, None).await.unwrap()[0].id;

        delete_gallery_image(&pool, id).await.unwrap();
        // Second delete of the same id: no error, no side effect.
        delete_gallery_image(&pool, id).await.unwrap();
        assert!(gallery_images(&pool, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_post_derives_slug_from_title() {
        let pool = test_pool().await;
        let post = create_post(&pool, &post_form("Eye Care!! 2024", None))
            .await
            .unwrap();
        assert_eq!(post.slug, "eye-care-2024");
    }

    #[tokio::test]
    async fn test_create_post_rejects_duplicate_slug() {
        let pool = test_pool().await;
        create_post(&pool, &post_form("Eye care", None)).await.unwrap();

        let err = create_post(&pool, &post_form("Second", Some("eye-care")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SlugConflict));

        // No duplicate row was inserted.
        let (rows,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM blog_posts WHERE slug = 'eye-care'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_create_post_requires_fields() {
        let pool = test_pool().await;
        let form = BlogPostForm {
            title: Some("Only a title".to_string()),
            ..Default::default()
        };
        let err = create_post(&pool, &form).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_published_lookup_ignores_drafts() {
        let pool = test_pool().await;
        let mut form = post_form("Hidden draft", Some("hidden-draft"));
        form.status = Some("draft".to_string());
        create_post(&pool, &form).await.unwrap();

        let found = published_post_by_slug(&pool, "hidden-draft").await.unwrap();
        assert!(found.is_none());

        // The admin variant still sees it.
        let posts = all_posts(&pool).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert!(post_by_id(&pool, posts[0].id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_published_posts_limit_and_order() {
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();
        for i in 0..2 {
            create_post(&pool, &post_form(&format!("Extra {i}"), None))
                .await
                .unwrap();
        }

        let posts = published_posts(&pool, Some(3)).await.unwrap();
        assert_eq!(posts.len(), 3);
        // Descending creation time, id ascending as the stable tiebreak.
        for pair in posts.windows(2) {
            assert!(
                pair[0].created_at > pair[1].created_at
                    || (pair[0].created_at == pair[1].created_at && pair[0].id < pair[1].id)
            );
        }
    }

    #[tokio::test]
    async fn test_update_post_rechecks_slug_against_other_rows() {
        let pool = test_pool().await;
        create_post(&pool, &post_form("Eye care", None)).await.unwrap();
        let second = create_post(&pool, &post_form("Child health", None))
            .await
            .unwrap();

        let err = update_post(&pool, second.id, &post_form("Child health", Some("eye-care")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SlugConflict));

        // Keeping its own slug is not a conflict.
        update_post(&pool, second.id, &post_form("Child health", Some("child-health")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_post_refreshes_updated_at() {
        let pool = test_pool().await;
        let post = create_post(&pool, &post_form("Eye care", None)).await.unwrap();

        // Backdate so the CURRENT_TIMESTAMP refresh is observable.
        sqlx::query("UPDATE blog_posts SET updated_at = '2000-01-01 00:00:00' WHERE id = ?")
            .bind(post.id)
            .execute(&pool)
            .await
            .unwrap();

        update_post(&pool, post.id, &post_form("Eye care", Some("eye-care")))
            .await
            .unwrap();
        let updated = post_by_id(&pool, post.id).await.unwrap().unwrap();
        assert!(updated.updated_at.and_utc().timestamp() > 946_684_800);
    }

    #[tokio::test]
    async fn test_delete_post_is_idempotent() {
        let pool = test_pool().await;
        let post = create_post(&pool, &post_form("Eye care", None)).await.unwrap();
        delete_post(&pool, post.id).await.unwrap();
        delete_post(&pool, post.id).await.unwrap();
        assert!(post_by_id(&pool, post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dashboard_stats_counts() {
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();
        create_gallery_image(&pool, "a.jpg", "").await.unwrap();
        record_visit(&pool, "127.0.0.1", "test-agent", "/", "").await;
        record_contact(&pool, "Jane", "jane@example.com", "0700", "Hello")
            .await
            .unwrap();

        let stats = dashboard_stats(&pool).await.unwrap();
        assert_eq!(stats.posts, 3);
        assert_eq!(stats.images, 1);
        assert_eq!(stats.total_visits, 1);
        assert_eq!(stats.today_visits, 1);
        assert_eq!(stats.contacts, 1);
        assert_eq!(stats.recent_images.len(), 1);
        assert_eq!(stats.recent_contacts.len(), 1);
    }
}
