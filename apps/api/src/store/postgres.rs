use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::blog::{NewPost, PostRow};
use crate::models::content::{NewPageImage, PageContentRow, PageImageRow};
use crate::models::music::{NewSong, SongRow, SongStatus};
use crate::store::{PostFilter, SongFilter, Store};

/// `Store` backed by the PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn active_content(
        &self,
        page_key: &str,
        section_key: &str,
    ) -> sqlx::Result<Option<PageContentRow>> {
        sqlx::query_as::<_, PageContentRow>(
            r#"
            SELECT * FROM page_content
            WHERE page_key = $1 AND section_key = $2 AND is_active = TRUE
            ORDER BY version DESC
            LIMIT 1
            "#,
        )
        .bind(page_key)
        .bind(section_key)
        .fetch_optional(&self.pool)
        .await
    }

    async fn active_page_content(&self, page_key: &str) -> sqlx::Result<Vec<PageContentRow>> {
        sqlx::query_as::<_, PageContentRow>(
            r#"
            SELECT DISTINCT ON (section_key) *
            FROM page_content
            WHERE page_key = $1 AND is_active = TRUE
            ORDER BY section_key, version DESC
            "#,
        )
        .bind(page_key)
        .fetch_all(&self.pool)
        .await
    }

    async fn content_history(
        &self,
        page_key: &str,
        section_key: &str,
    ) -> sqlx::Result<Vec<PageContentRow>> {
        sqlx::query_as::<_, PageContentRow>(
            r#"
            SELECT * FROM page_content
            WHERE page_key = $1 AND section_key = $2
            ORDER BY version DESC
            "#,
        )
        .bind(page_key)
        .bind(section_key)
        .fetch_all(&self.pool)
        .await
    }

    async fn commit_content(
        &self,
        page_key: &str,
        section_key: &str,
        content: &Value,
        created_by: Uuid,
    ) -> sqlx::Result<PageContentRow> {
        let mut tx = self.pool.begin().await?;

        // Serialises concurrent commits to the same section until the
        // transaction ends.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text || '/' || $2::text))")
            .bind(page_key)
            .bind(section_key)
            .execute(&mut *tx)
            .await?;

        let current_max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(version) FROM page_content WHERE page_key = $1 AND section_key = $2",
        )
        .bind(page_key)
        .bind(section_key)
        .fetch_one(&mut *tx)
        .await?;
        let new_version = current_max.unwrap_or(0) + 1;

        sqlx::query(
            r#"
            UPDATE page_content SET is_active = FALSE
            WHERE page_key = $1 AND section_key = $2 AND is_active = TRUE
            "#,
        )
        .bind(page_key)
        .bind(section_key)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, PageContentRow>(
            r#"
            INSERT INTO page_content
                (id, page_key, section_key, version, is_active, content, created_by)
            VALUES ($1, $2, $3, $4, TRUE, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(page_key)
        .bind(section_key)
        .bind(new_version)
        .bind(content)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Committed {page_key}/{section_key} version {new_version}");
        Ok(row)
    }

    async fn deactivate_content(&self, page_key: &str, section_key: &str) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE page_content SET is_active = FALSE
            WHERE page_key = $1 AND section_key = $2 AND is_active = TRUE
            "#,
        )
        .bind(page_key)
        .bind(section_key)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn list_images(
        &self,
        page_key: &str,
        section_key: &str,
    ) -> sqlx::Result<Vec<PageImageRow>> {
        sqlx::query_as::<_, PageImageRow>(
            r#"
            SELECT * FROM page_images
            WHERE page_key = $1 AND section_key = $2
            ORDER BY display_order ASC, created_at DESC
            "#,
        )
        .bind(page_key)
        .bind(section_key)
        .fetch_all(&self.pool)
        .await
    }

    async fn insert_image(&self, image: NewPageImage) -> sqlx::Result<PageImageRow> {
        sqlx::query_as::<_, PageImageRow>(
            r#"
            INSERT INTO page_images (id, page_key, section_key, url, alt_text, display_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&image.page_key)
        .bind(&image.section_key)
        .bind(&image.url)
        .bind(&image.alt_text)
        .bind(image.display_order)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_image(&self, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM page_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn session_user(&self, token: &str) -> sqlx::Result<Option<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM sessions WHERE token = $1 AND expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    async fn user_role(&self, user_id: Uuid) -> sqlx::Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT role FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_songs(&self, filter: &SongFilter) -> sqlx::Result<Vec<SongRow>> {
        sqlx::query_as::<_, SongRow>(
            r#"
            SELECT * FROM songs
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL
                   OR strpos(lower(title), lower($2)) > 0
                   OR strpos(lower(artist), lower($2)) > 0)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.search.as_deref())
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn insert_song(&self, song: NewSong) -> sqlx::Result<SongRow> {
        sqlx::query_as::<_, SongRow>(
            r#"
            INSERT INTO songs (id, title, artist, url, submitted_by, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&song.title)
        .bind(&song.artist)
        .bind(&song.url)
        .bind(&song.submitted_by)
        .bind(SongStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
    }

    async fn set_song_status(
        &self,
        id: Uuid,
        status: SongStatus,
    ) -> sqlx::Result<Option<SongRow>> {
        sqlx::query_as::<_, SongRow>(
            "UPDATE songs SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_song(&self, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, filter: &PostFilter) -> sqlx::Result<Vec<PostRow>> {
        let visibility: Vec<String> = filter
            .visibility
            .iter()
            .map(|v| v.as_str().to_string())
            .collect();
        sqlx::query_as::<_, PostRow>(
            r#"
            SELECT * FROM posts
            WHERE (cardinality($1::text[]) = 0 OR visibility = ANY($1))
              AND ($2::text IS NULL OR language = $2)
              AND ($3::text IS NULL
                   OR strpos(lower(title), lower($3)) > 0
                   OR strpos(lower(summary), lower($3)) > 0)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&visibility)
        .bind(filter.language.as_deref())
        .bind(filter.search.as_deref())
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn post_by_slug(&self, slug: &str) -> sqlx::Result<Option<PostRow>> {
        sqlx::query_as::<_, PostRow>("SELECT * FROM posts WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_post(&self, post: NewPost) -> sqlx::Result<PostRow> {
        sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, slug, title, summary, body, language, visibility, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.summary)
        .bind(&post.body)
        .bind(&post.language)
        .bind(post.visibility.as_str())
        .bind(&post.tags)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_post(&self, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
