//! Persistence seam.
//!
//! Every route reaches the database through `Store`. `AppState` carries an
//! `Arc<dyn Store>`; production wires `PgStore`, tests wire `MemoryStore`.
//! Each method is one round trip against one table.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::models::blog::{NewPost, PostRow, Visibility};
use crate::models::content::{NewPageImage, PageContentRow, PageImageRow};
use crate::models::music::{NewSong, SongRow, SongStatus};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Clone, Default)]
pub struct SongFilter {
    pub status: Option<SongStatus>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Visibilities to include. Empty means any.
    pub visibility: Vec<Visibility>,
    pub language: Option<String>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait Store: Send + Sync {
    // Versioned page content

    /// Highest-version active row for a section, if any.
    async fn active_content(
        &self,
        page_key: &str,
        section_key: &str,
    ) -> sqlx::Result<Option<PageContentRow>>;

    /// Active row of every section on a page, ordered by section key.
    async fn active_page_content(&self, page_key: &str) -> sqlx::Result<Vec<PageContentRow>>;

    /// Every version of a section, newest first.
    async fn content_history(
        &self,
        page_key: &str,
        section_key: &str,
    ) -> sqlx::Result<Vec<PageContentRow>>;

    /// Appends `content` as version `max + 1`, active, and marks earlier
    /// versions of the same section inactive.
    async fn commit_content(
        &self,
        page_key: &str,
        section_key: &str,
        content: &Value,
        created_by: Uuid,
    ) -> sqlx::Result<PageContentRow>;

    /// Marks every version of a section inactive. Returns rows touched.
    async fn deactivate_content(&self, page_key: &str, section_key: &str) -> sqlx::Result<u64>;

    // Page images

    /// Images of a section ordered by `display_order ASC, created_at DESC`.
    async fn list_images(
        &self,
        page_key: &str,
        section_key: &str,
    ) -> sqlx::Result<Vec<PageImageRow>>;

    async fn insert_image(&self, image: NewPageImage) -> sqlx::Result<PageImageRow>;

    async fn delete_image(&self, id: Uuid) -> sqlx::Result<bool>;

    // Auth

    /// User owning an unexpired session token.
    async fn session_user(&self, token: &str) -> sqlx::Result<Option<Uuid>>;

    async fn user_role(&self, user_id: Uuid) -> sqlx::Result<Option<String>>;

    // Songs

    async fn list_songs(&self, filter: &SongFilter) -> sqlx::Result<Vec<SongRow>>;

    async fn insert_song(&self, song: NewSong) -> sqlx::Result<SongRow>;

    async fn set_song_status(&self, id: Uuid, status: SongStatus)
        -> sqlx::Result<Option<SongRow>>;

    async fn delete_song(&self, id: Uuid) -> sqlx::Result<bool>;

    // Blog posts

    async fn list_posts(&self, filter: &PostFilter) -> sqlx::Result<Vec<PostRow>>;

    async fn post_by_slug(&self, slug: &str) -> sqlx::Result<Option<PostRow>>;

    async fn insert_post(&self, post: NewPost) -> sqlx::Result<PostRow>;

    async fn delete_post(&self, id: Uuid) -> sqlx::Result<bool>;
}
