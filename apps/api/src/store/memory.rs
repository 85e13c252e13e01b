//! In-memory `Store` used by handler tests. Supports simulated backend
//! failure and counts successful writes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::models::blog::{NewPost, PostRow};
use crate::models::content::{NewPageImage, PageContentRow, PageImageRow};
use crate::models::music::{NewSong, SongRow, SongStatus};
use crate::store::{PostFilter, SongFilter, Store};

#[derive(Default)]
struct Tables {
    content: Vec<PageContentRow>,
    images: Vec<PageImageRow>,
    sessions: Vec<(String, Uuid, DateTime<Utc>)>,
    roles: Vec<(Uuid, String)>,
    songs: Vec<SongRow>,
    posts: Vec<PostRow>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call returns a backend error.
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn add_session(&self, token: &str, user_id: Uuid, ttl: Duration) {
        self.tables
            .lock()
            .unwrap()
            .sessions
            .push((token.to_string(), user_id, Utc::now() + ttl));
    }

    pub fn add_role(&self, user_id: Uuid, role: &str) {
        self.tables
            .lock()
            .unwrap()
            .roles
            .push((user_id, role.to_string()));
    }

    pub fn seed_content(&self, page_key: &str, section_key: &str, version: i32, active: bool) {
        self.tables.lock().unwrap().content.push(PageContentRow {
            id: Uuid::new_v4(),
            page_key: page_key.to_string(),
            section_key: section_key.to_string(),
            version,
            is_active: active,
            content: serde_json::json!({ "version": version }),
            created_by: None,
            created_at: Utc::now(),
        });
    }

    pub fn seed_image(
        &self,
        page_key: &str,
        section_key: &str,
        url: &str,
        display_order: i32,
        created_at: DateTime<Utc>,
    ) {
        self.tables.lock().unwrap().images.push(PageImageRow {
            id: Uuid::new_v4(),
            page_key: page_key.to_string(),
            section_key: section_key.to_string(),
            url: url.to_string(),
            alt_text: None,
            display_order,
            created_at,
        });
    }

    pub fn seed_song(&self, title: &str, status: SongStatus) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().songs.push(SongRow {
            id,
            title: title.to_string(),
            artist: "Unknown".to_string(),
            url: None,
            submitted_by: None,
            status: status.as_str().to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        id
    }

    pub fn seed_post(&self, slug: &str, visibility: &str, language: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().posts.push(PostRow {
            id,
            slug: slug.to_string(),
            title: slug.replace('-', " "),
            summary: None,
            body: String::new(),
            language: language.to_string(),
            visibility: visibility.to_string(),
            tags: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        id
    }

    pub fn song(&self, id: Uuid) -> Option<SongRow> {
        self.tables
            .lock()
            .unwrap()
            .songs
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn image_count(&self) -> usize {
        self.tables.lock().unwrap().images.len()
    }

    fn check(&self) -> sqlx::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::Protocol("simulated backend failure".into()));
        }
        Ok(())
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page<T: Clone>(rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn active_content(
        &self,
        page_key: &str,
        section_key: &str,
    ) -> sqlx::Result<Option<PageContentRow>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .content
            .iter()
            .filter(|r| r.page_key == page_key && r.section_key == section_key && r.is_active)
            .max_by_key(|r| r.version)
            .cloned())
    }

    async fn active_page_content(&self, page_key: &str) -> sqlx::Result<Vec<PageContentRow>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut sections: Vec<&str> = tables
            .content
            .iter()
            .filter(|r| r.page_key == page_key && r.is_active)
            .map(|r| r.section_key.as_str())
            .collect();
        sections.sort();
        sections.dedup();
        Ok(sections
            .into_iter()
            .filter_map(|section| {
                tables
                    .content
                    .iter()
                    .filter(|r| r.page_key == page_key && r.section_key == section && r.is_active)
                    .max_by_key(|r| r.version)
                    .cloned()
            })
            .collect())
    }

    async fn content_history(
        &self,
        page_key: &str,
        section_key: &str,
    ) -> sqlx::Result<Vec<PageContentRow>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .content
            .iter()
            .filter(|r| r.page_key == page_key && r.section_key == section_key)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(rows)
    }

    async fn commit_content(
        &self,
        page_key: &str,
        section_key: &str,
        content: &Value,
        created_by: Uuid,
    ) -> sqlx::Result<PageContentRow> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let mut max_version = 0;
        for row in tables
            .content
            .iter_mut()
            .filter(|r| r.page_key == page_key && r.section_key == section_key)
        {
            max_version = max_version.max(row.version);
            row.is_active = false;
        }
        let row = PageContentRow {
            id: Uuid::new_v4(),
            page_key: page_key.to_string(),
            section_key: section_key.to_string(),
            version: max_version + 1,
            is_active: true,
            content: content.clone(),
            created_by: Some(created_by),
            created_at: Utc::now(),
        };
        tables.content.push(row.clone());
        self.wrote();
        Ok(row)
    }

    async fn deactivate_content(&self, page_key: &str, section_key: &str) -> sqlx::Result<u64> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let mut touched = 0;
        for row in tables.content.iter_mut().filter(|r| {
            r.page_key == page_key && r.section_key == section_key && r.is_active
        }) {
            row.is_active = false;
            touched += 1;
        }
        self.wrote();
        Ok(touched)
    }

    async fn list_images(
        &self,
        page_key: &str,
        section_key: &str,
    ) -> sqlx::Result<Vec<PageImageRow>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .images
            .iter()
            .filter(|r| r.page_key == page_key && r.section_key == section_key)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    async fn insert_image(&self, image: NewPageImage) -> sqlx::Result<PageImageRow> {
        self.check()?;
        let row = PageImageRow {
            id: Uuid::new_v4(),
            page_key: image.page_key,
            section_key: image.section_key,
            url: image.url,
            alt_text: image.alt_text,
            display_order: image.display_order,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().images.push(row.clone());
        self.wrote();
        Ok(row)
    }

    async fn delete_image(&self, id: Uuid) -> sqlx::Result<bool> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.images.len();
        tables.images.retain(|r| r.id != id);
        self.wrote();
        Ok(tables.images.len() < before)
    }

    async fn session_user(&self, token: &str) -> sqlx::Result<Option<Uuid>> {
        self.check()?;
        let now = Utc::now();
        Ok(self
            .tables
            .lock()
            .unwrap()
            .sessions
            .iter()
            .find(|(t, _, expires_at)| t == token && *expires_at > now)
            .map(|(_, user_id, _)| *user_id))
    }

    async fn user_role(&self, user_id: Uuid) -> sqlx::Result<Option<String>> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .roles
            .iter()
            .find(|(id, _)| *id == user_id)
            .map(|(_, role)| role.clone()))
    }

    async fn list_songs(&self, filter: &SongFilter) -> sqlx::Result<Vec<SongRow>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .songs
            .iter()
            .filter(|s| filter.status.map_or(true, |st| s.status == st.as_str()))
            .filter(|s| {
                filter.search.as_deref().map_or(true, |q| {
                    contains_ci(&s.title, q) || contains_ci(&s.artist, q)
                })
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(rows, filter.limit, filter.offset))
    }

    async fn insert_song(&self, song: NewSong) -> sqlx::Result<SongRow> {
        self.check()?;
        let row = SongRow {
            id: Uuid::new_v4(),
            title: song.title,
            artist: song.artist,
            url: song.url,
            submitted_by: song.submitted_by,
            status: SongStatus::Pending.as_str().to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.tables.lock().unwrap().songs.push(row.clone());
        self.wrote();
        Ok(row)
    }

    async fn set_song_status(
        &self,
        id: Uuid,
        status: SongStatus,
    ) -> sqlx::Result<Option<SongRow>> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        self.wrote();
        Ok(tables.songs.iter_mut().find(|s| s.id == id).map(|s| {
            s.status = status.as_str().to_string();
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn delete_song(&self, id: Uuid) -> sqlx::Result<bool> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.songs.len();
        tables.songs.retain(|s| s.id != id);
        self.wrote();
        Ok(tables.songs.len() < before)
    }

    async fn list_posts(&self, filter: &PostFilter) -> sqlx::Result<Vec<PostRow>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .posts
            .iter()
            .filter(|p| {
                filter.visibility.is_empty()
                    || filter.visibility.iter().any(|v| p.visibility == v.as_str())
            })
            .filter(|p| filter.language.as_deref().map_or(true, |l| p.language == l))
            .filter(|p| {
                filter.search.as_deref().map_or(true, |q| {
                    contains_ci(&p.title, q)
                        || p.summary.as_deref().is_some_and(|s| contains_ci(s, q))
                })
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(rows, filter.limit, filter.offset))
    }

    async fn post_by_slug(&self, slug: &str) -> sqlx::Result<Option<PostRow>> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn insert_post(&self, post: NewPost) -> sqlx::Result<PostRow> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.posts.iter().any(|p| p.slug == post.slug) {
            return Err(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint: slug {}",
                post.slug
            )));
        }
        let row = PostRow {
            id: Uuid::new_v4(),
            slug: post.slug,
            title: post.title,
            summary: post.summary,
            body: post.body,
            language: post.language,
            visibility: post.visibility.as_str().to_string(),
            tags: post.tags,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.posts.push(row.clone());
        self.wrote();
        Ok(row)
    }

    async fn delete_post(&self, id: Uuid) -> sqlx::Result<bool> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        self.wrote();
        Ok(tables.posts.len() < before)
    }
}
