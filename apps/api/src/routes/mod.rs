pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::assistant;
use crate::blog;
use crate::content;
use crate::errors::AppError;
use crate::music;
use crate::state::AppState;

/// Multipart framing allowance on top of the configured file size.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Body of every successful admin delete.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: Uuid,
}

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Page CMS (public reads)
        .route(
            "/api/page-content/:page_key",
            get(content::handlers::handle_get_page),
        )
        .route(
            "/api/page-content/:page_key/:section_key",
            get(content::handlers::handle_get_section),
        )
        .route(
            "/api/page-images/:page_key/:section_key",
            get(content::handlers::handle_list_images),
        )
        // Listings
        .route(
            "/api/songs",
            get(music::handlers::handle_list_songs).post(music::handlers::handle_submit_song),
        )
        .route("/api/posts", get(blog::handlers::handle_list_posts))
        .route("/api/posts/:slug", get(blog::handlers::handle_get_post))
        // Assistant
        .route("/api/chat", post(assistant::handlers::handle_chat))
        // Admin: page CMS
        .route(
            "/api/admin/page-content/:page_key/:section_key",
            post(content::handlers::handle_commit_content)
                .delete(content::handlers::handle_deactivate_content),
        )
        .route(
            "/api/admin/page-content/:page_key/:section_key/history",
            get(content::handlers::handle_content_history),
        )
        .route(
            "/api/admin/page-content/:page_key/:section_key/revert",
            post(content::handlers::handle_revert_content),
        )
        .route(
            "/api/admin/page-images",
            post(content::handlers::handle_upload_image)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/admin/page-images/:id",
            delete(content::handlers::handle_delete_image),
        )
        // Admin: songs
        .route(
            "/api/admin/songs",
            get(music::handlers::handle_admin_list_songs),
        )
        .route(
            "/api/admin/songs/:id",
            delete(music::handlers::handle_delete_song),
        )
        .route(
            "/api/admin/songs/:id/status",
            post(music::handlers::handle_update_song_status),
        )
        // Admin: posts
        .route(
            "/api/admin/posts",
            get(blog::handlers::handle_admin_list_posts).post(blog::handlers::handle_create_post),
        )
        .route(
            "/api/admin/posts/:id",
            delete(blog::handlers::handle_delete_post),
        )
        .fallback(not_found)
        .with_state(state)
}
