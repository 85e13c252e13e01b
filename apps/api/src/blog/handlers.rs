use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::blog::validation::{
    parse_admin_visibility, parse_language, parse_public_visibility, validate_post,
    CreatePostRequest,
};
use crate::errors::AppError;
use crate::models::blog::{PostRow, Visibility};
use crate::models::user::AdminUser;
use crate::pagination::{normalize_search, PageParams, DEFAULT_LIMIT, MAX_LIMIT};
use crate::routes::DeletedResponse;
use crate::state::AppState;
use crate::store::PostFilter;

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub visibility: Option<String>,
    pub language: Option<String>,
    pub search: Option<String>,
}

/// GET /api/posts
pub async fn handle_list_posts(
    State(state): State<AppState>,
    query: Result<Query<PostListQuery>, QueryRejection>,
) -> Result<Json<Vec<PostRow>>, AppError> {
    let Query(query) = query?;
    let filter = post_filter(query, DEFAULT_LIMIT, parse_public_visibility)?;
    Ok(Json(state.store.list_posts(&filter).await?))
}

/// GET /api/posts/:slug
///
/// Private posts read as not found.
pub async fn handle_get_post(
    State(state): State<AppState>,
    slug: Result<Path<String>, PathRejection>,
) -> Result<Json<PostRow>, AppError> {
    let Path(slug) = slug?;
    state
        .store
        .post_by_slug(&slug)
        .await?
        .filter(|post| post.visibility != Visibility::Private.as_str())
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Post '{slug}' not found")))
}

/// GET /api/admin/posts
pub async fn handle_admin_list_posts(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<PostListQuery>, QueryRejection>,
) -> Result<Json<Vec<PostRow>>, AppError> {
    let Query(query) = query?;
    let filter = post_filter(query, MAX_LIMIT, parse_admin_visibility)?;
    Ok(Json(state.store.list_posts(&filter).await?))
}

/// POST /api/admin/posts
pub async fn handle_create_post(
    admin: AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostRow>), AppError> {
    let Json(req) = payload?;
    let post = validate_post(req)?;
    if state.store.post_by_slug(&post.slug).await?.is_some() {
        return Err(AppError::Validation(format!(
            "A post with slug '{}' already exists",
            post.slug
        )));
    }
    let row = state.store.insert_post(post).await?;
    info!("Admin {} created post {} ({})", admin.user_id, row.id, row.slug);
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/admin/posts/:id
pub async fn handle_delete_post(
    admin: AdminUser,
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeletedResponse>, AppError> {
    let Path(id) = id?;
    if !state.store.delete_post(id).await? {
        return Err(AppError::NotFound(format!("Post {id} not found")));
    }
    info!("Admin {} deleted post {id}", admin.user_id);
    Ok(Json(DeletedResponse { deleted: id }))
}

fn post_filter(
    query: PostListQuery,
    default_limit: i64,
    visibility: fn(Option<&str>) -> Result<Vec<Visibility>, AppError>,
) -> Result<PostFilter, AppError> {
    let (limit, offset) = PageParams {
        limit: query.limit,
        offset: query.offset,
    }
    .resolve(default_limit)?;

    Ok(PostFilter {
        visibility: visibility(query.visibility.as_deref())?,
        language: parse_language(query.language.as_deref())?,
        search: normalize_search(query.search),
        limit,
        offset,
    })
}
