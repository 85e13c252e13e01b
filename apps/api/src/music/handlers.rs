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

use crate::errors::AppError;
use crate::models::music::{SongRow, SongStatus};
use crate::models::user::AdminUser;
use crate::music::validation::{
    parse_moderation_status, parse_status_filter, validate_submission, StatusUpdateRequest,
    SubmitSongRequest,
};
use crate::pagination::{normalize_search, PageParams, DEFAULT_LIMIT, MAX_LIMIT};
use crate::routes::DeletedResponse;
use crate::state::AppState;
use crate::store::SongFilter;

#[derive(Debug, Deserialize)]
pub struct SongListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminSongListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
}

/// GET /api/songs
///
/// Approved songs only, newest first.
pub async fn handle_list_songs(
    State(state): State<AppState>,
    query: Result<Query<SongListQuery>, QueryRejection>,
) -> Result<Json<Vec<SongRow>>, AppError> {
    let Query(query) = query?;
    let (limit, offset) = PageParams {
        limit: query.limit,
        offset: query.offset,
    }
    .resolve(DEFAULT_LIMIT)?;

    let songs = state
        .store
        .list_songs(&SongFilter {
            status: Some(SongStatus::Approved),
            search: normalize_search(query.search),
            limit,
            offset,
        })
        .await?;
    Ok(Json(songs))
}

/// POST /api/songs
///
/// Public submission; lands as `pending` until moderated.
pub async fn handle_submit_song(
    State(state): State<AppState>,
    payload: Result<Json<SubmitSongRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SongRow>), AppError> {
    let Json(req) = payload?;
    let song = validate_submission(req)?;
    let row = state.store.insert_song(song).await?;
    info!("Song {} submitted for review", row.id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/admin/songs
///
/// At most `MAX_LIMIT` rows per call, any status unless filtered.
pub async fn handle_admin_list_songs(
    _admin: AdminUser,
    State(state): State<AppState>,
    query: Result<Query<AdminSongListQuery>, QueryRejection>,
) -> Result<Json<Vec<SongRow>>, AppError> {
    let Query(query) = query?;
    let (limit, offset) = PageParams {
        limit: query.limit,
        offset: query.offset,
    }
    .resolve(MAX_LIMIT)?;

    let songs = state
        .store
        .list_songs(&SongFilter {
            status: parse_status_filter(query.status.as_deref())?,
            search: normalize_search(query.search),
            limit,
            offset,
        })
        .await?;
    Ok(Json(songs))
}

/// POST /api/admin/songs/:id/status
pub async fn handle_update_song_status(
    admin: AdminUser,
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<SongRow>, AppError> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let status = parse_moderation_status(req.status.as_deref())?;

    let row = state
        .store
        .set_song_status(id, status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Song {id} not found")))?;

    info!("Admin {} set song {id} to {}", admin.user_id, status.as_str());
    Ok(Json(row))
}

/// DELETE /api/admin/songs/:id
pub async fn handle_delete_song(
    admin: AdminUser,
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeletedResponse>, AppError> {
    let Path(id) = id?;
    if !state.store.delete_song(id).await? {
        return Err(AppError::NotFound(format!("Song {id} not found")));
    }
    info!("Admin {} deleted song {id}", admin.user_id);
    Ok(Json(DeletedResponse { deleted: id }))
}
