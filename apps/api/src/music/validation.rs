use serde::Deserialize;

use crate::errors::AppError;
use crate::models::music::{NewSong, SongStatus};

const MAX_TITLE_LEN: usize = 200;
const MAX_ARTIST_LEN: usize = 200;
const MAX_URL_LEN: usize = 2048;

/// Statuses an admin may set. `pending` is only ever assigned on submission.
pub const MODERATION_STATUSES: &[SongStatus] = &[SongStatus::Approved, SongStatus::Rejected];

#[derive(Debug, Deserialize)]
pub struct SubmitSongRequest {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub url: Option<String>,
    pub submitted_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

/// Parses a moderation status against the allow-list.
pub fn parse_moderation_status(raw: Option<&str>) -> Result<SongStatus, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("status is required".to_string()))?;

    SongStatus::parse(raw)
        .filter(|status| MODERATION_STATUSES.contains(status))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid status '{raw}'. Must be 'approved' or 'rejected'"
            ))
        })
}

/// Parses an optional `status` listing filter (any known status).
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<SongStatus>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => SongStatus::parse(s)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Unknown status filter '{s}'"))),
    }
}

fn required(field: &str, value: Option<String>, max: usize) -> Result<String, AppError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))?;
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value)
}

/// Validates a public song submission.
pub fn validate_submission(req: SubmitSongRequest) -> Result<NewSong, AppError> {
    let title = required("title", req.title, MAX_TITLE_LEN)?;
    let artist = required("artist", req.artist, MAX_ARTIST_LEN)?;

    let url = req
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());
    if let Some(url) = &url {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(AppError::Validation(
                "url must start with http:// or https://".to_string(),
            ));
        }
        if url.len() > MAX_URL_LEN {
            return Err(AppError::Validation("url is too long".to_string()));
        }
    }

    let submitted_by = req
        .submitted_by
        .map(|s| s.trim().chars().take(100).collect::<String>())
        .filter(|s| !s.is_empty());

    Ok(NewSong {
        title,
        artist,
        url,
        submitted_by,
    })
}
