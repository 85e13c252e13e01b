use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SongRow {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub url: Option<String>,
    pub submitted_by: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SongStatus {
    Pending,
    Approved,
    Rejected,
}

impl SongStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SongStatus::Pending => "pending",
            SongStatus::Approved => "approved",
            SongStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(SongStatus::Pending),
            "approved" => Some(SongStatus::Approved),
            "rejected" => Some(SongStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub url: Option<String>,
    pub submitted_by: Option<String>,
}
