use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One version of a page section. Rows are never deleted; the active
/// version is the highest `version` among rows with `is_active = true`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PageContentRow {
    pub id: Uuid,
    pub page_key: String,
    pub section_key: String,
    pub version: i32,
    pub is_active: bool,
    pub content: Value,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PageImageRow {
    pub id: Uuid,
    pub page_key: String,
    pub section_key: String,
    pub url: String,
    pub alt_text: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPageImage {
    pub page_key: String,
    pub section_key: String,
    pub url: String,
    pub alt_text: Option<String>,
    pub display_order: i32,
}
