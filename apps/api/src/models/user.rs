use serde::Serialize;
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";

/// A caller whose session token resolved to a user and whose role record
/// grants admin access.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    pub user_id: Uuid,
    pub role: String,
}
