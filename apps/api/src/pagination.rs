use crate::errors::AppError;

pub const DEFAULT_LIMIT: i64 = 20;
/// Upper bound for any listing, public or admin.
pub const MAX_LIMIT: i64 = 100;

/// `limit` / `offset` query parameters shared by listing routes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageParams {
    /// Resolves to `(limit, offset)`. `limit` is clamped to `[1, MAX_LIMIT]`;
    /// a negative offset is rejected.
    pub fn resolve(self, default_limit: i64) -> Result<(i64, i64), AppError> {
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT);
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::Validation(
                "offset must be zero or greater".to_string(),
            ));
        }
        Ok((limit, offset))
    }
}

/// Trims a free-text search term; blank becomes `None`.
pub fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
