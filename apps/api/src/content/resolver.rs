use serde::Serialize;
use tracing::warn;

use crate::models::content::{PageContentRow, PageImageRow};
use crate::store::Store;

/// Result of a section lookup. `use_fallback` is set whenever no content
/// could be returned, whether the section is empty or the lookup failed.
#[derive(Debug, Clone, Serialize)]
pub struct ContentResolution {
    pub content: Option<PageContentRow>,
    pub use_fallback: bool,
}

impl ContentResolution {
    pub fn found(row: PageContentRow) -> Self {
        Self {
            content: Some(row),
            use_fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            content: None,
            use_fallback: true,
        }
    }
}

/// Returns the highest-version active row for a section, or the fallback
/// signal. One lookup per call; no retry, no cache.
pub async fn resolve_section(
    store: &dyn Store,
    page_key: &str,
    section_key: &str,
) -> ContentResolution {
    match store.active_content(page_key, section_key).await {
        Ok(Some(row)) => ContentResolution::found(row),
        Ok(None) => ContentResolution::fallback(),
        Err(e) => {
            warn!("Content lookup for {page_key}/{section_key} failed, using fallback: {e}");
            ContentResolution::fallback()
        }
    }
}

/// Active content of every section on a page. Failure reads as "no sections".
pub async fn resolve_page(store: &dyn Store, page_key: &str) -> Vec<PageContentRow> {
    store
        .active_page_content(page_key)
        .await
        .unwrap_or_else(|e| {
            warn!("Content lookup for page {page_key} failed, using fallback: {e}");
            Vec::new()
        })
}

/// Ordered image set of a section. Failure reads as an empty set.
pub async fn resolve_images(
    store: &dyn Store,
    page_key: &str,
    section_key: &str,
) -> Vec<PageImageRow> {
    store
        .list_images(page_key, section_key)
        .await
        .unwrap_or_else(|e| {
            warn!("Image lookup for {page_key}/{section_key} failed, returning empty set: {e}");
            Vec::new()
        })
}
