use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::storage::ObjectStore;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Destination for admin image uploads.
    pub objects: Arc<dyn ObjectStore>,
    /// `None` when no API key is configured; the chat route then reports 503.
    pub llm: Option<LlmClient>,
    pub config: Config,
}
