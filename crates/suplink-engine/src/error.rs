use std::sync::Arc;

use thiserror::Error;

/// Error type returned by the engine's external collaborators.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("product and country are required")]
    InvalidQuery,

    /// The Search API call failed. Shared by every caller coalesced onto the
    /// same request.
    #[error("supplier search failed: {0}")]
    Fetch(Arc<dyn std::error::Error + Send + Sync>),

    #[error("enrichment store unavailable: {0}")]
    Enrichment(String),
}

impl EngineError {
    pub(crate) fn fetch(source: SourceError) -> Self {
        EngineError::Fetch(Arc::from(source))
    }
}
