//! Domain types and configuration shared by every `suplink` crate.

pub mod advisory;
pub mod app_config;
pub mod config;
pub mod search;
pub mod session;
pub mod supplier;

use thiserror::Error;

pub use advisory::AdvisoryItem;
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use search::{SearchKey, SearchMode, SearchQuery};
pub use session::SessionState;
pub use supplier::{normalize_identity, EnrichmentRecord, RawHit, SupplierRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
