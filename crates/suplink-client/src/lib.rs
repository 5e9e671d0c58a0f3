//! HTTP client for the supplier-discovery API: search, advisory content, and
//! the save-and-analyze trigger.

pub mod client;
pub mod error;
pub mod types;

pub use client::SuplinkClient;
pub use error::ClientError;
pub use types::{SaveSearchRequest, SaveSearchResponse, MAX_ADVISORIES};
