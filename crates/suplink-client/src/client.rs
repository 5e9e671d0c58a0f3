//! HTTP client for the supplier-discovery REST API.
//!
//! Wraps `reqwest` with typed request/response handling. Every non-2xx reply
//! becomes [`ClientError::UnexpectedStatus`]; nothing is retried here.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use suplink_core::{AdvisoryItem, EnrichmentRecord, RawHit, SearchKey};

use crate::error::ClientError;
use crate::types::{
    ErrorBody, FaqResponse, SaveSearchRequest, SaveSearchResponse, SuppliersBySearchResponse,
    MAX_ADVISORIES,
};

/// Client for the supplier-discovery API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct SuplinkClient {
    client: Client,
    base_url: Url,
}

impl SuplinkClient {
    /// Creates a client rooted at `base_url` (e.g. `https://host/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends below the base
        // path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Runs a supplier search for `key`.
    ///
    /// Hits are returned in the API's relevance order.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnexpectedStatus`] on any non-2xx reply.
    /// - [`ClientError::Http`] on network failure or timeout.
    /// - [`ClientError::Deserialize`] if the body is not a list of hits.
    pub async fn search(&self, key: &SearchKey) -> Result<Vec<RawHit>, ClientError> {
        let url = self.build_url(
            "search",
            &[
                ("product", key.display_product()),
                ("country", key.display_country()),
                ("mode", key.mode().as_str()),
            ],
        )?;
        tracing::debug!(%url, "requesting search hits");
        let response = self.client.get(url.clone()).send().await?;
        let hits: Vec<RawHit> = Self::read_json(response, &url).await?;
        tracing::debug!(key = %key, hits = hits.len(), "search hits received");
        Ok(hits)
    }

    /// Fetches the advisory notes for `product`.
    ///
    /// Items with a blank title or body are dropped and at most
    /// [`MAX_ADVISORIES`] are returned.
    ///
    /// # Errors
    ///
    /// Same as [`SuplinkClient::search`]. Callers usually degrade to an empty
    /// list.
    pub async fn advisories(&self, product: &str) -> Result<Vec<AdvisoryItem>, ClientError> {
        let url = self.build_url("faq", &[("product", product.trim())])?;
        let response = self.client.get(url.clone()).send().await?;
        let body: FaqResponse = Self::read_json(response, &url).await?;
        Ok(body
            .faqs
            .iter()
            .filter_map(AdvisoryItem::cleaned)
            .take(MAX_ADVISORIES)
            .collect())
    }

    /// Persists a completed search and asks the backend to analyze its
    /// suppliers.
    ///
    /// # Errors
    ///
    /// Same as [`SuplinkClient::search`].
    pub async fn save_search_and_analyze(
        &self,
        request: &SaveSearchRequest,
    ) -> Result<SaveSearchResponse, ClientError> {
        let url = self.build_url("save-search-and-analyze", &[])?;
        let response = self.client.post(url.clone()).json(request).send().await?;
        Self::read_json(response, &url).await
    }

    /// Reads back the analyzed suppliers of a saved search, highest score
    /// first as the backend orders them.
    ///
    /// `search_id` comes from [`SaveSearchResponse::search_id`]. Suppliers
    /// whose analysis has not finished yet are simply absent.
    ///
    /// # Errors
    ///
    /// Same as [`SuplinkClient::search`].
    pub async fn suppliers_by_search(
        &self,
        search_id: &str,
    ) -> Result<Vec<EnrichmentRecord>, ClientError> {
        let url = self.build_url("suppliers-by-search", &[("search_id", search_id.trim())])?;
        let response = self.client.get(url.clone()).send().await?;
        let body: SuppliersBySearchResponse = Self::read_json(response, &url).await?;
        tracing::debug!(search_id, suppliers = body.suppliers.len(), "analyzed suppliers received");
        Ok(body
            .suppliers
            .into_iter()
            .map(EnrichmentRecord::from)
            .filter(|record| !record.identity.trim().is_empty())
            .collect())
    }

    /// Joins `path` onto the base URL and appends percent-encoded query
    /// parameters.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Asserts a 2xx status and parses the body as `T`.
    async fn read_json<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .map(|b| b.error);
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use suplink_core::SearchMode;

    use super::*;

    fn test_client(base_url: &str) -> SuplinkClient {
        SuplinkClient::new(base_url, 30, "suplink-test/0.1")
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_below_base_path() {
        let client = test_client("https://suplink.example/api");
        let url = client.build_url("faq", &[("product", "bolts")]).unwrap();
        assert_eq!(url.as_str(), "https://suplink.example/api/faq?product=bolts");
    }

    #[test]
    fn build_url_strips_trailing_slashes() {
        let client = test_client("https://suplink.example/api//");
        let url = client.build_url("save-search-and-analyze", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://suplink.example/api/save-search-and-analyze"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://suplink.example");
        let key = SearchKey::new("nuts & bolts", "South Africa", SearchMode::Deep).unwrap();
        let url = client
            .build_url(
                "search",
                &[
                    ("product", key.display_product()),
                    ("country", key.display_country()),
                    ("mode", key.mode().as_str()),
                ],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://suplink.example/search?product=nuts+%26+bolts&country=South+Africa&mode=deep"
        );
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        let result = SuplinkClient::new("not a url", 30, "suplink-test/0.1");
        assert!(matches!(result, Err(ClientError::InvalidBaseUrl { .. })));
    }
}
