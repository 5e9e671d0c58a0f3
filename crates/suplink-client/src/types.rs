//! Request and response bodies that are not domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use suplink_core::supplier::non_blank;
use suplink_core::{AdvisoryItem, EnrichmentRecord, SearchMode, SupplierRecord};

/// Most advisory items ever returned for one product.
pub const MAX_ADVISORIES: usize = 5;

/// Body of `GET /faq`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FaqResponse {
    #[serde(default)]
    pub faqs: Vec<AdvisoryItem>,
}

/// Body of a non-2xx reply, when the API sends one.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

/// Body of `POST /save-search-and-analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct SaveSearchRequest {
    pub search_term: String,
    pub country: String,
    pub results: Vec<SupplierRecord>,
    pub mode: SearchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Reply from `POST /save-search-and-analyze`. Only used for logging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveSearchResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// Id of the saved search; a number or a string depending on the
    /// backing store.
    #[serde(default)]
    pub search_id: Option<Value>,
    #[serde(default)]
    pub new_urls_count: Option<u64>,
}

impl SaveSearchResponse {
    /// The saved search id as text, ready for
    /// [`crate::SuplinkClient::suppliers_by_search`].
    #[must_use]
    pub fn search_id(&self) -> Option<String> {
        match self.search_id.as_ref()? {
            Value::String(id) => non_blank(Some(id.clone())),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Body of `GET /suppliers-by-search`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SuppliersBySearchResponse {
    #[serde(default)]
    pub suppliers: Vec<DiscoveredSupplier>,
}

/// An analyzed supplier as stored by the backend, with its column names.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DiscoveredSupplier {
    pub website_url: String,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub score_analysis: Option<String>,
    pub overall_score: Option<i32>,
    pub star_rating: Option<i32>,
    pub certifications: Option<Value>,
    pub b2b_platform_name: Option<String>,
    pub search_query: Option<String>,
    pub search_country: Option<String>,
}

impl From<DiscoveredSupplier> for EnrichmentRecord {
    fn from(row: DiscoveredSupplier) -> Self {
        let certifications = match row.certifications {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) if !s.trim().is_empty() => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        };

        EnrichmentRecord {
            identity: row.website_url,
            display_name: non_blank(row.company_name),
            email: non_blank(row.email),
            phone: non_blank(row.phone),
            summary: non_blank(row.score_analysis),
            overall_score: row.overall_score,
            star_rating: row.star_rating,
            certifications,
            verified_platform_name: non_blank(row.b2b_platform_name),
            search_query: non_blank(row.search_query),
            search_country: non_blank(row.search_country),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn reply(search_id: Value) -> SaveSearchResponse {
        serde_json::from_value(json!({"message": "saved", "search_id": search_id})).unwrap()
    }

    #[test]
    fn search_id_accepts_numbers_and_strings() {
        assert_eq!(reply(json!(42)).search_id().as_deref(), Some("42"));
        assert_eq!(
            reply(json!("7f1c0a9e")).search_id().as_deref(),
            Some("7f1c0a9e")
        );
    }

    #[test]
    fn search_id_ignores_null_and_blank() {
        assert!(reply(Value::Null).search_id().is_none());
        assert!(reply(json!("  ")).search_id().is_none());
        assert!(SaveSearchResponse::default().search_id().is_none());
    }

    #[test]
    fn discovered_supplier_maps_to_enrichment_record() {
        let row: DiscoveredSupplier = serde_json::from_value(json!({
            "website_url": "https://acme.example",
            "company_name": "Acme",
            "email": "",
            "overall_score": 21,
            "star_rating": 4,
            "certifications": ["ISO 9001", " ", 5],
            "b2b_platform_name": "IndiaMART",
            "discover_search_id": 42
        }))
        .unwrap();
        let record = EnrichmentRecord::from(row);
        assert_eq!(record.identity, "https://acme.example");
        assert_eq!(record.display_name.as_deref(), Some("Acme"));
        assert!(record.email.is_none());
        assert_eq!(record.overall_score, Some(21));
        assert_eq!(record.certifications, Some(vec!["ISO 9001".to_owned()]));
        assert_eq!(record.verified_platform_name.as_deref(), Some("IndiaMART"));
    }
}
