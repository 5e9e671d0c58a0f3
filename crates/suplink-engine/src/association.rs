//! Decides which stored analyses belong to a search.
//!
//! A row belongs to a search when its stored query contains the product and
//! its stored country contains the country, case-insensitively, and it
//! carries a score. The match is a plain substring test: it can pick up rows
//! from unrelated queries that share a substring and miss paraphrased
//! country names.

use suplink_core::{EnrichmentRecord, SearchKey};

#[must_use]
pub fn is_associated(record: &EnrichmentRecord, key: &SearchKey) -> bool {
    record.overall_score.is_some()
        && contains_ignore_case(record.search_query.as_deref(), key.product())
        && contains_ignore_case(record.search_country.as_deref(), key.country())
}

/// Keeps the rows of `records` associated with `key`, in input order.
#[must_use]
pub fn associated_with(records: Vec<EnrichmentRecord>, key: &SearchKey) -> Vec<EnrichmentRecord> {
    records
        .into_iter()
        .filter(|record| is_associated(record, key))
        .collect()
}

/// `needle` is already lower-cased.
fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}
