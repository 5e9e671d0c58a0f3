//! Query identity: the `(product, country, mode)` triple every session and
//! every coalesced fetch is keyed by.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Search depth requested from the Search API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Quick,
    Deep,
}

impl SearchMode {
    /// Wire value sent as the `mode` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Quick => "quick",
            SearchMode::Deep => "deep",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(SearchMode::Quick),
            "deep" => Ok(SearchMode::Deep),
            other => Err(format!("unknown search mode '{other}' (expected quick or deep)")),
        }
    }
}

/// A search as submitted by a caller, before normalization.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub product: String,
    pub country: String,
    /// Defaults to [`SearchMode::Quick`] when unset.
    pub mode: Option<SearchMode>,
    /// Forwarded to the save-and-trigger call when present.
    pub user_id: Option<String>,
}

impl SearchQuery {
    #[must_use]
    pub fn new(product: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            country: country.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Normalized key for this query, or `None` if product or country is blank.
    #[must_use]
    pub fn key(&self) -> Option<SearchKey> {
        SearchKey::new(&self.product, &self.country, self.mode.unwrap_or_default())
    }
}

/// Normalized search identity.
///
/// Equality and hashing only look at the trimmed, lower-cased product and
/// country plus the mode. The trimmed caller spelling is retained for
/// outbound requests.
#[derive(Debug, Clone)]
pub struct SearchKey {
    product: String,
    country: String,
    mode: SearchMode,
    display_product: String,
    display_country: String,
}

impl SearchKey {
    /// Returns `None` when either product or country is empty after trimming.
    #[must_use]
    pub fn new(product: &str, country: &str, mode: SearchMode) -> Option<Self> {
        let display_product = product.trim();
        let display_country = country.trim();
        if display_product.is_empty() || display_country.is_empty() {
            return None;
        }
        Some(Self {
            product: display_product.to_lowercase(),
            country: display_country.to_lowercase(),
            mode,
            display_product: display_product.to_owned(),
            display_country: display_country.to_owned(),
        })
    }

    /// Lower-cased product.
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Lower-cased country.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Product as the caller typed it, trimmed.
    #[must_use]
    pub fn display_product(&self) -> &str {
        &self.display_product
    }

    /// Country as the caller typed it, trimmed.
    #[must_use]
    pub fn display_country(&self) -> &str {
        &self.display_country
    }
}

impl PartialEq for SearchKey {
    fn eq(&self, other: &Self) -> bool {
        self.product == other.product && self.country == other.country && self.mode == other.mode
    }
}

impl Eq for SearchKey {}

impl Hash for SearchKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.product.hash(state);
        self.country.hash(state);
        self.mode.hash(state);
    }
}

/// Canonical `product|country|mode` form, e.g. `bolts|india|quick`.
impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.product, self.country, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn key_normalizes_case_and_whitespace() {
        let a = SearchKey::new("  Bolts ", "INDIA", SearchMode::Quick).unwrap();
        let b = SearchKey::new("bolts", " india", SearchMode::Quick).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "bolts|india|quick");
        assert_eq!(a.display_product(), "Bolts");
        assert_eq!(a.display_country(), "INDIA");
    }

    #[test]
    fn keys_differing_only_in_mode_are_distinct() {
        let quick = SearchKey::new("bolts", "india", SearchMode::Quick).unwrap();
        let deep = SearchKey::new("bolts", "india", SearchMode::Deep).unwrap();
        assert_ne!(quick, deep);
    }

    #[test]
    fn equal_keys_hash_equally() {
        let mut set = HashSet::new();
        set.insert(SearchKey::new("Bolts", "India", SearchMode::Quick).unwrap());
        assert!(set.contains(&SearchKey::new("bolts", "india", SearchMode::Quick).unwrap()));
    }

    #[test]
    fn blank_product_or_country_yields_no_key() {
        assert!(SearchKey::new("   ", "india", SearchMode::Quick).is_none());
        assert!(SearchKey::new("bolts", "", SearchMode::Quick).is_none());
    }

    #[test]
    fn query_mode_defaults_to_quick() {
        let key = SearchQuery::new("bolts", "india").key().unwrap();
        assert_eq!(key.mode(), SearchMode::Quick);
    }

    #[test]
    fn search_mode_parses_case_insensitively() {
        assert_eq!(" Deep ".parse::<SearchMode>().unwrap(), SearchMode::Deep);
        assert_eq!("QUICK".parse::<SearchMode>().unwrap(), SearchMode::Quick);
        assert!("advanced".parse::<SearchMode>().is_err());
    }

    #[test]
    fn search_mode_serializes_lowercase() {
        let json = serde_json::to_string(&SearchMode::Deep).unwrap();
        assert_eq!(json, "\"deep\"");
    }
}
