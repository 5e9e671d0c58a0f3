//! Supplier records as they arrive from search and from the analysis store,
//! and the merged [`SupplierRecord`] both are folded into.

use serde::{Deserialize, Deserializer, Serialize};

/// Normalizes a supplier URL for identity comparison: trimmed, lower-cased,
/// with a single trailing `/` removed.
#[must_use]
pub fn normalize_identity(url: &str) -> String {
    let lowered = url.trim().to_lowercase();
    match lowered.strip_suffix('/') {
        Some(stripped) => stripped.to_owned(),
        None => lowered,
    }
}

/// Maps empty and whitespace-only strings to `None`.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_owned())
        }
    })
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(Option::<String>::deserialize(deserializer)?))
}

/// One hit from the Search API, in relevance order.
///
/// The API sends `""` for contact fields it could not extract; those
/// deserialize as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(rename = "url")]
    pub identity: String,
    #[serde(rename = "name", default)]
    pub display_name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub summary: Option<String>,
}

impl RawHit {
    #[must_use]
    pub fn new(identity: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            email: None,
            phone: None,
            summary: None,
        }
    }
}

/// A quality-analysis row for a supplier, produced out of band by the
/// analysis pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub identity: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: Option<String>,
    /// 0–25.
    pub overall_score: Option<i32>,
    /// 1–5.
    pub star_rating: Option<i32>,
    pub certifications: Option<Vec<String>>,
    pub verified_platform_name: Option<String>,
    /// Search term the analysis was originally run for.
    pub search_query: Option<String>,
    /// Country the analysis was originally run for.
    pub search_country: Option<String>,
}

impl EnrichmentRecord {
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_score(mut self, overall_score: i32) -> Self {
        self.overall_score = Some(overall_score);
        self
    }
}

/// Merged view of one supplier.
///
/// Serializes with the Search API field names so the list can be posted back
/// to the save-and-trigger endpoint unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierRecord {
    #[serde(rename = "url")]
    pub identity: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_platform_name: Option<String>,
}

impl SupplierRecord {
    #[must_use]
    pub fn from_hit(hit: &RawHit) -> Self {
        Self {
            identity: hit.identity.trim().to_owned(),
            display_name: hit.display_name.trim().to_owned(),
            email: non_blank(hit.email.clone()),
            phone: non_blank(hit.phone.clone()),
            summary: non_blank(hit.summary.clone()),
            overall_score: None,
            star_rating: None,
            certifications: None,
            verified_platform_name: None,
        }
    }

    #[must_use]
    pub fn from_enrichment(record: &EnrichmentRecord) -> Self {
        let mut merged = Self {
            identity: record.identity.trim().to_owned(),
            display_name: String::new(),
            email: None,
            phone: None,
            summary: None,
            overall_score: None,
            star_rating: None,
            certifications: None,
            verified_platform_name: None,
        };
        merged.overlay_enrichment(record);
        merged
    }

    /// Overlays a later hit for the same identity; present fields replace
    /// earlier ones.
    pub fn overlay_hit(&mut self, hit: &RawHit) {
        if !hit.display_name.trim().is_empty() {
            hit.display_name.trim().clone_into(&mut self.display_name);
        }
        overlay(&mut self.email, hit.email.as_ref());
        overlay(&mut self.phone, hit.phone.as_ref());
        overlay(&mut self.summary, hit.summary.as_ref());
    }

    /// Overlays an analysis row. Present enrichment fields win; absent ones
    /// leave the current value alone. Rating and certifications are only
    /// taken together with a score.
    pub fn overlay_enrichment(&mut self, record: &EnrichmentRecord) {
        if let Some(name) = record.display_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                name.clone_into(&mut self.display_name);
            }
        }
        overlay(&mut self.email, record.email.as_ref());
        overlay(&mut self.phone, record.phone.as_ref());
        overlay(&mut self.summary, record.summary.as_ref());
        overlay(
            &mut self.verified_platform_name,
            record.verified_platform_name.as_ref(),
        );

        if let Some(score) = record.overall_score {
            self.overall_score = Some(score);
            if record.star_rating.is_some() {
                self.star_rating = record.star_rating;
            }
            if let Some(certs) = &record.certifications {
                self.certifications = Some(certs.clone());
            }
        }
    }

    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.overall_score.is_some()
    }
}

fn overlay(slot: &mut Option<String>, incoming: Option<&String>) {
    if let Some(value) = non_blank(incoming.cloned()) {
        *slot = Some(value);
    }
}
