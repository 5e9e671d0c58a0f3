//! Read access to the `suplink_discovered` analysis table.
//!
//! Rows are returned unfiltered; associating them with a search is the
//! engine's job.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use suplink_core::supplier::non_blank;
use suplink_core::EnrichmentRecord;
use uuid::Uuid;

use crate::DbError;

/// A row from the `suplink_discovered` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EnrichmentRow {
    pub id: Uuid,
    pub website_url: String,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub score_analysis: Option<String>,
    pub overall_score: Option<i32>,
    pub star_rating: Option<i32>,
    pub certifications: Value,
    pub b2b_platform_name: Option<String>,
    pub search_query: Option<String>,
    pub search_country: Option<String>,
    pub last_analyzed: Option<DateTime<Utc>>,
}

/// List every analysis row, most recently analyzed first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_enrichment_rows(pool: &PgPool) -> Result<Vec<EnrichmentRow>, DbError> {
    let rows = sqlx::query_as::<_, EnrichmentRow>(
        "SELECT id, website_url, company_name, email, phone, score_analysis, \
                overall_score, star_rating, certifications, b2b_platform_name, \
                search_query, search_country, last_analyzed \
         FROM suplink_discovered \
         ORDER BY last_analyzed DESC NULLS LAST, website_url",
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!(rows = rows.len(), "loaded enrichment rows");
    Ok(rows)
}

impl From<EnrichmentRow> for EnrichmentRecord {
    fn from(row: EnrichmentRow) -> Self {
        // Stored as a JSONB array of strings; anything else is ignored.
        let certifications = match row.certifications {
            Value::Array(items) => {
                let certs: Vec<String> = items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) if !s.trim().is_empty() => Some(s),
                        _ => None,
                    })
                    .collect();
                Some(certs)
            }
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
            search_query: row.search_query,
            search_country: row.search_country,
        }
    }
}
