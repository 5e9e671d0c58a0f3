//! Folds search hits and stored analyses into one record per supplier.

use std::collections::HashMap;

use suplink_core::{normalize_identity, EnrichmentRecord, RawHit, SupplierRecord};

/// Merges `hits` and `enrichment` into one [`SupplierRecord`] per normalized
/// identity.
///
/// Hits are inserted first, in arrival order, so the Search API's relevance
/// order is the base order. Each enrichment record is then overlaid onto the
/// matching entry (its present fields win) or appended when the supplier did
/// not appear in `hits`. Entries without an identity are skipped.
///
/// Pure: the output only depends on the inputs.
#[must_use]
pub fn merge(hits: &[RawHit], enrichment: &[EnrichmentRecord]) -> Vec<SupplierRecord> {
    let mut merged: Vec<SupplierRecord> = Vec::with_capacity(hits.len() + enrichment.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(merged.capacity());

    for hit in hits {
        let identity = normalize_identity(&hit.identity);
        if identity.is_empty() {
            tracing::trace!(name = %hit.display_name, "skipping hit without url");
            continue;
        }
        match positions.get(&identity) {
            Some(&at) => merged[at].overlay_hit(hit),
            None => {
                positions.insert(identity, merged.len());
                merged.push(SupplierRecord::from_hit(hit));
            }
        }
    }

    for record in enrichment {
        let identity = normalize_identity(&record.identity);
        if identity.is_empty() {
            continue;
        }
        match positions.get(&identity) {
            Some(&at) => merged[at].overlay_enrichment(record),
            None => {
                positions.insert(identity, merged.len());
                merged.push(SupplierRecord::from_enrichment(record));
            }
        }
    }

    merged
}
