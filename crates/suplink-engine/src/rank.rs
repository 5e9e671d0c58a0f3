//! Two-tier ordering of merged supplier records.

use std::cmp::Reverse;

use suplink_core::SupplierRecord;

/// Orders scored records (highest `overall_score` first) ahead of unscored
/// ones.
///
/// The sort is stable: tied scores keep their input order, and unscored
/// records keep their relative order. The boundary between the two tiers is
/// what [`split_groups`] reports.
#[must_use]
pub fn rank(records: Vec<SupplierRecord>) -> Vec<SupplierRecord> {
    let (mut scored, unscored): (Vec<_>, Vec<_>) =
        records.into_iter().partition(SupplierRecord::is_scored);
    scored.sort_by_key(|record| Reverse(record.overall_score));
    scored.extend(unscored);
    scored
}

/// Splits a ranked list into `(previously_analyzed, new)`.
#[must_use]
pub fn split_groups(ranked: &[SupplierRecord]) -> (&[SupplierRecord], &[SupplierRecord]) {
    let boundary = ranked.partition_point(SupplierRecord::is_scored);
    ranked.split_at(boundary)
}

#[cfg(test)]
mod tests {
    use suplink_core::RawHit;

    use super::*;

    fn record(url: &str, score: Option<i32>) -> SupplierRecord {
        let mut r = SupplierRecord::from_hit(&RawHit::new(url, url));
        r.overall_score = score;
        r
    }

    fn ids(records: &[SupplierRecord]) -> Vec<&str> {
        records.iter().map(|r| r.identity.as_str()).collect()
    }

    #[test]
    fn scored_first_descending_then_unscored() {
        let ranked = rank(vec![
            record("five", Some(5)),
            record("unscored", None),
            record("nine", Some(9)),
        ]);
        assert_eq!(ids(&ranked), ["nine", "five", "unscored"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = rank(vec![
            record("first", Some(12)),
            record("top", Some(20)),
            record("second", Some(12)),
            record("third", Some(12)),
        ]);
        assert_eq!(ids(&ranked), ["top", "first", "second", "third"]);
    }

    #[test]
    fn unscored_keep_relative_order() {
        let ranked = rank(vec![
            record("n1", None),
            record("s", Some(1)),
            record("n2", None),
            record("n3", None),
        ]);
        assert_eq!(ids(&ranked), ["s", "n1", "n2", "n3"]);
    }

    #[test]
    fn split_groups_follows_partition() {
        let ranked = rank(vec![
            record("new", None),
            record("old-a", Some(3)),
            record("old-b", Some(8)),
        ]);
        let (analyzed, fresh) = split_groups(&ranked);
        assert_eq!(ids(analyzed), ["old-b", "old-a"]);
        assert_eq!(ids(fresh), ["new"]);
    }

    #[test]
    fn empty_input_ranks_to_empty() {
        assert!(rank(Vec::new()).is_empty());
        let (analyzed, fresh) = split_groups(&[]);
        assert!(analyzed.is_empty() && fresh.is_empty());
    }
}
