//! Merge of freshly fetched draws into the local dataset.

use std::collections::HashSet;

use crate::types::{DrawCode, DrawRecord};

/// Union `fresh` and `existing`, keeping the first occurrence of each code
/// (fresh wins), sorted descending by code.
pub fn merge_draws(fresh: Vec<DrawRecord>, existing: Vec<DrawRecord>) -> Vec<DrawRecord> {
    let mut seen = HashSet::new();
    let mut merged: Vec<DrawRecord> = fresh
        .into_iter()
        .chain(existing)
        .filter(|record| seen.insert(record.code.clone()))
        .collect();

    merged.sort_by(|a, b| b.code.cmp(&a.code));
    merged
}

/// Latest code in a dataset
pub fn latest_code(records: &[DrawRecord]) -> Option<&DrawCode> {
    records.iter().map(|r| &r.code).max()
}
