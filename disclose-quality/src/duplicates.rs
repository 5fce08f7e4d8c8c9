//! Near-duplicate detection over a batch of records.
//!
//! Two passes. First, exact grouping on the identity key
//! `{doc_id, member, transaction date, asset description}` catches re-filed
//! entries verbatim. Second, field-weighted fuzzy similarity between record
//! pairs that share a member catches re-files with cosmetic edits or a new
//! filing id; pairs at or above the threshold become candidate groups for
//! human review. Comparison is tokenized, so whitespace-only differences
//! still score as duplicates.

use std::collections::{HashMap, HashSet};

use disclose_core::TradeRecord;
use disclose_core::matching::token_set_ratio;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DUPLICATE_THRESHOLD: f64 = 0.8;

const ASSET_WEIGHT: f64 = 0.5;
const DATE_WEIGHT: f64 = 0.2;
const AMOUNT_WEIGHT: f64 = 0.15;
const TYPE_WEIGHT: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateKind {
    #[serde(rename = "exact")]
    Exact,
    #[serde(rename = "fuzzy")]
    Fuzzy,
}

impl DuplicateKind {
    pub fn label(&self) -> &'static str {
        match self {
            DuplicateKind::Exact => "exact",
            DuplicateKind::Fuzzy => "fuzzy",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub kind: DuplicateKind,
    /// Indices into the audited batch, ascending.
    pub indices: Vec<usize>,
    /// 1.0 for exact groups; the pair score for fuzzy candidates.
    pub similarity: f64,
}

/// Weighted similarity between two records' key fields, in [0, 1].
///
/// The asset description dominates (token-set ratio, so word order and
/// whitespace do not matter); transaction date, amount, and type contribute
/// equality checks. The filing id is deliberately not compared: a duplicate
/// filed twice gets a fresh id.
pub fn pair_similarity(a: &TradeRecord, b: &TradeRecord) -> f64 {
    let asset = token_set_ratio(&a.asset_description, &b.asset_description);
    let date = match (a.transaction_date, b.transaction_date) {
        (Some(x), Some(y)) => eq_score(x == y),
        _ => eq_score(a.transaction_date_raw.trim() == b.transaction_date_raw.trim()),
    };
    let amount = match (a.amount, b.amount) {
        (Some(x), Some(y)) => eq_score(x == y),
        _ => eq_score(a.amount_raw.trim() == b.amount_raw.trim()),
    };
    let tx_type = match (a.transaction_type, b.transaction_type) {
        (Some(x), Some(y)) => eq_score(x == y),
        _ => eq_score(a.transaction_type_raw.trim() == b.transaction_type_raw.trim()),
    };
    ASSET_WEIGHT * asset + DATE_WEIGHT * date + AMOUNT_WEIGHT * amount + TYPE_WEIGHT * tx_type
}

fn eq_score(equal: bool) -> f64 {
    if equal { 1.0 } else { 0.0 }
}

/// Find duplicate groups in a batch. Groups come back ordered by their
/// first record index; each fuzzy group is one pair.
pub fn find_duplicates(records: &[TradeRecord]) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut paired: HashSet<(usize, usize)> = HashSet::new();

    let mut exact: HashMap<(String, String, String, String), Vec<usize>> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        let key = (
            record.doc_id.trim().to_string(),
            record.member.trim().to_string(),
            record.transaction_date_raw.trim().to_string(),
            record.asset_description.trim().to_string(),
        );
        exact.entry(key).or_default().push(i);
    }
    for indices in exact.into_values() {
        if indices.len() < 2 {
            continue;
        }
        for (pos, &i) in indices.iter().enumerate() {
            for &j in &indices[pos + 1..] {
                paired.insert((i, j));
            }
        }
        groups.push(DuplicateGroup {
            kind: DuplicateKind::Exact,
            indices,
            similarity: 1.0,
        });
    }

    let mut by_member: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        by_member
            .entry(record.member.trim().to_string())
            .or_default()
            .push(i);
    }
    for indices in by_member.into_values() {
        for (pos, &i) in indices.iter().enumerate() {
            for &j in &indices[pos + 1..] {
                if paired.contains(&(i, j)) {
                    continue;
                }
                let score = pair_similarity(&records[i], &records[j]);
                if score >= DUPLICATE_THRESHOLD {
                    groups.push(DuplicateGroup {
                        kind: DuplicateKind::Fuzzy,
                        indices: vec![i, j],
                        similarity: score,
                    });
                }
            }
        }
    }

    groups.sort_by_key(|g| (g.indices[0], g.indices.get(1).copied().unwrap_or(0)));
    debug!(records = records.len(), groups = groups.len(), "duplicate scan finished");
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use disclose_core::ReferenceData;
    use disclose_extract::parse_document;

    fn batch() -> Vec<TradeRecord> {
        let data = ReferenceData::curated();
        let text = "\
Name: Doe, Jane
JT Apple Inc. (AAPL) P 01/27/2023 02/06/2023 $1,001 - $15,000
SP Pfizer Inc. (PFE) S 04/02/2023 04/06/2023 $15,001 - $50,000
";
        parse_document(text, "20017777", None, &data).records
    }

    #[test]
    fn test_distinct_records_are_not_grouped() {
        let records = batch();
        assert_eq!(records.len(), 2);
        assert!(pair_similarity(&records[0], &records[1]) < DUPLICATE_THRESHOLD);
        assert!(find_duplicates(&records).is_empty());
    }

    #[test]
    fn test_verbatim_refile_groups_exactly() {
        let mut records = batch();
        records.push(records[0].clone());
        let groups = find_duplicates(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, DuplicateKind::Exact);
        assert_eq!(groups[0].indices, vec![0, 2]);
        assert_eq!(groups[0].similarity, 1.0);
    }

    #[test]
    fn test_whitespace_variant_with_new_doc_id_is_fuzzy_candidate() {
        let mut records = batch();
        let mut refiled = records[0].clone();
        refiled.doc_id = "20018888".to_string();
        refiled.asset_description = "Apple  Inc.".to_string();
        records.push(refiled);
        assert!(pair_similarity(&records[0], &records[2]) > DUPLICATE_THRESHOLD);
        let groups = find_duplicates(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, DuplicateKind::Fuzzy);
        assert_eq!(groups[0].indices, vec![0, 2]);
        assert!(groups[0].similarity > DUPLICATE_THRESHOLD);
    }

    #[test]
    fn test_different_members_never_fuzzy_pair() {
        let mut records = batch();
        let mut other = records[0].clone();
        other.member = "Roe, Richard".to_string();
        other.doc_id = "20019999".to_string();
        records.push(other);
        assert!(find_duplicates(&records).is_empty());
    }
}
