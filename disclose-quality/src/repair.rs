//! Bulk repair of weak records without re-parsing.
//!
//! Typical use: the reference dictionaries have grown since a batch was
//! parsed, and records that assembled with an unresolved ticker or owner
//! can now resolve. [`plan_repairs`] re-runs just those two normalizers
//! and builds a dry-run plan of per-record changes; nothing is mutated
//! until [`RepairPlan::apply_to`].

use disclose_core::{OwnerType, ReferenceData, TradeRecord, normalize_owner, normalize_ticker};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Records at or below this confidence are re-examined even when fully
/// normalized.
const REVISIT_CONFIDENCE: f64 = 0.5;

/// One record's pending changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRepair {
    /// Index into the audited batch.
    pub index: usize,
    /// Newly resolvable ticker, if the stored record had none.
    pub ticker: Option<String>,
    /// Newly resolvable owner, if the stored record had none.
    pub owner: Option<OwnerType>,
    /// Human-readable before/after lines.
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairPlan {
    /// How many records were eligible for re-examination.
    pub examined: usize,
    pub repairs: Vec<RecordRepair>,
}

impl RepairPlan {
    pub fn is_empty(&self) -> bool {
        self.repairs.is_empty()
    }

    /// The full diff, one line per field change.
    pub fn describe(&self) -> Vec<String> {
        self.repairs
            .iter()
            .flat_map(|r| r.notes.iter().map(move |n| format!("record {}: {n}", r.index)))
            .collect()
    }

    /// Write the planned changes into the batch. Returns how many records
    /// were touched. Indices outside the slice are skipped.
    pub fn apply_to(&self, records: &mut [TradeRecord]) -> usize {
        let mut touched = 0;
        for repair in &self.repairs {
            let Some(record) = records.get_mut(repair.index) else {
                continue;
            };
            if let Some(symbol) = &repair.ticker {
                record.ticker = Some(symbol.clone());
            }
            if let Some(owner) = repair.owner {
                record.owner = Some(owner);
            }
            record
                .parsing_notes
                .push("repaired in bulk re-normalization pass".to_string());
            touched += 1;
        }
        info!(touched, "repair plan applied");
        touched
    }
}

/// Re-run the ticker and owner normalizers over eligible records (low
/// confidence, or assembled with normalization gaps) against the current
/// reference data. Pure with respect to `records`.
pub fn plan_repairs(records: &[TradeRecord], data: &ReferenceData) -> RepairPlan {
    let mut plan = RepairPlan::default();
    for (index, record) in records.iter().enumerate() {
        if record.confidence > REVISIT_CONFIDENCE && record.fully_normalized() {
            continue;
        }
        plan.examined += 1;
        let mut repair = RecordRepair {
            index,
            ticker: None,
            owner: None,
            notes: Vec::new(),
        };

        if record.ticker.is_none() {
            let mut res = normalize_ticker(&record.ticker_raw, data);
            if !res.is_resolved() {
                let fallback = normalize_ticker(&record.asset_description, data);
                if fallback.is_resolved() {
                    res = fallback;
                }
            }
            if let Some(symbol) = res.value {
                repair.notes.push(format!("ticker: (unresolved) -> {symbol}"));
                repair.ticker = Some(symbol);
            }
        }

        if record.owner.is_none() {
            if let Some(owner) = normalize_owner(&record.owner_raw).value {
                repair
                    .notes
                    .push(format!("owner: {:?} -> {}", record.owner_raw, owner.label()));
                repair.owner = Some(owner);
            }
        }

        if repair.ticker.is_some() || repair.owner.is_some() {
            plan.repairs.push(repair);
        }
    }
    info!(
        examined = plan.examined,
        repairs = plan.repairs.len(),
        "repair plan built"
    );
    plan
}
