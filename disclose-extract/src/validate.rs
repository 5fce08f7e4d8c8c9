//! Structural validation of corrected drafts and the confidence score.
//!
//! The validator never rejects: it reports problems as notes, and each note
//! costs the record a fixed slice of confidence. Rejection happens only for
//! empty shells, upstream in the assembler.

use disclose_core::{
    DraftRecord, NormalizationMethod, ParseStrategy, TransactionType, normalize_amount,
    normalize_owner,
};

use crate::tokens::parse_flexible_date;

const COMPLETENESS_WEIGHT: f64 = 0.5;
const CORE_FIELD_COUNT: f64 = 6.0;
const CORRECTION_BONUS: f64 = 0.10;
const CORRECTION_BONUS_CAP: f64 = 0.30;
const NOTE_PENALTY: f64 = 0.05;

/// Check the corrected draft's tail fields against their expected shapes.
/// Returns one note per problem found, in field order.
pub fn validate_draft(draft: &DraftRecord) -> Vec<String> {
    let mut notes = Vec::new();

    let owner = normalize_owner(&draft.owner);
    if !owner.is_resolved() || owner.method == NormalizationMethod::Heuristic {
        notes.push(format!("owner {:?} not a recognized code", draft.owner));
    }

    if TransactionType::from_raw(&draft.transaction_type).is_none() {
        notes.push(format!(
            "transaction type {:?} not recognized",
            draft.transaction_type
        ));
    }

    let transaction = date_note(&draft.transaction_date, "transaction date", &mut notes);
    let notification = date_note(&draft.notification_date, "notification date", &mut notes);
    if let (Some(t), Some(n)) = (transaction, notification) {
        if n < t {
            notes.push("notification date precedes transaction date".to_string());
        }
    }

    if draft.amount.trim().is_empty() {
        notes.push("amount missing".to_string());
    } else if !normalize_amount(&draft.amount).is_resolved() {
        notes.push(format!("amount {:?} unresolvable", draft.amount));
    }

    notes
}

fn date_note(
    raw: &str,
    field: &str,
    notes: &mut Vec<String>,
) -> Option<chrono::NaiveDate> {
    if raw.trim().is_empty() {
        notes.push(format!("{field} missing"));
        return None;
    }
    match parse_flexible_date(raw) {
        Some(date) => Some(date),
        None => {
            notes.push(format!("{field} {raw:?} unparseable"));
            None
        }
    }
}

/// How many of the six core raw fields hold any text.
pub fn populated_core_fields(draft: &DraftRecord) -> usize {
    [
        &draft.owner,
        &draft.asset_description,
        &draft.transaction_type,
        &draft.transaction_date,
        &draft.notification_date,
        &draft.amount,
    ]
    .iter()
    .filter(|f| !f.trim().is_empty())
    .count()
}

fn strategy_bonus(strategy: ParseStrategy) -> f64 {
    match strategy {
        ParseStrategy::Standard => 0.30,
        ParseStrategy::Relaxed => 0.20,
        ParseStrategy::Shifted => 0.15,
        ParseStrategy::Partial => 0.10,
    }
}

/// Additive confidence score, clamped to `[0, 1]`.
///
/// Completeness carries half the weight; the strategy bonus rewards lines
/// that needed less coercion; corrections earn a small bonus (a repaired
/// record beats an unrepaired suspect one) up to a cap; every validator
/// note costs a fixed penalty. A fully populated standard-strategy record
/// with no corrections and no notes scores exactly 0.8.
pub fn confidence_score(
    populated: usize,
    strategy: ParseStrategy,
    corrections: usize,
    validator_notes: usize,
) -> f64 {
    let completeness = COMPLETENESS_WEIGHT * (populated.min(6) as f64 / CORE_FIELD_COUNT);
    let repairs = (corrections as f64 * CORRECTION_BONUS).min(CORRECTION_BONUS_CAP);
    let penalty = validator_notes as f64 * NOTE_PENALTY;
    (completeness + strategy_bonus(strategy) + repairs - penalty).clamp(0.0, 1.0)
}
