//! Draft-to-record assembly: validation, scoring, normalization, and the
//! final immutable [`TradeRecord`].
//!
//! Assembly is deliberately lossless about provenance: raw field text,
//! strategy, applied correction ids, and every note from extraction,
//! normalization, and validation survive into the record.

use disclose_core::{
    DraftRecord, ParseStrategy, ReferenceData, TradeRecord, TransactionType, detect_asset_type,
    normalize_amount, normalize_owner, normalize_ticker, split_member_name,
};
use tracing::debug;

use crate::tokens::parse_flexible_date;
use crate::validate::{confidence_score, populated_core_fields, validate_draft};

/// Build the final record from a corrected draft. Returns `None` only for
/// empty shells (member, document id, and asset all blank); everything else
/// is kept and scored, however weak.
pub fn assemble(
    draft: DraftRecord,
    strategy: ParseStrategy,
    edge_cases: Vec<String>,
    data: &ReferenceData,
) -> Option<TradeRecord> {
    if draft.is_empty_shell() {
        debug!("draft rejected: member, doc id, and asset all blank");
        return None;
    }

    let validator_notes = validate_draft(&draft);
    let confidence = confidence_score(
        populated_core_fields(&draft),
        strategy,
        edge_cases.len(),
        validator_notes.len(),
    );

    let owner = normalize_owner(&draft.owner);

    // The ticker slot comes first; when it holds nothing usable, the asset
    // description often carries the symbol inline.
    let mut ticker = normalize_ticker(&draft.ticker, data);
    if !ticker.is_resolved() {
        let from_description = normalize_ticker(&draft.asset_description, data);
        if from_description.is_resolved() {
            ticker = from_description;
        }
    }
    let asset_type = if ticker.is_resolved() {
        None
    } else {
        detect_asset_type(&draft.ticker, data)
            .or_else(|| detect_asset_type(&draft.asset_description, data))
            .map(str::to_string)
    };

    let amount = normalize_amount(&draft.amount);
    let (first_name, last_name) = split_member_name(&draft.member);

    let mut parsing_notes = draft.notes.clone();
    parsing_notes.extend(owner.notes.iter().cloned());
    parsing_notes.extend(ticker.notes.iter().cloned());
    parsing_notes.extend(amount.notes.iter().cloned());
    parsing_notes.extend(validator_notes);

    Some(TradeRecord {
        member: draft.member,
        first_name,
        last_name,
        doc_id: draft.doc_id,
        owner: owner.value,
        owner_raw: draft.owner,
        asset_description: draft.asset_description,
        ticker: ticker.value,
        ticker_raw: draft.ticker,
        asset_type,
        transaction_type: TransactionType::from_raw(&draft.transaction_type),
        transaction_type_raw: draft.transaction_type,
        transaction_date: parse_flexible_date(&draft.transaction_date),
        transaction_date_raw: draft.transaction_date,
        notification_date: parse_flexible_date(&draft.notification_date),
        notification_date_raw: draft.notification_date,
        amount: amount.value,
        amount_raw: draft.amount,
        filing_status: draft.filing_status,
        description: draft.description,
        confidence,
        strategy,
        edge_cases_applied: edge_cases,
        parsing_notes,
    })
}
