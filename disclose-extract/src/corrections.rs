//! Edge-case correction engine: an ordered cascade of independent rewrite
//! rules over a draft record.
//!
//! Each rule is a pure function guarded by a structural predicate on the
//! current field values. Rules relocate or reinterpret text, they never
//! drop it. The cascade re-evaluates from the top after every rewrite
//! (one correction can expose the need for another) and applies each rule
//! at most once per record; every application is recorded by id.

use disclose_core::{DraftRecord, ReferenceData};
use tracing::{debug, warn};

use crate::tokens::{is_date_shaped, is_type_shaped};

pub const TRANSACTION_DATE_AMOUNT_SHIFT: &str = "transaction_date_amount_shift";
pub const NOTIFICATION_DATE_AMOUNT_SHIFT: &str = "notification_date_amount_shift";
pub const PARTIAL_SALE_SPLIT: &str = "partial_sale_split";
pub const TYPE_HOLDS_DATES: &str = "type_holds_dates";
pub const SPOUSE_DC_PLACEHOLDER: &str = "spouse_dc_placeholder";
pub const COMPANY_TICKER_XREF: &str = "company_ticker_xref";
pub const KNOWN_BAD_RECORD: &str = "known_bad_record";

type RuleFn = fn(&DraftRecord, &ReferenceData) -> Option<DraftRecord>;

pub struct CorrectionRule {
    pub id: &'static str,
    apply: RuleFn,
}

const RULES: [CorrectionRule; 7] = [
    CorrectionRule {
        id: TRANSACTION_DATE_AMOUNT_SHIFT,
        apply: transaction_date_amount_shift,
    },
    CorrectionRule {
        id: NOTIFICATION_DATE_AMOUNT_SHIFT,
        apply: notification_date_amount_shift,
    },
    CorrectionRule {
        id: PARTIAL_SALE_SPLIT,
        apply: partial_sale_split,
    },
    CorrectionRule {
        id: TYPE_HOLDS_DATES,
        apply: type_holds_dates,
    },
    CorrectionRule {
        id: SPOUSE_DC_PLACEHOLDER,
        apply: spouse_dc_placeholder,
    },
    CorrectionRule {
        id: COMPANY_TICKER_XREF,
        apply: company_ticker_xref,
    },
    CorrectionRule {
        id: KNOWN_BAD_RECORD,
        apply: known_bad_record,
    },
];

/// The cascade, in application order.
pub fn rules() -> &'static [CorrectionRule] {
    &RULES
}

/// Run the cascade to a fixed point. Returns the corrected draft and the
/// ordered rule ids that fired.
pub fn run_corrections(draft: DraftRecord, data: &ReferenceData) -> (DraftRecord, Vec<String>) {
    let mut current = draft;
    let mut applied: Vec<String> = Vec::new();
    'cascade: loop {
        for rule in &RULES {
            if applied.iter().any(|id| id == rule.id) {
                continue;
            }
            let Some(next) = (rule.apply)(&current, data) else {
                continue;
            };
            if next == current {
                continue;
            }
            if rule.id == KNOWN_BAD_RECORD {
                // Manual curation hits warn, not debug: each one is a
                // candidate for promotion into a general rule.
                warn!(
                    doc_id = %current.doc_id,
                    ticker = %current.ticker,
                    "known-bad override applied"
                );
            } else {
                debug!(rule = rule.id, "correction applied");
            }
            current = next;
            applied.push(rule.id.to_string());
            continue 'cascade;
        }
        break;
    }
    (current, applied)
}

/// Re-derive the four tail fields (type, both dates, amount) from token
/// positions, anchored at the rightmost recognizable type token. Prefers
/// the preserved structural line; falls back to the tail slots themselves
/// for drafts that arrive without one (bulk repair of persisted rows).
fn reanchor_tail(draft: &DraftRecord) -> Option<DraftRecord> {
    let source = if draft.raw_line.trim().is_empty() {
        format!(
            "{} {} {} {}",
            draft.transaction_type, draft.transaction_date, draft.notification_date, draft.amount
        )
    } else {
        draft.raw_line.clone()
    };
    let tokens: Vec<&str> = source.split_whitespace().collect();
    let type_idx = tokens.iter().rposition(|t| is_type_shaped(t))?;

    let mut type_token = tokens[type_idx].to_ascii_uppercase();
    let mut tail_start = type_idx + 1;
    if let Some(next) = tokens.get(tail_start) {
        if next
            .trim_end_matches([',', '.'])
            .eq_ignore_ascii_case("(partial)")
        {
            type_token = format!("{} (PARTIAL)", tokens[type_idx].to_ascii_uppercase());
            tail_start += 1;
        }
    }

    let date_idxs: Vec<usize> = (tail_start..tokens.len())
        .filter(|&i| is_date_shaped(tokens[i]))
        .collect();
    let (t_idx, n_idx) = match date_idxs.as_slice() {
        [] => return None,
        [one] => (*one, None),
        [first, second, ..] => (*first, Some(*second)),
    };

    let mut amount_parts: Vec<&str> = Vec::new();
    for i in tail_start..tokens.len() {
        if i == t_idx || Some(i) == n_idx {
            continue;
        }
        amount_parts.push(tokens[i]);
    }

    let mut fixed = draft.clone();
    fixed.transaction_type = type_token;
    fixed.transaction_date = tokens[t_idx]
        .trim_end_matches([',', '.', ';'])
        .to_string();
    fixed.notification_date = n_idx
        .map(|i| tokens[i].trim_end_matches([',', '.', ';']).to_string())
        .unwrap_or_default();
    fixed.amount = amount_parts.join(" ");
    Some(fixed)
}

/// The transaction-date slot holds a dollar amount: the whole tail is off
/// by at least one token.
fn transaction_date_amount_shift(draft: &DraftRecord, _data: &ReferenceData) -> Option<DraftRecord> {
    if !draft.transaction_date.trim().starts_with('$') {
        return None;
    }
    reanchor_tail(draft)
}

/// The notification-date slot holds a dollar amount, or a date landed in
/// the amount slot: the tail is off by one, with the true amount (if any)
/// sitting earlier than its slot.
fn notification_date_amount_shift(
    draft: &DraftRecord,
    _data: &ReferenceData,
) -> Option<DraftRecord> {
    if draft.transaction_date.trim().starts_with('$') {
        return None;
    }
    let shifted = draft.notification_date.trim().starts_with('$')
        || is_date_shaped(draft.amount.trim());
    if !shifted {
        return None;
    }
    reanchor_tail(draft)
}

/// The type slot holds only `(partial)`: the real type letter was severed
/// into the asset tail. Re-join, retrying once for the double-shift case.
fn partial_sale_split(draft: &DraftRecord, _data: &ReferenceData) -> Option<DraftRecord> {
    if !draft
        .transaction_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("(partial)")
    {
        return None;
    }
    let mut asset_tokens: Vec<&str> = draft.asset_description.split_whitespace().collect();
    let mut joined = draft.transaction_type.trim().to_string();
    for _ in 0..2 {
        if !joined.to_ascii_lowercase().starts_with("(partial)") {
            break;
        }
        let Some(last) = asset_tokens.pop() else {
            break;
        };
        joined = format!("{} {joined}", last.to_ascii_uppercase());
    }
    let first = joined.split_whitespace().next()?;
    if !is_type_shaped(first) {
        return None;
    }
    let mut fixed = draft.clone();
    fixed.transaction_type = format!("{} (PARTIAL)", first.to_ascii_uppercase());
    fixed.asset_description = asset_tokens.join(" ");
    Some(fixed)
}

/// The type slot starts with a digit: it actually holds date text. Re-read
/// the tail from further back; for drafts with no recoverable type token,
/// split the dates out directly and relocate whatever the date slots held.
fn type_holds_dates(draft: &DraftRecord, _data: &ReferenceData) -> Option<DraftRecord> {
    if !draft
        .transaction_type
        .trim()
        .starts_with(|c: char| c.is_ascii_digit())
    {
        return None;
    }
    if let Some(fixed) = reanchor_tail(draft) {
        return Some(fixed);
    }

    let dates: Vec<&str> = draft
        .transaction_type
        .split_whitespace()
        .filter(|t| is_date_shaped(t))
        .collect();
    if dates.is_empty() {
        return None;
    }
    let leftover: Vec<&str> = draft
        .transaction_type
        .split_whitespace()
        .filter(|t| !is_date_shaped(t))
        .collect();

    let mut fixed = draft.clone();
    fixed.transaction_date = dates[0].trim_end_matches([',', '.', ';']).to_string();
    if let Some(second) = dates.get(1) {
        fixed.notification_date = second.trim_end_matches([',', '.', ';']).to_string();
    }
    fixed.transaction_type = leftover.join(" ");
    let displaced = draft.transaction_date.trim();
    if !displaced.is_empty() && !is_date_shaped(displaced) {
        if fixed.amount.trim().is_empty() {
            fixed.amount = displaced.to_string();
        } else {
            fixed.push_note(format!("displaced token {displaced:?} from date slot"));
        }
    }
    Some(fixed)
}

/// The literal `Spouse/DC` placeholder stands in for the filing's default
/// range.
fn spouse_dc_placeholder(draft: &DraftRecord, data: &ReferenceData) -> Option<DraftRecord> {
    if !draft.amount.trim().eq_ignore_ascii_case("spouse/dc") {
        return None;
    }
    let mut fixed = draft.clone();
    fixed.amount = data.placeholder_bracket().label().to_string();
    fixed.push_note("spouse/dc placeholder replaced with default range");
    Some(fixed)
}

/// No usable ticker, but the first asset word matches the first word of a
/// curated company name: adopt the canonical name/ticker pair.
fn company_ticker_xref(draft: &DraftRecord, data: &ReferenceData) -> Option<DraftRecord> {
    if data.is_known_ticker(&draft.ticker) {
        return None;
    }
    let first = draft.asset_description.split_whitespace().next()?;
    let first = first.trim_matches(|c: char| !c.is_alphanumeric());
    let entry = data.company_by_first_word(first)?;
    if draft.ticker == entry.ticker && draft.asset_description == entry.name {
        return None;
    }
    let mut fixed = draft.clone();
    if fixed.asset_description != entry.name {
        fixed.push_note(format!(
            "asset text {:?} cross-referenced to {:?}",
            fixed.asset_description, entry.name
        ));
    }
    fixed.ticker = entry.ticker.clone();
    fixed.asset_description = entry.name.clone();
    Some(fixed)
}

/// Individually verified historical failure keyed on `(doc_id, ticker)`.
fn known_bad_record(draft: &DraftRecord, data: &ReferenceData) -> Option<DraftRecord> {
    let hit = data.known_bad_for(&draft.doc_id, &draft.ticker)?;
    let mut fixed = draft.clone();
    if let Some(ticker) = &hit.fix.ticker {
        fixed.ticker = ticker.clone();
    }
    if let Some(asset) = &hit.fix.asset_description {
        fixed.asset_description = asset.clone();
    }
    if let Some(tt) = &hit.fix.transaction_type {
        fixed.transaction_type = tt.clone();
    }
    if let Some(amount) = &hit.fix.amount {
        fixed.amount = amount.clone();
    }
    if fixed == *draft {
        return None;
    }
    fixed.push_note("manually curated override for this filing");
    Some(fixed)
}
