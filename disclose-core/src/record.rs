//! Trade record model: the mutable draft that correction rules rewrite, and
//! the immutable assembled record with normalized fields and provenance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amount::AmountValue;
use crate::owner::OwnerType;

/// Transaction type vocabulary. Filings print single letters (`P`, `S`, `E`)
/// with `S (partial)` marking a partial sale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[serde(rename = "purchase")]
    Purchase,
    #[serde(rename = "sale")]
    Sale,
    #[serde(rename = "partial-sale")]
    PartialSale,
    #[serde(rename = "exchange")]
    Exchange,
}

impl TransactionType {
    /// Map a raw type token: short letter codes, the `(partial)` suffix
    /// form, and spelled-out words all appear in extracted text.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let cleaned = raw.trim().trim_end_matches([',', '.', ';']).to_ascii_uppercase();
        match cleaned.as_str() {
            "P" | "PURCHASE" => Some(TransactionType::Purchase),
            "S" | "SALE" | "SALE (FULL)" | "S (FULL)" => Some(TransactionType::Sale),
            "E" | "EXCHANGE" => Some(TransactionType::Exchange),
            "S (PARTIAL)" | "SALE (PARTIAL)" | "S(PARTIAL)" => Some(TransactionType::PartialSale),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Sale => "sale",
            TransactionType::PartialSale => "partial-sale",
            TransactionType::Exchange => "exchange",
        }
    }
}

/// Which extraction strategy produced a draft. Ordered by how much the line
/// had to be coerced; the confidence scorer grants a descending bonus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ParseStrategy {
    /// Anchored regex over a well-formed line.
    #[serde(rename = "standard")]
    Standard,
    /// Same shape but tolerating malformed spacing/punctuation or a missing
    /// owner prefix.
    #[serde(rename = "relaxed")]
    Relaxed,
    /// Token re-anchoring from the line tail after a field shift.
    #[serde(rename = "shifted")]
    Shifted,
    /// Partial acceptance with missing fields noted.
    #[serde(rename = "partial")]
    Partial,
}

impl ParseStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            ParseStrategy::Standard => "standard",
            ParseStrategy::Relaxed => "relaxed",
            ParseStrategy::Shifted => "shifted",
            ParseStrategy::Partial => "partial",
        }
    }
}

/// The eleven raw string fields of one disclosure entry, as extracted,
/// before normalization. Mutable while the correction cascade runs.
///
/// `raw_line` preserves the structural line the strategy matched so that
/// correction rules can re-derive fields from token positions; rules
/// relocate or reinterpret text, they never drop it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DraftRecord {
    pub member: String,
    pub doc_id: String,
    pub owner: String,
    pub asset_description: String,
    pub ticker: String,
    pub transaction_type: String,
    pub transaction_date: String,
    pub notification_date: String,
    pub amount: String,
    pub filing_status: String,
    pub description: String,

    /// The structural line that produced this draft.
    pub raw_line: String,
    /// Warnings accumulated during extraction/correction.
    pub notes: Vec<String>,
}

impl DraftRecord {
    /// True when the three document-level required fields are all blank;
    /// such drafts are rejected outright rather than scored.
    pub fn is_empty_shell(&self) -> bool {
        self.member.trim().is_empty()
            && self.doc_id.trim().is_empty()
            && self.asset_description.trim().is_empty()
    }

    pub fn push_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

/// Final normalized trade record. Immutable once assembled: raw fields kept
/// verbatim for audit, normalized fields populated by the assembler, and
/// full provenance (strategy, correction rules, notes) attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRecord {
    pub member: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub doc_id: String,

    pub owner: Option<OwnerType>,
    pub owner_raw: String,

    pub asset_description: String,
    pub ticker: Option<String>,
    pub ticker_raw: String,
    /// Display name resolved from a two-letter asset-type code when no
    /// ticker could be extracted (e.g. `ST` -> "Stock").
    pub asset_type: Option<String>,

    pub transaction_type: Option<TransactionType>,
    pub transaction_type_raw: String,

    pub transaction_date: Option<NaiveDate>,
    pub transaction_date_raw: String,
    pub notification_date: Option<NaiveDate>,
    pub notification_date_raw: String,

    pub amount: Option<AmountValue>,
    pub amount_raw: String,

    pub filing_status: String,
    pub description: String,

    /// Overall confidence in [0, 1].
    pub confidence: f64,
    /// Which extraction strategy produced the draft.
    pub strategy: ParseStrategy,
    /// Ordered correction-rule ids applied to the draft.
    pub edge_cases_applied: Vec<String>,
    /// Human-readable warnings and errors.
    pub parsing_notes: Vec<String>,
}

impl TradeRecord {
    /// True if any correction rule fired for this record.
    pub fn was_corrected(&self) -> bool {
        !self.edge_cases_applied.is_empty()
    }

    /// True when ticker, owner, and amount all normalized.
    pub fn fully_normalized(&self) -> bool {
        self.ticker.is_some() && self.owner.is_some() && self.amount.is_some()
    }
}

/// Best-effort first/last name split of a member string.
///
/// Handles `Last, First`, `Hon. First [Middle] Last`, and plain
/// `First [Middle] Last`. Returns `(None, None)` when the string has no
/// usable name shape.
pub fn split_member_name(member: &str) -> (Option<String>, Option<String>) {
    let cleaned = member
        .trim()
        .trim_start_matches("Hon.")
        .trim_start_matches("Hon ")
        .trim_start_matches("Rep.")
        .trim_start_matches("Sen.")
        .trim();
    if cleaned.is_empty() {
        return (None, None);
    }

    if let Some((last, first)) = cleaned.split_once(',') {
        let first_token = first.trim().split_whitespace().next();
        return (
            first_token.map(|s| s.to_string()),
            non_empty(last.trim()),
        );
    }

    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    match parts.len() {
        0 => (None, None),
        1 => (None, Some(parts[0].to_string())),
        _ => (
            Some(parts[0].to_string()),
            Some(parts[parts.len() - 1].to_string()),
        ),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}
