//! Multi-strategy field extraction: one entry block in, one draft record
//! out, tried in fixed priority order.
//!
//! Strategy 1 is an anchored regex over a well-formed line. Strategy 2
//! relaxes spacing, punctuation, and the owner prefix. Strategy 3 re-anchors
//! the line tail positionally at the transaction-type token; it deliberately
//! does not inspect what lands in each slot, so a displaced amount or date
//! survives into the draft where the correction cascade can see it.
//! Strategy 4 accepts partial records and notes what is missing.

use std::sync::LazyLock;

use disclose_core::{DraftRecord, ParseStrategy};
use regex::Regex;
use tracing::debug;

use crate::classify::RawEntryBlock;
use crate::tokens::{is_amount_start, is_date_shaped, is_type_shaped, owner_prefix};

static STANDARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<owner>(?i:SP|DC|JT))\s+",
        r"(?P<asset>.+?)\s+",
        r"(?P<type>(?i:S\s*\(partial\)|S\s*\(full\)|P|S|E))\s+",
        r"(?P<tdate>\d{1,2}/\d{1,2}/\d{4})\s+",
        r"(?P<ndate>\d{1,2}/\d{1,2}/\d{4})\s+",
        r"(?P<amount>(?i:over\s+)?\$.+)$",
    ))
    .unwrap()
});

static RELAXED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:(?P<owner>(?i:SP|DC|JT))\b[\s.,:]*)?",
        r"(?P<asset>.+?)[\s.,;:]+",
        r"(?P<type>(?i:S\s*\(partial\)|S\s*\(full\)|P|S|E))[\s.,]+",
        r"(?P<tdate>\d{1,2}/\d{1,2}/\d{4}|\d{4}-\d{2}-\d{2})[\s.,]+",
        r"(?P<ndate>\d{1,2}/\d{1,2}/\d{4}|\d{4}-\d{2}-\d{2})[\s.,]+",
        r"(?P<amount>(?i:over\s+)?\$.*)$",
    ))
    .unwrap()
});

static TRAILING_TICKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.*?)\s*[(\[](?P<sym>[A-Za-z][A-Za-z./\-]{0,5})[)\]][\s.,]*$").unwrap()
});

static FILING_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^F(?:\s*S)?\s*:\s*").unwrap());

static DESC_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:D|S\s*O?)\s*:\s*").unwrap());

/// Run the strategy ladder over one block. `None` means no strategy could
/// recover minimal structure (a recognizable type and one date); the caller
/// skips the block and reports it.
pub fn extract_draft(block: &RawEntryBlock) -> Option<(DraftRecord, ParseStrategy)> {
    let text = block.primary_text();
    let (mut draft, strategy) = try_standard(&text)
        .map(|d| (d, ParseStrategy::Standard))
        .or_else(|| try_relaxed(&text).map(|d| (d, ParseStrategy::Relaxed)))
        .or_else(|| try_shifted(&text).map(|d| (d, ParseStrategy::Shifted)))
        .or_else(|| try_partial(&text).map(|d| (d, ParseStrategy::Partial)))?;
    debug!(
        strategy = strategy.label(),
        start_line = block.start_line,
        "strategy matched block"
    );
    draft.raw_line = text;
    merge_continuations(&mut draft, block);
    Some((draft, strategy))
}

fn try_standard(text: &str) -> Option<DraftRecord> {
    let caps = STANDARD_RE.captures(text)?;
    let (asset, ticker) = split_trailing_ticker(&caps["asset"]);
    Some(DraftRecord {
        owner: caps["owner"].to_ascii_uppercase(),
        asset_description: asset,
        ticker,
        transaction_type: caps["type"].to_ascii_uppercase(),
        transaction_date: caps["tdate"].to_string(),
        notification_date: caps["ndate"].to_string(),
        amount: caps["amount"].trim().to_string(),
        ..DraftRecord::default()
    })
}

fn try_relaxed(text: &str) -> Option<DraftRecord> {
    let caps = RELAXED_RE.captures(text)?;
    let (asset, ticker) = split_trailing_ticker(caps["asset"].trim_end_matches(['.', ',', ';']));
    let mut draft = DraftRecord {
        asset_description: asset,
        ticker,
        transaction_type: normalize_type_token(&caps["type"]),
        transaction_date: caps["tdate"].to_string(),
        notification_date: caps["ndate"].to_string(),
        amount: caps["amount"].trim().to_string(),
        ..DraftRecord::default()
    };
    match caps.name("owner") {
        Some(m) => draft.owner = m.as_str().to_ascii_uppercase(),
        None => {
            draft.owner = "JT".to_string();
            draft.push_note("no owner prefix, defaulted to joint");
        }
    }
    Some(draft)
}

/// Positional re-anchor: everything after the rightmost type token is
/// slotted as date/date/amount without inspection.
fn try_shifted(text: &str) -> Option<DraftRecord> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 6 {
        return None;
    }
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
    // A two-token tail has no amount to slot; that is a missing field, not
    // a shift, and belongs to the partial strategy.
    let tail = &tokens[tail_start..];
    if tail.len() < 3 || !tail.iter().any(|t| is_date_shaped(t)) {
        return None;
    }

    let (owner, asset_start) = match owner_prefix(tokens[0]) {
        Some(p) => (p.to_string(), 1),
        None => (String::new(), 0),
    };
    let asset_tokens = &tokens[asset_start..type_idx];
    if asset_tokens.is_empty() {
        return None;
    }
    let (asset, ticker) = split_trailing_ticker(&asset_tokens.join(" "));

    let mut draft = DraftRecord {
        owner,
        asset_description: asset,
        ticker,
        transaction_type: type_token,
        transaction_date: tail[0].to_string(),
        notification_date: tail.get(1).map(|t| t.to_string()).unwrap_or_default(),
        amount: tail.get(2..).map(|s| s.join(" ")).unwrap_or_default(),
        ..DraftRecord::default()
    };
    draft.push_note(format!("re-anchored line tail at token {type_idx}"));
    if draft.owner.is_empty() {
        draft.push_note("no owner prefix");
    }
    Some(draft)
}

/// Accept whatever structure exists and note the gaps.
fn try_partial(text: &str) -> Option<DraftRecord> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let type_idx = tokens.iter().rposition(|t| is_type_shaped(t))?;

    let date_idxs: Vec<usize> = (0..tokens.len()).filter(|&i| is_date_shaped(tokens[i])).collect();
    if date_idxs.is_empty() {
        return None;
    }
    // Prefer dates after the type token; fall back to any position.
    let after: Vec<usize> = date_idxs.iter().copied().filter(|&i| i > type_idx).collect();
    let chosen = if after.is_empty() { &date_idxs } else { &after };
    let t_idx = chosen[0];
    let n_idx = chosen.get(1).copied();

    let amount_idx = tokens
        .iter()
        .position(|t| is_amount_start(t))
        .filter(|&i| i > type_idx);
    let amount = match amount_idx {
        Some(i) => tokens[i..]
            .iter()
            .filter(|t| !is_date_shaped(t))
            .copied()
            .collect::<Vec<_>>()
            .join(" "),
        None => String::new(),
    };

    let (owner, asset_start) = match owner_prefix(tokens[0]) {
        Some(p) => (p.to_string(), 1),
        None => (String::new(), 0),
    };
    let asset_end = [Some(type_idx), Some(t_idx), amount_idx]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(tokens.len())
        .max(asset_start);
    let (asset, ticker) = split_trailing_ticker(&tokens[asset_start..asset_end].join(" "));

    let mut draft = DraftRecord {
        owner,
        asset_description: asset,
        ticker,
        transaction_type: tokens[type_idx].to_ascii_uppercase(),
        transaction_date: tokens[t_idx].to_string(),
        notification_date: n_idx.map(|i| tokens[i].to_string()).unwrap_or_default(),
        amount,
        ..DraftRecord::default()
    };
    if draft.owner.is_empty() {
        draft.push_note("owner missing");
    }
    if draft.notification_date.is_empty() {
        draft.push_note("notification date missing");
    }
    if draft.amount.is_empty() {
        draft.push_note("amount missing");
    }
    Some(draft)
}

/// Split a trailing `(SYM)`/`[SYM]` group off an asset description.
fn split_trailing_ticker(asset: &str) -> (String, String) {
    match TRAILING_TICKER_RE.captures(asset.trim()) {
        Some(caps) => (
            caps["name"].trim().to_string(),
            caps["sym"].to_ascii_uppercase(),
        ),
        None => (asset.trim().to_string(), String::new()),
    }
}

/// Collapse internal whitespace in a matched type token (`S  (partial)`).
fn normalize_type_token(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// Second pass over the block: continuation-only fields.
fn merge_continuations(draft: &mut DraftRecord, block: &RawEntryBlock) {
    if draft.ticker.trim().is_empty() {
        if let Some(line) = block.ticker_continuations().first() {
            draft.ticker = line
                .trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']'))
                .to_string();
        }
    }
    if draft.filing_status.is_empty() {
        let parts: Vec<String> = block
            .filing_status_lines()
            .iter()
            .map(|l| FILING_PREFIX_RE.replace(l, "").trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        draft.filing_status = parts.join(" ");
    }
    if draft.description.is_empty() {
        let parts: Vec<String> = block
            .description_lines()
            .iter()
            .map(|l| DESC_PREFIX_RE.replace(l, "").trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        draft.description = parts.join(" ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_document;

    fn single_block(text: &str) -> RawEntryBlock {
        let mut blocks = classify_document(text);
        assert_eq!(blocks.len(), 1, "expected one block from {text:?}");
        blocks.remove(0)
    }

    #[test]
    fn test_standard_strategy_clean_line() {
        let block =
            single_block("JT Apple Inc. (AAPL) P 01/27/2023 02/06/2023 $1,001 - $15,000\n");
        let (draft, strategy) = extract_draft(&block).unwrap();
        assert_eq!(strategy, ParseStrategy::Standard);
        assert_eq!(draft.owner, "JT");
        assert_eq!(draft.asset_description, "Apple Inc.");
        assert_eq!(draft.ticker, "AAPL");
        assert_eq!(draft.transaction_type, "P");
        assert_eq!(draft.transaction_date, "01/27/2023");
        assert_eq!(draft.notification_date, "02/06/2023");
        assert_eq!(draft.amount, "$1,001 - $15,000");
        assert!(draft.notes.is_empty());
    }

    #[test]
    fn test_standard_partial_sale_type() {
        let block = single_block(
            "SP Tesla, Inc. (TSLA) S (partial) 03/10/2023 03/14/2023 $15,001 - $50,000\n",
        );
        let (draft, strategy) = extract_draft(&block).unwrap();
        assert_eq!(strategy, ParseStrategy::Standard);
        assert_eq!(draft.transaction_type, "S (PARTIAL)");
    }

    #[test]
    fn test_relaxed_defaults_missing_owner_to_joint() {
        let block = single_block(
            "Microsoft Corporation (MSFT). S. 2023-03-01. 2023-03-05. $50,001 - $100,000\n",
        );
        let (draft, strategy) = extract_draft(&block).unwrap();
        assert_eq!(strategy, ParseStrategy::Relaxed);
        assert_eq!(draft.owner, "JT");
        assert_eq!(draft.ticker, "MSFT");
        assert!(draft.notes.iter().any(|n| n.contains("defaulted to joint")));
    }

    #[test]
    fn test_shifted_strategy_slots_tail_positionally() {
        let block = single_block("JT Chevron Corporation (CVX) P 01/12/2023 $8,000 02/01/2023\n");
        let (draft, strategy) = extract_draft(&block).unwrap();
        assert_eq!(strategy, ParseStrategy::Shifted);
        assert_eq!(draft.transaction_date, "01/12/2023");
        // The displaced amount lands in the notification-date slot for the
        // correction cascade to repair.
        assert_eq!(draft.notification_date, "$8,000");
        assert_eq!(draft.amount, "02/01/2023");
    }

    #[test]
    fn test_partial_strategy_notes_missing_amount() {
        let block = single_block("DC Pfizer Inc. (PFE) S 04/02/2023 04/06/2023\n");
        let (draft, strategy) = extract_draft(&block).unwrap();
        assert_eq!(strategy, ParseStrategy::Partial);
        assert_eq!(draft.owner, "DC");
        assert_eq!(draft.transaction_date, "04/02/2023");
        assert_eq!(draft.notification_date, "04/06/2023");
        assert!(draft.amount.is_empty());
        assert!(draft.notes.iter().any(|n| n.contains("amount missing")));
    }

    #[test]
    fn test_no_structure_yields_none() {
        let block = single_block("JT certification text with no trade structure at all\n");
        assert!(extract_draft(&block).is_none());
    }

    #[test]
    fn test_continuation_merge_fills_ticker_and_status() {
        let text = "\
JT Exxon Mobil Corporation P 02/10/2023 02/14/2023 $50,001 -
$100,000
(XOM)
F S: New
D: Dividend reinvestment
";
        let block = single_block(text);
        let (draft, strategy) = extract_draft(&block).unwrap();
        assert_eq!(strategy, ParseStrategy::Standard);
        assert_eq!(draft.ticker, "XOM");
        assert_eq!(draft.filing_status, "New");
        assert_eq!(draft.description, "Dividend reinvestment");
        assert_eq!(draft.amount, "$50,001 - $100,000");
    }
}
