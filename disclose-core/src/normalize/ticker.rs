//! Ticker symbol resolution.
//!
//! Ordered fallback: explicit symbol markup in the text, then the curated
//! company dictionary (exact, partial, fuzzy), then a bare all-caps token
//! heuristic. Confidence descends in that order. Two- and three-letter
//! asset-type codes (`ST`, `OP`, `ETF`, ...) are reported as asset types,
//! never as tickers.

use std::sync::LazyLock;

use regex::Regex;

use crate::matching;
use crate::reference::ReferenceData;
use crate::result::{NormalizationMethod, NormalizationResult};

const EXPLICIT_CONF: f64 = 0.95;
const DICTIONARY_CONF: f64 = 0.95;
const FUZZY_FLOOR: f64 = 0.80;
const FUZZY_CONF_MIN: f64 = 0.70;
const FUZZY_CONF_MAX: f64 = 0.85;
const BARE_KNOWN_CONF: f64 = 0.60;
const BARE_UNKNOWN_CONF: f64 = 0.50;

/// `(AAPL)`, `[AAPL]`, or `Symbol: AAPL` anywhere in the text.
static EXPLICIT_SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \(\s*([A-Za-z][A-Za-z./\-]{0,5})\s*\)
        | \[\s*([A-Za-z][A-Za-z./\-]{0,5})\s*\]
        | (?i:symbol)\s*:\s*([A-Za-z][A-Za-z./\-]{0,5})\b
        ",
    )
    .unwrap()
});

/// Uppercase a candidate symbol and collapse every `BRK` variant
/// (`brk`, `BRK/B`, `BRK B`, `BRK.A`) onto the class-B listing.
fn canonical_symbol(token: &str) -> String {
    let upper = token.trim().to_ascii_uppercase();
    let compact: String = upper.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if compact.starts_with("BRK") && compact.len() <= 5 {
        return "BRK.B".to_string();
    }
    upper
}

fn is_symbol_shaped(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= 6
        && token.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '-'))
}

/// Resolve a ticker symbol from raw text: the ticker column value when one
/// survived extraction, otherwise the asset-description line.
pub fn normalize_ticker(raw: &str, data: &ReferenceData) -> NormalizationResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NormalizationResult::unresolved("empty ticker text");
    }
    if matches!(trimmed, "--" | "-" | "N/A" | "n/a" | "NA" | "None" | "none") {
        return NormalizationResult::unresolved(format!("no-ticker marker {trimmed:?}"));
    }

    // The whole value is already one symbol-shaped token.
    if is_symbol_shaped(trimmed) {
        let symbol = canonical_symbol(trimmed);
        if symbol == "BRK.B" {
            return NormalizationResult::resolved(symbol, EXPLICIT_CONF, NormalizationMethod::Override)
                .with_note("canonicalized Berkshire class-B variant");
        }
        if !data.is_excluded_token(&symbol) {
            if let Some(display) = data.asset_type_name(&symbol) {
                return NormalizationResult::unresolved(format!(
                    "asset-type code {symbol} ({display}), not a ticker"
                ));
            }
            if data.is_known_ticker(&symbol) {
                return NormalizationResult::resolved(
                    symbol,
                    EXPLICIT_CONF,
                    NormalizationMethod::Direct,
                );
            }
        }
    }

    let mut result = NormalizationResult::unresolved(String::new());
    result.notes.clear();

    // (a) explicit markup: parenthesized, bracketed, or Symbol:-prefixed.
    for caps in EXPLICIT_SYMBOL_RE.captures_iter(trimmed) {
        let Some(m) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            continue;
        };
        let candidate = canonical_symbol(m.as_str());
        if data.is_excluded_token(&candidate) {
            result
                .notes
                .push(format!("skipped excluded token {candidate:?}"));
            continue;
        }
        if !data.is_known_ticker(&candidate) {
            if let Some(display) = data.asset_type_name(&candidate) {
                result
                    .notes
                    .push(format!("asset-type code {candidate} ({display}), not a ticker"));
                continue;
            }
        }
        let mut out = NormalizationResult::resolved(
            candidate.clone(),
            EXPLICIT_CONF,
            NormalizationMethod::Direct,
        );
        out.notes = result.notes;
        if !data.is_known_ticker(&candidate) {
            out = out.with_note(format!("{candidate} not in ticker universe"));
        }
        return out;
    }

    // (b) curated company dictionary, exact then partial.
    let entry = data.company_by_name(trimmed).or_else(|| {
        if matching::tokenize(trimmed).len() >= 2 {
            data.company_by_partial_name(trimmed)
        } else {
            None
        }
    });
    if let Some(entry) = entry {
        let mut out = NormalizationResult::resolved(
            canonical_symbol(&entry.ticker),
            DICTIONARY_CONF,
            NormalizationMethod::Dictionary,
        );
        out.notes = result.notes;
        return out.with_note(format!("matched company {:?}", entry.name));
    }

    // (c) fuzzy dictionary match, score scaled into confidence.
    if let Some((name, score)) =
        matching::best_match(trimmed, data.companies().map(|e| e.name.as_str()), FUZZY_FLOOR)
    {
        if let Some(entry) = data.company_by_name(name) {
            let span = FUZZY_CONF_MAX - FUZZY_CONF_MIN;
            let confidence = FUZZY_CONF_MIN + (score - FUZZY_FLOOR) / (1.0 - FUZZY_FLOOR) * span;
            let mut out = NormalizationResult::resolved(
                canonical_symbol(&entry.ticker),
                confidence,
                NormalizationMethod::Fuzzy,
            );
            out.notes = result.notes;
            return out.with_note(format!("fuzzy match {:?} at {score:.2}", entry.name));
        }
    }

    // (d) bare all-caps token, universe hits preferred.
    let mut bare_known: Option<String> = None;
    let mut bare_any: Option<String> = None;
    for token in trimmed.split_whitespace() {
        let stripped = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if stripped.is_empty()
            || stripped.len() > 5
            || !stripped.chars().all(|c| c.is_ascii_uppercase())
        {
            continue;
        }
        if data.is_excluded_token(stripped) {
            continue;
        }
        if let Some(display) = data.asset_type_name(stripped) {
            if !data.is_known_ticker(stripped) {
                result
                    .notes
                    .push(format!("asset-type code {stripped} ({display}), not a ticker"));
                continue;
            }
        }
        let candidate = canonical_symbol(stripped);
        if data.is_known_ticker(&candidate) {
            bare_known.get_or_insert(candidate);
        } else {
            bare_any.get_or_insert(candidate);
        }
    }
    if let Some(symbol) = bare_known {
        let mut out =
            NormalizationResult::resolved(symbol, BARE_KNOWN_CONF, NormalizationMethod::Heuristic);
        out.notes = result.notes;
        return out.with_note("bare all-caps token, in ticker universe");
    }
    if let Some(symbol) = bare_any {
        let mut out = NormalizationResult::resolved(
            symbol.clone(),
            BARE_UNKNOWN_CONF,
            NormalizationMethod::Heuristic,
        );
        out.notes = result.notes;
        return out.with_note(format!("bare all-caps token {symbol}, not in ticker universe"));
    }

    result.notes.push(format!("no ticker found in {trimmed:?}"));
    result
}

/// Asset-type display name when the text carries a type code instead of a
/// ticker (`[ST]`, `(OP)`, a bare `ETF` token).
pub fn detect_asset_type(raw: &str, data: &ReferenceData) -> Option<&'static str> {
    for token in raw.split_whitespace() {
        let stripped = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if stripped.len() > 3 || stripped.is_empty() {
            continue;
        }
        if data.is_known_ticker(stripped) {
            continue;
        }
        if let Some(display) = data.asset_type_name(stripped) {
            return Some(display);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> ReferenceData {
        ReferenceData::curated()
    }

    #[test]
    fn test_parenthesized_symbol() {
        let res = normalize_ticker("Apple Inc. (AAPL) common stock", &data());
        assert_eq!(res.value.as_deref(), Some("AAPL"));
        assert_eq!(res.method, NormalizationMethod::Direct);
        assert!(res.confidence >= 0.95);
    }

    #[test]
    fn test_excluded_token_skipped_then_real_symbol_found() {
        let res = normalize_ticker("Some Fund (ETF) holding (MSFT)", &data());
        assert_eq!(res.value.as_deref(), Some("MSFT"));
        assert!(res.notes.iter().any(|n| n.contains("ETF")));
    }

    #[test]
    fn test_verbatim_universe_symbol() {
        let res = normalize_ticker("AAPL", &data());
        assert_eq!(res.value.as_deref(), Some("AAPL"));
        assert_eq!(res.method, NormalizationMethod::Direct);
    }

    #[test]
    fn test_dictionary_exact_and_partial() {
        let res = normalize_ticker("Exxon Mobil Corporation", &data());
        assert_eq!(res.value.as_deref(), Some("XOM"));
        assert_eq!(res.method, NormalizationMethod::Dictionary);

        let res = normalize_ticker("Goldman Sachs", &data());
        assert_eq!(res.value.as_deref(), Some("GS"));
    }

    #[test]
    fn test_fuzzy_dictionary_match() {
        let res = normalize_ticker("Mikrosoft Corporation", &data());
        assert_eq!(res.value.as_deref(), Some("MSFT"));
        assert_eq!(res.method, NormalizationMethod::Fuzzy);
        assert!(res.confidence >= 0.70 && res.confidence <= 0.85);
    }

    #[test]
    fn test_bare_token_heuristic() {
        let res = normalize_ticker("bought some NVDA on margin", &data());
        assert_eq!(res.value.as_deref(), Some("NVDA"));
        assert_eq!(res.method, NormalizationMethod::Heuristic);
        assert!((0.50..=0.60).contains(&res.confidence));

        let res = normalize_ticker("municipal obligation QZX series", &data());
        assert_eq!(res.value.as_deref(), Some("QZX"));
        assert!(res.confidence <= 0.50 + f64::EPSILON);
    }

    #[test]
    fn test_brk_variants_canonicalize() {
        for raw in ["brk", "BRK", "BRK.B", "brk/b", "BRK B", "(BRK.A)"] {
            let res = normalize_ticker(raw, &data());
            assert_eq!(res.value.as_deref(), Some("BRK.B"), "raw {raw:?}");
        }
    }

    #[test]
    fn test_asset_type_code_is_not_a_ticker() {
        let res = normalize_ticker("ST", &data());
        assert!(res.value.is_none());
        assert!(res.notes.iter().any(|n| n.contains("asset-type code")));
        assert_eq!(detect_asset_type("[ST]", &data()), Some("Stock"));
        assert_eq!(detect_asset_type("plain prose", &data()), None);
    }

    #[test]
    fn test_no_ticker_marker() {
        let res = normalize_ticker("--", &data());
        assert!(res.value.is_none());
        assert!(!res.notes.is_empty());
    }
}
