//! Amount-bracket resolution.
//!
//! Scrubs the trailing checkbox garbage the text extractor leaves on amount
//! cells, canonicalizes separator variants, then matches the eleven standard
//! brackets. Text that matches no bracket still yields a value when it
//! carries explicit dollar figures: a pair becomes an explicit min/max, a
//! single figure snaps into the bracket containing it, and `over`/`+`
//! phrasing becomes an open-ended minimum.
//!
//! A digit run counts as a dollar figure only with a `$` attached. The one
//! exception is a bare `low - high` dash pair, which extraction produces
//! when both dollar signs drop out. Dates and stray numbers that migrate
//! into the amount column stay unresolved rather than being read as money.

use std::sync::LazyLock;

use regex::Regex;

use crate::amount::{AmountBracket, AmountValue};
use crate::result::{NormalizationMethod, NormalizationResult};

const EXACT_LABEL_CONF: f64 = 1.0;
const BOUNDS_PAIR_CONF: f64 = 0.9;
const EXPLICIT_PAIR_CONF: f64 = 0.85;
const OPEN_ENDED_CONF: f64 = 0.8;
const SNAPPED_CONF: f64 = 0.8;

static DOLLAR_FIGURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*(\d[\d,]*)(?:\.(\d{1,2}))?").unwrap());

static BARE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d[\d,]*)(?:\.(\d{1,2}))?\s*-\s*(\d[\d,]*)(?:\.(\d{1,2}))?$").unwrap()
});

static NEGATIVE_FIGURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*-\s*\d").unwrap());

static DASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*-\s*").unwrap());

static TRAILING_PLUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\+\s*$").unwrap());

/// Normalize raw amount text onto a bracket or explicit figure pair.
pub fn normalize_amount(raw: &str) -> NormalizationResult<AmountValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NormalizationResult::unresolved("empty amount text");
    }
    if trimmed.starts_with('-') {
        return NormalizationResult::unresolved(format!("negative amount {trimmed:?}"));
    }

    let cleaned = canonicalize(trimmed);
    if cleaned.is_empty() {
        return NormalizationResult::unresolved(format!(
            "nothing left of {trimmed:?} after scrubbing"
        ));
    }
    // Catches `$-5,000`; a leading minus is caught above before the dash
    // gets respaced into range form.
    if NEGATIVE_FIGURE_RE.is_match(&cleaned) {
        return NormalizationResult::unresolved(format!("negative amount {trimmed:?}"));
    }
    let scrubbed_note = (cleaned.len() < collapse_spaces(trimmed).len())
        .then(|| format!("scrubbed amount text to {cleaned:?}"));

    // Exact canonical label.
    let key = cleaned.to_lowercase();
    if let Some(bracket) = AmountBracket::all()
        .into_iter()
        .find(|b| b.label().to_lowercase() == key)
    {
        let mut out = NormalizationResult::resolved(
            AmountValue::Bracket(bracket),
            EXACT_LABEL_CONF,
            NormalizationMethod::Direct,
        );
        if let Some(note) = scrubbed_note {
            out = out.with_note(note);
        }
        return out;
    }

    let figures = extract_cents(&cleaned);
    let open_ended = is_open_ended(&cleaned);

    let mut out = match figures.as_slice() {
        [] => NormalizationResult::unresolved(format!("no dollar figure in {cleaned:?}")),
        [single] if open_ended => NormalizationResult::resolved(
            AmountValue::Explicit {
                min_cents: *single,
                max_cents: None,
            },
            OPEN_ENDED_CONF,
            NormalizationMethod::Heuristic,
        )
        .with_note("open-ended amount"),
        [single] => match AmountBracket::containing_cents(*single) {
            Some(bracket) => NormalizationResult::resolved(
                AmountValue::Bracket(bracket),
                SNAPPED_CONF,
                NormalizationMethod::Heuristic,
            )
            .with_note(format!(
                "snapped single figure into bracket {:?}",
                bracket.label()
            )),
            None => NormalizationResult::unresolved(format!(
                "figure in {cleaned:?} falls below the smallest bracket"
            )),
        },
        [first, second, rest @ ..] => {
            let (min, max, swapped) = if first > second {
                (*second, *first, true)
            } else {
                (*first, *second, false)
            };
            let bounds_hit = AmountBracket::all()
                .into_iter()
                .find(|b| b.min_cents() == min && b.max_cents() == Some(max));
            let mut out = match bounds_hit {
                Some(bracket) => NormalizationResult::resolved(
                    AmountValue::Bracket(bracket),
                    BOUNDS_PAIR_CONF,
                    NormalizationMethod::Direct,
                )
                .with_note(format!("figures match bracket {:?}", bracket.label())),
                None => NormalizationResult::resolved(
                    AmountValue::Explicit {
                        min_cents: min,
                        max_cents: Some(max),
                    },
                    EXPLICIT_PAIR_CONF,
                    NormalizationMethod::Direct,
                ),
            };
            if swapped {
                out = out.with_note("swapped inverted min/max");
            }
            if !rest.is_empty() {
                out = out.with_note(format!("ignored {} extra figure(s)", rest.len()));
            }
            out
        }
    };
    if !cleaned.contains('$') && out.value.is_some() {
        out = out.with_note("no dollar signs in amount text");
    }
    if let Some(note) = scrubbed_note {
        out = out.with_note(note);
    }
    out
}

/// Unify dash and plus spacing, drop trailing extraction garbage, collapse
/// whitespace.
fn canonicalize(raw: &str) -> String {
    let unified = raw.replace(['\u{2013}', '\u{2014}'], "-");
    let spaced = DASH_RE.replace_all(&unified, " - ");
    let plussed = TRAILING_PLUS_RE.replace(&spaced, " +");
    collapse_spaces(&scrub_trailing_garbage(&plussed))
}

/// Trailing all-lowercase words, and a lowercase run glued straight onto the
/// last digit, are extraction artifacts (checkbox glyphs like `gfedc`).
fn scrub_trailing_garbage(s: &str) -> String {
    let mut out = s.trim_end();
    loop {
        // Whitespace here can be multi-byte (NBSP in PDF text), so advance
        // by the matched char's width, not by one byte.
        let last_word_start = out
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let last = &out[last_word_start..];
        if !last.is_empty()
            && last.chars().all(|c| c.is_ascii_lowercase())
            && last_word_start > 0
        {
            out = out[..last_word_start].trim_end();
            continue;
        }
        break;
    }
    let unglued = out.trim_end_matches(|c: char| c.is_ascii_lowercase());
    if unglued.len() < out.len() && unglued.ends_with(|c: char| c.is_ascii_digit()) {
        return unglued.to_string();
    }
    out.to_string()
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_open_ended(cleaned: &str) -> bool {
    let lower = cleaned.to_lowercase();
    lower.ends_with('+')
        || lower.contains("over ")
        || lower.contains("greater")
        || lower.contains("more than")
}

/// Dollar figures in the text, in cents, in order of appearance. Without any
/// `$` in the text, only a full-line `low - high` pair is accepted, so digit
/// runs in dates and stray column content never read as figures.
fn extract_cents(cleaned: &str) -> Vec<i64> {
    if cleaned.contains('$') {
        return DOLLAR_FIGURE_RE
            .captures_iter(cleaned)
            .filter_map(|caps| {
                figure_cents(caps.get(1)?.as_str(), caps.get(2).map(|m| m.as_str()))
            })
            .collect();
    }
    let Some(caps) = BARE_RANGE_RE.captures(cleaned) else {
        return Vec::new();
    };
    let lo = figure_cents(&caps[1], caps.get(2).map(|m| m.as_str()));
    let hi = figure_cents(&caps[3], caps.get(4).map(|m| m.as_str()));
    match (lo, hi) {
        (Some(lo), Some(hi)) => vec![lo, hi],
        _ => Vec::new(),
    }
}

fn figure_cents(whole: &str, frac: Option<&str>) -> Option<i64> {
    let whole: i64 = whole.replace(',', "").parse().ok()?;
    let frac = match frac {
        Some(f) if f.len() == 1 => f.parse::<i64>().ok()? * 10,
        Some(f) => f.parse::<i64>().ok()?,
        None => 0,
    };
    Some(whole * 100 + frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_labels_are_idempotent() {
        for bracket in AmountBracket::all() {
            let res = normalize_amount(bracket.label());
            assert_eq!(res.value, Some(AmountValue::Bracket(bracket)));
            assert!(res.confidence >= 0.95, "label {:?}", bracket.label());
        }
    }

    #[test]
    fn test_separator_variants_map_to_canonical() {
        for raw in [
            "$1,001-$15,000",
            "$1,001 -$15,000",
            "$1,001\u{2013}$15,000",
            "$1,001  -  $15,000",
        ] {
            let res = normalize_amount(raw);
            assert_eq!(
                res.value,
                Some(AmountValue::Bracket(AmountBracket::Range1Kto15K)),
                "raw {raw:?}"
            );
        }
    }

    #[test]
    fn test_trailing_checkbox_garbage_stripped() {
        let res = normalize_amount("$15,001 - $50,000 gfedc gfedcb");
        assert_eq!(res.value, Some(AmountValue::Bracket(AmountBracket::Range15Kto50K)));
        assert!(res.notes.iter().any(|n| n.contains("scrubbed")));

        let glued = normalize_amount("$1,001 - $15,000gfedc");
        assert_eq!(glued.value, Some(AmountValue::Bracket(AmountBracket::Range1Kto15K)));
    }

    #[test]
    fn test_single_figure_snaps_into_bracket() {
        let res = normalize_amount("$2,400");
        assert_eq!(res.value, Some(AmountValue::Bracket(AmountBracket::Range1Kto15K)));
        assert_eq!(res.method, NormalizationMethod::Heuristic);
        approx::assert_relative_eq!(res.confidence, SNAPPED_CONF);
    }

    #[test]
    fn test_open_ended_amount() {
        let res = normalize_amount("over $1,000,000");
        assert_eq!(
            res.value,
            Some(AmountValue::Explicit {
                min_cents: 100_000_000,
                max_cents: None
            })
        );

        let plus = normalize_amount("$50,000,000 +");
        assert_eq!(plus.value, Some(AmountValue::Bracket(AmountBracket::Over50M)));
        assert!(plus.confidence >= 0.95);
    }

    #[test]
    fn test_explicit_pair_and_inverted_swap() {
        let res = normalize_amount("$5,000 - $9,000");
        assert_eq!(
            res.value,
            Some(AmountValue::Explicit {
                min_cents: 500_000,
                max_cents: Some(900_000)
            })
        );

        let swapped = normalize_amount("$9,000 - $5,000");
        assert_eq!(
            swapped.value,
            Some(AmountValue::Explicit {
                min_cents: 500_000,
                max_cents: Some(900_000)
            })
        );
        assert!(swapped.notes.iter().any(|n| n.contains("swapped")));
    }

    #[test]
    fn test_negative_rejected() {
        let res = normalize_amount("-$5,000");
        assert!(res.value.is_none());
        assert!(res.notes.iter().any(|n| n.contains("negative")));

        let glued = normalize_amount("$-5,000");
        assert!(glued.value.is_none());
        assert!(glued.notes.iter().any(|n| n.contains("negative")));
    }

    #[test]
    fn test_no_figures() {
        let res = normalize_amount("gfedc");
        assert!(res.value.is_none());
    }

    #[test]
    fn test_date_text_refused() {
        for raw in ["02/06/2023", "03/05/2023", "2023-02-06"] {
            let res = normalize_amount(raw);
            assert!(res.value.is_none(), "raw {raw:?} resolved to {:?}", res.value);
            assert_eq!(res.method, NormalizationMethod::Unresolved, "raw {raw:?}");
            assert!(!res.notes.is_empty(), "raw {raw:?}");
        }
    }

    #[test]
    fn test_bare_number_refused() {
        let res = normalize_amount("2023");
        assert!(res.value.is_none());
        assert!(res.notes.iter().any(|n| n.contains("no dollar figure")));
    }

    #[test]
    fn test_dollarless_range_still_resolves() {
        let res = normalize_amount("1,001 - 15,000");
        assert_eq!(res.value, Some(AmountValue::Bracket(AmountBracket::Range1Kto15K)));
        assert!(res.notes.iter().any(|n| n.contains("no dollar signs")));
    }

    #[test]
    fn test_multibyte_whitespace_before_garbage() {
        let res = normalize_amount("$8,000\u{a0}gfedc");
        assert_eq!(res.value, Some(AmountValue::Bracket(AmountBracket::Range1Kto15K)));
        assert!(res.notes.iter().any(|n| n.contains("scrubbed")));
    }
}
