//! Ownership-type resolution.
//!
//! Direct mapping from the short codes and long-form synonyms filings use,
//! a fuzzy fallback for near-misses, and a column-misalignment heuristic:
//! when the owner cell holds an organization or person name the line was
//! shifted, so the best guess is recorded at low confidence instead of
//! failing the whole record.

use crate::matching;
use crate::owner::OwnerType;
use crate::result::{NormalizationMethod, NormalizationResult};

const DIRECT_CONF: f64 = 0.95;
const FUZZY_FLOOR: f64 = 0.70;
// Multi-word inputs collide with person names under Jaro-Winkler, so they
// must clear a stricter bar before the misalignment heuristic is skipped.
const MULTIWORD_FUZZY_FLOOR: f64 = 0.85;
const FUZZY_CONF: f64 = 0.75;
const MISALIGNED_CONF: f64 = 0.40;

/// Every spelling the direct map recognizes.
const OWNER_SYNONYMS: &[(&str, OwnerType)] = &[
    ("C", OwnerType::SelfHeld),
    ("SELF", OwnerType::SelfHeld),
    ("MEMBER", OwnerType::SelfHeld),
    ("FILER", OwnerType::SelfHeld),
    ("SP", OwnerType::Spouse),
    ("SPOUSE", OwnerType::Spouse),
    ("WIFE", OwnerType::Spouse),
    ("HUSBAND", OwnerType::Spouse),
    ("JT", OwnerType::Joint),
    ("JOINT", OwnerType::Joint),
    ("JOINTLY", OwnerType::Joint),
    ("JOINT ACCOUNT", OwnerType::Joint),
    ("DC", OwnerType::DependentChild),
    ("DEPENDENT CHILD", OwnerType::DependentChild),
    ("DEPENDENT", OwnerType::DependentChild),
    ("CHILD", OwnerType::DependentChild),
    ("MINOR CHILD", OwnerType::DependentChild),
];

const ORG_MARKERS: &[&str] = &["family", "trust", "llc", "fund", "partners", "foundation"];

/// Resolve raw owner text onto the closed enum.
pub fn normalize_owner(raw: &str) -> NormalizationResult<OwnerType> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return NormalizationResult::unresolved("empty owner text");
    }

    for (synonym, owner) in OWNER_SYNONYMS {
        if cleaned == *synonym {
            return NormalizationResult::resolved(*owner, DIRECT_CONF, NormalizationMethod::Direct);
        }
    }

    // Near-miss spellings ("JOINTT", "SPOSE").
    if cleaned.len() >= 2 {
        let floor = if cleaned.contains(' ') {
            MULTIWORD_FUZZY_FLOOR
        } else {
            FUZZY_FLOOR
        };
        let mut best: Option<(OwnerType, &str, f64)> = None;
        for (synonym, owner) in OWNER_SYNONYMS {
            let score = matching::similarity(&cleaned, synonym);
            if score < floor {
                continue;
            }
            if best.is_none_or(|(_, _, s)| score > s) {
                best = Some((*owner, synonym, score));
            }
        }
        if let Some((owner, synonym, score)) = best {
            return NormalizationResult::resolved(owner, FUZZY_CONF, NormalizationMethod::Fuzzy)
                .with_note(format!("fuzzy owner match {synonym:?} at {score:.2}"));
        }
    }

    // Column misalignment: a name landed in the owner cell.
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_ascii_alphabetic()))
        .filter(|w| !w.is_empty())
        .collect();
    if words.len() >= 2 && words.iter().all(|w| w.chars().all(|c| c.is_ascii_alphabetic())) {
        let lower = cleaned.to_lowercase();
        if ORG_MARKERS.iter().any(|m| lower.contains(m)) {
            return NormalizationResult::resolved(
                OwnerType::Joint,
                MISALIGNED_CONF,
                NormalizationMethod::Heuristic,
            )
            .with_note(format!("owner cell holds an organization name {cleaned:?}"));
        }
        return NormalizationResult::resolved(
            OwnerType::SelfHeld,
            MISALIGNED_CONF,
            NormalizationMethod::Heuristic,
        )
        .with_note(format!("owner cell holds a person name {cleaned:?}"));
    }

    NormalizationResult::unresolved(format!("unrecognized owner {raw:?}"))
}

fn clean(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| matches!(c, ':' | '.' | ',' | ';'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}
