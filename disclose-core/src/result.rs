//! Typed normalization results.
//!
//! Every normalizer answers with the same shape: maybe a value, a
//! confidence, which method produced it, and notes explaining anything
//! surprising. An unknown value is `None` plus notes, never a silent guess.

use serde::{Deserialize, Serialize};

/// How a normalized value was produced. Confidence conventions descend in
/// roughly this order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NormalizationMethod {
    /// Exact hit: regex extraction, short-code table, canonical bracket.
    #[serde(rename = "direct")]
    Direct,
    /// Exact or partial match against a curated dictionary.
    #[serde(rename = "dictionary")]
    Dictionary,
    /// Fuzzy string similarity above a floor.
    #[serde(rename = "fuzzy")]
    Fuzzy,
    /// Structural guesswork: bare all-caps token, figure snapping,
    /// misalignment best-guess.
    #[serde(rename = "heuristic")]
    Heuristic,
    /// A canonicalization or curated override fired (e.g. BRK -> BRK.B).
    #[serde(rename = "override")]
    Override,
    /// No value could be resolved.
    #[serde(rename = "unresolved")]
    Unresolved,
}

/// Outcome of normalizing one raw field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizationResult<T> {
    pub value: Option<T>,
    pub confidence: f64,
    pub method: NormalizationMethod,
    pub notes: Vec<String>,
}

impl<T> NormalizationResult<T> {
    pub fn resolved(value: T, confidence: f64, method: NormalizationMethod) -> Self {
        Self {
            value: Some(value),
            confidence,
            method,
            notes: Vec::new(),
        }
    }

    pub fn unresolved(note: impl Into<String>) -> Self {
        Self {
            value: None,
            confidence: 0.0,
            method: NormalizationMethod::Unresolved,
            notes: vec![note.into()],
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_carries_method() {
        let r = NormalizationResult::resolved("AAPL", 0.95, NormalizationMethod::Direct);
        assert!(r.is_resolved());
        assert_eq!(r.method, NormalizationMethod::Direct);
        assert!(r.notes.is_empty());
    }

    #[test]
    fn test_unresolved_keeps_signal() {
        let r: NormalizationResult<String> = NormalizationResult::unresolved("no ticker-shaped token");
        assert!(!r.is_resolved());
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.notes.len(), 1);
    }
}
