//! Ownership vocabulary for disclosure entries.
//!
//! Filings mark whose holding a trade belongs to with a short code column
//! (`SP`, `DC`, `JT`, or blank/`C` for the member's own holding). The raw
//! column is noisy, so the closed enum lives here and the mapping from raw
//! text lives in `normalize::owner`.

use serde::{Deserialize, Serialize};

/// Whose holding a disclosed trade belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OwnerType {
    /// The filing member's own holding (`C` or blank owner column).
    #[serde(rename = "self")]
    SelfHeld,
    #[serde(rename = "spouse")]
    Spouse,
    #[serde(rename = "joint")]
    Joint,
    #[serde(rename = "dependent-child")]
    DependentChild,
}

impl OwnerType {
    /// The short code as printed in the disclosure owner column.
    pub fn short_code(&self) -> &'static str {
        match self {
            OwnerType::SelfHeld => "C",
            OwnerType::Spouse => "SP",
            OwnerType::Joint => "JT",
            OwnerType::DependentChild => "DC",
        }
    }

    /// Stable lowercase label used in serialized records and reports.
    pub fn label(&self) -> &'static str {
        match self {
            OwnerType::SelfHeld => "self",
            OwnerType::Spouse => "spouse",
            OwnerType::Joint => "joint",
            OwnerType::DependentChild => "dependent-child",
        }
    }

    /// Map a bare short code (`C`/`SP`/`JT`/`DC`), case-insensitive.
    pub fn from_short_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "C" => Some(OwnerType::SelfHeld),
            "SP" => Some(OwnerType::Spouse),
            "JT" => Some(OwnerType::Joint),
            "DC" => Some(OwnerType::DependentChild),
            _ => None,
        }
    }

    /// All variants, in disclosure-column order.
    pub fn all() -> [OwnerType; 4] {
        [
            OwnerType::SelfHeld,
            OwnerType::Spouse,
            OwnerType::Joint,
            OwnerType::DependentChild,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_code_round_trip() {
        for owner in OwnerType::all() {
            assert_eq!(OwnerType::from_short_code(owner.short_code()), Some(owner));
        }
    }

    #[test]
    fn test_from_short_code_case_insensitive() {
        assert_eq!(OwnerType::from_short_code("jt"), Some(OwnerType::Joint));
        assert_eq!(OwnerType::from_short_code(" sp "), Some(OwnerType::Spouse));
        assert_eq!(OwnerType::from_short_code("dc"), Some(OwnerType::DependentChild));
        assert_eq!(OwnerType::from_short_code("XX"), None);
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&OwnerType::DependentChild).unwrap();
        assert_eq!(json, "\"dependent-child\"");
    }
}
