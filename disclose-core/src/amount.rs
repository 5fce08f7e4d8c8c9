//! Dollar-amount brackets used by congressional disclosures.
//!
//! Filings never state exact amounts, only one of a fixed set of ranges.
//! The eleven canonical brackets live here with integer bounds in cents;
//! mapping noisy raw text onto them lives in `normalize::amount`.

use serde::{Deserialize, Serialize};

/// One of the eleven canonical disclosure ranges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AmountBracket {
    #[serde(rename = "1-1k")]
    UpTo1K,
    #[serde(rename = "1k-15k")]
    Range1Kto15K,
    #[serde(rename = "15k-50k")]
    Range15Kto50K,
    #[serde(rename = "50k-100k")]
    Range50Kto100K,
    #[serde(rename = "100k-250k")]
    Range100Kto250K,
    #[serde(rename = "250k-500k")]
    Range250Kto500K,
    #[serde(rename = "500k-1m")]
    Range500Kto1M,
    #[serde(rename = "1m-5m")]
    Range1Mto5M,
    #[serde(rename = "5m-25m")]
    Range5Mto25M,
    #[serde(rename = "25m-50m")]
    Range25Mto50M,
    #[serde(rename = "50m-plus")]
    Over50M,
}

impl AmountBracket {
    /// All brackets in ascending order.
    pub fn all() -> [AmountBracket; 11] {
        [
            AmountBracket::UpTo1K,
            AmountBracket::Range1Kto15K,
            AmountBracket::Range15Kto50K,
            AmountBracket::Range50Kto100K,
            AmountBracket::Range100Kto250K,
            AmountBracket::Range250Kto500K,
            AmountBracket::Range500Kto1M,
            AmountBracket::Range1Mto5M,
            AmountBracket::Range5Mto25M,
            AmountBracket::Range25Mto50M,
            AmountBracket::Over50M,
        ]
    }

    /// Lower bound in cents, inclusive.
    pub fn min_cents(&self) -> i64 {
        match self {
            AmountBracket::UpTo1K => 100,
            AmountBracket::Range1Kto15K => 100_100,
            AmountBracket::Range15Kto50K => 1_500_100,
            AmountBracket::Range50Kto100K => 5_000_100,
            AmountBracket::Range100Kto250K => 10_000_100,
            AmountBracket::Range250Kto500K => 25_000_100,
            AmountBracket::Range500Kto1M => 50_000_100,
            AmountBracket::Range1Mto5M => 100_000_100,
            AmountBracket::Range5Mto25M => 500_000_100,
            AmountBracket::Range25Mto50M => 2_500_000_100,
            AmountBracket::Over50M => 5_000_000_100,
        }
    }

    /// Upper bound in cents, inclusive. `None` for the open-ended top bracket.
    pub fn max_cents(&self) -> Option<i64> {
        match self {
            AmountBracket::UpTo1K => Some(100_000),
            AmountBracket::Range1Kto15K => Some(1_500_000),
            AmountBracket::Range15Kto50K => Some(5_000_000),
            AmountBracket::Range50Kto100K => Some(10_000_000),
            AmountBracket::Range100Kto250K => Some(25_000_000),
            AmountBracket::Range250Kto500K => Some(50_000_000),
            AmountBracket::Range500Kto1M => Some(100_000_000),
            AmountBracket::Range1Mto5M => Some(500_000_000),
            AmountBracket::Range5Mto25M => Some(2_500_000_000),
            AmountBracket::Range25Mto50M => Some(5_000_000_000),
            AmountBracket::Over50M => None,
        }
    }

    /// Canonical label exactly as a well-formed filing prints it.
    pub fn label(&self) -> &'static str {
        match self {
            AmountBracket::UpTo1K => "$1 - $1,000",
            AmountBracket::Range1Kto15K => "$1,001 - $15,000",
            AmountBracket::Range15Kto50K => "$15,001 - $50,000",
            AmountBracket::Range50Kto100K => "$50,001 - $100,000",
            AmountBracket::Range100Kto250K => "$100,001 - $250,000",
            AmountBracket::Range250Kto500K => "$250,001 - $500,000",
            AmountBracket::Range500Kto1M => "$500,001 - $1,000,000",
            AmountBracket::Range1Mto5M => "$1,000,001 - $5,000,000",
            AmountBracket::Range5Mto25M => "$5,000,001 - $25,000,000",
            AmountBracket::Range25Mto50M => "$25,000,001 - $50,000,000",
            AmountBracket::Over50M => "$50,000,000 +",
        }
    }

    /// Bracket containing a single dollar figure, if any.
    pub fn containing_cents(cents: i64) -> Option<AmountBracket> {
        if cents < 0 {
            return None;
        }
        AmountBracket::all().into_iter().find(|b| {
            cents >= b.min_cents() && b.max_cents().map_or(true, |max| cents <= max)
        })
    }
}

/// A normalized amount: either one of the canonical brackets, or an explicit
/// pair of dollar figures when the raw text carried values that do not line
/// up with any bracket. `max_cents = None` means an open-ended minimum
/// ("over $X", "$X +").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AmountValue {
    Bracket(AmountBracket),
    Explicit {
        min_cents: i64,
        max_cents: Option<i64>,
    },
}

impl AmountValue {
    pub fn min_cents(&self) -> i64 {
        match self {
            AmountValue::Bracket(b) => b.min_cents(),
            AmountValue::Explicit { min_cents, .. } => *min_cents,
        }
    }

    pub fn max_cents(&self) -> Option<i64> {
        match self {
            AmountValue::Bracket(b) => b.max_cents(),
            AmountValue::Explicit { max_cents, .. } => *max_cents,
        }
    }

    /// Display string: canonical label for brackets, `$min - $max` otherwise.
    pub fn display(&self) -> String {
        match self {
            AmountValue::Bracket(b) => b.label().to_string(),
            AmountValue::Explicit { min_cents, max_cents } => match max_cents {
                Some(max) => format!("${} - ${}", group_dollars(*min_cents), group_dollars(*max)),
                None => format!("${} +", group_dollars(*min_cents)),
            },
        }
    }
}

/// Whole dollars with thousands separators, for display only.
fn group_dollars(cents: i64) -> String {
    let dollars = cents / 100;
    let raw = dollars.abs().to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if dollars < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
