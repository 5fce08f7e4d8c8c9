//! Token shape predicates shared by the extraction strategies and the
//! correction cascade. Both sides must agree on what counts as a date, a
//! transaction type, or the start of an amount expression.

use std::sync::LazyLock;

use chrono::NaiveDate;
use disclose_core::TransactionType;
use regex::Regex;

static DATE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{1,2}/\d{1,2}/\d{4}|\d{4}-\d{2}-\d{2})[.,;]?$").unwrap()
});

/// `M/D/YYYY` or ISO-8601, with tolerated trailing punctuation.
pub fn is_date_shaped(token: &str) -> bool {
    DATE_TOKEN_RE.is_match(token.trim())
}

/// A recognizable transaction-type token (`P`, `S`, `E`, `S(partial)`).
pub fn is_type_shaped(token: &str) -> bool {
    TransactionType::from_raw(token).is_some()
}

/// The first token of an amount expression.
pub fn is_amount_start(token: &str) -> bool {
    let t = token.trim();
    t.starts_with('$') || t.eq_ignore_ascii_case("over") || t.eq_ignore_ascii_case("greater")
}

/// The owner prefix at the head of a structural line, if present.
pub fn owner_prefix(token: &str) -> Option<&'static str> {
    match token
        .trim_end_matches([':', '.', ','])
        .to_ascii_uppercase()
        .as_str()
    {
        "SP" => Some("SP"),
        "DC" => Some("DC"),
        "JT" => Some("JT"),
        _ => None,
    }
}

/// Parse a date token under either accepted format.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim().trim_end_matches(['.', ',', ';']);
    NaiveDate::parse_from_str(cleaned, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(cleaned, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_shapes() {
        assert!(is_date_shaped("01/27/2023"));
        assert!(is_date_shaped("1/5/2023,"));
        assert!(is_date_shaped("2023-01-27"));
        assert!(!is_date_shaped("01/27/23"));
        assert!(!is_date_shaped("$1,001"));
    }

    #[test]
    fn test_type_shapes() {
        assert!(is_type_shaped("P"));
        assert!(is_type_shaped("s"));
        assert!(is_type_shaped("S(partial)"));
        assert!(!is_type_shaped("Stock"));
    }

    #[test]
    fn test_parse_flexible_date() {
        let d = parse_flexible_date("1/5/2023").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
        let iso = parse_flexible_date("2023-01-05").unwrap();
        assert_eq!(iso, d);
        assert!(parse_flexible_date("13/45/2023").is_none());
    }

    #[test]
    fn test_owner_prefix() {
        assert_eq!(owner_prefix("jt"), Some("JT"));
        assert_eq!(owner_prefix("SP:"), Some("SP"));
        assert_eq!(owner_prefix("JTX"), None);
    }
}
