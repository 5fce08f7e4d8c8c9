//! Fuzzy string similarity helpers shared by the normalizers and the
//! duplicate auditor.
//!
//! strsim provides the primitives (Jaro-Winkler, normalized Levenshtein);
//! the token-set ratio on top of them makes comparisons insensitive to word
//! order and duplicated words, which is what company-name columns need
//! ("APPLE INC COMMON STOCK" vs "Apple Inc.").

/// Lowercase alphanumeric tokens, order preserved. Single-character tokens
/// are kept: they carry share-class suffixes ("Class A" vs "Class B").
pub fn tokenize(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Token-set ratio in [0, 1]: compare the sorted token intersection against
/// each side's full sorted token string and keep the best pairwise score.
/// 1.0 when one side's tokens are a subset of the other's.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let mut ta = tokenize(a);
    let mut tb = tokenize(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    ta.sort();
    ta.dedup();
    tb.sort();
    tb.dedup();

    let inter: Vec<&String> = ta.iter().filter(|t| tb.binary_search(t).is_ok()).collect();
    let joined_inter = inter
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let joined_a = ta.join(" ");
    let joined_b = tb.join(" ");

    let inter_vs_a = strsim::normalized_levenshtein(&joined_inter, &joined_a);
    let inter_vs_b = strsim::normalized_levenshtein(&joined_inter, &joined_b);
    let full = strsim::normalized_levenshtein(&joined_a, &joined_b);

    inter_vs_a.max(inter_vs_b).max(full)
}

/// Jaro-Winkler over whole lowercased strings; the right tool for short
/// code-like values (owner codes, ticker variants).
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::jaro_winkler(&a.to_lowercase(), &b.to_lowercase())
}

/// Best dictionary entry by token-set ratio, with its score, if any entry
/// clears `floor`.
pub fn best_match<'a, I>(needle: &str, haystack: I, floor: f64) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in haystack {
        let score = token_set_ratio(needle, candidate);
        if score < floor {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((candidate, score)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_set_ratio_order_insensitive() {
        let a = token_set_ratio("Apple Inc Common Stock", "Common Stock Apple Inc");
        assert!(a > 0.99, "got {a}");
    }

    #[test]
    fn test_token_set_ratio_subset() {
        let a = token_set_ratio("Apple", "Apple Inc");
        assert!(a > 0.95, "got {a}");
    }

    #[test]
    fn test_token_set_ratio_disjoint() {
        let a = token_set_ratio("Apple Inc", "Exxon Mobil Corp");
        assert!(a < 0.5, "got {a}");
    }

    #[test]
    fn test_tokenize_keeps_share_class_letters() {
        assert_eq!(tokenize("Berkshire Class B"), vec!["berkshire", "class", "b"]);
        let a = token_set_ratio("Berkshire Hathaway Class A", "Berkshire Hathaway Class B");
        assert!(a < 1.0, "share classes must stay distinguishable, got {a}");
    }

    #[test]
    fn test_best_match_respects_floor() {
        let dict = ["apple inc", "microsoft corp", "exxon mobil"];
        let hit = best_match("aple inc", dict.iter().copied(), 0.80);
        assert_eq!(hit.map(|(name, _)| name), Some("apple inc"));

        let miss = best_match("zzzz", dict.iter().copied(), 0.80);
        assert!(miss.is_none());
    }

    #[test]
    fn test_similarity_close_codes() {
        assert!(similarity("JT", "JT") > 0.99);
        assert!(similarity("JOINT", "JOINTLY") > 0.9);
    }
}
