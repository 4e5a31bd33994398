//! Fuzzy keyword scoring for group lookups.
//!
//! Every incoming group message is scored against all stored keywords of
//! that chat. Jaro-Winkler similarity (scaled to 0-100) tolerates the typos
//! people actually make in movie names ("alfa" for "alpha"); anything below
//! the threshold counts as no match.

use strsim::jaro_winkler;

/// Minimum 0-100 score for a keyword to count as a match.
pub const MATCH_THRESHOLD: f64 = 80.0;

/// A winning keyword and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch<'a> {
    pub keyword: &'a str,
    pub score: f64,
}

/// Pick the best-scoring keyword for a message, if any clears the threshold.
///
/// Keywords are expected lowercase and in ascending order (the repository
/// stores them that way); only a strictly higher score replaces the current
/// best, so equal scores resolve to the first keyword in that order. An
/// exact match scores 100 and always wins.
pub fn best_match<'a>(keywords: &'a [String], message: &str) -> Option<FuzzyMatch<'a>> {
    let message = message.trim().to_lowercase();
    if message.is_empty() {
        return None;
    }

    let mut best: Option<FuzzyMatch<'a>> = None;

    for keyword in keywords {
        let score = jaro_winkler(keyword, &message) * 100.0;
        let replace = match best {
            Some(current) => score > current.score,
            None => true,
        };
        if replace {
            best = Some(FuzzyMatch { keyword, score });
        }
    }

    best.filter(|m| m.score >= MATCH_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_exact_match_scores_100_and_wins() {
        let kws = keywords(&["alpha", "alphas", "beta"]);
        let m = best_match(&kws, "alpha").unwrap();

        assert_eq!(m.keyword, "alpha");
        assert_eq!(m.score, 100.0);
    }

    #[test]
    fn test_close_typo_clears_threshold() {
        let kws = keywords(&["alpha"]);
        let m = best_match(&kws, "alfa").unwrap();

        assert_eq!(m.keyword, "alpha");
        assert!(m.score >= MATCH_THRESHOLD);
    }

    #[test]
    fn test_unrelated_text_matches_nothing() {
        let kws = keywords(&["alpha", "beta", "gamma"]);
        assert_eq!(best_match(&kws, "zzz"), None);
    }

    #[test]
    fn test_equal_scores_keep_first_keyword() {
        // "ab" scores identically against both; sorted order breaks the tie.
        let kws = keywords(&["abc", "abd"]);
        let m = best_match(&kws, "ab").unwrap();

        assert_eq!(m.keyword, "abc");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let kws = keywords(&["alpha"]);
        let m = best_match(&kws, "  ALPHA  ").unwrap();

        assert_eq!(m.score, 100.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(best_match(&[], "alpha"), None);

        let kws = keywords(&["alpha"]);
        assert_eq!(best_match(&kws, "   "), None);
    }
}
