// src/ingest/matcher.rs
use std::collections::HashSet;

use crate::ingest::normalize_text;
use crate::ingest::types::{FeedEntry, MatchedEntry};

/// Cross-reference feed entries with trend terms.
///
/// The match decision and the `trend_names` annotation deliberately use two
/// different rules:
///   1. an entry matches when the set of normalized trends intersects the
///      set of whitespace tokens of the normalized title;
///   2. `trend_names` re-scans the original trend list and keeps every trend
///      whose normalized form is a substring of the normalized title.
/// A multi-word trend can therefore appear in `trend_names` without ever
/// driving the match. Do not unify the two steps.
pub fn match_entries(entries: &[FeedEntry], trends: &[String]) -> Vec<MatchedEntry> {
    let trends_normalized: HashSet<String> = trends.iter().map(|t| normalize_text(t)).collect();

    let mut matched = Vec::new();
    for entry in entries {
        let title_normalized = normalize_text(&entry.title);
        let title_tokens: HashSet<&str> = title_normalized.split_whitespace().collect();

        let hit = trends_normalized
            .iter()
            .any(|t| title_tokens.contains(t.as_str()));
        if !hit {
            continue;
        }

        let trend_names = trends
            .iter()
            .filter(|t| title_normalized.contains(&normalize_text(t)))
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        tracing::info!(title = %entry.title, trends = %trend_names, "news matched");
        matched.push(MatchedEntry {
            entry: entry.clone(),
            trend_names,
        });
    }

    tracing::info!(matched = matched.len(), total = entries.len(), "matched news with trends");
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: "https://example.test/a".to_string(),
            published: Some(1_700_000_000),
        }
    }

    #[test]
    fn single_word_trend_matches_and_annotates() {
        let entries = vec![entry("Stocks rally as market surges")];
        let trends = vec!["market".to_string()];
        let out = match_entries(&entries, &trends);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].trend_names, "market");
    }

    #[test]
    fn disjoint_vocabulary_is_dropped() {
        let entries = vec![entry("Weather report")];
        let trends = vec!["market".to_string()];
        assert!(match_entries(&entries, &trends).is_empty());
    }

    #[test]
    fn multiword_trend_rides_along_via_substring_rule() {
        // "stock market" never token-matches (tokens are single words), but
        // once "market" matches the entry, the substring re-scan picks the
        // multi-word trend up as well.
        let entries = vec![entry("Stocks rally as stock market surges")];
        let trends = vec!["market".to_string(), "stock market".to_string()];
        let out = match_entries(&entries, &trends);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].trend_names, "market, stock market");
    }

    #[test]
    fn multiword_trend_alone_never_matches() {
        let entries = vec![entry("Stocks rally as stock market surges")];
        let trends = vec!["stock market".to_string()];
        assert!(match_entries(&entries, &trends).is_empty());
    }
}
