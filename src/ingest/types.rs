// src/ingest/types.rs
use anyhow::Result;

/// One article pulled from the news feed.
///
/// `published` is unix seconds; `None` when the feed's `pubDate` did not
/// parse as RFC 2822. A bad date never drops the entry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub published: Option<i64>,
}

/// A feed entry whose title shares vocabulary with at least one trend term.
/// `trend_names` is the ", "-joined list of matching trends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEntry {
    pub entry: FeedEntry,
    pub trend_names: String,
}

/// A matched entry with its sentiment score attached.
/// The score is nominally in [-1, 1] but stored as returned, unclamped.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedEntry {
    pub matched: MatchedEntry,
    pub sentiment_score: f64,
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<FeedEntry>>;
    fn name(&self) -> &'static str;
}
