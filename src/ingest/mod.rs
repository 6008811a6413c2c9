// src/ingest/mod.rs
pub mod config;
pub mod matcher;
pub mod providers;
pub mod scheduler;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::ingest::providers::trends::TrendFetcher;
use crate::ingest::types::FeedSource;
use crate::sentiment::SentimentScorer;
use crate::store::{DynNewsStore, NewsRecord};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_runs_total", "Pipeline runs started.");
        describe_counter!("ingest_run_errors_total", "Pipeline runs that failed.");
        describe_counter!("ingest_entries_total", "Feed entries parsed.");
        describe_counter!("ingest_matched_total", "Entries matched against trends.");
        describe_counter!("ingest_upserts_total", "News records upserted.");
        describe_counter!("sentiment_requests_total", "Scoring service calls issued.");
        describe_histogram!("ingest_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!(
            "ingest_pipeline_last_run_ts",
            "Unix ts when the pipeline last completed."
        );
    });
}

/// Canonical form used on both sides of the trend/title match: every maximal
/// run of non-word characters becomes one space, then lowercase, then trim.
pub fn normalize_text(text: &str) -> String {
    static RE_NON_WORD: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_NON_WORD.get_or_init(|| regex::Regex::new(r"\W+").unwrap());
    re.replace_all(text, " ").to_lowercase().trim().to_string()
}

/// Everything one pipeline run needs, injected so tests can fake each seam.
pub struct PipelineDeps {
    pub feed: Arc<dyn FeedSource>,
    pub trends: TrendFetcher,
    pub trends_region: String,
    pub scorer: SentimentScorer,
    pub store: DynNewsStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub trends: usize,
    pub matched: usize,
    pub created: usize,
    pub updated: usize,
}

/// One full pipeline run, strictly sequential:
/// fetch feed -> fetch+translate trends -> match -> score -> upsert.
///
/// Any upstream failure aborts before a single upsert happens. Upserts are
/// independent; a failure mid-way leaves the already-committed prefix in
/// place and propagates.
pub async fn run_once(deps: &PipelineDeps) -> Result<RunSummary> {
    ensure_metrics_described();
    counter!("ingest_runs_total").increment(1);

    let entries = deps
        .feed
        .fetch_latest()
        .await
        .context("fetching news feed")?;
    tracing::info!(count = entries.len(), source = deps.feed.name(), "fetched feed entries");

    let trends = deps
        .trends
        .fetch(&deps.trends_region)
        .await
        .context("fetching trends")?;
    tracing::info!(count = trends.len(), region = %deps.trends_region, "fetched translated trends");

    let matched = matcher::match_entries(&entries, &trends);
    counter!("ingest_matched_total").increment(matched.len() as u64);

    let enriched = deps
        .scorer
        .enrich(matched)
        .await
        .context("enriching matched news with sentiment")?;

    let mut created = 0usize;
    let mut updated = 0usize;
    for e in &enriched {
        let record = NewsRecord {
            title: e.matched.entry.title.clone(),
            link: e.matched.entry.link.clone(),
            published: e.matched.entry.published,
            sentiment_score: e.sentiment_score,
            trend_names: e.matched.trend_names.clone(),
        };
        let was_created = deps
            .store
            .upsert(record)
            .with_context(|| format!("upserting '{}'", e.matched.entry.title))?;
        counter!("ingest_upserts_total").increment(1);
        if was_created {
            created += 1;
        } else {
            updated += 1;
        }
        tracing::info!(
            title = %e.matched.entry.title,
            action = if was_created { "created" } else { "updated" },
            "news record upserted"
        );
    }

    let now = chrono::Utc::now().timestamp().max(0) as u64;
    gauge!("ingest_pipeline_last_run_ts").set(now as f64);

    let summary = RunSummary {
        entries: entries.len(),
        trends: trends.len(),
        matched: enriched.len(),
        created,
        updated,
    };
    tracing::info!(?summary, "pipeline run completed");
    Ok(summary)
}
