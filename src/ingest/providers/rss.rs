// src/ingest/providers/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::ingest::types::{FeedEntry, FeedSource};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// RFC 2822 (`Mon, 02 Jan 2006 15:04:05 +0200`) to unix seconds.
/// Returns `None` on parse failure; the caller keeps the entry either way.
fn parse_pub_date(ts: &str) -> Option<i64> {
    match OffsetDateTime::parse(ts, &Rfc2822) {
        Ok(dt) => Some(dt.to_offset(UtcOffset::UTC).unix_timestamp()),
        Err(e) => {
            tracing::warn!(error = %e, pub_date = ts, "unparseable pubDate, keeping entry without it");
            None
        }
    }
}

/// News feed provider. HTTP in production, fixture strings in tests.
pub struct RssFeedProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        url: String,
        client: reqwest::Client,
    },
}

impl RssFeedProvider {
    pub fn from_url(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client,
            },
        }
    }

    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<FeedEntry>> {
        let t0 = std::time::Instant::now();
        let rss: Rss = from_str(s).context("parsing news feed xml")?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let title = it.title.unwrap_or_default();
            if title.is_empty() {
                continue;
            }
            out.push(FeedEntry {
                title,
                link: it.link.unwrap_or_default(),
                published: it.pub_date.as_deref().and_then(parse_pub_date),
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_entries_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl FeedSource for RssFeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<FeedEntry>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_items_from_str(s),

            Mode::Http { url, client } => {
                let resp = client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("fetching news feed from {url}"))?;
                let resp = resp
                    .error_for_status()
                    .with_context(|| format!("news feed returned error status for {url}"))?;
                let body = resp.text().await.context("reading news feed body")?;
                Self::parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "NewsFeed"
    }
}
