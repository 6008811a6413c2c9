// src/ingest/providers/trends.rs
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::providers::translate::Translator;

#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Current ranked trending search terms for `region`, untranslated.
    async fn trending(&self, region: &str) -> Result<Vec<String>>;
    fn name(&self) -> &'static str;
}

/// Map a pytrends-style region name to the geo code the trends RSS expects.
/// Unknown names are passed through uppercased so plain geo codes also work.
fn region_to_geo(region: &str) -> String {
    match region {
        "united_states" => "US".to_string(),
        "united_kingdom" => "GB".to_string(),
        "ukraine" => "UA".to_string(),
        "germany" => "DE".to_string(),
        "poland" => "PL".to_string(),
        other => other.to_ascii_uppercase(),
    }
}

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
}

fn parse_terms_from_str(s: &str) -> Result<Vec<String>> {
    let rss: Rss = from_str(s).context("parsing trends rss xml")?;
    Ok(rss
        .channel
        .item
        .into_iter()
        .filter_map(|it| it.title)
        .filter(|t| !t.is_empty())
        .collect())
}

/// Google Trends daily trending-searches provider (RSS endpoint).
pub struct GoogleTrendsProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

impl GoogleTrendsProvider {
    const ENDPOINT: &'static str = "https://trends.google.com/trending/rss";

    pub fn new(client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http { client },
        }
    }

    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }
}

#[async_trait]
impl TrendSource for GoogleTrendsProvider {
    async fn trending(&self, region: &str) -> Result<Vec<String>> {
        match &self.mode {
            Mode::Fixture(s) => parse_terms_from_str(s),

            Mode::Http { client } => {
                let geo = region_to_geo(region);
                let body = client
                    .get(Self::ENDPOINT)
                    .query(&[("geo", geo.as_str())])
                    .send()
                    .await
                    .with_context(|| format!("fetching trends for {region}"))?
                    .error_for_status()
                    .with_context(|| format!("trends source returned error status for {region}"))?
                    .text()
                    .await
                    .context("reading trends body")?;
                parse_terms_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "GoogleTrends"
    }
}

/// Fetches trending terms and translates them in order.
///
/// A single translation failure aborts the whole fetch, so the pipeline
/// either sees the full translated list or none of it.
pub struct TrendFetcher {
    source: Arc<dyn TrendSource>,
    translator: Arc<dyn Translator>,
}

impl TrendFetcher {
    pub fn new(source: Arc<dyn TrendSource>, translator: Arc<dyn Translator>) -> Self {
        Self { source, translator }
    }

    pub async fn fetch(&self, region: &str) -> Result<Vec<String>> {
        let terms = self.source.trending(region).await?;
        tracing::debug!(count = terms.len(), region, "fetched trending terms");

        let mut translated = Vec::with_capacity(terms.len());
        for term in &terms {
            let out = self
                .translator
                .translate(term)
                .await
                .with_context(|| format!("translating trend term '{term}'"))?;
            tracing::debug!(term, translated = %out, "translated trend");
            translated.push(out);
        }
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_mapping_knows_defaults_and_passes_codes_through() {
        assert_eq!(region_to_geo("united_states"), "US");
        assert_eq!(region_to_geo("ukraine"), "UA");
        assert_eq!(region_to_geo("fr"), "FR");
    }

    #[test]
    fn trends_rss_parses_titles_in_order() {
        let xml = r#"<rss version="2.0"><channel>
            <title>Daily Search Trends</title>
            <item><title>market</title></item>
            <item><title>taylor swift</title></item>
        </channel></rss>"#;
        let terms = parse_terms_from_str(xml).unwrap();
        assert_eq!(terms, vec!["market".to_string(), "taylor swift".to_string()]);
    }
}
