// src/ingest/config.rs
use anyhow::{Context, Result};
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config/aggregator.toml";

const DEFAULT_FEED_URL: &str = "https://tsn.ua/rss/full.rss";
const DEFAULT_TRENDS_REGION: &str = "united_states";
const DEFAULT_TARGET_LANG: &str = "uk";
const DEFAULT_INTERVAL_SECS: u64 = 120;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed_url: String,
    pub trends_region: String,
    pub target_lang: String,
    pub interval_secs: u64,
    pub bind_addr: String,
    pub openai_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            trends_region: DEFAULT_TRENDS_REGION.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults <- optional `config/aggregator.toml` <- env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
        } else {
            Self::default()
        };
        cfg.apply_env();
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("NEWS_FEED_URL") {
            self.feed_url = v;
        }
        if let Ok(v) = std::env::var("TRENDS_REGION") {
            self.trends_region = v;
        }
        if let Ok(v) = std::env::var("TARGET_LANG") {
            self.target_lang = v;
        }
        if let Ok(v) = std::env::var("INGEST_INTERVAL_SECS") {
            if let Ok(n) = v.parse() {
                self.interval_secs = n;
            }
        }
        if let Ok(v) = std::env::var("BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Ok(v) = std::env::var("OPENAI_MODEL") {
            self.openai_model = v;
        }
    }

    /// `tokio::time::interval` panics on a zero duration, so a zero interval
    /// from file or env is bumped to the minimum.
    fn sanitize(&mut self) {
        if self.interval_secs == 0 {
            tracing::warn!("interval_secs = 0 is invalid, using 1");
            self.interval_secs = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_cover_every_field() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.trends_region, "united_states");
        assert_eq!(cfg.target_lang, "uk");
        assert_eq!(cfg.interval_secs, 120);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"feed_url = "https://news.test/rss""#).unwrap();
        writeln!(f, "interval_secs = 30").unwrap();

        let cfg = AppConfig::from_file(f.path()).unwrap();
        assert_eq!(cfg.feed_url, "https://news.test/rss");
        assert_eq!(cfg.interval_secs, 30);
        assert_eq!(cfg.trends_region, "united_states");
    }

    #[test]
    fn zero_interval_is_clamped_to_one_second() {
        let mut cfg = AppConfig {
            interval_secs: 0,
            ..AppConfig::default()
        };
        cfg.sanitize();
        assert_eq!(cfg.interval_secs, 1);
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_take_precedence() {
        std::env::set_var("TRENDS_REGION", "ukraine");
        std::env::set_var("INGEST_INTERVAL_SECS", "600");

        let mut cfg = AppConfig::default();
        cfg.apply_env();
        assert_eq!(cfg.trends_region, "ukraine");
        assert_eq!(cfg.interval_secs, 600);

        std::env::remove_var("TRENDS_REGION");
        std::env::remove_var("INGEST_INTERVAL_SECS");
    }
}
