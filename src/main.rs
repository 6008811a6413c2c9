//! Trend News Aggregator — Binary Entrypoint
//! Boots the ingest scheduler and the Axum read API, wiring shared state.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trend_news_aggregator::api::{self, AppState};
use trend_news_aggregator::ingest::config::AppConfig;
use trend_news_aggregator::ingest::providers::{
    rss::RssFeedProvider,
    translate::MyMemoryTranslator,
    trends::{GoogleTrendsProvider, TrendFetcher},
};
use trend_news_aggregator::ingest::scheduler::{spawn_pipeline_scheduler, SchedulerCfg};
use trend_news_aggregator::ingest::PipelineDeps;
use trend_news_aggregator::metrics::Metrics;
use trend_news_aggregator::sentiment::{OpenAiChatClient, SentimentScorer};
use trend_news_aggregator::store::MemoryStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load().context("loading configuration")?;
    tracing::info!(?cfg, "starting trend-news-aggregator");

    let metrics = Metrics::init(cfg.interval_secs);

    let http = reqwest::Client::builder()
        .user_agent("trend-news-aggregator/0.1")
        .connect_timeout(std::time::Duration::from_secs(4))
        .timeout(std::time::Duration::from_secs(20))
        .build()
        .context("building http client")?;

    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is empty; sentiment scoring will fail");
    }

    let store = Arc::new(MemoryStore::new());
    let deps = Arc::new(PipelineDeps {
        feed: Arc::new(RssFeedProvider::from_url(cfg.feed_url.clone(), http.clone())),
        trends: TrendFetcher::new(
            Arc::new(GoogleTrendsProvider::new(http.clone())),
            Arc::new(MyMemoryTranslator::new(http, "en", &cfg.target_lang)),
        ),
        trends_region: cfg.trends_region.clone(),
        scorer: SentimentScorer::new(Arc::new(OpenAiChatClient::new(
            api_key,
            cfg.openai_model.clone(),
        ))),
        store: store.clone(),
    });

    let _scheduler = spawn_pipeline_scheduler(
        SchedulerCfg {
            interval_secs: cfg.interval_secs,
        },
        deps,
    );

    let router = api::create_router(AppState { store }).merge(metrics.router());
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.bind_addr))?;
    tracing::info!(addr = %cfg.bind_addr, "read API listening");
    axum::serve(listener, router).await.context("serving api")?;

    Ok(())
}
