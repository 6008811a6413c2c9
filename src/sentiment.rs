//! Sentiment scoring via an external chat-completion service.
//!
//! The service replies in free text, so the score is recovered with an
//! ordered fallback chain: numeric extraction, then keyword match, then 0.0.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::counter;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::ingest::types::{EnrichedEntry, MatchedEntry};

const SYSTEM_PROMPT: &str = "You are an assistant providing sentiment analysis. \
Please rate the sentiment of the following text from -1 (very negative) to 1 (very positive).";

/// Low-level client for the scoring service: takes the text, returns the
/// raw reply. Separated behind a trait so tests can substitute a fake.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn completion(&self, text: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub type DynChatClient = Arc<dyn ChatClient>;

/// OpenAI Chat Completions client. Requires an API key.
pub struct OpenAiChatClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiChatClient {
    const ENDPOINT: &'static str = "https://api.openai.com/v1/chat/completions";

    pub fn new(api_key: String, model: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("trend-news-aggregator/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn completion(&self, text: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
            n: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Msg {
                    role: "user",
                    content: text,
                },
            ],
            // Deterministic decoding; the reply is parsed, not displayed.
            temperature: 0.0,
            max_tokens: 50,
            n: 1,
        };

        counter!("sentiment_requests_total").increment(1);

        let resp = self
            .http
            .post(Self::ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("calling scoring service")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("scoring service returned {status}: {body}"));
        }

        let body: Resp = resp
            .json()
            .await
            .context("parsing scoring service response")?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("scoring service response missing message content"))?;
        Ok(content.trim().to_string())
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Parse a free-text sentiment reply into a score.
///
/// Precedence, each step independently testable:
///   1. first signed/unsigned decimal number anywhere in the reply,
///      returned as-is (no clamping to [-1, 1]);
///   2. the substring "positive" -> 1.0, "negative" -> -1.0;
///   3. 0.0.
pub fn parse_sentiment_reply(reply: &str) -> f64 {
    static RE_NUM: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_NUM.get_or_init(|| regex::Regex::new(r"-?\d+(\.\d+)?").unwrap());

    if let Some(m) = re.find(reply) {
        if let Ok(v) = m.as_str().parse::<f64>() {
            return v;
        }
    }

    if reply.contains("positive") {
        return 1.0;
    }
    if reply.contains("negative") {
        return -1.0;
    }
    0.0
}

/// Scores matched entries one at a time through the injected client.
pub struct SentimentScorer {
    client: DynChatClient,
}

impl SentimentScorer {
    pub fn new(client: DynChatClient) -> Self {
        Self { client }
    }

    pub async fn score(&self, text: &str) -> Result<f64> {
        let reply = self.client.completion(text).await?;
        let score = parse_sentiment_reply(&reply);
        tracing::info!(text, score, reply = %reply, "sentiment scored");
        Ok(score)
    }

    /// Sequential, all-or-nothing: one failed call fails the whole batch
    /// and no partial set is returned.
    pub async fn enrich(&self, matched: Vec<MatchedEntry>) -> Result<Vec<EnrichedEntry>> {
        let mut out = Vec::with_capacity(matched.len());
        for m in matched {
            let sentiment_score = self
                .score(&m.entry.title)
                .await
                .with_context(|| format!("scoring '{}'", m.entry.title))?;
            out.push(EnrichedEntry {
                matched: m,
                sentiment_score,
            });
        }
        Ok(out)
    }
}
