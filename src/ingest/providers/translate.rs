// src/ingest/providers/translate.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// MyMemory translation client (no API key required for low volumes).
pub struct MyMemoryTranslator {
    client: reqwest::Client,
    /// e.g. "en|uk"
    langpair: String,
}

impl MyMemoryTranslator {
    const ENDPOINT: &'static str = "https://api.mymemory.translated.net/get";

    pub fn new(client: reqwest::Client, source_lang: &str, target_lang: &str) -> Self {
        Self {
            client,
            langpair: format!("{source_lang}|{target_lang}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: ResponseData,
    #[serde(rename = "responseStatus")]
    response_status: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let resp = self
            .client
            .get(Self::ENDPOINT)
            .query(&[("q", text), ("langpair", &self.langpair)])
            .send()
            .await
            .context("calling translation service")?
            .error_for_status()
            .context("translation service returned error status")?;

        let body: MyMemoryResponse = resp
            .json()
            .await
            .context("parsing translation service response")?;

        // MyMemory reports errors in-band: status 200 with a non-200 code.
        if body.response_status.as_i64().unwrap_or(0) != 200
            && body.response_status.as_str() != Some("200")
        {
            return Err(anyhow!(
                "translation service rejected request: status {}",
                body.response_status
            ));
        }

        body.response_data
            .translated_text
            .ok_or_else(|| anyhow!("translation response missing translatedText"))
    }

    fn name(&self) -> &'static str {
        "MyMemory"
    }
}
