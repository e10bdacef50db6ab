use crate::error::{MarketInsightError, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Machine translation through Google's public translate endpoint.
#[derive(Clone)]
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
    source: String,
    target: String,
}

impl GoogleTranslator {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: GOOGLE_TRANSLATE_URL.to_string(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Indonesian to English, the direction product names are looked up in.
    pub fn indonesian_to_english() -> Self {
        Self::new("id", "en")
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let res = self
            .client
            .get(&self.base_url)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(MarketInsightError::Translation(format!(
                "Translate API error (status {}): {}",
                status, err_text
            )));
        }

        let body: Value = res.json().await?;
        let translated = parse_translation(&body)?;
        debug!("Translated '{}' -> '{}'", text, translated);
        Ok(translated)
    }
}

// Response shape: [[["translated", "original", ...], ...], null, "id", ...]
fn parse_translation(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            MarketInsightError::Translation("Unexpected translate response format".to_string())
        })?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|s| s.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(MarketInsightError::Translation(
            "Translate response contained no text".to_string(),
        ));
    }

    Ok(translated)
}
