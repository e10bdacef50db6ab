use crate::error::{MarketInsightError, Result};
use crate::llm::{ChatModel, SYSTEM_PROMPT};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GROQ_BASE_URL: &str = "https://api.groq.com";
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for Groq's OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GROQ_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, text: &str) -> Result<String> {
        let url = format!("{}/openai/v1/chat/completions", self.base_url);

        let payload = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: text,
                },
            ],
            temperature: 0.0,
        };

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(classify_failure(status, err_text));
        }

        let body: ChatResponse = res.json().await?;
        first_choice_text(body)
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn invoke(&self, text: &str) -> Result<String> {
        self.chat(text).await
    }
}

/// Maps a failed completion response onto the error taxonomy. Throttling is
/// recognised by status first and by the provider's message as a fallback.
fn classify_failure(status: StatusCode, body: String) -> MarketInsightError {
    if status == StatusCode::TOO_MANY_REQUESTS || body.contains("Rate limit") {
        MarketInsightError::RateLimited(body)
    } else {
        MarketInsightError::Llm {
            status: status.as_u16(),
            message: body,
        }
    }
}

fn first_choice_text(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| MarketInsightError::Llm {
            status: StatusCode::OK.as_u16(),
            message: "No choices returned".to_string(),
        })
}
