use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketInsightError {
    #[error("Rate limit reached: {0}")]
    RateLimited(String),

    #[error("Failed to process request after multiple attempts ({attempts} attempts)")]
    RetriesExhausted { attempts: u32 },

    #[error("LLM API error (status {status}): {message}")]
    Llm { status: u16, message: String },

    #[error("Trade API error: {0}")]
    TradeApi(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("No bracketed value found in {context} reply: {reply}")]
    MissingPattern { context: String, reply: String },

    #[error("Invalid forecast value: {0}")]
    InvalidForecast(String),

    #[error("No trade rows available for {0}")]
    EmptyTable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl MarketInsightError {
    /// Whether the retry policy may try the call again.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, MarketInsightError::RateLimited(_))
    }
}

pub type Result<T> = std::result::Result<T, MarketInsightError>;
