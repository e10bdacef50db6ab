use crate::comtrade::COMTRADE_BASE_URL;
use crate::error::{MarketInsightError, Result};
use crate::llm::{DEFAULT_MODEL, GROQ_BASE_URL};
use std::collections::HashMap;
use std::time::Duration;

/// Process settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub comtrade_api_key: String,
    pub comtrade_base_url: String,
    pub groq_api_key: String,
    pub groq_base_url: String,
    pub groq_model: String,
    pub llm_max_attempts: u32,
    pub request_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| MarketInsightError::Config(format!("{} must be set", key)))
        };

        let llm_max_attempts = parse_or("LLM_MAX_ATTEMPTS", get("LLM_MAX_ATTEMPTS"), 5)?;
        if llm_max_attempts == 0 {
            return Err(MarketInsightError::Config(
                "LLM_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            comtrade_api_key: required("COMTRADE_UN_API_KEY")?,
            comtrade_base_url: get("COMTRADE_BASE_URL")
                .unwrap_or_else(|| COMTRADE_BASE_URL.to_string()),
            groq_api_key: required("GROQ_API_KEY")?,
            groq_base_url: get("GROQ_BASE_URL").unwrap_or_else(|| GROQ_BASE_URL.to_string()),
            groq_model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_max_attempts,
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                get("REQUEST_TIMEOUT_SECS"),
                120,
            )?),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", get("PORT"), 8000)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| MarketInsightError::Config(format!("{} is invalid ('{}'): {}", key, raw, e))),
    }
}
