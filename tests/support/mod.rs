#![allow(dead_code)]

use async_trait::async_trait;
use market_insight::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn record(reporter: &str, period: i32, net_wgt: f64, primary_value: f64) -> TradeRecord {
    TradeRecord {
        reporter_desc: reporter.to_string(),
        period,
        net_wgt,
        primary_value,
        cmd_desc: Some("Coconut (copra) oil and its fractions".to_string()),
        reporter_code: None,
        cmd_code: Some("151319".to_string()),
    }
}

/// Imports of coconut oil from Indonesia, out of period order on purpose.
pub fn coconut_oil_records() -> Vec<TradeRecord> {
    vec![
        record("Malaysia", 2023, 9_000.0, 18_000.0),
        record("Netherlands", 2021, 4_000.0, 9_000.0),
        record("China", 2022, 6_000.0, 11_000.0),
        record("Malaysia", 2021, 7_000.0, 14_000.0),
        record("USA", 2023, 3_000.0, 8_000.0),
        record("China", 2023, 5_500.0, 10_500.0),
        record("Netherlands", 2023, 4_500.0, 9_500.0),
        record("Malaysia", 2022, 8_000.0, 16_000.0),
        record("Japan", 2022, 100.0, 400.0),
    ]
}

/// Answers the HS code question, drafts a per-country forecast and echoes
/// the bracketed pair back when asked to extract it.
pub struct FakeModel {
    pub hs_reply: String,
    pub forecasts: HashMap<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn new(hs_reply: &str) -> Self {
        Self {
            hs_reply: hs_reply.to_string(),
            forecasts: HashMap::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_forecast(mut self, country: &str, pair: &str) -> Self {
        self.forecasts.insert(country.to_string(), pair.to_string());
        self
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for FakeModel {
    async fn invoke(&self, text: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(text.to_string());

        if text.starts_with("What is the HS Code") {
            return Ok(self.hs_reply.clone());
        }

        if let Some(info) = text.split("Information:").nth(1) {
            let pair = info
                .find('[')
                .and_then(|start| info[start..].find(']').map(|end| &info[start..=start + end]))
                .unwrap_or("I could not find a prediction");
            return Ok(pair.to_string());
        }

        let country = text
            .split("how much ")
            .nth(1)
            .and_then(|rest| rest.split(" will import").next())
            .unwrap_or_default();
        let pair = self
            .forecasts
            .get(country)
            .cloned()
            .unwrap_or_else(|| "[1,000; 2,000]".to_string());
        Ok(format!(
            "Looking at the trend, {} should import roughly {} next year.",
            country, pair
        ))
    }
}

pub struct FakeTranslator;

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        Ok(match text {
            "minyak kelapa" => "coconut oil".to_string(),
            other => other.to_string(),
        })
    }
}

pub struct FakeTradeSource {
    pub records: Vec<TradeRecord>,
    pub queries: Mutex<Vec<TradeQuery>>,
}

impl FakeTradeSource {
    pub fn new(records: Vec<TradeRecord>) -> Self {
        Self {
            records,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TradeSource for FakeTradeSource {
    async fn fetch(&self, query: &TradeQuery) -> Result<Vec<TradeRecord>> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.records.clone())
    }
}

pub fn service(
    model: Arc<FakeModel>,
    trade: Arc<FakeTradeSource>,
) -> MarketInsightService {
    MarketInsightService::new(model, Arc::new(FakeTranslator), trade)
}
