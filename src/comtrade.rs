use crate::error::{MarketInsightError, Result};
use crate::table::TradeRecord;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const COMTRADE_BASE_URL: &str = "https://comtradeapi.un.org";

/// UN M49 code of Indonesia, the fixed trade partner.
pub const INDONESIA_PARTNER_CODE: &str = "360";
pub const MAX_RECORDS: u32 = 500;

/// An annual import query: every reporter that imported `cmd_code` from the
/// partner during the listed periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeQuery {
    pub cmd_code: String,
    /// Comma separated years, e.g. `"2023,2022,2021"`.
    pub period: String,
    pub partner_code: String,
    pub max_records: u32,
}

impl TradeQuery {
    pub fn imports_from_indonesia(cmd_code: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            cmd_code: cmd_code.into(),
            period: period.into(),
            partner_code: INDONESIA_PARTNER_CODE.to_string(),
            max_records: MAX_RECORDS,
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("cmdCode", self.cmd_code.clone()),
            ("flowCode", "M".to_string()),
            ("partnerCode", self.partner_code.clone()),
            ("period", self.period.clone()),
            ("maxRecords", self.max_records.to_string()),
            ("format", "JSON".to_string()),
            ("breakdownMode", "classic".to_string()),
            ("includeDesc", "True".to_string()),
        ]
    }
}

#[async_trait]
pub trait TradeSource: Send + Sync {
    async fn fetch(&self, query: &TradeQuery) -> Result<Vec<TradeRecord>>;
}

#[derive(Debug, Deserialize)]
struct ComtradeResponse {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    data: Option<Vec<TradeRecord>>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the UN Comtrade final-data API (annual, HS classification).
#[derive(Clone)]
pub struct ComtradeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ComtradeClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: COMTRADE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }
}

#[async_trait]
impl TradeSource for ComtradeClient {
    async fn fetch(&self, query: &TradeQuery) -> Result<Vec<TradeRecord>> {
        let url = format!("{}/data/v1/get/C/A/HS", self.base_url);
        info!(
            "Fetching Comtrade imports: cmdCode={} period={} partner={}",
            query.cmd_code, query.period, query.partner_code
        );

        let res = self
            .client
            .get(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&query.query_pairs())
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(MarketInsightError::TradeApi(format!(
                "Comtrade API error (status {}): {}",
                status, err_text
            )));
        }

        let body: ComtradeResponse = res.json().await?;
        let records = parse_response(body, query.max_records)?;
        debug!("Comtrade returned {} records", records.len());
        Ok(records)
    }
}

fn parse_response(body: ComtradeResponse, max_records: u32) -> Result<Vec<TradeRecord>> {
    if let Some(error) = body.error.filter(|e| !e.trim().is_empty()) {
        return Err(MarketInsightError::TradeApi(error));
    }

    let records = body.data.unwrap_or_default();
    if records.len() >= max_records as usize {
        warn!(
            "Comtrade result hit the {} record cap (reported count: {:?}); data may be truncated",
            max_records, body.count
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> ComtradeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_query_uses_fixed_import_parameters() {
        let query = TradeQuery::imports_from_indonesia("151319", "2023,2022");
        let pairs = query.query_pairs();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("cmdCode"), Some("151319"));
        assert_eq!(get("period"), Some("2023,2022"));
        assert_eq!(get("flowCode"), Some("M"));
        assert_eq!(get("partnerCode"), Some("360"));
        assert_eq!(get("maxRecords"), Some("500"));
        assert_eq!(get("format"), Some("JSON"));
        assert_eq!(get("includeDesc"), Some("True"));
        assert_eq!(get("reporterCode"), None);
    }

    #[test]
    fn test_parse_response_records() {
        let body = response(
            r#"{
                "elements": 2,
                "count": 2,
                "data": [
                    {"reporterDesc": "Malaysia", "period": "2022", "netWgt": 1500.0, "primaryValue": 3000.0, "cmdCode": "151319", "cmdDesc": "Coconut oil"},
                    {"reporterDesc": "India", "period": 2023, "netWgt": null, "primaryValue": 10.0}
                ],
                "error": ""
            }"#,
        );

        let records = parse_response(body, MAX_RECORDS).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reporter_desc, "Malaysia");
        assert_eq!(records[0].period, 2022);
        assert_eq!(records[0].cmd_code.as_deref(), Some("151319"));
        assert_eq!(records[1].period, 2023);
        assert_eq!(records[1].net_wgt, 0.0);
    }

    #[test]
    fn test_parse_response_surfaces_api_error() {
        let body = response(r#"{"count": 0, "data": null, "error": "Invalid cmdCode"}"#);
        let err = parse_response(body, MAX_RECORDS).unwrap_err();
        assert!(err.to_string().contains("Invalid cmdCode"));
    }

    #[test]
    fn test_parse_response_empty_data() {
        let body = response(r#"{"count": 0, "data": []}"#);
        assert!(parse_response(body, MAX_RECORDS).unwrap().is_empty());
    }
}
