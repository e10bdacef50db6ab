use crate::error::{MarketInsightError, Result};
use crate::llm::prompts::{forecast_extraction, forecast_question};
use crate::llm::{require_bracketed, ChatModel, RetryPolicy};
use crate::table::{CountryTable, TradeRow};
use log::{debug, info};

/// Predicted imports for the year after the last observed period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportForecast {
    pub net_wgt: f64,
    pub primary_value: f64,
}

/// Parses `"[netWgt; primaryValue]"`, tolerating thousands separators.
pub fn parse_forecast(reply: &str) -> Result<ImportForecast> {
    let pair = require_bracketed(reply, "forecast")?.replace(',', "");
    let mut parts = pair.split("; ");

    let (Some(net_wgt), Some(primary_value), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(MarketInsightError::InvalidForecast(format!(
            "expected [netWgt; primaryValue], got [{}]",
            pair
        )));
    };

    Ok(ImportForecast {
        net_wgt: parse_number(net_wgt)?,
        primary_value: parse_number(primary_value)?,
    })
}

fn parse_number(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| MarketInsightError::InvalidForecast(format!("'{}': {}", raw, e)))
}

/// Asks the model for next year's imports of one country in two steps:
/// a free-text prediction, then a second call that reduces it to
/// `[netWgt; primaryValue]`.
pub struct ImportForecaster<'a> {
    model: &'a dyn ChatModel,
    retry: RetryPolicy,
}

impl<'a> ImportForecaster<'a> {
    pub fn new(model: &'a dyn ChatModel, retry: RetryPolicy) -> Self {
        Self { model, retry }
    }

    pub async fn predict(&self, table: &CountryTable, product: &str) -> Result<ImportForecast> {
        let last_period = table
            .last_period()
            .ok_or_else(|| MarketInsightError::EmptyTable(table.country.clone()))?;
        let target_year = last_period + 1;

        info!(
            "Forecasting {} imports for {}: Step 1 - Drafting prediction...",
            target_year, table.country
        );
        let question =
            forecast_question(&table.country, product, target_year, table.historical_rows())?;
        let draft = self.retry.invoke(self.model, &question).await?;
        debug!("Draft forecast for {}: {} chars", table.country, draft.len());

        info!(
            "Forecasting {} imports for {}: Step 2 - Extracting figures...",
            target_year, table.country
        );
        let extracted = self
            .retry
            .invoke(self.model, &forecast_extraction(&draft))
            .await?;

        parse_forecast(&extracted)
    }

    /// Predicts and appends the synthetic next-year row.
    pub async fn forecast(&self, mut table: CountryTable, product: &str) -> Result<CountryTable> {
        let prediction = self.predict(&table, product).await?;
        let period = table
            .last_period()
            .ok_or_else(|| MarketInsightError::EmptyTable(table.country.clone()))?
            + 1;

        table.rows.push(TradeRow {
            period,
            reporter_desc: table.country.clone(),
            net_wgt: prediction.net_wgt,
            primary_value: prediction.primary_value,
            forecast: true,
        });

        Ok(table)
    }
}
