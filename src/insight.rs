use crate::comtrade::{ComtradeClient, TradeQuery, TradeSource};
use crate::config::Settings;
use crate::error::Result;
use crate::forecast::ImportForecaster;
use crate::hs_code::resolve_hs_code;
use crate::llm::{ChatModel, GroqClient, RetryPolicy};
use crate::table::{partition_by_importer, top_n_importers, CountryTable, TradeRow};
use crate::translate::{GoogleTranslator, Translator};
use futures::future::try_join_all;
use log::info;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PERIOD: &str = "2023,2022,2021";
pub const DEFAULT_TOP_N: usize = 5;

/// Forecast tables for the top importers, heaviest importer first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketInsight {
    pub hs_code: String,
    pub tables: Vec<CountryTable>,
}

impl MarketInsight {
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.country.as_str())
    }

    pub fn get(&self, country: &str) -> Option<&[TradeRow]> {
        self.tables
            .iter()
            .find(|t| t.country == country)
            .map(|t| t.rows.as_slice())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Serializes as `{country: [rows...]}`, keeping the ranking order.
impl Serialize for MarketInsight {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for table in &self.tables {
            map.serialize_entry(&table.country, &table.rows)?;
        }
        map.end()
    }
}

pub struct MarketInsightService {
    model: Arc<dyn ChatModel>,
    translator: Arc<dyn Translator>,
    trade_source: Arc<dyn TradeSource>,
    retry: RetryPolicy,
}

impl MarketInsightService {
    pub fn new(
        model: Arc<dyn ChatModel>,
        translator: Arc<dyn Translator>,
        trade_source: Arc<dyn TradeSource>,
    ) -> Self {
        Self {
            model,
            translator,
            trade_source,
            retry: RetryPolicy::default(),
        }
    }

    /// Wires the production clients: Groq for the model, UN Comtrade for
    /// trade data and Google for Indonesian to English translation.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model = GroqClient::new(settings.groq_api_key.clone())
            .with_base_url(settings.groq_base_url.as_str())
            .with_model(settings.groq_model.as_str())
            .with_timeout(settings.request_timeout)?;
        let trade_source = ComtradeClient::new(settings.comtrade_api_key.clone())
            .with_base_url(settings.comtrade_base_url.as_str())
            .with_timeout(settings.request_timeout)?;
        let translator = GoogleTranslator::indonesian_to_english();

        Ok(Self::new(Arc::new(model), Arc::new(translator), Arc::new(trade_source))
            .with_retry_policy(RetryPolicy::new(
                settings.llm_max_attempts,
                Duration::from_secs(1),
            )))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Runs the whole pipeline. Any failure aborts the request; no partial
    /// result is returned.
    pub async fn get_market_insight(
        &self,
        product: &str,
        period: &str,
        n: usize,
    ) -> Result<MarketInsight> {
        info!("Step 1 - Resolving HS code for '{}'", product);
        let resolved = resolve_hs_code(
            product,
            self.translator.as_ref(),
            self.model.as_ref(),
            &self.retry,
        )
        .await?;

        info!("Step 2 - Fetching import data with Indonesia as the partner");
        let query = TradeQuery::imports_from_indonesia(resolved.hs_code.as_str(), period);
        let records = self.trade_source.fetch(&query).await?;

        info!("Step 3 - Selecting top {} importers from {} records", n, records.len());
        let importers = top_n_importers(&records, n);

        info!("Step 4 - Filtering data for {:?}", importers);
        let tables = partition_by_importer(&records, &importers);

        info!("Step 5 - Forecasting next-year imports for {} importers", tables.len());
        let forecaster = ImportForecaster::new(self.model.as_ref(), self.retry);
        let tables = try_join_all(
            tables
                .into_iter()
                .map(|table| forecaster.forecast(table, &resolved.english_name)),
        )
        .await?;

        Ok(MarketInsight {
            hs_code: resolved.hs_code,
            tables,
        })
    }
}
