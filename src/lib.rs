//! # Market Insight
//!
//! Finds the countries that import the most of a product from Indonesia and
//! asks a language model for a naive next-year forecast of each one's imports.
//!
//! ## Pipeline
//!
//! 1. **HS code**: the product name is translated to English and a chat model
//!    is asked for its 6-digit Harmonized System code (`[151319]`).
//! 2. **Trade data**: annual import records with Indonesia as the partner are
//!    fetched from UN Comtrade.
//! 3. **Top importers**: reporters are ranked by total net weight.
//! 4. **Forecast**: each importer's history is sent to the model in two
//!    chained calls and the predicted `[netWgt; primaryValue]` is appended as
//!    a new row for the following year.
//!
//! Rate-limited model calls are retried with exponential backoff
//! ([`RetryPolicy`]); every other failure aborts the request.
//!
//! ## Example
//!
//! ```rust,ignore
//! use market_insight::*;
//!
//! let settings = Settings::from_env()?;
//! let service = MarketInsightService::from_settings(&settings)?;
//! let insight = service
//!     .get_market_insight("minyak kelapa", DEFAULT_PERIOD, DEFAULT_TOP_N)
//!     .await?;
//!
//! for country in insight.countries() {
//!     println!("{country}");
//! }
//! ```

pub mod comtrade;
pub mod config;
pub mod error;
pub mod forecast;
pub mod hs_code;
pub mod insight;
pub mod llm;
pub mod table;
pub mod translate;

#[cfg(feature = "server")]
pub mod server;

pub use comtrade::{ComtradeClient, TradeQuery, TradeSource};
pub use config::Settings;
pub use error::{MarketInsightError, Result};
pub use forecast::{parse_forecast, ImportForecast, ImportForecaster};
pub use hs_code::{parse_hs_code, resolve_hs_code, ResolvedProduct};
pub use insight::{MarketInsight, MarketInsightService, DEFAULT_PERIOD, DEFAULT_TOP_N};
pub use llm::{ChatModel, GroqClient, RetryPolicy};
pub use table::*;
pub use translate::{GoogleTranslator, Translator};
