pub mod client;
pub mod prompts;
pub mod retry;
pub mod utils;

pub use client::*;
pub use retry::*;
pub use utils::*;

use async_trait::async_trait;

use crate::error::Result;

/// Indonesian system instruction: "you are a data analyst who gives the
/// insight the client needs".
pub const SYSTEM_PROMPT: &str =
    "Kamu adalah analis data yang akan memberikan insight yang dibutuhkan oleh klien";

/// A chat model that answers one human turn under [`SYSTEM_PROMPT`].
///
/// Implementations must report throttling as
/// [`MarketInsightError::RateLimited`](crate::MarketInsightError::RateLimited)
/// so [`RetryPolicy`] can tell it apart from fatal failures.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn invoke(&self, text: &str) -> Result<String>;
}
