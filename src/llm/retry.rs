use crate::error::{MarketInsightError, Result};
use crate::llm::ChatModel;
use log::warn;
use std::time::Duration;
use tokio::time::sleep;

/// Exponential backoff for rate-limited model calls.
///
/// After the `i`-th failed attempt (zero-based) the policy waits
/// `base_delay * 2^i` before trying again, so the default waits are
/// 1s, 2s, 4s, 8s and 16s. Only [`MarketInsightError::RateLimited`] is
/// retried; any other error is returned as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    pub async fn invoke(&self, model: &dyn ChatModel, text: &str) -> Result<String> {
        for attempt in 0..self.max_attempts {
            match model.invoke(text).await {
                Ok(reply) => return Ok(reply),
                Err(MarketInsightError::RateLimited(message)) => {
                    let wait = self.delay_for(attempt);
                    if attempt + 1 < self.max_attempts {
                        warn!(
                            "Rate limit exceeded (attempt {}/{}): {}. Waiting {:?} before retrying...",
                            attempt + 1,
                            self.max_attempts,
                            message,
                            wait
                        );
                    } else {
                        warn!(
                            "Rate limit exceeded on final attempt {}/{}: {}. Waiting {:?} before giving up",
                            attempt + 1,
                            self.max_attempts,
                            message,
                            wait
                        );
                    }
                    sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(MarketInsightError::RetriesExhausted {
            attempts: self.max_attempts,
        })
    }
}
