use regex::Regex;
use std::sync::LazyLock;

use crate::error::{MarketInsightError, Result};

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("bracket pattern is valid"));

/// Returns the contents of the first `[...]` in a model reply.
///
/// Matching is non-greedy and does not cross line breaks, so
/// `"a [1] b [2]"` yields `"1"`.
pub fn first_bracketed(reply: &str) -> Option<&str> {
    BRACKETED
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Like [`first_bracketed`], but a missing pattern is an error naming the
/// step that expected it.
pub fn require_bracketed<'a>(reply: &'a str, context: &str) -> Result<&'a str> {
    first_bracketed(reply).ok_or_else(|| MarketInsightError::MissingPattern {
        context: context.to_string(),
        reply: reply.to_string(),
    })
}
