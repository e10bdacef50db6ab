// Prompts for the HS code lookup and the two-step import forecast

use crate::table::TradeRow;
use serde::Serialize;

pub fn hs_code_question(english_product: &str) -> String {
    format!(
        "What is the HS Code of {}, represent it on [HS CODE] format for the first 6-digit, ex: [151319]",
        english_product
    )
}

/// Historical rows as sent to the model: only the four columns it reasons over.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptRow<'a> {
    period: i32,
    reporter_desc: &'a str,
    net_wgt: f64,
    primary_value: f64,
}

pub fn forecast_question<'a>(
    country: &str,
    product: &str,
    target_year: i32,
    history: impl IntoIterator<Item = &'a TradeRow>,
) -> serde_json::Result<String> {
    let rows: Vec<PromptRow<'_>> = history
        .into_iter()
        .map(|row| PromptRow {
            period: row.period,
            reporter_desc: &row.reporter_desc,
            net_wgt: row.net_wgt,
            primary_value: row.primary_value,
        })
        .collect();
    let data = serde_json::to_string(&rows)?;

    Ok(format!(
        "Assistant: Based on given data. Netwgt is represented in kg, how much {country} will import {product} in kg from Indonesia on {target_year} based on weight and primary value? Answer in formatted predicted import: [netWgt; primaryValue], for example: [100; 200] Data: {data}"
    ))
}

pub fn forecast_extraction(first_reply: &str) -> String {
    format!(
        "Extract netWgt and Primary value prediction from the information in format [netWgt; primaryValue] without any explanation, for example: [100000; 200000].   Information:{}",
        first_reply
    )
}
