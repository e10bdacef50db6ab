use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A single annual import record as returned by the trade statistics API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub reporter_desc: String,
    #[serde(deserialize_with = "year_from_string_or_number")]
    pub period: i32,
    /// Net weight in kg. The API reports `null` for some reporters.
    #[serde(default, deserialize_with = "zero_if_null")]
    pub net_wgt: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub primary_value: f64,
    #[serde(default)]
    pub cmd_desc: Option<String>,
    #[serde(default)]
    pub reporter_code: Option<i64>,
    #[serde(default)]
    pub cmd_code: Option<String>,
}

/// The projection of a record that is forecast and returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRow {
    pub period: i32,
    pub reporter_desc: String,
    pub net_wgt: f64,
    pub primary_value: f64,
    /// Set on the synthetic row appended by the forecaster.
    #[serde(default)]
    pub forecast: bool,
}

impl From<&TradeRecord> for TradeRow {
    fn from(record: &TradeRecord) -> Self {
        Self {
            period: record.period,
            reporter_desc: record.reporter_desc.clone(),
            net_wgt: record.net_wgt,
            primary_value: record.primary_value,
            forecast: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryTable {
    pub country: String,
    pub rows: Vec<TradeRow>,
}

impl CountryTable {
    pub fn new(country: impl Into<String>, rows: Vec<TradeRow>) -> Self {
        Self {
            country: country.into(),
            rows,
        }
    }

    pub fn last_period(&self) -> Option<i32> {
        self.rows.last().map(|row| row.period)
    }

    pub fn historical_rows(&self) -> impl Iterator<Item = &TradeRow> {
        self.rows.iter().filter(|row| !row.forecast)
    }
}

/// Per-reporter totals used to rank importers.
#[derive(Debug, Clone, PartialEq)]
pub struct ImporterTotal {
    pub reporter: String,
    pub net_wgt: f64,
    pub primary_value: f64,
}

/// Sums weight and value per reporter, keeping first-appearance order.
pub fn importer_totals(records: &[TradeRecord]) -> Vec<ImporterTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ImporterTotal> = Vec::new();

    for record in records {
        let slot = *index
            .entry(record.reporter_desc.as_str())
            .or_insert_with(|| {
                totals.push(ImporterTotal {
                    reporter: record.reporter_desc.clone(),
                    net_wgt: 0.0,
                    primary_value: 0.0,
                });
                totals.len() - 1
            });

        totals[slot].net_wgt += record.net_wgt;
        totals[slot].primary_value += record.primary_value;
    }

    totals
}

/// Returns up to `n` reporters ranked by total net weight, heaviest first.
///
/// Ties keep the order in which reporters first appear in `records`. When
/// fewer than `n` reporters exist, all of them are returned.
pub fn top_n_importers(records: &[TradeRecord], n: usize) -> Vec<String> {
    let mut totals = importer_totals(records);
    totals.sort_by(|a, b| b.net_wgt.total_cmp(&a.net_wgt));

    totals
        .into_iter()
        .take(n)
        .map(|total| total.reporter)
        .collect()
}

/// Splits the fetched records into one table per selected importer, in the
/// order given. Each table's rows are sorted by period, oldest first.
pub fn partition_by_importer(records: &[TradeRecord], importers: &[String]) -> Vec<CountryTable> {
    importers
        .iter()
        .map(|importer| {
            let mut rows: Vec<TradeRow> = records
                .iter()
                .filter(|record| &record.reporter_desc == importer)
                .map(TradeRow::from)
                .collect();
            rows.sort_by_key(|row| row.period);
            CountryTable::new(importer.clone(), rows)
        })
        .collect()
}

fn year_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i64),
        Text(String),
    }

    match Year::deserialize(deserializer)? {
        Year::Number(n) => i32::try_from(n).map_err(serde::de::Error::custom),
        Year::Text(s) => s.trim().parse::<i32>().map_err(serde::de::Error::custom),
    }
}

fn zero_if_null<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(reporter: &str, period: i32, net_wgt: f64) -> TradeRecord {
        TradeRecord {
            reporter_desc: reporter.to_string(),
            period,
            net_wgt,
            primary_value: net_wgt * 2.0,
            cmd_desc: None,
            reporter_code: None,
            cmd_code: None,
        }
    }

    #[test]
    fn test_top_n_ranks_by_summed_weight() {
        let records = vec![
            record("Malaysia", 2021, 100.0),
            record("India", 2021, 500.0),
            record("Malaysia", 2022, 450.0),
            record("China", 2021, 300.0),
            record("India", 2022, 10.0),
        ];

        let top = top_n_importers(&records, 2);
        assert_eq!(top, vec!["Malaysia".to_string(), "India".to_string()]);
    }

    #[test]
    fn test_top_n_returns_all_when_fewer_reporters() {
        let records = vec![
            record("India", 2021, 1.0),
            record("China", 2021, 2.0),
            record("Japan", 2021, 3.0),
        ];

        let top = top_n_importers(&records, 5);
        assert_eq!(top.len(), 3);
        assert_eq!(top, vec!["Japan", "China", "India"]);
    }

    #[test]
    fn test_top_n_ties_keep_first_appearance() {
        let records = vec![
            record("Egypt", 2021, 50.0),
            record("Kenya", 2021, 50.0),
            record("Chile", 2021, 50.0),
        ];

        assert_eq!(top_n_importers(&records, 2), vec!["Egypt", "Kenya"]);
    }

    #[test]
    fn test_top_n_zero_and_empty() {
        let records = vec![record("India", 2021, 1.0)];
        assert!(top_n_importers(&records, 0).is_empty());
        assert!(top_n_importers(&[], 5).is_empty());
    }

    #[test]
    fn test_importer_totals_sum_value_too() {
        let records = vec![record("India", 2021, 10.0), record("India", 2022, 5.0)];
        let totals = importer_totals(&records);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].net_wgt, 15.0);
        assert_eq!(totals[0].primary_value, 30.0);
    }

    #[test]
    fn test_partition_sorts_rows_by_period() {
        let records = vec![
            record("India", 2023, 3.0),
            record("China", 2022, 9.0),
            record("India", 2021, 1.0),
            record("India", 2022, 2.0),
        ];

        let tables = partition_by_importer(&records, &["India".to_string()]);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].country, "India");
        let periods: Vec<i32> = tables[0].rows.iter().map(|r| r.period).collect();
        assert_eq!(periods, vec![2021, 2022, 2023]);
        assert_eq!(tables[0].last_period(), Some(2023));
    }

    #[test]
    fn test_record_accepts_string_period_and_null_weight() {
        let json = r#"{
            "reporterDesc": "Malaysia",
            "period": "2022",
            "netWgt": null,
            "primaryValue": 1234.5,
            "cmdDesc": "Coconut (copra) oil",
            "reporterCode": 458
        }"#;

        let record: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.period, 2022);
        assert_eq!(record.net_wgt, 0.0);
        assert_eq!(record.primary_value, 1234.5);
        assert_eq!(record.reporter_code, Some(458));
    }

    #[test]
    fn test_row_serializes_with_api_field_names() {
        let row = TradeRow::from(&record("India", 2021, 7.0));
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["reporterDesc"], "India");
        assert_eq!(value["netWgt"], 7.0);
        assert_eq!(value["primaryValue"], 14.0);
        assert_eq!(value["forecast"], false);
    }
}
