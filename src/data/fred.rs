//! FRED `fredgraph.csv` integration.
//!
//! The public graph endpoint needs no API key and returns the full history of
//! one series as CSV. Its header has drifted over time (`DATE` vs.
//! `observation_date`), and missing observations are written as `.`, so the
//! parser is tolerant about both.

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::StringRecord;
use reqwest::blocking::Client;
use tracing::debug;

use crate::data::table::{ObservationSeries, SeriesTable};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv";

const DATE_COLUMNS: [&str; 2] = ["date", "observation_date"];

// The graph endpoint rejects some non-browser agents.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

/// Anything that can produce an observation series for an identifier.
pub trait SeriesSource {
    /// Fetch one series and keep observations on or after `start`.
    fn fetch_series(&self, series_id: &str, start: NaiveDate) -> Result<ObservationSeries, AppError>;

    /// Fetch several series and outer-join them on date.
    ///
    /// Any single failure fails the whole batch.
    fn fetch_table(&self, series_ids: &[&str], start: NaiveDate) -> Result<SeriesTable, AppError> {
        let mut series = Vec::with_capacity(series_ids.len());
        for id in series_ids {
            series.push(self.fetch_series(id, start)?);
        }
        Ok(SeriesTable::outer_join(series))
    }
}

pub struct FredClient {
    client: Client,
    base_url: String,
}

impl FredClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Transport {
                series_id: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn fetch_body(&self, series_id: &str) -> Result<String, AppError> {
        let transport = |message: String| AppError::Transport {
            series_id: series_id.to_string(),
            message,
        };

        debug!(series_id, url = %self.base_url, "fetching series");
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("id", series_id)])
            .send()
            .map_err(|e| transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(transport(format!("status {}", resp.status())));
        }

        resp.text().map_err(|e| transport(format!("failed to read body: {e}")))
    }
}

impl SeriesSource for FredClient {
    fn fetch_series(&self, series_id: &str, start: NaiveDate) -> Result<ObservationSeries, AppError> {
        let body = self.fetch_body(series_id)?;
        let series = parse_fredgraph_csv(series_id, &body)?.since(start);
        debug!(series_id, rows = series.len(), "parsed series");
        Ok(series)
    }
}

/// Parse a `fredgraph.csv` body into an observation series.
///
/// Rows with unparseable dates (or undecodable CSV) are dropped; unparseable
/// values become missing.
pub fn parse_fredgraph_csv(series_id: &str, body: &str) -> Result<ObservationSeries, AppError> {
    let malformed = |expected: String| AppError::MalformedResponse {
        series_id: series_id.to_string(),
        expected,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| malformed(format!("a CSV header row ({e})")))?
        .clone();
    let header_map = build_header_map(&headers);

    let date_idx = DATE_COLUMNS
        .iter()
        .find_map(|name| header_map.get(*name).copied())
        .ok_or_else(|| malformed("a date column (DATE or observation_date)".to_string()))?;

    let value_idx = header_map
        .get(&normalize_header_name(series_id))
        .copied()
        .ok_or_else(|| malformed(format!("a '{series_id}' value column")))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let Ok(record) = record else {
            continue;
        };
        let Some(date) = record.get(date_idx).and_then(parse_date) else {
            continue;
        };
        let value = record.get(value_idx).and_then(coerce_numeric);
        rows.push((date, value));
    }

    Ok(ObservationSeries::from_rows(series_id, rows))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Coerce an upstream cell to a number; anything else is missing.
///
/// FRED writes gaps as `.`; empty cells and non-finite numbers are treated the
/// same way.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_observation_date_header() {
        let body = "observation_date,UNRATE\n2020-01-01,3.6\n2020-02-01,3.5\n";
        let s = parse_fredgraph_csv("UNRATE", body).unwrap();
        assert_eq!(s.points(), &[(d(2020, 1, 1), Some(3.6)), (d(2020, 2, 1), Some(3.5))]);
    }

    #[test]
    fn parses_legacy_date_header_with_bom() {
        let body = "\u{feff}DATE,GDPC1\n2020-04-01,17258.2\n2020-01-01,18951.9\n";
        let s = parse_fredgraph_csv("GDPC1", body).unwrap();
        assert_eq!(s.first_date(), Some(d(2020, 1, 1)));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn placeholder_value_is_missing_and_row_is_kept() {
        let body = "observation_date,DGS10\n2024-01-01,.\n2024-01-02,3.95\n2024-01-03,n/a\n";
        let s = parse_fredgraph_csv("DGS10", body).unwrap();
        assert_eq!(
            s.points(),
            &[(d(2024, 1, 1), None), (d(2024, 1, 2), Some(3.95)), (d(2024, 1, 3), None)]
        );
    }

    #[test]
    fn rows_with_bad_dates_are_dropped() {
        let body = "observation_date,UNRATE\nnot-a-date,1.0\n2020-01-01,3.6\n,4.0\n2020-02-30,5.0\n";
        let s = parse_fredgraph_csv("UNRATE", body).unwrap();
        assert_eq!(s.points(), &[(d(2020, 1, 1), Some(3.6))]);
    }

    #[test]
    fn missing_value_column_is_malformed() {
        let body = "observation_date,OTHER\n2020-01-01,3.6\n";
        let err = parse_fredgraph_csv("UNRATE", body).unwrap_err();
        match err {
            AppError::MalformedResponse { series_id, expected } => {
                assert_eq!(series_id, "UNRATE");
                assert!(expected.contains("UNRATE"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_date_column_is_malformed() {
        let body = "when,UNRATE\n2020-01-01,3.6\n";
        let err = parse_fredgraph_csv("UNRATE", body).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));
        assert!(err.to_string().contains("date column"));
    }

    #[test]
    fn html_error_page_is_malformed_not_a_panic() {
        let body = "<html><body>Series not found</body></html>";
        assert!(parse_fredgraph_csv("NOPE", body).is_err());
    }

    #[test]
    fn value_column_match_ignores_case() {
        let body = "observation_date,unrate\n2020-01-01,3.6\n";
        let s = parse_fredgraph_csv("UNRATE", body).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn coerce_numeric_handles_placeholders() {
        assert_eq!(coerce_numeric(" 1.5 "), Some(1.5));
        assert_eq!(coerce_numeric("."), None);
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("NaN"), None);
        assert_eq!(coerce_numeric("inf"), None);
        assert_eq!(coerce_numeric("#N/A"), None);
        assert_eq!(coerce_numeric("-2e3"), Some(-2000.0));
    }

    struct FixedSource;

    impl SeriesSource for FixedSource {
        fn fetch_series(&self, series_id: &str, start: NaiveDate) -> Result<ObservationSeries, AppError> {
            match series_id {
                "A" => Ok(ObservationSeries::from_rows(
                    "A",
                    vec![(d(2019, 1, 1), Some(0.5)), (d(2020, 1, 1), Some(1.0))],
                )
                .since(start)),
                "B" => Ok(ObservationSeries::from_rows("B", vec![(d(2020, 2, 1), Some(2.0))]).since(start)),
                other => Err(AppError::Transport {
                    series_id: other.to_string(),
                    message: "status 404 Not Found".to_string(),
                }),
            }
        }
    }

    #[test]
    fn fetch_table_joins_and_applies_start() {
        let t = FixedSource.fetch_table(&["A", "B"], d(2020, 1, 1)).unwrap();
        assert_eq!(t.dates(), &[d(2020, 1, 1), d(2020, 2, 1)]);
        assert_eq!(t.columns().len(), 2);
    }

    #[test]
    fn fetch_table_fails_if_any_series_fails() {
        let err = FixedSource.fetch_table(&["A", "MISSING"], d(2020, 1, 1)).unwrap_err();
        assert!(matches!(err, AppError::Transport { ref series_id, .. } if series_id == "MISSING"));
    }
}
