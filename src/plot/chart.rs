//! Chart data preparation shared by the PNG renderer, the terminal widget and
//! the ASCII preview.
//!
//! Dates are mapped to decimal years so every backend can use a plain `f64`
//! axis. Missing values split a series into separate line segments instead of
//! being bridged.

use chrono::{Datelike, NaiveDate};

use crate::data::SeriesTable;
use crate::domain::ChartSpec;

/// One labeled series, already split at gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub segments: Vec<Vec<(f64, f64)>>,
}

/// Everything a backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub series: Vec<PlotSeries>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Date as a decimal year (`2020-07-01` → ~2020.5).
pub fn decimal_year(date: NaiveDate) -> f64 {
    let days_in_year = if date.leap_year() { 366.0 } else { 365.0 };
    date.year() as f64 + date.ordinal0() as f64 / days_in_year
}

/// Build plot series for every column of `table`, labeled from `spec`.
///
/// Returns `None` when the table holds no values at all.
pub fn chart_data(spec: &ChartSpec, table: &SeriesTable) -> Option<ChartData> {
    let xs: Vec<f64> = table.dates().iter().map(|d| decimal_year(*d)).collect();

    let series: Vec<PlotSeries> = table
        .columns()
        .iter()
        .map(|col| PlotSeries {
            label: spec.label_for(&col.id).to_string(),
            segments: split_segments(&xs, &col.values),
        })
        .collect();

    let (y_min, y_max) = table.value_range()?;
    let x_min = xs.first().copied()?;
    let x_max = xs.last().copied()?;

    Some(ChartData {
        series,
        x_bounds: widen([x_min, x_max], 0.0, 0.5),
        y_bounds: widen([y_min, y_max], 0.05, 1.0),
    })
}

fn split_segments(xs: &[f64], values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (x, v) in xs.iter().zip(values) {
        match v {
            Some(y) => current.push((*x, *y)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

// Pads a range by `frac` of its span; a degenerate range is widened by
// `flat_pad` on each side so backends always get a non-empty axis.
fn widen(bounds: [f64; 2], frac: f64, flat_pad: f64) -> [f64; 2] {
    let [lo, hi] = bounds;
    let span = hi - lo;
    if span.abs() < 1e-12 {
        return [lo - flat_pad, hi + flat_pad];
    }
    let pad = span * frac;
    [lo - pad, hi + pad]
}

/// Tick label for a decimal-year axis.
pub fn fmt_year(v: f64) -> String {
    format!("{v:.0}")
}

/// Tick label for the value axis.
pub fn fmt_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{v:.0}")
    } else if v.abs() >= 10.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::domain::SeriesSpec;

    fn spec() -> ChartSpec {
        ChartSpec {
            page_title: "CPI".to_string(),
            series: vec![SeriesSpec { id: "CPIAUCSL".to_string(), label: "Headline".to_string() }],
            transform: "yoy".to_string(),
            frequency: "monthly".to_string(),
            units: "%".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn decimal_year_starts_at_year_boundary() {
        let d = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(decimal_year(d), 2021.0);
        let mid = NaiveDate::from_ymd_opt(2021, 7, 2).unwrap();
        assert!((decimal_year(mid) - 2021.4986).abs() < 1e-3);
    }

    #[test]
    fn gaps_split_segments() {
        let dates: Vec<NaiveDate> = (1..=5).map(|m| NaiveDate::from_ymd_opt(2020, m, 1).unwrap()).collect();
        let table = SeriesTable::from_columns(
            dates,
            vec![Column {
                id: "CPIAUCSL".to_string(),
                values: vec![None, Some(1.0), Some(2.0), None, Some(3.0)],
            }],
        )
        .unwrap();

        let data = chart_data(&spec(), &table).unwrap();
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].label, "Headline");
        let lens: Vec<usize> = data.series[0].segments.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![2, 1]);
        assert!(data.y_bounds[0] < 1.0 && data.y_bounds[1] > 3.0);
    }

    #[test]
    fn all_missing_table_has_no_chart_data() {
        let dates = vec![NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()];
        let table = SeriesTable::from_columns(
            dates,
            vec![Column { id: "CPIAUCSL".to_string(), values: vec![None] }],
        )
        .unwrap();
        assert!(chart_data(&spec(), &table).is_none());
    }

    #[test]
    fn single_point_gets_non_empty_bounds() {
        let dates = vec![NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()];
        let table = SeriesTable::from_columns(
            dates,
            vec![Column { id: "CPIAUCSL".to_string(), values: vec![Some(2.5)] }],
        )
        .unwrap();
        let data = chart_data(&spec(), &table).unwrap();
        assert!(data.x_bounds[1] > data.x_bounds[0]);
        assert!(data.y_bounds[1] > data.y_bounds[0]);
    }
}
