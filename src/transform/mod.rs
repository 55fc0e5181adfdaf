//! Level / year-over-year / QoQ-SAAR transforms over a [`SeriesTable`].
//!
//! All lags are row lags on the table index, not calendar lags: if the input
//! has gaps, a 12-row lag on monthly data is not necessarily one year.
//! QoQ-SAAR always lags one row, whatever frequency the chart declares.

use crate::data::SeriesTable;
use crate::domain::{Frequency, TransformKind};
use crate::error::AppError;

/// Apply `kind` to every column. Index and column ids are unchanged.
pub fn transform(table: &SeriesTable, kind: TransformKind, frequency: Frequency) -> SeriesTable {
    match kind {
        TransformKind::Level => table.clone(),
        TransformKind::Yoy => {
            let periods = frequency.yoy_periods();
            table.map_columns(|values| yoy(values, periods))
        }
        TransformKind::QoqSaar => table.map_columns(qoq_saar),
    }
}

/// String front door used by chart specs: the transform name is validated
/// before any column is touched.
pub fn build_series_for_chart(
    table: &SeriesTable,
    transform_name: &str,
    frequency: &str,
) -> Result<SeriesTable, AppError> {
    let kind: TransformKind = transform_name.parse()?;
    Ok(transform(table, kind, Frequency::infer(frequency)))
}

/// `100 × (v[i] / v[i − periods] − 1)`.
pub fn yoy(values: &[Option<f64>], periods: usize) -> Vec<Option<f64>> {
    lagged(values, periods, |cur, prev| 100.0 * (cur / prev - 1.0))
}

/// `100 × ((v[i] / v[i − 1])⁴ − 1)`.
pub fn qoq_saar(values: &[Option<f64>]) -> Vec<Option<f64>> {
    lagged(values, 1, |cur, prev| 100.0 * ((cur / prev).powi(4) - 1.0))
}

fn lagged(values: &[Option<f64>], lag: usize, f: impl Fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let prev_idx = i.checked_sub(lag)?;
            let cur = values[i]?;
            let prev = values[prev_idx]?;
            let out = f(cur, prev);
            out.is_finite().then_some(out)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Months, NaiveDate};

    use super::*;
    use crate::data::Column;

    fn monthly_table(columns: Vec<(&str, Vec<Option<f64>>)>) -> SeriesTable {
        let n = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let dates = (0..n)
            .map(|i| start.checked_add_months(Months::new(i as u32)).unwrap())
            .collect();
        let columns = columns
            .into_iter()
            .map(|(id, values)| Column { id: id.to_string(), values })
            .collect();
        SeriesTable::from_columns(dates, columns).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn level_is_identity() {
        let t = monthly_table(vec![
            ("A", vec![Some(1.0), None, Some(3.0)]),
            ("B", vec![None, Some(-2.0), Some(0.0)]),
        ]);
        for freq in Frequency::ALL {
            assert_eq!(transform(&t, TransformKind::Level, freq), t);
        }
    }

    #[test]
    fn yoy_of_constant_series_is_zero_after_lag() {
        for freq in Frequency::ALL {
            let periods = freq.yoy_periods();
            let t = monthly_table(vec![("K", vec![Some(7.5); periods + 5])]);
            let out = transform(&t, TransformKind::Yoy, freq);
            let values = &out.column("K").unwrap().values;

            assert!(values[..periods].iter().all(Option::is_none));
            assert!(values[periods..].iter().all(|v| v.map(|x| approx(x, 0.0)) == Some(true)));
        }
    }

    #[test]
    fn yoy_uses_row_lag_for_quarterly() {
        let t = monthly_table(vec![("Q", vec![Some(100.0), Some(101.0), Some(102.0), Some(103.0), Some(110.0)])]);
        let out = build_series_for_chart(&t, "yoy", "quarterly").unwrap();
        let v = &out.column("Q").unwrap().values;
        assert!(v[..4].iter().all(Option::is_none));
        assert!(approx(v[4].unwrap(), 10.0));
    }

    #[test]
    fn yoy_is_missing_when_either_operand_is_missing() {
        let mut values = vec![Some(1.0); 14];
        values[0] = None;
        values[13] = None;
        let out = yoy(&values, 12);
        assert_eq!(out[12], None);
        assert_eq!(out[13], None);
    }

    #[test]
    fn qoq_saar_of_constant_ratio_series() {
        let r: f64 = 1.02;
        let values: Vec<Option<f64>> = (0..8).map(|i| Some(50.0 * r.powi(i))).collect();
        let t = monthly_table(vec![("G", values)]);
        // Frequency is ignored by this transform.
        let out = transform(&t, TransformKind::QoqSaar, Frequency::Monthly);
        let v = &out.column("G").unwrap().values;

        assert_eq!(v[0], None);
        let expected = 100.0 * (r.powi(4) - 1.0);
        assert!(v[1..].iter().all(|x| approx(x.unwrap(), expected)));
    }

    #[test]
    fn division_by_zero_is_missing() {
        let out = qoq_saar(&[Some(0.0), Some(1.0)]);
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn unsupported_transform_fails_before_computation() {
        let t = monthly_table(vec![("A", vec![Some(1.0), Some(2.0)])]);
        let err = build_series_for_chart(&t, "log_diff", "monthly").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedTransform(ref k) if k == "log_diff"));
    }

    #[test]
    fn output_shape_matches_input() {
        let t = monthly_table(vec![("A", vec![Some(1.0); 20]), ("B", vec![Some(2.0); 20])]);
        let out = transform(&t, TransformKind::Yoy, Frequency::Monthly);
        assert_eq!(out.dates(), t.dates());
        let ids: Vec<_> = out.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(out.len(), 20);
    }
}
