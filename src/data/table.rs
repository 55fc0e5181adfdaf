//! Observation series and the date-aligned multi-series table.
//!
//! Missing values are `None` throughout; nothing here ever substitutes a
//! number for a gap.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

/// One fetched series: strictly increasing, unique dates.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    pub id: String,
    points: Vec<(NaiveDate, Option<f64>)>,
}

impl ObservationSeries {
    /// Build a series from unordered rows.
    ///
    /// Rows are sorted by date; when a date repeats, the last row wins.
    pub fn from_rows(id: impl Into<String>, rows: Vec<(NaiveDate, Option<f64>)>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
        for (date, value) in rows {
            by_date.insert(date, value);
        }
        Self {
            id: id.into(),
            points: by_date.into_iter().collect(),
        }
    }

    pub fn points(&self) -> &[(NaiveDate, Option<f64>)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop observations strictly before `start`.
    pub fn since(mut self, start: NaiveDate) -> Self {
        self.points.retain(|(d, _)| *d >= start);
        self
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(d, _)| *d)
    }
}

/// A named value column aligned to a [`SeriesTable`] date index.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: String,
    pub values: Vec<Option<f64>>,
}

/// Date-indexed table with one column per series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl SeriesTable {
    /// Outer-join series on date. Column order follows input order; a
    /// repeated series id keeps only its first occurrence.
    pub fn outer_join(series: Vec<ObservationSeries>) -> Self {
        let mut seen = BTreeSet::new();
        let series: Vec<ObservationSeries> = series
            .into_iter()
            .filter(|s| seen.insert(s.id.clone()))
            .collect();

        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|(d, _)| *d))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = series
            .into_iter()
            .map(|s| {
                let lookup: BTreeMap<NaiveDate, Option<f64>> = s.points.into_iter().collect();
                let values = dates
                    .iter()
                    .map(|d| lookup.get(d).copied().flatten())
                    .collect();
                Column { id: s.id, values }
            })
            .collect();

        Self { dates, columns }
    }

    /// Build a table directly from an index and columns of equal length.
    ///
    /// Returns `None` if any column length differs from the index length.
    pub fn from_columns(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Option<Self> {
        if columns.iter().any(|c| c.values.len() != dates.len()) {
            return None;
        }
        Some(Self { dates, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Same index and column ids, new values per column.
    pub(crate) fn map_columns(&self, mut f: impl FnMut(&[Option<f64>]) -> Vec<Option<f64>>) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                id: c.id.clone(),
                values: f(&c.values),
            })
            .collect();
        Self {
            dates: self.dates.clone(),
            columns,
        }
    }

    fn row_has_value(&self, idx: usize) -> bool {
        self.columns.iter().any(|c| c.values[idx].is_some())
    }

    /// Remove rows where every column is missing.
    pub fn drop_all_missing_rows(&self) -> Self {
        let keep: Vec<usize> = (0..self.dates.len()).filter(|&i| self.row_has_value(i)).collect();
        let dates = keep.iter().map(|&i| self.dates[i]).collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                id: c.id.clone(),
                values: keep.iter().map(|&i| c.values[i]).collect(),
            })
            .collect();
        Self { dates, columns }
    }

    /// True if at least one cell holds a value.
    pub fn has_values(&self) -> bool {
        self.columns.iter().any(|c| c.values.iter().any(Option::is_some))
    }

    /// The last `n` rows that carry at least one value, oldest first.
    pub fn recent_rows(&self, n: usize) -> Vec<(NaiveDate, Vec<Option<f64>>)> {
        let mut rows: Vec<(NaiveDate, Vec<Option<f64>>)> = (0..self.dates.len())
            .rev()
            .filter(|&i| self.row_has_value(i))
            .take(n)
            .map(|i| (self.dates[i], self.columns.iter().map(|c| c.values[i]).collect()))
            .collect();
        rows.reverse();
        rows
    }

    /// Min/max over all non-missing values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in self.columns.iter().flat_map(|c| c.values.iter().flatten()) {
            lo = lo.min(*v);
            hi = hi.max(*v);
        }
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn from_rows_sorts_and_deduplicates() {
        let s = ObservationSeries::from_rows(
            "X",
            vec![
                (d(2020, 3, 1), Some(3.0)),
                (d(2020, 1, 1), Some(1.0)),
                (d(2020, 3, 1), Some(30.0)),
                (d(2020, 2, 1), None),
            ],
        );
        let dates: Vec<_> = s.points().iter().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![d(2020, 1, 1), d(2020, 2, 1), d(2020, 3, 1)]);
        assert_eq!(s.points()[2].1, Some(30.0));
        assert_eq!(s.points()[1].1, None);
    }

    #[test]
    fn since_is_inclusive_of_start() {
        let s = ObservationSeries::from_rows(
            "X",
            vec![(d(2019, 12, 1), Some(1.0)), (d(2020, 1, 1), Some(2.0)), (d(2020, 2, 1), Some(3.0))],
        )
        .since(d(2020, 1, 1));
        assert_eq!(s.len(), 2);
        assert_eq!(s.first_date(), Some(d(2020, 1, 1)));
    }

    #[test]
    fn outer_join_aligns_on_union_of_dates() {
        let a = ObservationSeries::from_rows("A", vec![(d(2020, 1, 1), Some(1.0)), (d(2020, 4, 1), Some(2.0))]);
        let b = ObservationSeries::from_rows("B", vec![(d(2020, 2, 1), Some(10.0)), (d(2020, 4, 1), None)]);
        let t = SeriesTable::outer_join(vec![a, b]);

        assert_eq!(t.dates(), &[d(2020, 1, 1), d(2020, 2, 1), d(2020, 4, 1)]);
        assert_eq!(t.column("A").unwrap().values, vec![Some(1.0), None, Some(2.0)]);
        assert_eq!(t.column("B").unwrap().values, vec![None, Some(10.0), None]);
    }

    #[test]
    fn outer_join_keeps_one_column_per_id() {
        let a = ObservationSeries::from_rows("A", vec![(d(2020, 1, 1), Some(1.0))]);
        let t = SeriesTable::outer_join(vec![a.clone(), a]);
        assert_eq!(t.columns().len(), 1);
    }

    #[test]
    fn drop_all_missing_rows_keeps_partial_rows() {
        let t = SeriesTable::from_columns(
            vec![d(2020, 1, 1), d(2020, 2, 1), d(2020, 3, 1)],
            vec![
                Column { id: "A".into(), values: vec![None, Some(1.0), None] },
                Column { id: "B".into(), values: vec![None, None, Some(2.0)] },
            ],
        )
        .unwrap();
        let trimmed = t.drop_all_missing_rows();
        assert_eq!(trimmed.dates(), &[d(2020, 2, 1), d(2020, 3, 1)]);
        assert!(trimmed.has_values());
    }

    #[test]
    fn recent_rows_skips_empty_rows_and_keeps_order() {
        let t = SeriesTable::from_columns(
            vec![d(2020, 1, 1), d(2020, 2, 1), d(2020, 3, 1), d(2020, 4, 1)],
            vec![Column { id: "A".into(), values: vec![Some(1.0), Some(2.0), Some(3.0), None] }],
        )
        .unwrap();
        let rows = t.recent_rows(2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, d(2020, 2, 1));
        assert_eq!(rows[1].1, vec![Some(3.0)]);
    }

    #[test]
    fn from_columns_rejects_ragged_input() {
        let t = SeriesTable::from_columns(
            vec![d(2020, 1, 1)],
            vec![Column { id: "A".into(), values: vec![] }],
        );
        assert!(t.is_none());
    }
}
