//! In-memory state of the interactive report builder.
//!
//! The session owns the ordered chart list plus the report-wide settings.
//! Every chart in it has already been fetched and transformed successfully,
//! so export only needs to render and assemble.

use chrono::{Local, NaiveDate};

use crate::data::SeriesTable;
use crate::domain::{ChartSpec, DEFAULT_REPORT_TITLE, ReportSpec, format_as_of};

/// One accepted chart: its spec, transformed data and optional narrative.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionChart {
    pub spec: ChartSpec,
    pub table: SeriesTable,
    pub narrative: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSession {
    pub title: String,
    pub as_of: String,
    pub start: NaiveDate,
    charts: Vec<SessionChart>,
}

impl ReportSession {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            as_of: format_as_of(Local::now().date_naive()),
            start,
            charts: Vec::new(),
        }
    }

    pub fn charts(&self) -> &[SessionChart] {
        &self.charts
    }

    pub fn chart(&self, idx: usize) -> Option<&SessionChart> {
        self.charts.get(idx)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Append a chart; returns its index.
    pub fn append(&mut self, spec: ChartSpec, table: SeriesTable) -> usize {
        self.charts.push(SessionChart {
            spec,
            table,
            narrative: None,
        });
        self.charts.len() - 1
    }

    /// Swap with the previous chart; returns the new index.
    pub fn move_up(&mut self, idx: usize) -> usize {
        if idx == 0 || idx >= self.charts.len() {
            return idx;
        }
        self.charts.swap(idx, idx - 1);
        idx - 1
    }

    /// Swap with the next chart; returns the new index.
    pub fn move_down(&mut self, idx: usize) -> usize {
        if idx + 1 >= self.charts.len() {
            return idx;
        }
        self.charts.swap(idx, idx + 1);
        idx + 1
    }

    pub fn remove(&mut self, idx: usize) -> Option<SessionChart> {
        (idx < self.charts.len()).then(|| self.charts.remove(idx))
    }

    /// Replace the narrative of one chart. Returns false for a bad index.
    pub fn set_narrative(&mut self, idx: usize, narrative: Option<String>) -> bool {
        match self.charts.get_mut(idx) {
            Some(chart) => {
                chart.narrative = narrative;
                true
            }
            None => false,
        }
    }

    /// Swap in freshly fetched data for one chart. Any narrative described the
    /// old data, so it is cleared. Returns false for a bad index.
    pub fn replace_table(&mut self, idx: usize, table: SeriesTable) -> bool {
        match self.charts.get_mut(idx) {
            Some(chart) => {
                chart.table = table;
                chart.narrative = None;
                true
            }
            None => false,
        }
    }

    /// The chart list as the declarative document batch mode reads.
    pub fn to_report_spec(&self) -> ReportSpec {
        ReportSpec {
            report_title: self.title.clone(),
            as_of: self.as_of.clone(),
            charts: self.charts.iter().map(|c| c.spec.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::domain::SeriesSpec;

    fn chart(title: &str) -> (ChartSpec, SeriesTable) {
        let spec = ChartSpec {
            page_title: title.to_string(),
            series: vec![SeriesSpec { id: "GDP".to_string(), label: String::new() }],
            transform: "level".to_string(),
            frequency: "quarterly".to_string(),
            units: String::new(),
            notes: String::new(),
        };
        let table = SeriesTable::from_columns(
            vec![NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()],
            vec![Column { id: "GDP".to_string(), values: vec![Some(1.0)] }],
        )
        .unwrap();
        (spec, table)
    }

    fn titles(s: &ReportSession) -> Vec<&str> {
        s.charts().iter().map(|c| c.spec.page_title.as_str()).collect()
    }

    fn session_abc() -> ReportSession {
        let mut s = ReportSession::new(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        for t in ["A", "B", "C"] {
            let (spec, table) = chart(t);
            s.append(spec, table);
        }
        s
    }

    #[test]
    fn move_up_and_down_respect_bounds() {
        let mut s = session_abc();
        assert_eq!(s.move_up(0), 0);
        assert_eq!(s.move_down(2), 2);
        assert_eq!(titles(&s), vec!["A", "B", "C"]);

        assert_eq!(s.move_up(2), 1);
        assert_eq!(titles(&s), vec!["A", "C", "B"]);
        assert_eq!(s.move_down(0), 1);
        assert_eq!(titles(&s), vec!["C", "A", "B"]);
    }

    #[test]
    fn remove_and_narrative() {
        let mut s = session_abc();
        assert!(s.set_narrative(1, Some("text".to_string())));
        assert!(!s.set_narrative(9, None));
        assert_eq!(s.chart(1).and_then(|c| c.narrative.as_deref()), Some("text"));

        let removed = s.remove(0).unwrap();
        assert_eq!(removed.spec.page_title, "A");
        assert!(s.remove(5).is_none());
        assert_eq!(titles(&s), vec!["B", "C"]);
    }

    #[test]
    fn replacing_data_clears_the_narrative() {
        let mut s = session_abc();
        s.set_narrative(0, Some("old".to_string()));
        let (_, table) = chart("A");
        assert!(s.replace_table(0, table));
        assert!(s.chart(0).unwrap().narrative.is_none());
        assert!(!s.replace_table(7, chart("Z").1));
    }

    #[test]
    fn report_spec_keeps_order_and_settings() {
        let mut s = session_abc();
        s.title = "Weekly pack".to_string();
        s.move_down(0);
        let spec = s.to_report_spec();
        assert_eq!(spec.report_title, "Weekly pack");
        let order: Vec<&str> = spec.charts.iter().map(|c| c.page_title.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }
}
