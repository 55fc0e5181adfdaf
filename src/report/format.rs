//! Formatted terminal output: run summaries and recent-row tables.
//!
//! We keep formatting code in one place so output changes stay localized and
//! the pipeline code stays free of presentation details.

use crate::app::pipeline::{ChartOutcome, ReportRun};
use crate::data::SeriesTable;
use crate::domain::{ChartSpec, ReportSpec};

const LABEL_WIDTH: usize = 14;

/// Summary printed after `mda build`.
pub fn format_run_summary(report: &ReportSpec, run: &ReportRun) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== mda - {} ===\n", report.report_title));
    out.push_str(&format!("As of: {}\n", report.as_of));
    out.push_str(&format!(
        "Charts: {} rendered, {} failed, {} total\n",
        run.rendered_count(),
        run.failed_count(),
        run.outcomes.len(),
    ));
    out.push('\n');

    for (idx, outcome) in run.outcomes.iter().enumerate() {
        match outcome {
            ChartOutcome::Rendered(chart) => {
                let narrative = if chart.narrative.is_some() { " +narrative" } else { "" };
                out.push_str(&format!(
                    "  ok   {:>2}. {} ({} rows){narrative}\n",
                    idx + 1,
                    chart.spec.page_title,
                    chart.table.len(),
                ));
            }
            ChartOutcome::Failed { title, error } => {
                out.push_str(&format!(
                    "  FAIL {:>2}. {title} [{}] {error}\n",
                    idx + 1,
                    error.kind().label(),
                ));
            }
        }
    }

    out.push('\n');
    out.push_str(&format!("Wrote {} pages to {}\n", run.pages, run.out_pdf.display()));
    out
}

/// The last `n` rows with at least one value, one column per series.
pub fn format_recent_rows(spec: &ChartSpec, table: &SeriesTable, n: usize) -> String {
    let mut out = String::new();

    let mut header = format!("{:<10}", "date");
    let mut rule = format!("{:-<10}", "");
    for col in table.columns() {
        header.push_str(&format!(" {:>LABEL_WIDTH$}", truncate(spec.label_for(&col.id), LABEL_WIDTH)));
        rule.push_str(&format!(" {:-<LABEL_WIDTH$}", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');

    for (date, values) in table.recent_rows(n) {
        let mut line = date.to_string();
        for v in values {
            let cell = v.map(|x| format!("{x:.3}")).unwrap_or_else(|| "-".to_string());
            line.push_str(&format!(" {cell:>LABEL_WIDTH$}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
