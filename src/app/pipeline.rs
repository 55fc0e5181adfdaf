//! Shared report pipeline used by both the batch CLI and the TUI.
//!
//! Per chart: fetch -> transform -> drop all-missing rows -> empty check ->
//! render -> (optional) narrative. A failing chart becomes a
//! [`ChartOutcome::Failed`] and the run moves on; only the successes reach
//! the PDF.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::data::{SeriesSource, SeriesTable};
use crate::domain::{ChartSpec, ReportSpec};
use crate::error::AppError;
use crate::narrative::NarrativeWriter;
use crate::plot::ChartRenderer;
use crate::report::{ReportPage, assemble_pdf};
use crate::session::ReportSession;
use crate::transform::build_series_for_chart;

/// A chart that made it onto a page.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub spec: ChartSpec,
    pub table: SeriesTable,
    pub image_path: PathBuf,
    pub narrative: Option<String>,
}

impl RenderedChart {
    fn page(&self) -> ReportPage {
        ReportPage {
            title: self.spec.page_title.clone(),
            image_path: self.image_path.clone(),
            narrative: self.narrative.clone(),
            notes: self.spec.notes.clone(),
        }
    }
}

#[derive(Debug)]
pub enum ChartOutcome {
    Rendered(RenderedChart),
    Failed { title: String, error: AppError },
}

/// Result of a batch run that produced a document.
#[derive(Debug)]
pub struct ReportRun {
    pub outcomes: Vec<ChartOutcome>,
    pub pages: usize,
    pub out_pdf: PathBuf,
}

impl ReportRun {
    pub fn rendered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ChartOutcome::Rendered(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.rendered_count()
    }
}

/// Inputs of one batch run.
#[derive(Debug, Clone, Copy)]
pub struct ReportRequest<'a> {
    pub report: &'a ReportSpec,
    pub start: NaiveDate,
    pub out_pdf: &'a Path,
    pub tmpdir: &'a Path,
}

/// File name of the n-th (0-based) chart image.
pub fn chart_image_name(idx: usize) -> String {
    format!("chart_{:03}.png", idx + 1)
}

/// Fetch and transform the data for one chart.
///
/// The chart entry and its transform name are validated before anything is
/// fetched. A result with no values is an empty-result error.
pub fn prepare_chart(source: &dyn SeriesSource, spec: &ChartSpec, start: NaiveDate) -> Result<SeriesTable, AppError> {
    spec.validate()?;
    spec.transform_kind()?;
    let raw = source.fetch_table(&spec.series_ids(), start)?;
    let table = build_series_for_chart(&raw, &spec.transform, &spec.frequency)?.drop_all_missing_rows();
    if !table.has_values() {
        return Err(AppError::EmptyResult {
            title: spec.page_title.clone(),
        });
    }
    Ok(table)
}

/// Prepare and render one chart into `out_png`.
pub fn build_chart(
    source: &dyn SeriesSource,
    renderer: &dyn ChartRenderer,
    spec: &ChartSpec,
    start: NaiveDate,
    out_png: &Path,
) -> Result<RenderedChart, AppError> {
    let table = prepare_chart(source, spec, start)?;
    renderer.render(spec, &table, out_png)?;
    Ok(RenderedChart {
        spec: spec.clone(),
        table,
        image_path: out_png.to_path_buf(),
        narrative: None,
    })
}

/// Run the whole batch: every chart in order, then the PDF.
///
/// Fails with [`AppError::NoCharts`] (and writes nothing) when no chart
/// succeeds.
pub fn run_report(
    source: &dyn SeriesSource,
    renderer: &dyn ChartRenderer,
    narrator: Option<&dyn NarrativeWriter>,
    request: &ReportRequest<'_>,
) -> Result<ReportRun, AppError> {
    let charts = &request.report.charts;
    let mut outcomes = Vec::with_capacity(charts.len());

    for (idx, spec) in charts.iter().enumerate() {
        let out_png = request.tmpdir.join(chart_image_name(idx));
        info!(chart = idx + 1, total = charts.len(), title = %spec.page_title, "building chart");

        match build_chart(source, renderer, spec, request.start, &out_png) {
            Ok(mut chart) => {
                if let Some(narrator) = narrator {
                    match narrator.write_narrative(&chart.spec, &chart.table) {
                        Ok(text) => chart.narrative = Some(text),
                        Err(err) => warn!(title = %spec.page_title, error = %err, "narrative failed; keeping chart without it"),
                    }
                }
                outcomes.push(ChartOutcome::Rendered(chart));
            }
            Err(err) => {
                warn!(title = %spec.page_title, kind = err.kind().label(), error = %err, "skipping chart");
                outcomes.push(ChartOutcome::Failed {
                    title: spec.page_title.clone(),
                    error: err,
                });
            }
        }
    }

    let pages: Vec<ReportPage> = outcomes
        .iter()
        .filter_map(|o| match o {
            ChartOutcome::Rendered(chart) => Some(chart.page()),
            ChartOutcome::Failed { .. } => None,
        })
        .collect();

    if pages.is_empty() {
        return Err(AppError::NoCharts {
            attempted: charts.len(),
        });
    }

    let page_count = assemble_pdf(&request.report.report_title, &request.report.as_of, &pages, request.out_pdf)?;
    info!(path = %request.out_pdf.display(), pages = page_count, "report written");

    Ok(ReportRun {
        outcomes,
        pages: page_count,
        out_pdf: request.out_pdf.to_path_buf(),
    })
}

/// Render an interactive session's charts (already fetched) and assemble
/// them. Returns the page count.
pub fn export_session(
    session: &ReportSession,
    renderer: &dyn ChartRenderer,
    out_pdf: &Path,
    tmpdir: &Path,
) -> Result<usize, AppError> {
    if session.is_empty() {
        return Err(AppError::NoCharts { attempted: 0 });
    }

    let mut pages = Vec::with_capacity(session.len());
    for (idx, chart) in session.charts().iter().enumerate() {
        let out_png = tmpdir.join(chart_image_name(idx));
        renderer.render(&chart.spec, &chart.table, &out_png)?;
        pages.push(ReportPage {
            title: chart.spec.page_title.clone(),
            image_path: out_png,
            narrative: chart.narrative.clone(),
            notes: chart.spec.notes.clone(),
        });
    }

    let count = assemble_pdf(&session.title, &session.as_of, &pages, out_pdf)?;
    info!(path = %out_pdf.display(), pages = count, "session exported");
    Ok(count)
}
