//! PNG chart rendering for report pages.
//!
//! One chart per page: every column of the transformed table is drawn as a
//! line on a single set of axes, with the page title as caption and the units
//! as the y-axis description.

use std::fs::create_dir_all;
use std::path::Path;

use plotters::prelude::*;
use tracing::debug;

use crate::data::SeriesTable;
use crate::domain::ChartSpec;
use crate::error::AppError;
use crate::plot::chart::{ChartData, chart_data, fmt_value, fmt_year};

/// 10.5 × 6.5 in at 160 dpi.
pub const DEFAULT_SIZE: (u32, u32) = (1680, 1040);

const PALETTE: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

/// Turns a chart spec plus its transformed table into an image file.
pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec, table: &SeriesTable, out_png: &Path) -> Result<(), AppError>;
}

/// Plotters bitmap renderer.
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
        }
    }
}

impl ChartRenderer for PngRenderer {
    fn render(&self, spec: &ChartSpec, table: &SeriesTable, out_png: &Path) -> Result<(), AppError> {
        let data = chart_data(spec, table).ok_or_else(|| AppError::EmptyResult {
            title: spec.page_title.clone(),
        })?;

        if let Some(parent) = out_png.parent() {
            create_dir_all(parent)
                .map_err(|e| AppError::io(format!("failed to create '{}'", parent.display()), e))?;
        }

        draw_png(spec, &data, out_png, (self.width, self.height))
            .map_err(|e| AppError::Render(format!("{}: {e}", spec.page_title)))?;
        debug!(path = %out_png.display(), "wrote chart image");
        Ok(())
    }
}

fn draw_png(
    spec: &ChartSpec,
    data: &ChartData,
    path: &Path,
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let [x0, x1] = data.x_bounds;
    let [y0, y1] = data.y_bounds;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.page_title, ("sans-serif", 40))
        .margin(28)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .light_line_style(&RGBColor(235, 235, 235))
        .bold_line_style(&RGBColor(210, 210, 210))
        .x_labels(10)
        .y_labels(8)
        .x_label_formatter(&|v| fmt_year(*v))
        .y_label_formatter(&|v| fmt_value(*v))
        .y_desc(spec.units.as_str())
        .label_style(("sans-serif", 22))
        .axis_desc_style(("sans-serif", 24))
        .draw()?;

    for (idx, series) in data.series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        for (seg_idx, segment) in series.segments.iter().enumerate() {
            let anno = chart.draw_series(LineSeries::new(segment.iter().copied(), color.stroke_width(3)))?;
            if seg_idx == 0 {
                anno.label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(3)));
            }
        }
    }

    if data.series.len() > 1 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.85))
            .border_style(&RGBColor(180, 180, 180))
            .label_font(("sans-serif", 20))
            .draw()?;
    }

    root.present()?;
    Ok(())
}
