//! Preview pane widget: the PNG page chart redrawn into terminal cells through
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::ChartData;

/// High-contrast line colors for dark terminals. Index `i` is shared with the
/// legend drawn next to the chart.
pub const SERIES_COLORS: [(u8, u8, u8); 6] = [
    (0, 255, 255),
    (255, 200, 0),
    (0, 255, 0),
    (255, 80, 80),
    (200, 120, 255),
    (255, 255, 255),
];

/// A render-only chart over prepared [`ChartData`].
pub struct SeriesPlottersChart<'a> {
    pub data: &'a ChartData,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

const LIGHT_GREY: RGBColor = RGBColor(200, 200, 200);

impl Widget for SeriesPlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [x0, x1] = self.data.x_bounds;
        let [y0, y1] = self.data.y_bounds;
        let drawable = [x0, x1, y0, y1].iter().all(|v| v.is_finite()) && x0 < x1 && y0 < y1;

        // Plotters errors out on tiny areas; show a hint instead.
        let hint = if area.width < 20 || area.height < 8 {
            Some("Enlarge the terminal to see the chart.")
        } else if !drawable {
            Some("Nothing to plot.")
        } else {
            None
        };
        if let Some(hint) = hint {
            buf.set_string(area.x, area.y, hint, Style::default().fg(Color::Yellow));
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 9)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_mesh()
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(4)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&LIGHT_GREY))
                .axis_style(&LIGHT_GREY)
                .draw()?;

            for (idx, series) in self.data.series.iter().enumerate() {
                let (r, g, b) = SERIES_COLORS[idx % SERIES_COLORS.len()];
                let color = RGBColor(r, g, b);
                for segment in &series.segments {
                    chart.draw_series(LineSeries::new(segment.iter().copied(), &color))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
