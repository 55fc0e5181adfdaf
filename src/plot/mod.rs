//! Chart rendering backends.
//!
//! - shared data preparation (`chart`)
//! - PNG pages for the PDF report (`png`)
//! - ASCII preview for `mda show` (`ascii`)

pub mod ascii;
pub mod chart;
pub mod png;

pub use ascii::render_ascii_chart;
pub use chart::{ChartData, PlotSeries, chart_data};
pub use png::{ChartRenderer, PngRenderer};
