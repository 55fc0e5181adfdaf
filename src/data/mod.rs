//! Upstream data: the FRED fetcher and the date-aligned table it produces.

pub mod fred;
pub mod table;

pub use fred::{FredClient, SeriesSource, coerce_numeric, parse_fredgraph_csv};
pub use table::{Column, ObservationSeries, SeriesTable};
