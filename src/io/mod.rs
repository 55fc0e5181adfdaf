//! Input/output helpers.
//!
//! - chart list JSON read/write (`spec_file`)
//! - transformed table exports (`export`)

pub mod export;
pub mod spec_file;

pub use export::write_table_csv;
pub use spec_file::{parse_report_spec, read_report_spec, write_report_spec};
