//! Report output: PDF assembly and formatted terminal summaries.

pub mod format;
pub mod layout;
pub mod pdf;

pub use format::{format_recent_rows, format_run_summary};
pub use pdf::{ReportPage, assemble_pdf};
