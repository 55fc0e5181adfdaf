//! Read/write the declarative chart list.
//!
//! The file is the JSON form of [`ReportSpec`]: only `charts[].page_title` and
//! `charts[].series` are required, everything else has a default. The
//! interactive builder's "save" action writes the same document batch mode
//! reads.
//!
//! Only the document shape is checked here. A chart with an empty series list
//! or a blank id still loads; it fails on its own when the report is built.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::domain::ReportSpec;
use crate::error::AppError;

/// Read a chart list.
pub fn read_report_spec(path: &Path) -> Result<ReportSpec, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::SpecFile(format!("failed to open '{}': {e}", path.display())))?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::SpecFile(format!("invalid chart list '{}': {e}", path.display())))
}

/// Parse a chart list from a JSON string.
pub fn parse_report_spec(json: &str) -> Result<ReportSpec, AppError> {
    serde_json::from_str(json).map_err(|e| AppError::SpecFile(format!("invalid chart list: {e}")))
}

/// Write a chart list as pretty JSON.
pub fn write_report_spec(path: &Path, spec: &ReportSpec) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("failed to create '{}'", path.display()), e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), spec)
        .map_err(|e| AppError::SpecFile(format!("failed to write '{}': {e}", path.display())))?;
    Ok(())
}
