//! Command-line parsing for the macro report builder.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! command dispatch (`app`) and from the data pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::DEFAULT_START_DATE;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mda", version, about = "Macro data archive: FRED charts to a PDF report")]
pub struct Cli {
    /// Log filter (e.g. `debug`, `macro_archive=trace`). Overrides MDA_LOG and RUST_LOG.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a PDF report from a JSON chart list.
    Build(BuildArgs),
    /// Fetch and transform series, then print a terminal preview.
    Show(ShowArgs),
    /// Launch the interactive report builder.
    ///
    /// Charts are fetched and validated as they are added; the finished list
    /// can be exported to PDF or saved as a chart list for `mda build`.
    Tui(TuiArgs),
}

#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    /// Chart list (JSON).
    #[arg(long, value_name = "JSON")]
    pub spec: PathBuf,

    /// Earliest observation date (YYYY-MM-DD).
    #[arg(long, default_value = DEFAULT_START_DATE)]
    pub start: String,

    /// Output PDF path.
    #[arg(long, value_name = "PDF")]
    pub out: PathBuf,

    /// Scratch directory for chart images.
    #[arg(long, default_value = "_charts_tmp")]
    pub tmpdir: PathBuf,

    /// Ask the narrative service for commentary on each chart (needs OPENAI_API_KEY).
    #[arg(long)]
    pub narrative: bool,

    /// Fail (exit 5) if any chart was skipped.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Series identifiers, comma separated (e.g. `UNRATE,U6RATE`).
    #[arg(long, value_delimiter = ',', required = true, value_name = "ID")]
    pub series: Vec<String>,

    /// Transform: level, yoy or qoq_saar.
    #[arg(long, default_value = "level")]
    pub transform: String,

    /// Frequency (monthly, quarterly, weekly, daily; first letter is enough).
    #[arg(long, default_value = "monthly")]
    pub frequency: String,

    /// Earliest observation date (YYYY-MM-DD).
    #[arg(long, default_value = DEFAULT_START_DATE)]
    pub start: String,

    /// Number of recent rows to print.
    #[arg(long, default_value_t = 12)]
    pub rows: usize,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the transformed table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Preload charts from a chart list (JSON).
    #[arg(long, value_name = "JSON")]
    pub spec: Option<PathBuf>,

    /// Earliest observation date (YYYY-MM-DD).
    #[arg(long, default_value = DEFAULT_START_DATE)]
    pub start: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_defaults() {
        let cli = Cli::parse_from(["mda", "build", "--spec", "charts.json", "--out", "r.pdf"]);
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.start, "1990-01-01");
        assert_eq!(args.tmpdir, PathBuf::from("_charts_tmp"));
        assert!(!args.narrative && !args.strict);
    }

    #[test]
    fn show_splits_series_list() {
        let cli = Cli::parse_from(["mda", "show", "--series", "UNRATE,U6RATE", "--transform", "yoy"]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.series, vec!["UNRATE", "U6RATE"]);
        assert_eq!(args.transform, "yoy");
    }

    #[test]
    fn log_level_is_global() {
        let cli = Cli::parse_from(["mda", "tui", "--log-level", "debug"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
