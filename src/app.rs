//! Command dispatch for the `mda` binary.
//!
//! Loads settings, installs the tracing subscriber and hands off to the batch
//! build, the terminal preview or the interactive builder.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::cli::{BuildArgs, Command, ShowArgs, TuiArgs};
use crate::config::Settings;
use crate::data::FredClient;
use crate::domain::{ChartSpec, SeriesSpec, parse_start_date};
use crate::error::AppError;
use crate::logging::{LogTarget, LoggingConfig, TUI_LOG_FILE};
use crate::narrative::{NarrativeClient, NarrativeWriter};
use crate::plot::{PngRenderer, chart_data, render_ascii_chart};

pub mod pipeline;

/// Entry point for the `mda` binary.
pub fn run() -> Result<(), AppError> {
    // We want `mda` and `mda --spec charts.json` to behave like `mda tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = Settings::from_env();

    let target = match cli.command {
        Command::Tui(_) => LogTarget::File(PathBuf::from(TUI_LOG_FILE)),
        Command::Build(_) | Command::Show(_) => LogTarget::Stderr,
    };
    crate::logging::init(&LoggingConfig::new(
        cli.log_level.as_deref(),
        settings.log_filter.as_deref(),
        target,
    ))?;

    match cli.command {
        Command::Build(args) => handle_build(args, &settings),
        Command::Show(args) => handle_show(args, &settings),
        Command::Tui(args) => handle_tui(args, settings),
    }
}

fn handle_build(args: BuildArgs, settings: &Settings) -> Result<(), AppError> {
    let start = parse_start_date(&args.start)?;
    let report = crate::io::read_report_spec(&args.spec)?;

    // Resolve the credential before any network work so a missing key fails fast.
    let narrator = if args.narrative {
        Some(NarrativeClient::from_settings(settings)?)
    } else {
        None
    };

    std::fs::create_dir_all(&args.tmpdir)
        .map_err(|e| AppError::io(format!("failed to create '{}'", args.tmpdir.display()), e))?;

    let source = FredClient::new(&settings.fred_graph_url)?;
    let renderer = PngRenderer::default();
    info!(charts = report.charts.len(), %start, "building report");

    let request = pipeline::ReportRequest {
        report: &report,
        start,
        out_pdf: &args.out,
        tmpdir: &args.tmpdir,
    };
    let run = pipeline::run_report(
        &source,
        &renderer,
        narrator.as_ref().map(|n| n as &dyn NarrativeWriter),
        &request,
    )?;

    println!("{}", crate::report::format_run_summary(&report, &run));

    if args.strict && run.failed_count() > 0 {
        return Err(AppError::PartialReport {
            failed: run.failed_count(),
            total: run.outcomes.len(),
        });
    }
    Ok(())
}

fn handle_show(args: ShowArgs, settings: &Settings) -> Result<(), AppError> {
    let start = parse_start_date(&args.start)?;
    let spec = show_chart_spec(&args);

    let source = FredClient::new(&settings.fred_graph_url)?;
    let table = pipeline::prepare_chart(&source, &spec, start)?;

    if let Some(data) = chart_data(&spec, &table) {
        println!("{}", render_ascii_chart(&data, args.width, args.height));
    }
    println!("{}", crate::report::format_recent_rows(&spec, &table, args.rows));

    if let Some(path) = &args.export {
        crate::io::write_table_csv(path, &table)?;
        info!(path = %path.display(), rows = table.len(), "exported table");
    }
    Ok(())
}

fn show_chart_spec(args: &ShowArgs) -> ChartSpec {
    let ids: Vec<String> = args
        .series
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    ChartSpec {
        page_title: format!("{} ({})", ids.join(", "), args.transform),
        series: ids
            .into_iter()
            .map(|id| SeriesSpec { id, label: String::new() })
            .collect(),
        transform: args.transform.clone(),
        frequency: args.frequency.clone(),
        units: String::new(),
        notes: String::new(),
    }
}

fn handle_tui(args: TuiArgs, settings: Settings) -> Result<(), AppError> {
    crate::tui::run(args, settings)
}

/// Rewrite argv so `mda` defaults to `mda tui`.
///
/// Rules:
/// - `mda`                       -> `mda tui`
/// - `mda --spec charts.json`    -> `mda tui --spec charts.json`
/// - `mda --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "build" | "show" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
