//! Shared domain types.
//!
//! Chart and report specifications are plain serde structs so the same shape
//! is read by batch mode, built by the interactive form, and written back out
//! by "save chart list".

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_REPORT_TITLE: &str = "Macro Economic Data Archive";
pub const DEFAULT_START_DATE: &str = "1990-01-01";

/// Native sampling frequency of a chart's series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Weekly,
    Daily,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Weekly,
        Frequency::Daily,
    ];

    /// Resolve a free-form frequency string by its first character.
    ///
    /// Anything unrecognized, including leading whitespace, is treated as
    /// monthly.
    pub fn infer(raw: &str) -> Frequency {
        match raw.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('q') => Frequency::Quarterly,
            Some('w') => Frequency::Weekly,
            Some('d') => Frequency::Daily,
            _ => Frequency::Monthly,
        }
    }

    /// Rows per year, used as the year-over-year lag.
    pub fn yoy_periods(self) -> usize {
        match self {
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Weekly => 52,
            Frequency::Daily => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Weekly => "weekly",
            Frequency::Daily => "daily",
        }
    }

    pub fn next(self) -> Frequency {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Number of periods in one year for a frequency string (12 if unrecognized).
pub fn infer_yoy_periods(freq: &str) -> usize {
    Frequency::infer(freq).yoy_periods()
}

/// Analytical form a chart displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Level,
    Yoy,
    QoqSaar,
}

impl TransformKind {
    pub const ALL: [TransformKind; 3] = [
        TransformKind::Level,
        TransformKind::Yoy,
        TransformKind::QoqSaar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransformKind::Level => "level",
            TransformKind::Yoy => "yoy",
            TransformKind::QoqSaar => "qoq_saar",
        }
    }

    /// Human-readable description used in prompts.
    pub fn describe(self) -> &'static str {
        match self {
            TransformKind::Level => "level",
            TransformKind::Yoy => "year-over-year percent change",
            TransformKind::QoqSaar => "quarter-over-quarter percent change, seasonally adjusted annual rate",
        }
    }

    pub fn next(self) -> TransformKind {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl FromStr for TransformKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "level" => Ok(TransformKind::Level),
            "yoy" => Ok(TransformKind::Yoy),
            "qoq_saar" => Ok(TransformKind::QoqSaar),
            other => Err(AppError::UnsupportedTransform(other.to_string())),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One series on a chart: upstream identifier plus legend label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// Declarative description of one report page.
///
/// `transform` and `frequency` stay as the raw strings from the chart list;
/// an unknown transform only fails the chart that uses it, at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub page_title: String,
    pub series: Vec<SeriesSpec>,
    #[serde(default = "default_transform")]
    pub transform: String,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub notes: String,
}

fn default_transform() -> String {
    TransformKind::Level.as_str().to_string()
}

fn default_frequency() -> String {
    Frequency::Monthly.as_str().to_string()
}

impl ChartSpec {
    pub fn series_ids(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.id.as_str()).collect()
    }

    /// Legend label for a series id (the id itself if no label is declared).
    pub fn label_for<'a>(&'a self, series_id: &'a str) -> &'a str {
        self.series
            .iter()
            .find(|s| s.id == series_id)
            .map(|s| s.label.as_str())
            .filter(|l| !l.is_empty())
            .unwrap_or(series_id)
    }

    /// Label used when a chart is described as a whole (prompts, lists).
    pub fn display_label(&self) -> String {
        let labels: Vec<&str> = self.series.iter().map(|s| self.label_for(&s.id)).collect();
        labels.join(", ")
    }

    /// Per-chart sanity checks: a title and at least one non-blank series id.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page_title.trim().is_empty() {
            return Err(AppError::SpecFile("chart has an empty page_title".to_string()));
        }
        if self.series.is_empty() {
            return Err(AppError::SpecFile(format!("chart '{}' lists no series", self.page_title)));
        }
        if self.series.iter().any(|s| s.id.trim().is_empty()) {
            return Err(AppError::SpecFile(format!(
                "chart '{}' has a series with an empty id",
                self.page_title
            )));
        }
        Ok(())
    }

    pub fn transform_kind(&self) -> Result<TransformKind, AppError> {
        self.transform.parse()
    }

    pub fn frequency(&self) -> Frequency {
        Frequency::infer(&self.frequency)
    }
}

/// A whole report: title, as-of label and the ordered chart list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSpec {
    #[serde(default = "default_report_title")]
    pub report_title: String,
    #[serde(default = "default_as_of")]
    pub as_of: String,
    pub charts: Vec<ChartSpec>,
}

fn default_report_title() -> String {
    DEFAULT_REPORT_TITLE.to_string()
}

fn default_as_of() -> String {
    format_as_of(Local::now().date_naive())
}

impl Default for ReportSpec {
    fn default() -> Self {
        Self {
            report_title: default_report_title(),
            as_of: default_as_of(),
            charts: Vec::new(),
        }
    }
}

/// Format an as-of date like "October 16, 2026".
pub fn format_as_of(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Parse a start date for data pulls.
pub fn parse_start_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate {
        input: raw.to_string(),
    })
}
