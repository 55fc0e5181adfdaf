//! Error type shared by every stage of the report pipeline.
//!
//! Variants follow the failure categories a caller actually needs to tell
//! apart (network vs. bad upstream data vs. no usable values vs. missing
//! credential), so the orchestrator and the TUI branch on [`ErrorKind`]
//! instead of matching message text.

use thiserror::Error;

/// Coarse failure category, stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    MalformedResponse,
    UnsupportedTransform,
    EmptyResult,
    MissingCredential,
    InvalidInput,
    Narrative,
    Output,
    NoCharts,
}

impl ErrorKind {
    /// Short label for status lines and log fields.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Transport => "network",
            ErrorKind::MalformedResponse => "bad response",
            ErrorKind::UnsupportedTransform => "unsupported transform",
            ErrorKind::EmptyResult => "no data",
            ErrorKind::MissingCredential => "missing credential",
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::Narrative => "narrative",
            ErrorKind::Output => "output",
            ErrorKind::NoCharts => "no charts",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("request for series '{series_id}' failed: {message}")]
    Transport { series_id: String, message: String },

    #[error("malformed upstream response for series '{series_id}': expected {expected}")]
    MalformedResponse { series_id: String, expected: String },

    #[error("unsupported transform '{0}' (expected one of: level, yoy, qoq_saar)")]
    UnsupportedTransform(String),

    #[error("chart '{title}' has no usable values after transformation")]
    EmptyResult { title: String },

    #[error("missing credential: set {var} to enable narrative generation")]
    MissingCredential { var: &'static str },

    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("invalid chart list: {0}")]
    SpecFile(String),

    #[error("narrative request failed: {0}")]
    Narrative(String),

    #[error("failed to render chart: {0}")]
    Render(String),

    #[error("failed to write document: {0}")]
    Document(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("no charts were generated ({attempted} attempted); report not written")]
    NoCharts { attempted: usize },

    #[error("{failed} of {total} charts failed")]
    PartialReport { failed: usize, total: usize },
}

impl AppError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Transport { .. } => ErrorKind::Transport,
            AppError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            AppError::UnsupportedTransform(_) => ErrorKind::UnsupportedTransform,
            AppError::EmptyResult { .. } => ErrorKind::EmptyResult,
            AppError::MissingCredential { .. } => ErrorKind::MissingCredential,
            AppError::InvalidDate { .. } | AppError::SpecFile(_) => ErrorKind::InvalidInput,
            AppError::Narrative(_) => ErrorKind::Narrative,
            AppError::Render(_)
            | AppError::Document(_)
            | AppError::Io { .. }
            | AppError::Terminal(_) => ErrorKind::Output,
            AppError::NoCharts { .. } | AppError::PartialReport { .. } => ErrorKind::NoCharts,
        }
    }

    /// Process exit code for the `mda` binary.
    ///
    /// - 2: bad input or configuration
    /// - 3: nothing usable to report
    /// - 4: network, upstream or output failure
    /// - 5: `--strict` run where some charts failed
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::UnsupportedTransform(_)
            | AppError::MissingCredential { .. }
            | AppError::InvalidDate { .. }
            | AppError::SpecFile(_) => 2,
            AppError::EmptyResult { .. } | AppError::NoCharts { .. } => 3,
            AppError::PartialReport { .. } => 5,
            _ => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_category() {
        let transport = AppError::Transport {
            series_id: "UNRATE".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(transport.exit_code(), 4);
        assert_eq!(transport.kind(), ErrorKind::Transport);

        assert_eq!(AppError::NoCharts { attempted: 2 }.exit_code(), 3);
        assert_eq!(AppError::UnsupportedTransform("mom".into()).exit_code(), 2);
        assert_eq!(
            AppError::PartialReport { failed: 1, total: 2 }.exit_code(),
            5
        );
    }

    #[test]
    fn malformed_message_names_series_and_expectation() {
        let err = AppError::MalformedResponse {
            series_id: "GDPC1".to_string(),
            expected: "a 'GDPC1' value column".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("GDPC1"));
        assert!(msg.contains("value column"));
    }
}
