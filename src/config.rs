//! Environment-driven settings.
//!
//! `.env` is loaded first (if present) so local runs don't need exported
//! variables. CLI flags override these where they overlap.

use crate::data::fred::DEFAULT_BASE_URL;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub fred_graph_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fred_graph_url: DEFAULT_BASE_URL.to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            log_filter: None,
        }
    }
}

impl Settings {
    /// Loads `.env` and reads:
    /// - `FRED_GRAPH_URL`  (default: the public fredgraph.csv endpoint)
    /// - `OPENAI_API_KEY`  (optional; only the narrative feature needs it)
    /// - `OPENAI_MODEL`    (default: `gpt-4o-mini`)
    /// - `OPENAI_BASE_URL` (default: `https://api.openai.com/v1`)
    /// - `MDA_LOG`         (tracing filter directive)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] but over an arbitrary lookup; blank
    /// values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            fred_graph_url: get("FRED_GRAPH_URL").unwrap_or(defaults.fred_graph_url),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            log_filter: get("MDA_LOG"),
        }
    }
}
