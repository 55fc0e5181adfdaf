//! Chart narratives from an OpenAI-compatible chat-completions endpoint.
//!
//! One blocking request per chart: a fixed analyst persona as the system
//! message and a user message carrying the chart's label, units, transform and
//! a markdown excerpt of the most recent observations.

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::data::SeriesTable;
use crate::domain::ChartSpec;
use crate::error::AppError;

/// Rows (with at least one value) included in the prompt excerpt.
pub const EXCERPT_ROWS: usize = 24;

pub const SYSTEM_PROMPT: &str = "You are an economic analyst writing commentary for a chart book of \
macroeconomic data. Write in a formal, neutral register. Describe the recent level and trend of the \
series shown, notable turning points and how the latest reading compares with the preceding year. \
Do not speculate beyond what the data shows and do not make forecasts. Respond with two to three \
short paragraphs of plain text, without headings, bullet points or markdown.";

/// Anything that can write a narrative for a rendered chart.
pub trait NarrativeWriter {
    fn write_narrative(&self, spec: &ChartSpec, table: &SeriesTable) -> Result<String, AppError>;
}

/// Blocking chat-completions client.
#[derive(Debug, Clone)]
pub struct NarrativeClient {
    http: Client,
    endpoint: String,
    model: String,
}

impl NarrativeClient {
    /// Fails with a missing-credential error when `OPENAI_API_KEY` is unset;
    /// nothing else in the app depends on it.
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let api_key = settings
            .openai_api_key
            .as_deref()
            .ok_or(AppError::MissingCredential { var: "OPENAI_API_KEY" })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| AppError::Narrative("OPENAI_API_KEY contains invalid header characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Narrative(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: chat_endpoint(&settings.openai_base_url),
            model: settings.openai_model.clone(),
        })
    }

    /// Single-turn chat call; returns the trimmed reply text.
    pub fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AppError> {
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: 0.2,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "requesting narrative");
        let response: ChatResponse = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| AppError::Narrative(format!("POST {} failed: {e}", self.endpoint)))?
            .error_for_status()
            .map_err(|e| AppError::Narrative(format!("POST {} returned {e}", self.endpoint)))?
            .json()
            .map_err(|e| AppError::Narrative(format!("unreadable response from {}: {e}", self.endpoint)))?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::Narrative("response had no message content".to_string()))
    }
}

impl NarrativeWriter for NarrativeClient {
    fn write_narrative(&self, spec: &ChartSpec, table: &SeriesTable) -> Result<String, AppError> {
        self.chat(SYSTEM_PROMPT, &build_user_prompt(spec, table, EXCERPT_ROWS))
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// User message for one chart.
pub fn build_user_prompt(spec: &ChartSpec, table: &SeriesTable, rows: usize) -> String {
    let transform = spec
        .transform_kind()
        .map(|k| k.describe().to_string())
        .unwrap_or_else(|_| spec.transform.clone());
    let units = if spec.units.trim().is_empty() {
        "not specified"
    } else {
        spec.units.as_str()
    };

    let mut out = String::new();
    out.push_str(&format!("Chart: {}\n", spec.page_title));
    out.push_str(&format!("Series: {}\n", spec.display_label()));
    out.push_str(&format!("Units: {units}\n"));
    out.push_str(&format!("Transformation: {transform}\n"));
    if !spec.notes.trim().is_empty() {
        out.push_str(&format!("Notes: {}\n", spec.notes.trim()));
    }
    out.push_str(&format!("\nMost recent observations:\n\n{}", excerpt_table(spec, table, rows)));
    out
}

/// Markdown table of the last `rows` rows carrying at least one value.
pub fn excerpt_table(spec: &ChartSpec, table: &SeriesTable, rows: usize) -> String {
    let labels: Vec<&str> = table.columns().iter().map(|c| spec.label_for(&c.id)).collect();

    let mut out = String::new();
    out.push_str(&format!("| Date | {} |\n", labels.join(" | ")));
    out.push_str(&format!("|---|{}\n", "---|".repeat(labels.len())));
    for (date, values) in table.recent_rows(rows) {
        let cells: Vec<String> = values
            .iter()
            .map(|v| v.map(|x| format!("{x:.2}")).unwrap_or_default())
            .collect();
        out.push_str(&format!("| {date} | {} |\n", cells.join(" | ")));
    }
    out
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}
