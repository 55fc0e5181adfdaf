//! Input state for the add-chart form and the one-line prompts.
//!
//! Pure state machines: key handling in `tui::App` only forwards characters
//! and navigation here, so the parsing rules are testable without a terminal.

use crate::domain::{ChartSpec, Frequency, SeriesSpec, TransformKind};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    SeriesIds,
    Labels,
    Transform,
    Frequency,
    Units,
    Notes,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::SeriesIds,
        Field::Labels,
        Field::Transform,
        Field::Frequency,
        Field::Units,
        Field::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Page title",
            Field::SeriesIds => "Series ids (comma separated)",
            Field::Labels => "Labels (comma separated, optional)",
            Field::Transform => "Transform (←/→)",
            Field::Frequency => "Frequency (←/→)",
            Field::Units => "Units",
            Field::Notes => "Notes",
        }
    }
}

/// The add-chart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartForm {
    pub title: String,
    pub series_ids: String,
    pub labels: String,
    pub transform: TransformKind,
    pub frequency: Frequency,
    pub units: String,
    pub notes: String,
    pub focus: usize,
}

impl Default for ChartForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            series_ids: String::new(),
            labels: String::new(),
            transform: TransformKind::Level,
            frequency: Frequency::Monthly,
            units: String::new(),
            notes: String::new(),
            focus: 0,
        }
    }
}

impl ChartForm {
    pub fn focused(&self) -> Field {
        Field::ALL[self.focus.min(Field::ALL.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    /// Text shown for a field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::SeriesIds => &self.series_ids,
            Field::Labels => &self.labels,
            Field::Transform => self.transform.as_str(),
            Field::Frequency => self.frequency.as_str(),
            Field::Units => &self.units,
            Field::Notes => &self.notes,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused() {
            Field::Title => Some(&mut self.title),
            Field::SeriesIds => Some(&mut self.series_ids),
            Field::Labels => Some(&mut self.labels),
            Field::Units => Some(&mut self.units),
            Field::Notes => Some(&mut self.notes),
            Field::Transform | Field::Frequency => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Cycle the choice fields; no-op on text fields.
    pub fn cycle(&mut self) {
        match self.focused() {
            Field::Transform => self.transform = self.transform.next(),
            Field::Frequency => self.frequency = self.frequency.next(),
            _ => {}
        }
    }

    /// Build a chart spec. Labels pair with ids by position; missing or blank
    /// labels fall back to the id when drawn.
    pub fn to_chart_spec(&self) -> Result<ChartSpec, AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::SpecFile("page title is required".to_string()));
        }

        let ids = split_list(&self.series_ids);
        if ids.is_empty() {
            return Err(AppError::SpecFile("at least one series id is required".to_string()));
        }
        let labels = split_list(&self.labels);

        let series = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| SeriesSpec {
                label: labels.get(i).cloned().unwrap_or_default(),
                id,
            })
            .collect();

        Ok(ChartSpec {
            page_title: title.to_string(),
            series,
            transform: self.transform.as_str().to_string(),
            frequency: self.frequency.as_str().to_string(),
            units: self.units.trim().to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// What a one-line prompt edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    ReportTitle,
    AsOf,
    StartDate,
    ExportPdf,
    SaveSpec,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::ReportTitle => "Report title",
            PromptKind::AsOf => "As-of label",
            PromptKind::StartDate => "Start date (YYYY-MM-DD)",
            PromptKind::ExportPdf => "Export PDF to",
            PromptKind::SaveSpec => "Save chart list to",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub fn new(kind: PromptKind, initial: impl Into<String>) -> Self {
        Self {
            kind,
            input: initial.into(),
        }
    }

    pub fn value(&self) -> &str {
        self.input.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_pair_with_ids_by_position() {
        let form = ChartForm {
            title: " Labor market ".to_string(),
            series_ids: "UNRATE, U6RATE,,".to_string(),
            labels: "Headline".to_string(),
            ..ChartForm::default()
        };
        let spec = form.to_chart_spec().unwrap();
        assert_eq!(spec.page_title, "Labor market");
        assert_eq!(spec.series_ids(), vec!["UNRATE", "U6RATE"]);
        assert_eq!(spec.label_for("UNRATE"), "Headline");
        assert_eq!(spec.label_for("U6RATE"), "U6RATE");
        assert_eq!(spec.transform, "level");
    }

    #[test]
    fn required_fields() {
        let err = ChartForm::default().to_chart_spec().unwrap_err();
        assert!(matches!(err, AppError::SpecFile(_)));
        let form = ChartForm { title: "T".to_string(), ..ChartForm::default() };
        assert!(form.to_chart_spec().is_err());
    }

    #[test]
    fn typing_goes_to_text_fields_only() {
        let mut form = ChartForm::default();
        form.push_char('G');
        form.next_field();
        form.push_char('X');
        form.backspace();
        form.push_char('Y');
        assert_eq!(form.title, "G");
        assert_eq!(form.series_ids, "Y");

        form.focus = 3;
        form.push_char('z');
        assert_eq!(form.transform, TransformKind::Level);
        form.cycle();
        assert_eq!(form.transform, TransformKind::Yoy);
        form.next_field();
        form.cycle();
        assert_eq!(form.frequency, Frequency::Quarterly);
    }

    #[test]
    fn field_navigation_wraps() {
        let mut form = ChartForm::default();
        form.prev_field();
        assert_eq!(form.focused(), Field::Notes);
        form.next_field();
        assert_eq!(form.focused(), Field::Title);
    }
}
