//! Ratatui-based interactive report builder.
//!
//! The left pane lists the session's charts, the right pane previews the
//! selected one (or shows the add-chart form). Every action reports into the
//! status line; a failed action leaves the rest of the session untouched.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::{info, warn};

use crate::app::pipeline;
use crate::cli::TuiArgs;
use crate::config::Settings;
use crate::data::{FredClient, SeriesSource};
use crate::domain::{ReportSpec, parse_start_date};
use crate::error::{AppError, ErrorKind};
use crate::narrative::{NarrativeClient, NarrativeWriter};
use crate::plot::{ChartRenderer, PngRenderer, chart::fmt_value, chart::fmt_year, chart_data};

mod form;
mod plotters_chart;

use form::{ChartForm, Field, Prompt, PromptKind};
use plotters_chart::{SERIES_COLORS, SeriesPlottersChart};

const SCRATCH_DIR: &str = "_charts_tmp";
const DEFAULT_EXPORT_PATH: &str = "macro_report.pdf";
const DEFAULT_SAVE_PATH: &str = "charts.json";

/// Start the TUI.
pub fn run(args: TuiArgs, settings: Settings) -> Result<(), AppError> {
    let start = parse_start_date(&args.start)?;
    let preload = args
        .spec
        .as_deref()
        .map(crate::io::read_report_spec)
        .transpose()?;
    let source = FredClient::new(&settings.fred_graph_url)?;

    let mut app = App::new(settings, Box::new(source), Box::new(PngRenderer::default()), start);
    if let Some(report) = preload {
        app.load_report(&report);
    }

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::Terminal(format!("failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::Terminal(format!("failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::Terminal(format!("failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Browse,
    Form(ChartForm),
    Prompt(Prompt),
}

/// Status line: the last action's outcome, with the error category when it
/// failed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Status {
    text: String,
    error: Option<ErrorKind>,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    fn failed(action: &str, err: &AppError) -> Self {
        Self {
            text: format!("{action} failed [{}]: {err}", err.kind().label()),
            error: Some(err.kind()),
        }
    }
}

struct App {
    session: crate::session::ReportSession,
    settings: Settings,
    source: Box<dyn SeriesSource>,
    renderer: Box<dyn ChartRenderer>,
    scratch_dir: PathBuf,
    selected: usize,
    mode: Mode,
    status: Status,
}

impl App {
    fn new(
        settings: Settings,
        source: Box<dyn SeriesSource>,
        renderer: Box<dyn ChartRenderer>,
        start: chrono::NaiveDate,
    ) -> Self {
        Self {
            session: crate::session::ReportSession::new(start),
            settings,
            source,
            renderer,
            scratch_dir: PathBuf::from(SCRATCH_DIR),
            selected: 0,
            mode: Mode::Browse,
            status: Status::info("Press 'a' to add a chart."),
        }
    }

    /// Seed the session from a chart list; charts that fail are reported and skipped.
    fn load_report(&mut self, report: &ReportSpec) {
        self.session.title = report.report_title.clone();
        self.session.as_of = report.as_of.clone();

        let mut failed = Vec::new();
        let mut first_kind = None;
        for spec in &report.charts {
            match pipeline::prepare_chart(self.source.as_ref(), spec, self.session.start) {
                Ok(table) => {
                    self.session.append(spec.clone(), table);
                }
                Err(err) => {
                    warn!(title = %spec.page_title, error = %err, "could not load chart");
                    failed.push(format!("{} [{}]", spec.page_title, err.kind().label()));
                    first_kind.get_or_insert(err.kind());
                }
            }
        }

        self.status = match first_kind {
            None => Status::info(format!("Loaded {} charts.", self.session.len())),
            Some(kind) => Status {
                text: format!(
                    "Loaded {} of {} charts; skipped: {}",
                    self.session.len(),
                    report.charts.len(),
                    failed.join(", ")
                ),
                error: Some(kind),
            },
        };
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::Terminal(format!("draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100)).map_err(|e| AppError::Terminal(format!("event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::Terminal(format!("event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.mode {
            Mode::Browse => return self.handle_browse_key(code),
            Mode::Form(_) => self.handle_form_key(code),
            Mode::Prompt(_) => self.handle_prompt_key(code),
        }
        false
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.session.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Form(ChartForm::default());
                self.status = Status::info("New chart: Tab to move, Enter to add, Esc to cancel.");
            }
            KeyCode::Char('K') => self.selected = self.session.move_up(self.selected),
            KeyCode::Char('J') => self.selected = self.session.move_down(self.selected),
            KeyCode::Char('x') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('n') => self.generate_narrative(),
            KeyCode::Char('e') => self.open_prompt(PromptKind::ExportPdf, DEFAULT_EXPORT_PATH.to_string()),
            KeyCode::Char('s') => self.open_prompt(PromptKind::SaveSpec, DEFAULT_SAVE_PATH.to_string()),
            KeyCode::Char('t') => self.open_prompt(PromptKind::ReportTitle, self.session.title.clone()),
            KeyCode::Char('o') => self.open_prompt(PromptKind::AsOf, self.session.as_of.clone()),
            KeyCode::Char('b') => self.open_prompt(PromptKind::StartDate, self.session.start.to_string()),
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let Mode::Form(form) = &mut self.mode else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.status = Status::info("Add canceled.");
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left | KeyCode::Right => form.cycle(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.push_char(c),
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, code: KeyCode) {
        let Mode::Prompt(prompt) = &mut self.mode else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.status = Status::info("Canceled.");
            }
            KeyCode::Enter => {
                let prompt = prompt.clone();
                self.mode = Mode::Browse;
                self.apply_prompt(&prompt);
            }
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(c) => prompt.input.push(c),
            _ => {}
        }
    }

    fn open_prompt(&mut self, kind: PromptKind, initial: String) {
        self.mode = Mode::Prompt(Prompt::new(kind, initial));
        self.status = Status::info(format!("{}: Enter to apply, Esc to cancel.", kind.label()));
    }

    /// Fetch, transform and validate the form's chart. The form stays open on
    /// failure so the input can be corrected.
    fn submit_form(&mut self) {
        let Mode::Form(form) = &self.mode else {
            return;
        };
        let result = form
            .to_chart_spec()
            .and_then(|spec| pipeline::prepare_chart(self.source.as_ref(), &spec, self.session.start).map(|t| (spec, t)));

        match result {
            Ok((spec, table)) => {
                let rows = table.len();
                info!(title = %spec.page_title, rows, "chart added");
                self.status = Status::info(format!("Added '{}' ({rows} rows).", spec.page_title));
                self.selected = self.session.append(spec, table);
                self.mode = Mode::Browse;
            }
            Err(err) => self.status = Status::failed("Add chart", &err),
        }
    }

    fn delete_selected(&mut self) {
        match self.session.remove(self.selected) {
            Some(chart) => {
                self.status = Status::info(format!("Deleted '{}'.", chart.spec.page_title));
                if self.selected >= self.session.len() {
                    self.selected = self.session.len().saturating_sub(1);
                }
            }
            None => self.status = Status::info("Nothing to delete."),
        }
    }

    fn generate_narrative(&mut self) {
        let Some(chart) = self.session.chart(self.selected) else {
            self.status = Status::info("No chart selected.");
            return;
        };
        let result = NarrativeClient::from_settings(&self.settings)
            .and_then(|client| client.write_narrative(&chart.spec, &chart.table));

        match result {
            Ok(text) => {
                let title = chart.spec.page_title.clone();
                self.session.set_narrative(self.selected, Some(text));
                self.status = Status::info(format!("Narrative ready for '{title}'."));
            }
            Err(err) => self.status = Status::failed("Narrative", &err),
        }
    }

    fn apply_prompt(&mut self, prompt: &Prompt) {
        let value = prompt.value();
        let result = match prompt.kind {
            PromptKind::ReportTitle | PromptKind::AsOf if value.is_empty() => {
                Err(AppError::SpecFile(format!("{} cannot be empty", prompt.kind.label())))
            }
            PromptKind::ReportTitle => {
                self.session.title = value.to_string();
                Ok(format!("Title: {value}"))
            }
            PromptKind::AsOf => {
                self.session.as_of = value.to_string();
                Ok(format!("As of: {value}"))
            }
            PromptKind::StartDate => parse_start_date(value).map(|start| {
                self.session.start = start;
                self.refresh_all()
            }),
            PromptKind::ExportPdf => self.export_pdf(Path::new(value)),
            PromptKind::SaveSpec => crate::io::write_report_spec(Path::new(value), &self.session.to_report_spec())
                .map(|()| format!("Saved {} charts to {value}", self.session.len())),
        };

        self.status = match result {
            Ok(text) => Status::info(text),
            Err(err) => Status::failed(prompt.kind.label(), &err),
        };
    }

    fn export_pdf(&self, out: &Path) -> Result<String, AppError> {
        std::fs::create_dir_all(&self.scratch_dir)
            .map_err(|e| AppError::io(format!("failed to create '{}'", self.scratch_dir.display()), e))?;
        let pages = pipeline::export_session(&self.session, self.renderer.as_ref(), out, &self.scratch_dir)?;
        Ok(format!("Wrote {pages} pages to {}", out.display()))
    }

    /// Re-fetch every chart from the session's start date. Charts that fail
    /// keep their previous data.
    fn refresh_all(&mut self) -> String {
        let mut failed = 0usize;
        for idx in 0..self.session.len() {
            let Some(spec) = self.session.chart(idx).map(|c| c.spec.clone()) else {
                continue;
            };
            match pipeline::prepare_chart(self.source.as_ref(), &spec, self.session.start) {
                Ok(table) => {
                    self.session.replace_table(idx, table);
                }
                Err(err) => {
                    warn!(title = %spec.page_title, error = %err, "refresh failed; keeping previous data");
                    failed += 1;
                }
            }
        }
        if failed == 0 {
            format!("Start date {}; refreshed {} charts.", self.session.start, self.session.len())
        } else {
            format!(
                "Start date {}; {failed} of {} charts kept previous data.",
                self.session.start,
                self.session.len()
            )
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("mda", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" - {}", self.session.title)),
            ]),
            Line::from(Span::styled(
                format!(
                    "as of: {} | start: {} | charts: {}",
                    self.session.as_of,
                    self.session.start,
                    self.session.len()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
            .split(area);

        self.draw_chart_list(frame, chunks[0]);
        match &self.mode {
            Mode::Form(form) => draw_form(frame, chunks[1], form),
            Mode::Browse | Mode::Prompt(_) => self.draw_preview(frame, chunks[1]),
        }
        if let Mode::Prompt(prompt) = &self.mode {
            draw_prompt(frame, area, prompt);
        }
    }

    fn draw_chart_list(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .session
            .charts()
            .iter()
            .enumerate()
            .map(|(idx, c)| {
                let marker = if c.narrative.is_some() { " ¶" } else { "" };
                ListItem::new(format!("{:>2}. {} [{}]{marker}", idx + 1, c.spec.page_title, c.spec.transform))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Charts").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.session.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_preview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(chart) = self.session.chart(self.selected) else {
            let block = Block::default().title("Preview").borders(Borders::ALL);
            let msg = Paragraph::new("No charts yet.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let block = Block::default()
            .title(chart.spec.page_title.as_str())
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let narrative_height = if chart.narrative.is_some() { 6 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(narrative_height),
            ])
            .split(inner);

        if let Some(data) = chart_data(&chart.spec, &chart.table) {
            let widget = SeriesPlottersChart {
                data: &data,
                y_label: chart.spec.units.as_str(),
                fmt_x: fmt_year,
                fmt_y: fmt_value,
            };
            frame.render_widget(widget, chunks[0]);

            let legend: Vec<Span> = data
                .series
                .iter()
                .enumerate()
                .flat_map(|(idx, s)| {
                    let (r, g, b) = SERIES_COLORS[idx % SERIES_COLORS.len()];
                    [
                        Span::styled("━━ ", Style::default().fg(Color::Rgb(r, g, b))),
                        Span::raw(format!("{}  ", s.label)),
                    ]
                })
                .collect();
            frame.render_widget(Paragraph::new(Line::from(legend)), chunks[1]);
        }

        if let Some(text) = &chart.narrative {
            let p = Paragraph::new(text.as_str())
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true });
            frame.render_widget(p, chunks[2]);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.mode {
            Mode::Browse => "a add  K/J move  x delete  n narrative  e export  s save  t title  o as-of  b start  q quit",
            Mode::Form(_) => "Tab/↑/↓ field  ←/→ choose  Enter add  Esc cancel",
            Mode::Prompt(_) => "Enter apply  Esc cancel",
        };
        let status_style = if self.status.error.is_some() {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.status.text.as_str(), status_style),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_form(frame: &mut ratatui::Frame<'_>, area: Rect, form: &ChartForm) {
    let focused = form.focused();
    let mut lines = Vec::new();
    for field in Field::ALL {
        let style = if field == focused {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default()
        };
        let cursor = if field == focused { "_" } else { "" };
        lines.push(Line::from(Span::styled(field.label(), Style::default().fg(Color::Gray))));
        lines.push(Line::from(Span::styled(format!("  {}{cursor}", form.value(field)), style)));
    }
    let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Add chart").borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_prompt(frame: &mut ratatui::Frame<'_>, area: Rect, prompt: &Prompt) {
    let rect = Rect {
        x: area.x + 2,
        y: area.y + area.height.saturating_sub(4),
        width: area.width.saturating_sub(4),
        height: 3.min(area.height),
    };
    frame.render_widget(Clear, rect);
    let p = Paragraph::new(format!("{}_", prompt.input)).block(
        Block::default()
            .title(prompt.kind.label())
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use image::{ImageBuffer, Rgb};

    use super::*;
    use crate::data::{ObservationSeries, SeriesTable};
    use crate::domain::ChartSpec;

    struct MemorySource(HashMap<String, ObservationSeries>);

    impl SeriesSource for MemorySource {
        fn fetch_series(&self, series_id: &str, start: NaiveDate) -> Result<ObservationSeries, AppError> {
            self.0
                .get(series_id)
                .cloned()
                .map(|s| s.since(start))
                .ok_or_else(|| AppError::Transport {
                    series_id: series_id.to_string(),
                    message: "not found".to_string(),
                })
        }
    }

    struct BlankRenderer;

    impl ChartRenderer for BlankRenderer {
        fn render(&self, _spec: &ChartSpec, _table: &SeriesTable, out_png: &Path) -> Result<(), AppError> {
            let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(64, 40, Rgb([255, 255, 255]));
            img.save(out_png).map_err(|e| AppError::Render(e.to_string()))
        }
    }

    fn app() -> App {
        let rows: Vec<(NaiveDate, Option<f64>)> = (1..=12)
            .map(|m| (NaiveDate::from_ymd_opt(2023, m, 1).unwrap(), Some(3.0 + m as f64 / 10.0)))
            .collect();
        let mut series = HashMap::new();
        series.insert("UNRATE".to_string(), ObservationSeries::from_rows("UNRATE", rows.clone()));
        series.insert("PAYEMS".to_string(), ObservationSeries::from_rows("PAYEMS", rows));
        App::new(
            Settings::default(),
            Box::new(MemorySource(series)),
            Box::new(BlankRenderer),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        )
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn add_chart(app: &mut App, title: &str, ids: &str) {
        app.handle_key(KeyCode::Char('a'));
        type_str(app, title);
        app.handle_key(KeyCode::Tab);
        type_str(app, ids);
        app.handle_key(KeyCode::Enter);
    }

    #[test]
    fn add_then_reorder_and_delete() {
        let mut app = app();
        add_chart(&mut app, "Unemployment", "UNRATE");
        add_chart(&mut app, "Payrolls", "PAYEMS");
        assert_eq!(app.session.len(), 2);
        assert_eq!(app.selected, 1);
        assert_eq!(app.mode, Mode::Browse);

        app.handle_key(KeyCode::Char('K'));
        assert_eq!(app.selected, 0);
        assert_eq!(app.session.chart(0).unwrap().spec.page_title, "Payrolls");

        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.session.len(), 1);
        assert_eq!(app.session.chart(0).unwrap().spec.page_title, "Unemployment");
    }

    #[test]
    fn failed_add_keeps_form_open_with_typed_error() {
        let mut app = app();
        add_chart(&mut app, "Broken", "NOPE");
        assert!(matches!(app.mode, Mode::Form(_)));
        assert!(app.status.text.contains("Blank [invalid input]"));
        assert_eq!(app.status.error, Some(ErrorKind::Transport));
        assert!(app.session.is_empty());

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.mode, Mode::Browse);
    }

    #[test]
    fn narrative_without_key_is_a_credential_error() {
        let mut app = app();
        add_chart(&mut app, "Unemployment", "UNRATE");
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.status.error, Some(ErrorKind::MissingCredential));
        assert!(app.session.chart(0).unwrap().narrative.is_none());
    }

    #[test]
    fn invalid_start_date_leaves_session_unchanged() {
        let mut app = app();
        let before = app.session.start;
        app.handle_key(KeyCode::Char('b'));
        for _ in 0..10 {
            app.handle_key(KeyCode::Backspace);
        }
        type_str(&mut app, "2020-13-01");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.status.error, Some(ErrorKind::InvalidInput));
        assert_eq!(app.session.start, before);
    }

    #[test]
    fn export_and_save_from_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.scratch_dir = dir.path().join("scratch");
        add_chart(&mut app, "Unemployment", "UNRATE");

        let pdf = dir.path().join("out.pdf");
        app.open_prompt(PromptKind::ExportPdf, pdf.display().to_string());
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.status.error, None, "{}", app.status.text);
        assert!(pdf.exists());

        let json = dir.path().join("charts.json");
        app.open_prompt(PromptKind::SaveSpec, json.display().to_string());
        app.handle_key(KeyCode::Enter);
        let saved = crate::io::read_report_spec(&json).unwrap();
        assert_eq!(saved.charts.len(), 1);
        assert_eq!(saved.charts[0].series[0].id, "UNRATE");
    }

    #[test]
    fn preload_reports_skipped_charts() {
        let mut app = app();
        let report: ReportSpec = crate::io::parse_report_spec(
            r#"{ "report_title": "Pack", "charts": [
                { "page_title": "Ok", "series": [ { "id": "UNRATE" } ] },
                { "page_title": "Bad", "series": [ { "id": "NOPE" } ] },
                { "page_title": "Blank", "series": [] }
            ] }"#,
        )
        .unwrap();
        app.load_report(&report);
        assert_eq!(app.session.len(), 1);
        assert_eq!(app.session.title, "Pack");
        assert!(app.status.text.contains("Bad [network]"));
        assert!(app.status.text.contains("Blank [invalid input]"));
        assert_eq!(app.status.error, Some(ErrorKind::Transport));
    }
}
