//! Page geometry for the PDF report.
//!
//! All lengths are millimetres on a landscape US-letter page, origin at the
//! bottom-left corner (PDF convention).

const INCH: f32 = 25.4;
const PT_TO_MM: f32 = 25.4 / 72.0;

pub const PAGE_WIDTH: f32 = 11.0 * INCH;
pub const PAGE_HEIGHT: f32 = 8.5 * INCH;

pub const HEADER_BAR_HEIGHT: f32 = 0.5 * INCH;
pub const SIDE_MARGIN: f32 = 0.6 * INCH;
pub const GAP_BELOW_HEADER: f32 = 0.8 * INCH;
pub const BOTTOM_MARGIN: f32 = 0.75 * INCH;
pub const HEADER_TEXT_BASELINE: f32 = PAGE_HEIGHT - HEADER_BAR_HEIGHT + 0.18 * INCH;
pub const FOOTER_BASELINE: f32 = 0.35 * INCH;
pub const NOTE_BASELINE: f32 = 0.55 * INCH;

/// Height reserved under the chart for narrative text.
pub const NARRATIVE_BLOCK_HEIGHT: f32 = 2.4 * INCH;
pub const NARRATIVE_FONT_SIZE: f32 = 9.5;
pub const NARRATIVE_LINE_HEIGHT: f32 = 4.6;

/// An axis-aligned box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Area available to the chart image on a chart page.
pub fn chart_frame(with_narrative: bool) -> Frame {
    let reserved = if with_narrative { NARRATIVE_BLOCK_HEIGHT } else { 0.0 };
    let bottom = BOTTOM_MARGIN + reserved;
    Frame {
        x: SIDE_MARGIN,
        y: bottom,
        width: PAGE_WIDTH - 2.0 * SIDE_MARGIN,
        height: PAGE_HEIGHT - HEADER_BAR_HEIGHT - GAP_BELOW_HEADER - bottom,
    }
}

/// Area for narrative text below a shrunken chart.
pub fn narrative_frame() -> Frame {
    Frame {
        x: SIDE_MARGIN,
        y: BOTTOM_MARGIN,
        width: PAGE_WIDTH - 2.0 * SIDE_MARGIN,
        height: NARRATIVE_BLOCK_HEIGHT - 3.0,
    }
}

/// Scale an image of `px_w × px_h` into `frame`, preserving aspect ratio and
/// centering it.
pub fn fit_image(px_w: u32, px_h: u32, frame: Frame) -> Frame {
    if px_w == 0 || px_h == 0 {
        return frame;
    }
    let scale = (frame.width / px_w as f32).min(frame.height / px_h as f32);
    let width = px_w as f32 * scale;
    let height = px_h as f32 * scale;
    Frame {
        x: frame.x + (frame.width - width) / 2.0,
        y: frame.y + (frame.height - height) / 2.0,
        width,
        height,
    }
}

/// Approximate rendered width of `text` in Helvetica at `size_pt`.
///
/// Built-in PDF fonts carry no metrics we can query, so this uses coarse
/// per-class glyph widths (in em).
pub fn text_width(text: &str, size_pt: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.25,
            ' ' | 'f' | 't' | 'r' | 'I' | '(' | ')' | '-' | '/' => 0.32,
            'm' | 'w' | 'M' | 'W' => 0.85,
            'A'..='Z' => 0.68,
            '0'..='9' => 0.556,
            _ => 0.52,
        })
        .sum();
    em * size_pt * PT_TO_MM
}

/// X position that right-aligns `text` to `right_edge`.
pub fn right_aligned_x(text: &str, size_pt: f32, right_edge: f32) -> f32 {
    right_edge - text_width(text, size_pt)
}

/// X position that centers `text` on the page.
pub fn centered_x(text: &str, size_pt: f32) -> f32 {
    ((PAGE_WIDTH - text_width(text, size_pt)) / 2.0).max(0.0)
}

/// Greedy word wrap to `max_width` millimetres. Paragraph breaks in the input
/// are kept as empty lines.
pub fn wrap_text(text: &str, size_pt: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for (idx, paragraph) in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()).enumerate() {
        if idx > 0 {
            lines.push(String::new());
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && text_width(&candidate, size_pt) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}
