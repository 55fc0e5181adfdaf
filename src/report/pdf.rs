//! PDF assembly: a cover page, then one landscape page per chart image.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};
use tracing::debug;

use crate::error::AppError;
use crate::report::layout::{
    self, FOOTER_BASELINE, HEADER_BAR_HEIGHT, HEADER_TEXT_BASELINE, NARRATIVE_FONT_SIZE, NARRATIVE_LINE_HEIGHT,
    NOTE_BASELINE, PAGE_HEIGHT, PAGE_WIDTH, SIDE_MARGIN,
};

const NAVY: (u8, u8, u8) = (0x0B, 0x2E, 0x5E);
const GREY: (u8, u8, u8) = (0x66, 0x66, 0x66);
const BLACK: (u8, u8, u8) = (0x00, 0x00, 0x00);
const WHITE: (u8, u8, u8) = (0xFF, 0xFF, 0xFF);

const IMAGE_DPI: f32 = 300.0;
const COVER_NOTE: &str = "Generated from public FRED data series (see chart list for sources).";

/// One chart page of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPage {
    pub title: String,
    pub image_path: PathBuf,
    pub narrative: Option<String>,
    pub notes: String,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Write the report to `out_pdf` and return the number of pages (cover
/// included).
pub fn assemble_pdf(report_title: &str, as_of: &str, pages: &[ReportPage], out_pdf: &Path) -> Result<usize, AppError> {
    let (doc, cover_page, cover_layer) =
        PdfDocument::new(report_title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts {
        regular: add_font(&doc, BuiltinFont::Helvetica)?,
        bold: add_font(&doc, BuiltinFont::HelveticaBold)?,
    };

    let cover = doc.get_page(cover_page).get_layer(cover_layer);
    draw_cover(&cover, &fonts, report_title, as_of);

    for (idx, page) in pages.iter().enumerate() {
        let image = load_image(&page.image_path)?;
        let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        draw_chart_page(&layer, &fonts, page, image, as_of, idx + 2);
    }

    if let Some(parent) = out_pdf.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::io(format!("failed to create '{}'", parent.display()), e))?;
    }
    let file = File::create(out_pdf).map_err(|e| AppError::io(format!("failed to create '{}'", out_pdf.display()), e))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| AppError::Document(format!("failed to write '{}': {e}", out_pdf.display())))?;

    let total = pages.len() + 1;
    debug!(path = %out_pdf.display(), pages = total, "wrote report");
    Ok(total)
}

fn add_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef, AppError> {
    doc.add_builtin_font(font)
        .map_err(|e| AppError::Document(format!("failed to load built-in font: {e}")))
}

fn load_image(path: &Path) -> Result<DynamicImage, AppError> {
    let img = image::open(path).map_err(|e| AppError::Document(format!("failed to read '{}': {e}", path.display())))?;
    // Alpha channels are not embedded; flatten to RGB.
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

fn draw_cover(layer: &PdfLayerReference, fonts: &Fonts, title: &str, as_of: &str) {
    let title = title.to_uppercase();
    let as_of = format!("As of {as_of}");

    set_fill(layer, BLACK);
    layer.use_text(&title, 28.0, Mm(layout::centered_x(&title, 28.0)), Mm(PAGE_HEIGHT * 0.65), &fonts.bold);
    layer.use_text(&as_of, 14.0, Mm(layout::centered_x(&as_of, 14.0)), Mm(PAGE_HEIGHT * 0.58), &fonts.regular);

    set_fill(layer, GREY);
    layer.use_text(
        COVER_NOTE,
        10.0,
        Mm(layout::centered_x(COVER_NOTE, 10.0)),
        Mm(PAGE_HEIGHT * 0.53),
        &fonts.regular,
    );
    draw_page_number(layer, fonts, 1);
}

fn draw_chart_page(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    page: &ReportPage,
    image: DynamicImage,
    as_of: &str,
    page_number: usize,
) {
    set_fill(layer, NAVY);
    layer.add_rect(
        Rect::new(Mm(0.0), Mm(PAGE_HEIGHT - HEADER_BAR_HEIGHT), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT))
            .with_mode(PaintMode::Fill),
    );

    let title = page.title.to_uppercase();
    let as_of = format!("As of {as_of}");
    set_fill(layer, WHITE);
    layer.use_text(&title, 12.0, Mm(SIDE_MARGIN), Mm(HEADER_TEXT_BASELINE), &fonts.bold);
    layer.use_text(
        &as_of,
        10.0,
        Mm(layout::right_aligned_x(&as_of, 10.0, PAGE_WIDTH - SIDE_MARGIN)),
        Mm(HEADER_TEXT_BASELINE),
        &fonts.regular,
    );

    let narrative = page.narrative.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let (px_w, px_h) = (image.width(), image.height());
    let placed = layout::fit_image(px_w, px_h, layout::chart_frame(narrative.is_some()));
    let natural_w = px_w as f32 / IMAGE_DPI * 25.4;
    let scale = if natural_w > 0.0 { placed.width / natural_w } else { 1.0 };

    Image::from_dynamic_image(&image).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(placed.x)),
            translate_y: Some(Mm(placed.y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );

    if let Some(text) = narrative {
        let frame = layout::narrative_frame();
        set_fill(layer, BLACK);
        let lines = layout::wrap_text(text, NARRATIVE_FONT_SIZE, frame.width);
        let max_lines = (frame.height / NARRATIVE_LINE_HEIGHT).floor() as usize;
        let mut y = frame.top() - NARRATIVE_LINE_HEIGHT;
        for line in lines.iter().take(max_lines) {
            if !line.is_empty() {
                layer.use_text(line, NARRATIVE_FONT_SIZE, Mm(frame.x), Mm(y), &fonts.regular);
            }
            y -= NARRATIVE_LINE_HEIGHT;
        }
    }

    let notes = page.notes.trim();
    if !notes.is_empty() {
        set_fill(layer, GREY);
        layer.use_text(format!("Note: {notes}"), 8.0, Mm(SIDE_MARGIN), Mm(NOTE_BASELINE), &fonts.regular);
    }

    draw_page_number(layer, fonts, page_number);
}

fn draw_page_number(layer: &PdfLayerReference, fonts: &Fonts, page_number: usize) {
    let label = format!("Page {page_number}");
    set_fill(layer, GREY);
    layer.use_text(
        &label,
        9.0,
        Mm(layout::right_aligned_x(&label, 9.0, PAGE_WIDTH - SIDE_MARGIN)),
        Mm(FOOTER_BASELINE),
        &fonts.regular,
    );
}

fn set_fill(layer: &PdfLayerReference, (r, g, b): (u8, u8, u8)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    )));
}
