//! Printable fee report: a title and a four-column table of the current view.

use crate::{
    error::{LedgerError, LedgerResult},
    query::View,
    record::format_date,
    schema::REPORT_COLUMNS,
};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
    Rgb,
};
use std::io::BufWriter;

/// The document-rendering collaborator.
pub trait ReportRenderer {
    /// Render the view under `title`. Returns the finished document bytes.
    fn render(&self, title: &str, view: &View) -> LedgerResult<Vec<u8>>;
}

/// The report table body: one row per view entry, REPORT_COLUMNS order.
pub fn report_rows(view: &View) -> Vec<[String; 4]> {
    view.records()
        .map(|r| {
            [
                r.name.clone(),
                r.mobile_number.clone(),
                r.balance.to_string(),
                format_date(r.due_date),
            ]
        })
        .collect()
}

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 15.0;
const ROW_H: f32 = 8.0;
const TITLE_SIZE: f32 = 18.0;
const CELL_SIZE: f32 = 10.0;
const CELL_PAD: f32 = 2.0;
const COLUMN_WIDTHS: [f32; 4] = [60.0, 45.0, 35.0, 40.0];

// #4F81BD
const HEADER_FILL: (f32, f32, f32) = (79.0 / 255.0, 129.0 / 255.0, 189.0 / 255.0);
const WHITE: (f32, f32, f32) = (1.0, 1.0, 1.0);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const GRID: (f32, f32, f32) = (0.5, 0.5, 0.5);

/// A4 PDF with Helvetica text, a filled header row and grid lines.
/// The header row repeats at the top of every page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReport;

impl ReportRenderer for PdfReport {
    fn render(&self, title: &str, view: &View) -> LedgerResult<Vec<u8>> {
        let rows = report_rows(view);

        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| LedgerError::Render(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| LedgerError::Render(e.to_string()))?;

        let mut layer = doc.get_page(page).get_layer(layer);
        layer.set_fill_color(rgb(BLACK));
        layer.use_text(title, TITLE_SIZE, Mm(MARGIN), Mm(PAGE_H - MARGIN - 7.0), &bold);

        let mut y = PAGE_H - MARGIN - 19.0;
        draw_header(&layer, &bold, y);
        y -= ROW_H;

        for row in &rows {
            if y - ROW_H < MARGIN {
                let (page, next) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
                layer = doc.get_page(page).get_layer(next);
                y = PAGE_H - MARGIN;
                draw_header(&layer, &bold, y);
                y -= ROW_H;
            }
            draw_row(&layer, &font, y, row);
            y -= ROW_H;
        }

        let mut writer = BufWriter::new(Vec::<u8>::new());
        doc.save(&mut writer)
            .map_err(|e| LedgerError::Render(e.to_string()))?;
        writer
            .into_inner()
            .map_err(|e| LedgerError::Render(e.to_string()))
    }
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// `top` is the upper edge of the row, in mm from the page bottom.
fn draw_header(layer: &PdfLayerReference, font: &IndirectFontRef, top: f32) {
    layer.set_fill_color(rgb(HEADER_FILL));
    layer.add_rect(Rect::new(
        Mm(MARGIN),
        Mm(top - ROW_H),
        Mm(MARGIN + COLUMN_WIDTHS.iter().sum::<f32>()),
        Mm(top),
    ));
    layer.set_fill_color(rgb(WHITE));
    draw_cells(layer, font, top, &REPORT_COLUMNS.map(str::to_string));
}

fn draw_row(layer: &PdfLayerReference, font: &IndirectFontRef, top: f32, cells: &[String; 4]) {
    layer.set_fill_color(rgb(BLACK));
    draw_cells(layer, font, top, cells);
}

fn draw_cells(layer: &PdfLayerReference, font: &IndirectFontRef, top: f32, cells: &[String; 4]) {
    layer.set_outline_color(rgb(GRID));
    layer.set_outline_thickness(0.5);

    let mut x = MARGIN;
    for (text, width) in cells.iter().zip(COLUMN_WIDTHS) {
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x), Mm(top)), false),
                (Point::new(Mm(x + width), Mm(top)), false),
                (Point::new(Mm(x + width), Mm(top - ROW_H)), false),
                (Point::new(Mm(x), Mm(top - ROW_H)), false),
            ],
            is_closed: true,
        });
        let shown = fit_to_width(text, width - 2.0 * CELL_PAD);
        layer.use_text(shown, CELL_SIZE, Mm(x + CELL_PAD), Mm(top - ROW_H + 2.7), font);
        x += width;
    }
}

/// Clip text that would run past its cell. Helvetica averages about half
/// an em per glyph, which is close enough for names and numbers.
fn fit_to_width(text: &str, width_mm: f32) -> String {
    let glyph_mm = CELL_SIZE * 0.5 * 0.3528;
    let max_chars = (width_mm / glyph_mm).floor() as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_clipped() {
        let clipped = fit_to_width(&"x".repeat(200), 56.0);
        assert!(clipped.ends_with("..."));
        assert!(clipped.len() < 200);
        assert_eq!(fit_to_width("Asha", 56.0), "Asha");
    }
}
