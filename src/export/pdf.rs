use std::borrow::Cow;

use printpdf::{BuiltinFont, Line, Mm, PdfDocument, PdfLayerReference, Point};

use super::{file_stem, DOCUMENT_TITLE};
use crate::error::ExportError;
use crate::models::PlayerRecord;

/// A4 portrait.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
/// Left margin and title baseline, measured from the top-left corner.
const MARGIN: f32 = 14.0;
const TITLE_TOP: f32 = 10.0;
/// Table geometry.
const TABLE_TOP: f32 = 16.0;
const ROW_HEIGHT: f32 = 9.0;
const FIELD_COLUMN_WIDTH: f32 = 50.0;
const CELL_PADDING: f32 = 2.5;
const TITLE_SIZE: f32 = 16.0;
const CELL_SIZE: f32 = 10.0;
/// Room for text inside the value column.
const VALUE_TEXT_WIDTH: f32 =
    PAGE_WIDTH - 2.0 * MARGIN - FIELD_COLUMN_WIDTH - 2.0 * CELL_PADDING;
const MM_PER_POINT: f32 = 0.3528;
const ELLIPSIS: &str = "...";

/// File name used when saving the PDF for a player called `name`.
pub fn pdf_file_name(name: &str) -> String {
    format!("{}.pdf", file_stem(name))
}

/// Render the single-page "Player Details" document: a title followed by a
/// two-column `Field | Value` table.
pub fn render_player_pdf(record: &PlayerRecord) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) =
        PdfDocument::new(DOCUMENT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;
    let canvas = doc.get_page(page).get_layer(layer);

    canvas.use_text(
        DOCUMENT_TITLE,
        TITLE_SIZE,
        Mm(MARGIN),
        from_top(TITLE_TOP),
        &bold,
    );

    let mut rows = vec![("Field", "Value", &bold)];
    rows.extend(
        record
            .labeled_values()
            .into_iter()
            .map(|(label, value)| (label, value, &regular)),
    );

    for (index, (field, value, font)) in rows.iter().enumerate() {
        let row_top = TABLE_TOP + index as f32 * ROW_HEIGHT;
        let baseline = from_top(row_top + ROW_HEIGHT - CELL_PADDING - 1.0);
        canvas.use_text(*field, CELL_SIZE, Mm(MARGIN + CELL_PADDING), baseline, *font);
        canvas.use_text(
            fit_to_width(value, VALUE_TEXT_WIDTH, CELL_SIZE),
            CELL_SIZE,
            Mm(MARGIN + FIELD_COLUMN_WIDTH + CELL_PADDING),
            baseline,
            *font,
        );
    }

    draw_grid(&canvas, rows.len());

    doc.save_to_bytes().map_err(pdf_error)
}

/// Cut `text` so that, set in Helvetica at `size` points, it fits within
/// `max_width` millimetres. Shortened text ends in an ASCII ellipsis since
/// the builtin fonts only cover WinAnsi.
fn fit_to_width(text: &str, max_width: f32, size: f32) -> Cow<'_, str> {
    let em = size * MM_PER_POINT;
    if text_width(text) * em <= max_width {
        return Cow::Borrowed(text);
    }

    let budget = max_width / em - text_width(ELLIPSIS);
    let mut used = 0.0;
    let mut end = 0;
    for (index, c) in text.char_indices() {
        used += glyph_width(c);
        if used > budget {
            break;
        }
        end = index + c.len_utf8();
    }
    Cow::Owned(format!("{}{ELLIPSIS}", text[..end].trim_end()))
}

fn text_width(text: &str) -> f32 {
    text.chars().map(glyph_width).sum()
}

/// Approximate Helvetica advance widths in ems, rounded up per class.
fn glyph_width(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        ' ' | 'f' | 't' | 'r' | 'I' | '-' | '(' | ')' | '/' => 0.34,
        'm' | 'M' | 'W' => 0.95,
        'w' | 'A'..='Z' | '@' | '%' => 0.78,
        c if c.is_ascii() => 0.56,
        _ => 1.0,
    }
}

/// Horizontal rule above every row and below the last, plus the three
/// vertical column borders.
fn draw_grid(canvas: &PdfLayerReference, row_count: usize) {
    let left = MARGIN;
    let right = PAGE_WIDTH - MARGIN;
    let divider = MARGIN + FIELD_COLUMN_WIDTH;
    let bottom = TABLE_TOP + row_count as f32 * ROW_HEIGHT;

    canvas.set_outline_thickness(0.3);
    for row in 0..=row_count {
        let y = TABLE_TOP + row as f32 * ROW_HEIGHT;
        canvas.add_line(segment((left, y), (right, y)));
    }
    for x in [left, divider, right] {
        canvas.add_line(segment((x, TABLE_TOP), (x, bottom)));
    }
}

/// Line between two points given in millimetres from the top-left corner.
fn segment(from: (f32, f32), to: (f32, f32)) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(from.0), from_top(from.1)), false),
            (Point::new(Mm(to.0), from_top(to.1)), false),
        ],
        is_closed: false,
    }
}

/// PDF coordinates grow upwards; the layout above is written top-down.
fn from_top(offset: f32) -> Mm {
    Mm(PAGE_HEIGHT - offset)
}

fn pdf_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerFields, PlayerId};

    #[test]
    fn file_name_uses_player_name() {
        assert_eq!(pdf_file_name("Leanne Graham"), "Leanne Graham.pdf");
        assert_eq!(pdf_file_name(""), "player.pdf");
    }

    #[test]
    fn renders_a_pdf_document() {
        let record = PlayerRecord::new(
            PlayerId::Remote(1),
            PlayerFields::new("Ann", "Team Acme", "Position aann"),
        );
        let bytes = render_player_pdf(&record).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 200);
    }

    #[test]
    fn long_values_are_cut_to_the_value_column() {
        let long = "Wolfeschlegelsteinhausenbergerdorff ".repeat(6);
        let fitted = fit_to_width(&long, VALUE_TEXT_WIDTH, CELL_SIZE);
        assert!(fitted.ends_with(ELLIPSIS));
        assert!(fitted.len() < long.len());
        assert!(long.starts_with(fitted.trim_end_matches(ELLIPSIS)));
        assert!(text_width(&fitted) * CELL_SIZE * MM_PER_POINT <= VALUE_TEXT_WIDTH);

        let wide = "W".repeat(200);
        let fitted = fit_to_width(&wide, VALUE_TEXT_WIDTH, CELL_SIZE);
        assert!(text_width(&fitted) * CELL_SIZE * MM_PER_POINT <= VALUE_TEXT_WIDTH);
    }

    #[test]
    fn short_values_are_left_alone() {
        assert!(matches!(
            fit_to_width("Team Acme", VALUE_TEXT_WIDTH, CELL_SIZE),
            Cow::Borrowed("Team Acme")
        ));
        assert_eq!(fit_to_width("", VALUE_TEXT_WIDTH, CELL_SIZE), "");
    }

    #[test]
    fn renders_records_with_overlong_values() {
        let record = PlayerRecord::new(
            PlayerId::Local(1),
            PlayerFields::new("Ann".repeat(80), "Team Acme", "Position aann"),
        );
        let bytes = render_player_pdf(&record).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
