use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use super::{file_stem, DOCUMENT_TITLE};
use crate::error::ExportError;
use crate::models::PlayerRecord;

const STYLE: &str = "body { font-family: Arial, sans-serif; padding: 20px; }\
h1 { color: #4caf50; }\
p { margin: 5px 0; }\
.logo { text-align: center; margin-bottom: 20px; }\
.logo img { max-width: 150px; }";

/// Build the printable page for one player. The page asks the browser for
/// the print dialog as soon as it has loaded.
pub fn render_print_html(record: &PlayerRecord, logo_url: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    let _ = write!(html, "<title>Print {DOCUMENT_TITLE}</title>");
    let _ = write!(html, "<style>{STYLE}</style>");
    html.push_str("</head><body onload=\"window.print()\">");
    let _ = write!(
        html,
        "<div class=\"logo\"><img src=\"{}\" alt=\"Logo\" /></div>",
        escape_html(logo_url)
    );
    let _ = write!(html, "<h1>{DOCUMENT_TITLE}</h1>");
    for (label, value) in record.labeled_values() {
        let _ = write!(
            html,
            "<p><strong>{label}:</strong> {}</p>",
            escape_html(value)
        );
    }
    html.push_str("</body></html>");
    html
}

/// Write the printable page into `dir` and return its path.
pub(super) fn write_print_document(
    dir: &Path,
    record: &PlayerRecord,
    logo_url: &str,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|err| ExportError::io(dir, err))?;
    let path = dir.join(format!(
        "player-roster-{}-{}.html",
        record.id,
        file_stem(&record.name)
    ));
    fs::write(&path, render_print_html(record, logo_url))
        .map_err(|err| ExportError::io(&path, err))?;
    Ok(path)
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            ch => escaped.push(ch),
        }
    }
    escaped
}
