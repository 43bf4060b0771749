//! Per-record document output: PDF download and system print.

mod pdf;
mod print;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ExportError;
use crate::models::PlayerRecord;

pub use pdf::{pdf_file_name, render_player_pdf};
pub use print::render_print_html;

/// Title shared by every exported document.
pub const DOCUMENT_TITLE: &str = "Player Details";

/// Side-effecting output for a single record. Implementations only read the
/// record they are given.
pub trait Exporter {
    /// Save the record as a PDF and return where it was written.
    fn download_pdf(&self, record: &PlayerRecord) -> Result<PathBuf, ExportError>;
    /// Hand a printable rendering of the record to the system and return the
    /// document that was opened.
    fn print(&self, record: &PlayerRecord) -> Result<PathBuf, ExportError>;
}

/// Writes PDFs into the export directory and prints through the default
/// browser.
#[derive(Debug, Clone)]
pub struct SystemExporter {
    export_dir: PathBuf,
    print_dir: PathBuf,
    logo_url: String,
}

impl SystemExporter {
    pub fn new(
        export_dir: impl Into<PathBuf>,
        print_dir: impl Into<PathBuf>,
        logo_url: impl Into<String>,
    ) -> Self {
        Self {
            export_dir: export_dir.into(),
            print_dir: print_dir.into(),
            logo_url: logo_url.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Write the PDF without touching anything else. Split out from
    /// [`Exporter::download_pdf`] so callers can export into any directory.
    pub fn write_pdf(dir: &Path, record: &PlayerRecord) -> Result<PathBuf, ExportError> {
        let bytes = render_player_pdf(record)?;
        fs::create_dir_all(dir).map_err(|err| ExportError::io(dir, err))?;
        let path = dir.join(pdf_file_name(&record.name));
        fs::write(&path, bytes).map_err(|err| ExportError::io(&path, err))?;
        Ok(path)
    }
}

impl Exporter for SystemExporter {
    fn download_pdf(&self, record: &PlayerRecord) -> Result<PathBuf, ExportError> {
        let path = Self::write_pdf(&self.export_dir, record)?;
        info!(id = %record.id, path = %path.display(), "exported player PDF");
        Ok(path)
    }

    fn print(&self, record: &PlayerRecord) -> Result<PathBuf, ExportError> {
        let path = print::write_print_document(&self.print_dir, record, &self.logo_url)?;
        open::that(&path).map_err(|source| ExportError::Open {
            path: path.clone(),
            source,
        })?;
        info!(id = %record.id, path = %path.display(), "sent player to print");
        Ok(path)
    }
}

/// Turn a player name into something safe to use as a file stem.
pub(crate) fn file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect();

    // A stem of only dots would resolve to the directory itself or its parent.
    if cleaned.is_empty() || cleaned.chars().all(|ch| ch == '.') {
        "player".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerFields, PlayerId};

    #[test]
    fn stems_strip_path_and_reserved_characters() {
        assert_eq!(file_stem("Leanne Graham"), "Leanne Graham");
        assert_eq!(file_stem("../etc/passwd"), ".._etc_passwd");
        assert_eq!(file_stem("a:b*c?"), "a_b_c_");
        assert_eq!(file_stem("tab\there"), "tab_here");
        assert_eq!(file_stem("   "), "player");
        assert_eq!(file_stem(".."), "player");
    }

    #[test]
    fn write_pdf_creates_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("downloads");
        let record = PlayerRecord::new(
            PlayerId::Local(1),
            PlayerFields::new("Ann/Lee", "Team Acme", "Position aann"),
        );

        let path = SystemExporter::write_pdf(&target, &record).unwrap();
        assert_eq!(path, target.join("Ann_Lee.pdf"));
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn unwritable_target_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();
        let record = PlayerRecord::new(PlayerId::Local(1), PlayerFields::new("Ann", "T", "P"));

        let err = SystemExporter::write_pdf(&blocker, &record).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
