//! # LMN Export
//!
//! Turns a [`RenderedLetter`] into a paginated US Letter PDF and writes it to disk under the
//! fixed name [`EXPORT_FILENAME`].
//!
//! Export is a no-op when there is nothing rendered yet: [`export_letter`] takes the rendered
//! letter as an `Option` and returns `Ok(None)` for `None`.

mod layout;
mod pdf;

pub use layout::{layout_pages, PlacedLine, TextStyle};

use lmn_core::RenderedLetter;
use std::path::{Path, PathBuf};

/// File name given to every exported letter.
pub const EXPORT_FILENAME: &str = "medical_necessity_letter.pdf";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to load PDF font: {0}")]
    Font(String),
    #[error("failed to write PDF document: {0}")]
    Render(String),
    #[error("failed to create export directory: {0}")]
    ExportDirCreation(std::io::Error),
    #[error("failed to write export file: {0}")]
    FileWrite(std::io::Error),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// A finished export, ready to be saved or streamed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: &'static str,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl ExportedDocument {
    /// Writes the document into `dir`, creating it if needed, and returns the file path.
    pub fn save_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(ExportError::ExportDirCreation)?;
        let path = dir.join(self.filename);
        std::fs::write(&path, &self.bytes).map_err(ExportError::FileWrite)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "letter exported");
        Ok(path)
    }
}

/// Exports a rendered letter as PDF. `None` means the letter has not been rendered and
/// yields `Ok(None)`.
pub fn export_letter(letter: Option<&RenderedLetter>) -> ExportResult<Option<ExportedDocument>> {
    let Some(letter) = letter else {
        tracing::debug!("export skipped: no rendered letter");
        return Ok(None);
    };
    let pages = layout_pages(letter);
    let bytes = pdf::write_pdf(&letter.title, &pages)?;
    Ok(Some(ExportedDocument {
        filename: EXPORT_FILENAME,
        bytes,
        page_count: pages.len(),
    }))
}
