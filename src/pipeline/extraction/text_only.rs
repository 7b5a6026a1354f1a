//! Text-file converter: no PDF library required.
//!
//! Handles two cases:
//! - the input is already markdown or plain text;
//! - the input is a PDF and an external converter left `<stem>.md` (or
//!   `<stem>.txt`) next to it.
//!
//! Returns `ExtractionError::NoSidecar` for a PDF without converted text so a
//! [`super::ChainConverter`] can fall through to the PDF text layer.

use std::path::{Path, PathBuf};

use super::sanitize::strip_control_characters;
use super::types::{ConversionMethod, ConvertedDocument, DocumentConverter};
use super::ExtractionError;
use crate::pipeline::import::DocumentKind;

/// Sidecar extensions, in lookup order.
const SIDECAR_EXTENSIONS: &[&str] = &["md", "txt"];

pub struct SidecarTextConverter;

impl DocumentConverter for SidecarTextConverter {
    fn name(&self) -> &'static str {
        "sidecar_text"
    }

    fn convert(&self, path: &Path) -> Result<ConvertedDocument, ExtractionError> {
        let (text_path, method) = match DocumentKind::from_path(path) {
            Some(kind) if kind.is_text() => (path.to_path_buf(), ConversionMethod::TextFile),
            Some(DocumentKind::Pdf) => {
                let sidecar =
                    find_sidecar(path).ok_or_else(|| ExtractionError::NoSidecar(path.to_path_buf()))?;
                (sidecar, ConversionMethod::Sidecar)
            }
            _ => return Err(ExtractionError::UnsupportedFormat(path.to_path_buf())),
        };

        let bytes = std::fs::read(&text_path)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| ExtractionError::EncodingError(format!("{}: {e}", text_path.display())))?;
        let text = strip_control_characters(&text);

        tracing::debug!(
            source = %path.display(),
            text_file = %text_path.display(),
            method = method.as_str(),
            text_length = text.len(),
            "Text read"
        );

        Ok(ConvertedDocument {
            source: path.to_path_buf(),
            method,
            page_count: 1,
            text,
        })
    }
}

/// `<dir>/<stem>.md` or `<dir>/<stem>.txt`, whichever exists first.
pub fn find_sidecar(pdf_path: &Path) -> Option<PathBuf> {
    SIDECAR_EXTENSIONS
        .iter()
        .map(|ext| pdf_path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}
