//! PDF text-layer extraction via Google PDFium.
//!
//! Digital gazettes carry a text layer; scanned ones do not and need an
//! external OCR converter (see [`super::text_only`]). A PDF whose every page
//! is blank is reported as `NoTextLayer` rather than an empty document.
//!
//! `PdfiumTextConverter` is stateless (`Send + Sync`). Each conversion binds
//! a fresh `Pdfium` instance because the upstream type is `!Send`.

use std::path::Path;

use pdfium_render::prelude::*;
use tracing::debug;

use super::sanitize::strip_control_characters;
use super::types::{ConversionMethod, ConvertedDocument, DocumentConverter};
use super::ExtractionError;
use crate::pipeline::import::DocumentKind;

/// Joins page texts; the cleaner flattens it like any other whitespace.
const PAGE_SEPARATOR: &str = "\n\n";

pub struct PdfiumTextConverter;

impl PdfiumTextConverter {
    /// Create a converter, verifying the PDFium library is loadable.
    pub fn new() -> Result<Self, ExtractionError> {
        let _ = load_pdfium()?;
        Ok(Self)
    }
}

/// Load the PDFium dynamic library.
///
/// Discovery order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` env var (explicit path)
/// 2. Alongside the running executable, then `<exe_dir>/pdfium/lib`
/// 3. System library search paths
fn load_pdfium() -> Result<Pdfium, ExtractionError> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        debug!(path = %path, "Loading PDFium from env var");
        let bindings = Pdfium::bind_to_library(&path).map_err(|e| {
            ExtractionError::PdfLibrary(format!("Failed to load PDFium from {path}: {e}"))
        })?;
        return Ok(Pdfium::new(bindings));
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            let candidates = [exe_dir.to_path_buf(), exe_dir.join("pdfium").join("lib")];

            for dir in &candidates {
                let lib_path = Pdfium::pdfium_platform_library_name_at_path(
                    dir.to_string_lossy().as_ref(),
                );
                if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
                    debug!(dir = %dir.display(), "Loaded PDFium from candidate directory");
                    return Ok(Pdfium::new(bindings));
                }
            }
        }
    }

    let bindings = Pdfium::bind_to_system_library().map_err(|e| {
        ExtractionError::PdfLibrary(format!(
            "PDFium library not found. Set PDFIUM_DYNAMIC_LIB_PATH or install PDFium: {e}"
        ))
    })?;
    Ok(Pdfium::new(bindings))
}

/// Map PDF load errors, telling encrypted files apart.
fn map_load_error(e: PdfiumError) -> ExtractionError {
    let msg = e.to_string();
    let lower = msg.to_lowercase();
    if lower.contains("password") || lower.contains("encrypt") {
        ExtractionError::PdfEncrypted
    } else {
        ExtractionError::PdfLoad(msg)
    }
}

/// Page texts joined with a blank line; `None` when every page is blank.
fn join_pages(pages: &[String]) -> Option<String> {
    if pages.iter().all(|p| p.trim().is_empty()) {
        return None;
    }
    Some(pages.join(PAGE_SEPARATOR))
}

impl DocumentConverter for PdfiumTextConverter {
    fn name(&self) -> &'static str {
        "pdfium_text_layer"
    }

    fn convert(&self, path: &Path) -> Result<ConvertedDocument, ExtractionError> {
        if DocumentKind::from_path(path) != Some(DocumentKind::Pdf) {
            return Err(ExtractionError::UnsupportedFormat(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let pdfium = load_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(&bytes, None)
            .map_err(map_load_error)?;

        let pages: Vec<String> = document
            .pages()
            .iter()
            .map(|page| page.text().map(|t| t.all()).unwrap_or_default())
            .collect();

        let text =
            join_pages(&pages).ok_or_else(|| ExtractionError::NoTextLayer(path.to_path_buf()))?;
        let text = strip_control_characters(&text);

        debug!(
            source = %path.display(),
            pages = pages.len(),
            text_length = text.len(),
            "PDF text layer read"
        );

        Ok(ConvertedDocument {
            source: path.to_path_buf(),
            method: ConversionMethod::PdfTextLayer,
            page_count: pages.len(),
            text,
        })
    }
}
