use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Text obtained for one source document, before cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedDocument {
    pub source: PathBuf,
    pub method: ConversionMethod,
    pub page_count: usize,
    pub text: String,
}

/// How the text was obtained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConversionMethod {
    /// The input itself was markdown or plain text.
    TextFile,
    /// Markdown/text produced by an external converter, stored next to the PDF.
    Sidecar,
    /// Native PDF text layer read through PDFium.
    PdfTextLayer,
}

impl ConversionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextFile => "text_file",
            Self::Sidecar => "sidecar",
            Self::PdfTextLayer => "pdf_text_layer",
        }
    }
}

/// Turns a source document into raw text (allows mocking for tests).
pub trait DocumentConverter {
    fn name(&self) -> &'static str;

    fn convert(&self, path: &Path) -> Result<ConvertedDocument, ExtractionError>;
}

// ── Mock for testing ──────────────────────────────────────

/// Converter returning fixed text for every path, or failing for names
/// listed in `failing`.
pub struct MockConverter {
    text: String,
    failing: Vec<String>,
}

impl MockConverter {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            failing: Vec::new(),
        }
    }

    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.failing.push(file_name.to_string());
        self
    }
}

impl DocumentConverter for MockConverter {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn convert(&self, path: &Path) -> Result<ConvertedDocument, ExtractionError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if self.failing.iter().any(|f| f == file_name) {
            return Err(ExtractionError::NoTextLayer(path.to_path_buf()));
        }
        Ok(ConvertedDocument {
            source: path.to_path_buf(),
            method: ConversionMethod::TextFile,
            page_count: 1,
            text: self.text.clone(),
        })
    }
}
