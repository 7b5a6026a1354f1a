pub mod boilerplate;
pub mod chain;
pub mod cleaning;
pub mod pdfium;
pub mod sanitize;
pub mod text_only;
pub mod types;

pub use boilerplate::*;
pub use chain::*;
pub use cleaning::*;
pub use pdfium::PdfiumTextConverter;
pub use sanitize::*;
pub use text_only::*;
pub use types::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("PDFium library unavailable: {0}")]
    PdfLibrary(String),

    #[error("PDF could not be opened: {0}")]
    PdfLoad(String),

    #[error("PDF is password protected")]
    PdfEncrypted,

    #[error("PDF has no text layer (scanned image?): {0}")]
    NoTextLayer(PathBuf),

    #[error("No converted text found next to: {0}")]
    NoSidecar(PathBuf),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid cleaning pattern '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("Invalid cleaning profile: {0}")]
    ProfileParse(String),

    #[error("No converter could read {path}: {}", reasons.join("; "))]
    AllConvertersFailed { path: PathBuf, reasons: Vec<String> },
}
