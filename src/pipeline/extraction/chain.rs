use std::path::Path;

use super::pdfium::PdfiumTextConverter;
use super::text_only::SidecarTextConverter;
use super::types::{ConvertedDocument, DocumentConverter};
use super::ExtractionError;

/// Tries each converter in order and returns the first success.
pub struct ChainConverter {
    converters: Vec<Box<dyn DocumentConverter + Send + Sync>>,
}

impl ChainConverter {
    pub fn new(converters: Vec<Box<dyn DocumentConverter + Send + Sync>>) -> Self {
        Self { converters }
    }

    /// Sidecar text first, then the PDF text layer.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(SidecarTextConverter),
            Box::new(PdfiumTextConverter),
        ])
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl DocumentConverter for ChainConverter {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn convert(&self, path: &Path) -> Result<ConvertedDocument, ExtractionError> {
        let mut reasons = Vec::with_capacity(self.converters.len());

        for converter in &self.converters {
            match converter.convert(path) {
                Ok(doc) => return Ok(doc),
                Err(e) => {
                    tracing::debug!(
                        converter = converter.name(),
                        source = %path.display(),
                        error = %e,
                        "Converter declined, trying next"
                    );
                    reasons.push(format!("{}: {e}", converter.name()));
                }
            }
        }

        Err(ExtractionError::AllConvertersFailed {
            path: path.to_path_buf(),
            reasons,
        })
    }
}
