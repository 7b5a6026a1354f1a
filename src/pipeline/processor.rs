//! Gazette batch orchestrator.
//!
//! Drives one folder (or one file) through the pipeline:
//! discover → identity from filename → convert → clean (optional) → export.
//!
//! Uses trait-based DI for the converter so the orchestrator stays testable
//! with mock implementations. A failure is scoped to its own file: it is
//! logged, recorded in the batch summary, and the batch moves on.

use std::path::{Path, PathBuf};

use crate::pipeline::export::{
    record_file_name, write_record, BatchSummary, ExportError, GazetteRecord, BAD_NAME_MESSAGE,
};
use crate::pipeline::extraction::{
    ChainConverter, CleaningProfile, ConversionMethod, DocumentConverter, ExtractionError,
    OcrArtifactCleaner,
};
use crate::pipeline::import::{discover_documents, display_name, IdentityParser, ImportError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Filename does not follow the gazette naming scheme: {0}")]
    UnrecognizedName(String),
}

impl ProcessingError {
    /// Text stored in the batch summary for a failed file.
    pub fn summary_message(&self) -> String {
        match self {
            Self::UnrecognizedName(_) => BAD_NAME_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One successfully exported document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub source: PathBuf,
    pub json_path: PathBuf,
    pub method: ConversionMethod,
    pub record: GazetteRecord,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct GazetteProcessor {
    converter: Box<dyn DocumentConverter + Send + Sync>,
    cleaner: Option<OcrArtifactCleaner>,
    parser: IdentityParser,
}

impl GazetteProcessor {
    /// Raw converter text is exported as-is until a cleaner is set.
    pub fn new(converter: Box<dyn DocumentConverter + Send + Sync>) -> Self {
        Self {
            converter,
            cleaner: None,
            parser: IdentityParser::default(),
        }
    }

    pub fn with_cleaner(mut self, cleaner: OcrArtifactCleaner) -> Self {
        self.cleaner = Some(cleaner);
        self
    }

    pub fn with_parser(mut self, parser: IdentityParser) -> Self {
        self.parser = parser;
        self
    }

    /// Identity, text and (optionally) cleaning for one file, without writing.
    ///
    /// The name is checked first so badly named files never reach the
    /// converter.
    pub fn build_record(
        &self,
        path: &Path,
    ) -> Result<(GazetteRecord, ConversionMethod), ProcessingError> {
        let name = display_name(path);
        let identity = self
            .parser
            .parse(&name)
            .ok_or_else(|| ProcessingError::UnrecognizedName(name.clone()))?;

        let converted = self.converter.convert(path)?;
        let text = match &self.cleaner {
            Some(cleaner) => cleaner.clean(&converted.text),
            None => converted.text,
        };

        tracing::info!(
            file = %name,
            id = %identity.id,
            corporation = %identity.corporation,
            gazette = %identity.gazette_number,
            year = %identity.year,
            method = converted.method.as_str(),
            text_length = text.len(),
            "Gazette converted"
        );

        Ok((GazetteRecord::new(identity, text), converted.method))
    }

    /// Build and write `<stem>.json` in `output_dir`.
    pub fn process_file(
        &self,
        path: &Path,
        output_dir: &Path,
    ) -> Result<ProcessedDocument, ProcessingError> {
        let (record, method) = self.build_record(path)?;
        let json_path = write_record(output_dir, &record_file_name(path), &record)?;

        Ok(ProcessedDocument {
            source: path.to_path_buf(),
            json_path,
            method,
            record,
        })
    }

    /// Process every document in `input_dir` and write the batch summary.
    ///
    /// Records go to `output_dir`, or next to the inputs when `None`.
    /// `Err` only for setup failures (missing input folder, summary not
    /// writable); per-file failures are in the returned summary.
    pub fn process_folder(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
    ) -> Result<BatchSummary, ProcessingError> {
        let output_dir = output_dir.unwrap_or(input_dir);
        let documents = discover_documents(input_dir)?;
        std::fs::create_dir_all(output_dir).map_err(ExportError::from)?;

        tracing::info!(
            input = %input_dir.display(),
            output = %output_dir.display(),
            files = documents.len(),
            "Batch started"
        );

        let mut summary = BatchSummary::new(input_dir, output_dir);
        let total = documents.len();

        for (idx, path) in documents.iter().enumerate() {
            let name = display_name(path);
            tracing::debug!(file = %name, position = idx + 1, total, "Processing");

            match self.process_file(path, output_dir) {
                Ok(done) => {
                    summary.record_success(
                        &name,
                        &display_name(&done.json_path),
                        done.record.identity,
                    );
                }
                Err(e @ ProcessingError::UnrecognizedName(_)) => {
                    tracing::warn!(file = %name, "Skipping file: {e}");
                    summary.record_failure(&name, &e.summary_message());
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "Gazette failed");
                    summary.record_failure(&name, &e.summary_message());
                }
            }
        }

        let summary_path = summary.write(output_dir)?;
        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            total = summary.total_files,
            summary = %summary_path.display(),
            "Batch complete"
        );

        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build a `GazetteProcessor` with production implementations.
///
/// - Converter: sidecar text, then the PDF text layer (`ChainConverter::standard`)
/// - Cleaner: only when `clean` is set; `profile` overrides the built-in table
pub fn build_processor(
    clean: bool,
    profile: Option<&Path>,
) -> Result<GazetteProcessor, ProcessingError> {
    let processor = GazetteProcessor::new(Box::new(ChainConverter::standard()));
    if !clean {
        return Ok(processor);
    }

    let profile = match profile {
        Some(path) => CleaningProfile::load(path)?,
        None => CleaningProfile::gazette(),
    };
    Ok(processor.with_cleaner(OcrArtifactCleaner::new(profile)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SUMMARY_FILE_NAME;
    use crate::pipeline::export::{read_record, FileStatus};
    use crate::pipeline::extraction::MockConverter;

    const RAW: &str = "## REPÚBLICA   DE   COLOMBIA\n\n## PROYECTO DE LEY\n\nA Ñ O de la ley";

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "x").unwrap();
        path
    }

    fn processor() -> GazetteProcessor {
        GazetteProcessor::new(Box::new(MockConverter::new(RAW)))
    }

    #[test]
    fn record_from_well_named_file() {
        let (record, method) = processor()
            .build_record(Path::new("/in/001_Camara_Gaceta1405_2025.pdf"))
            .unwrap();
        assert_eq!(record.identity.id, "001");
        assert_eq!(record.identity.gazette_number, "1405");
        assert_eq!(record.full_text, RAW);
        assert_eq!(method, ConversionMethod::TextFile);
    }

    #[test]
    fn bad_name_is_rejected_before_conversion() {
        let p = GazetteProcessor::new(Box::new(MockConverter::new(RAW).failing_on("badname.pdf")));
        let err = p.build_record(Path::new("badname.pdf")).unwrap_err();
        assert!(matches!(err, ProcessingError::UnrecognizedName(_)));
        assert_eq!(err.summary_message(), "Formato de nombre incorrecto");
    }

    #[test]
    fn cleaner_is_applied_when_set() {
        let p = processor().with_cleaner(OcrArtifactCleaner::default());
        let (record, _) = p
            .build_record(Path::new("001_Camara_Gaceta1405_2025.pdf"))
            .unwrap();
        assert_eq!(record.full_text, "PROYECTO DE LEY AÑO de la ley");
    }

    #[test]
    fn custom_parser_is_used() {
        let parser = IdentityParser::with_pattern(
            r"^(?P<id>\d+)-(?P<corporation>\w+)-(?P<number>\d+)-(?P<year>\d{4})$",
        )
        .unwrap();
        let p = processor().with_parser(parser);
        assert!(p.build_record(Path::new("7-Senado-12-2024.md")).is_ok());
        assert!(p
            .build_record(Path::new("001_Camara_Gaceta1405_2025.pdf"))
            .is_err());
    }

    #[test]
    fn folder_batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("camara");
        let output = dir.path().join("camara_json");
        std::fs::create_dir(&input).unwrap();
        touch(&input, "001_Camara_Gaceta1405_2025.pdf");
        touch(&input, "002_Camara_Gaceta1540_2025.pdf");
        touch(&input, "003_Camara_Gaceta1600_2025.pdf");
        touch(&input, "badname.pdf");

        let p = GazetteProcessor::new(Box::new(
            MockConverter::new(RAW).failing_on("002_Camara_Gaceta1540_2025.pdf"),
        ));
        let summary = p.process_folder(&input, Some(&output)).unwrap();

        assert_eq!(summary.total_files, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);

        let by_name = |n: &str| summary.details.iter().find(|d| d.file_name == n).unwrap();
        assert_eq!(by_name("001_Camara_Gaceta1405_2025.pdf").status, FileStatus::Success);
        assert_eq!(
            by_name("001_Camara_Gaceta1405_2025.pdf").json_file.as_deref(),
            Some("001_Camara_Gaceta1405_2025.json")
        );
        assert_eq!(by_name("002_Camara_Gaceta1540_2025.pdf").status, FileStatus::Error);
        assert_eq!(
            by_name("badname.pdf").message.as_deref(),
            Some("Formato de nombre incorrecto")
        );

        assert!(output.join(SUMMARY_FILE_NAME).is_file());
        let record = read_record(&output.join("003_Camara_Gaceta1600_2025.json")).unwrap();
        assert_eq!(record.identity.gazette_number, "1600");
        assert!(!output.join("002_Camara_Gaceta1540_2025.json").exists());
    }

    #[test]
    fn output_defaults_to_input_folder() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "001_Senado_Gaceta10_2024.pdf");

        let summary = processor().process_folder(dir.path(), None).unwrap();
        assert_eq!(summary.succeeded, 1);
        assert!(dir.path().join("001_Senado_Gaceta10_2024.json").is_file());
        assert!(dir.path().join(SUMMARY_FILE_NAME).is_file());
    }

    #[test]
    fn second_run_ignores_its_own_output() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "001_Senado_Gaceta10_2024.pdf");

        processor().process_folder(dir.path(), None).unwrap();
        let summary = processor().process_folder(dir.path(), None).unwrap();
        assert_eq!(summary.total_files, 1);
    }

    #[test]
    fn missing_input_folder_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = processor().process_folder(&dir.path().join("senado"), None);
        assert!(matches!(
            result,
            Err(ProcessingError::Import(ImportError::InputNotFound(_)))
        ));
    }

    #[test]
    fn empty_folder_writes_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary = processor().process_folder(dir.path(), None).unwrap();
        assert_eq!(summary.total_files, 0);
        assert!(summary.is_clean());
    }

    #[test]
    fn factory_without_cleaning() {
        assert!(build_processor(false, None).unwrap().cleaner.is_none());
        assert!(build_processor(true, None).unwrap().cleaner.is_some());
    }

    #[test]
    fn factory_with_bad_profile_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perfil.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            build_processor(true, Some(&path)),
            Err(ProcessingError::Extraction(ExtractionError::ProfileParse(_)))
        ));
    }
}
