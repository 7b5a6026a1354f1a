use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ExportError;
use crate::config::SUMMARY_FILE_NAME;
use crate::pipeline::import::GazetteIdentity;

/// Message recorded for files whose name does not follow the naming contract.
pub const BAD_NAME_MESSAGE: &str = "Formato de nombre incorrecto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    #[serde(rename = "exitoso")]
    Success,
    #[serde(rename = "error")]
    Error,
}

/// Per-file line of the batch summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    #[serde(rename = "archivo")]
    pub file_name: String,
    #[serde(rename = "estado")]
    pub status: FileStatus,
    #[serde(rename = "json_generado", default, skip_serializing_if = "Option::is_none")]
    pub json_file: Option<String>,
    #[serde(rename = "mensaje", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub identity: Option<GazetteIdentity>,
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    #[serde(rename = "total_archivos")]
    pub total_files: usize,
    #[serde(rename = "exitosos")]
    pub succeeded: usize,
    #[serde(rename = "con_errores")]
    pub failed: usize,
    #[serde(rename = "carpeta_origen")]
    pub source_dir: String,
    #[serde(rename = "carpeta_destino")]
    pub output_dir: String,
    #[serde(rename = "detalles")]
    pub details: Vec<FileReport>,
}

impl BatchSummary {
    pub fn new(source_dir: &Path, output_dir: &Path) -> Self {
        Self {
            total_files: 0,
            succeeded: 0,
            failed: 0,
            source_dir: source_dir.display().to_string(),
            output_dir: output_dir.display().to_string(),
            details: Vec::new(),
        }
    }

    pub fn record_success(&mut self, file_name: &str, json_file: &str, identity: GazetteIdentity) {
        self.total_files += 1;
        self.succeeded += 1;
        self.details.push(FileReport {
            file_name: file_name.to_string(),
            status: FileStatus::Success,
            json_file: Some(json_file.to_string()),
            message: None,
            identity: Some(identity),
        });
    }

    pub fn record_failure(&mut self, file_name: &str, message: &str) {
        self.total_files += 1;
        self.failed += 1;
        self.details.push(FileReport {
            file_name: file_name.to_string(),
            status: FileStatus::Error,
            json_file: None,
            message: Some(message.to_string()),
            identity: None,
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Write as [`SUMMARY_FILE_NAME`] in `output_dir`.
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(SUMMARY_FILE_NAME);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<Self, ExportError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Whether a JSON file in an output folder is the batch summary, not a record.
pub fn is_summary_file(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()) == Some(SUMMARY_FILE_NAME)
}
