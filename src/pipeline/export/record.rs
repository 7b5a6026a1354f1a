use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ExportError;
use crate::pipeline::import::GazetteIdentity;

/// One exported gazette: identity fields plus the full text.
///
/// Serialized as `{ "id", "corporacion", "numeroGaceta", "año",
/// "texto_completo" }`, the interchange shape read by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteRecord {
    #[serde(flatten)]
    pub identity: GazetteIdentity,
    #[serde(rename = "texto_completo")]
    pub full_text: String,
}

impl GazetteRecord {
    pub fn new(identity: GazetteIdentity, full_text: String) -> Self {
        Self {
            identity,
            full_text,
        }
    }

    /// Document id used by the search index: `<corporation>_<number>_<year>_<id>`.
    pub fn document_key(&self) -> String {
        let i = &self.identity;
        format!("{}_{}_{}_{}", i.corporation, i.gazette_number, i.year, i.id)
    }
}

/// `<stem>.json` for a source document.
pub fn record_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("documento");
    format!("{stem}.json")
}

/// Write one record as pretty-printed UTF-8 JSON (non-ASCII kept verbatim).
/// Returns the path written.
pub fn write_record(
    output_dir: &Path,
    file_name: &str,
    record: &GazetteRecord,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Read a record written by [`write_record`].
pub fn read_record(path: &Path) -> Result<GazetteRecord, ExportError> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| ExportError::InvalidRecord {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
