use std::path::{Path, PathBuf};

use super::IndexError;
use crate::pipeline::export::{is_summary_file, read_record, ExportError, GazetteRecord};

/// Records read from an export folder, plus the files that could not be read.
#[derive(Debug, Default)]
pub struct LoadedRecords {
    pub records: Vec<GazetteRecord>,
    pub skipped: Vec<(PathBuf, String)>,
}

/// Read every exported record (`*.json`, summary excluded) in `dir`, sorted
/// by file name. A malformed file is skipped and reported, not fatal.
pub fn load_records(dir: &Path) -> Result<LoadedRecords, IndexError> {
    if !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()).into());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(ExportError::from)? {
        let path = entry.map_err(ExportError::from)?.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if path.is_file() && is_json && !is_summary_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut loaded = LoadedRecords::default();
    for path in paths {
        match read_record(&path) {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable record");
                loaded.skipped.push((path, e.to_string()));
            }
        }
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::export::{write_record, BatchSummary};
    use crate::pipeline::import::parse_gazette_filename;

    #[test]
    fn loads_records_and_skips_summary() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["002_Camara_Gaceta1540_2025", "001_Camara_Gaceta1405_2025"] {
            let identity = parse_gazette_filename(name).unwrap();
            let record = GazetteRecord::new(identity, "texto".into());
            write_record(dir.path(), &format!("{name}.json"), &record).unwrap();
        }
        BatchSummary::new(dir.path(), dir.path())
            .write(dir.path())
            .unwrap();
        std::fs::write(dir.path().join("notas.txt"), "x").unwrap();

        let loaded = load_records(dir.path()).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].identity.id, "001");
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn malformed_record_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("roto.json"), "{").unwrap();

        let loaded = load_records(dir.path()).unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.skipped.len(), 1);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_records(&dir.path().join("json")).is_err());
    }
}
