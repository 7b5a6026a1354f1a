//! Naming contract shared with the gazette downloader.
//!
//! The downloader owns the browser session; what lives here is the pure part
//! of its bookkeeping: sequential ids, corporation classification, the final
//! filename, the year fallback and the "is this really a PDF" check. Files
//! named here are exactly the ones [`super::identity`] can parse back.

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Highest id before the sequence wraps back to `001`.
const MAX_SEQUENCE_ID: u16 = 999;

/// Files smaller than this cannot be a usable gazette PDF.
const MIN_PDF_BYTES: u64 = 100;

const PDF_MAGIC: &[u8] = b"%PDF-";

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(20\d{2}|19\d{2})").expect("Invalid year regex"));

/// Sequential three-digit ids (`001`..`999`), owned by the caller.
///
/// One sequence per download session; nothing is shared between sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u16,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Resume a session, e.g. after counting files already on disk.
    /// Values outside `1..=999` restart at `001`.
    pub fn starting_at(next: u16) -> Self {
        let next = if (1..=MAX_SEQUENCE_ID).contains(&next) { next } else { 1 };
        Self { next }
    }

    /// Hand out the next id and advance, wrapping after `999`.
    pub fn next_id(&mut self) -> String {
        if self.next > MAX_SEQUENCE_ID {
            self.next = 1;
        }
        let id = format!("{:03}", self.next);
        self.next += 1;
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Which chamber a listing row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Senado,
    Camara,
    Desconocida,
}

impl EntityType {
    /// Classify the free-text corporation label shown in the listing.
    pub fn classify(corporation_label: &str) -> Self {
        if corporation_label.contains("Senado") {
            Self::Senado
        } else if corporation_label.contains("Cámara") || corporation_label.contains("Camara") {
            Self::Camara
        } else {
            Self::Desconocida
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Senado => "Senado",
            Self::Camara => "Camara",
            Self::Desconocida => "Desconocida",
        }
    }

    /// Sub-folder of the download root, `None` for the root itself.
    pub fn folder_name(&self) -> Option<&'static str> {
        match self {
            Self::Senado => Some("Senado_de_la_Republica"),
            Self::Camara => Some("Camara_de_Representantes"),
            Self::Desconocida => None,
        }
    }
}

/// `<id>_<entity>_Gaceta<number>_<year>.pdf`
pub fn gazette_file_name(id: &str, entity: EntityType, number: &str, year: &str) -> String {
    format!("{id}_{}_Gaceta{number}_{year}.pdf", entity.as_str())
}

/// Name used when [`gazette_file_name`] already exists at the destination.
///
/// The timestamp suffix breaks the parse contract on purpose: duplicates
/// surface as skipped files instead of silently overwriting a record.
pub fn collision_file_name(
    id: &str,
    entity: EntityType,
    number: &str,
    year: &str,
    unix_timestamp: i64,
) -> String {
    format!(
        "{id}_{}_Gaceta{number}_{year}_{unix_timestamp}.pdf",
        entity.as_str()
    )
}

/// First `19xx`/`20xx` token in a listing cell, else the current year.
pub fn extract_year(text: &str) -> String {
    YEAR_PATTERN
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| chrono::Local::now().format("%Y").to_string())
}

/// Whether a downloaded file looks like a complete PDF.
pub fn is_valid_pdf(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() || metadata.len() < MIN_PDF_BYTES {
        return false;
    }

    let mut header = [0u8; 5];
    match std::fs::File::open(path).and_then(|mut f| f.read_exact(&mut header)) {
        Ok(()) => header == PDF_MAGIC,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::import::identity::parse_gazette_filename;

    #[test]
    fn sequence_is_zero_padded() {
        let mut seq = IdSequence::new();
        assert_eq!(seq.next_id(), "001");
        assert_eq!(seq.next_id(), "002");
        assert_eq!(seq.next_id(), "003");
    }

    #[test]
    fn sequence_wraps_after_999() {
        let mut seq = IdSequence::starting_at(998);
        assert_eq!(seq.next_id(), "998");
        assert_eq!(seq.next_id(), "999");
        assert_eq!(seq.next_id(), "001");
        assert_eq!(seq.next_id(), "002");
    }

    #[test]
    fn sequence_out_of_range_restarts() {
        assert_eq!(IdSequence::starting_at(0).next_id(), "001");
        assert_eq!(IdSequence::starting_at(1500).next_id(), "001");
    }

    #[test]
    fn independent_sequences_do_not_interfere() {
        let mut a = IdSequence::new();
        let mut b = IdSequence::new();
        a.next_id();
        a.next_id();
        assert_eq!(b.next_id(), "001");
        assert_eq!(a.next_id(), "003");
    }

    #[test]
    fn classifies_corporations() {
        assert_eq!(EntityType::classify("Senado de la República"), EntityType::Senado);
        assert_eq!(EntityType::classify("Cámara de Representantes"), EntityType::Camara);
        assert_eq!(EntityType::classify("Camara"), EntityType::Camara);
        assert_eq!(EntityType::classify("Congreso Pleno"), EntityType::Desconocida);
    }

    #[test]
    fn folder_per_entity() {
        assert_eq!(EntityType::Senado.folder_name(), Some("Senado_de_la_Republica"));
        assert_eq!(EntityType::Camara.folder_name(), Some("Camara_de_Representantes"));
        assert_eq!(EntityType::Desconocida.folder_name(), None);
    }

    #[test]
    fn generated_names_parse_back() {
        let mut seq = IdSequence::new();
        let name = gazette_file_name(&seq.next_id(), EntityType::Camara, "1405", "2025");
        assert_eq!(name, "001_Camara_Gaceta1405_2025.pdf");

        let identity = parse_gazette_filename(&name).unwrap();
        assert_eq!(identity.id, "001");
        assert_eq!(identity.corporation, "Camara");
        assert_eq!(identity.gazette_number, "1405");
        assert_eq!(identity.year, "2025");
    }

    #[test]
    fn collision_names_do_not_parse() {
        let name = collision_file_name("001", EntityType::Senado, "12", "2024", 1_724_760_000);
        assert_eq!(name, "001_Senado_Gaceta12_2024_1724760000.pdf");
        assert!(parse_gazette_filename(&name).is_none());
    }

    #[test]
    fn year_from_date_cell() {
        assert_eq!(extract_year("27/08/2025"), "2025");
        assert_eq!(extract_year("Publicada en 1998, reimpresa 2003"), "1998");
    }

    #[test]
    fn year_falls_back_to_current() {
        let current = chrono::Local::now().format("%Y").to_string();
        assert_eq!(extract_year("sin fecha"), current);
    }

    #[test]
    fn valid_pdf_detection() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("good.pdf");
        let mut body = b"%PDF-1.7\n".to_vec();
        body.resize(200, b' ');
        std::fs::write(&good, &body).unwrap();
        assert!(is_valid_pdf(&good));

        let tiny = dir.path().join("tiny.pdf");
        std::fs::write(&tiny, b"%PDF-1.7").unwrap();
        assert!(!is_valid_pdf(&tiny));

        let html = dir.path().join("error.pdf");
        std::fs::write(&html, "<html>".repeat(50)).unwrap();
        assert!(!is_valid_pdf(&html));

        assert!(!is_valid_pdf(&dir.path().join("missing.pdf")));
    }
}
