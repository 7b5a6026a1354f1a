use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ImportError;

/// Input kinds the batch accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentKind {
    /// Original gazette scan or digital PDF.
    Pdf,
    /// Markdown already produced by an external converter.
    Markdown,
    PlainText,
}

impl DocumentKind {
    /// Detect from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "md" | "markdown" => Some(Self::Markdown),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Markdown => "markdown",
            Self::PlainText => "plain_text",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Markdown | Self::PlainText)
    }
}

/// List the documents of one input folder (non-recursive), sorted by name.
///
/// A text file sharing its stem with a PDF is that PDF's converted sidecar,
/// not a document of its own, so it is left out.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    if !dir.is_dir() {
        return Err(ImportError::InputNotFound(dir.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(kind) = DocumentKind::from_path(&path) {
            candidates.push((path, kind));
        }
    }

    let pdf_stems: HashSet<String> = candidates
        .iter()
        .filter(|(_, kind)| *kind == DocumentKind::Pdf)
        .filter_map(|(path, _)| stem_of(path))
        .collect();

    let mut documents: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|(path, kind)| {
            !kind.is_text() || stem_of(path).map_or(true, |s| !pdf_stems.contains(&s))
        })
        .map(|(path, _)| path)
        .collect();

    documents.sort();
    Ok(documents)
}

fn stem_of(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// File name as shown in logs and summaries.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .unwrap_or_else(|| path.display().to_string())
}
