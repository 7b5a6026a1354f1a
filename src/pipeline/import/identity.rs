//! Gazette identity from filenames.
//!
//! The downloader names every file `<id>_<corporation>_Gaceta<number>_<year>.pdf`
//! (see [`super::naming`]). Parsing is all-or-nothing: a stem either yields all
//! four fields verbatim or no record at all. A no-match is an expected outcome
//! for stray files, so it is modelled as `None`, never as an error.
//!
//! Known limitation: the corporation token cannot contain `_`. Names such as
//! `001_Camara_de_Representantes_Gaceta12_2025.pdf` do not match.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use super::ImportError;

/// Anchored pattern for the default naming scheme.
pub const DEFAULT_FILENAME_PATTERN: &str =
    r"^(?P<id>\d+)_(?P<corporation>[^_]+)_Gaceta(?P<number>\d+)_(?P<year>\d{4})$";

/// Capture groups every filename pattern must expose.
const REQUIRED_GROUPS: [&str; 4] = ["id", "corporation", "number", "year"];

static DEFAULT_PARSER: LazyLock<IdentityParser> = LazyLock::new(|| IdentityParser {
    regex: Regex::new(DEFAULT_FILENAME_PATTERN).expect("Invalid default filename pattern"),
});

/// Identity fields carried by a gazette filename.
///
/// Numeric fields stay strings so leading zeros survive (`"001"` is not `1`).
/// Serialized with the interchange keys used by the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteIdentity {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "corporacion")]
    pub corporation: String,
    #[serde(rename = "numeroGaceta", deserialize_with = "string_or_number")]
    pub gazette_number: String,
    #[serde(rename = "año", deserialize_with = "string_or_number")]
    pub year: String,
}

/// Accepts `"1540"` or `1540`: hand-written records sometimes store numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Parses gazette identities out of filenames with a fixed, anchored pattern.
#[derive(Debug, Clone)]
pub struct IdentityParser {
    regex: Regex,
}

impl IdentityParser {
    /// Parser for a different naming scheme.
    ///
    /// The pattern must define the named groups `id`, `corporation`, `number`
    /// and `year`; anchoring is the caller's responsibility.
    pub fn with_pattern(pattern: &str) -> Result<Self, ImportError> {
        let regex =
            Regex::new(pattern).map_err(|e| ImportError::InvalidPattern(e.to_string()))?;

        let names: Vec<&str> = regex.capture_names().flatten().collect();
        if let Some(missing) = REQUIRED_GROUPS.iter().find(|g| !names.contains(*g)) {
            return Err(ImportError::MissingCaptureGroup((*missing).to_string()));
        }

        Ok(Self { regex })
    }

    /// Parse a filename (with or without extension, with or without directories).
    ///
    /// Returns `None` when the stem does not match the pattern exactly.
    pub fn parse(&self, filename: &str) -> Option<GazetteIdentity> {
        let stem = Path::new(filename).file_stem()?.to_str()?;
        let caps = self.regex.captures(stem)?;

        let field = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
        let identity = GazetteIdentity {
            id: field("id")?,
            corporation: field("corporation")?,
            gazette_number: field("number")?,
            year: field("year")?,
        };

        // A custom pattern with optional groups could capture empty strings.
        let complete = !identity.id.is_empty()
            && !identity.corporation.is_empty()
            && !identity.gazette_number.is_empty()
            && !identity.year.is_empty();
        complete.then_some(identity)
    }
}

impl Default for IdentityParser {
    fn default() -> Self {
        DEFAULT_PARSER.clone()
    }
}

/// Parse with the default naming scheme.
pub fn parse_gazette_filename(filename: &str) -> Option<GazetteIdentity> {
    DEFAULT_PARSER.parse(filename)
}
