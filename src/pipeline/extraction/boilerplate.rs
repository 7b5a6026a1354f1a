//! Boilerplate tables for the OCR cleaner.
//!
//! A [`CleaningProfile`] is an ordered list of named patterns, each removed
//! independently across the whole text (case-insensitive, `.` spans lines),
//! plus the heading marker the cleaner turns back into paragraph breaks.
//!
//! Patterns run after the de-spacing passes, so the built-in gazette table
//! uses `\s*` wherever the OCR may have glued or split words. Heading rules
//! only match right after the heading marker and leave the marker in place.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Heading marker emitted by the markdown converter.
pub const DEFAULT_HEADING_MARKER: &str = "##";

/// How a table entry is written.
#[derive(Debug, Clone, Copy)]
enum Source {
    /// Raw regular expression.
    Regex(&'static str),
    /// Literal phrase; every character may be separated by whitespace.
    Spaced(&'static str),
    /// Raw regular expression matched only as a section heading.
    Heading(&'static str),
}

/// Masthead, footer and index blocks of the "Gaceta del Congreso" series.
const GAZETTE_BOILERPLATE: &[(&str, Source)] = &[
    (
        "volume_banner",
        Source::Regex(r"(?-i:AÑO\s*[IVXLCDM]+\s*-\s*N[º°o])\.?\s*\d+"),
    ),
    ("directors_label", Source::Regex(r"\bDIRECTOR(?:ES)?\s*:")),
    ("country_banner", Source::Regex(r"REP[ÚU]BLICA\s*DE\s*COLOMBIA")),
    (
        "series_banner",
        Source::Regex(r"G\s*a\s*c\s*e\s*t\s*a\s*d\s*e\s*l\s*C\s*o\s*n\s*g(?:\s*r\s*e\s*s\s*o)?"),
    ),
    (
        "legal_citation_banner",
        Source::Regex(
            r"SENADO\s*Y\s*C[ÁA]MARA\s*\(\s*Art[íi]culo\s*36\s*,\s*Ley\s*5[ªa]\s*de\s*1992\s*\)",
        ),
    ),
    (
        "printer_banner",
        Source::Spaced("IMPRENTA NACIONAL DE COLOMBIA www.imprenta.gov.co"),
    ),
    (
        "dateline",
        Source::Regex(r"Bogot[áa]\s*,\s*D\.\s*C\.\s*,\s*.{0,80}?\s+de\s+\d{4}"),
    ),
    ("issn", Source::Regex(r"I\s*S\s*S\s*N[\s\d]*-[\s\d]*\d")),
    ("page_count_banner", Source::Regex(r"EDICI[ÓO]N\s*DE\s*\d+\s*P[ÁA]GINAS")),
    (
        "senate_secretary",
        Source::Regex(r"SECRETARIO\s*GENERAL\s*DEL\s*SENADO\s*www\.secretariasenado\.gov\.co"),
    ),
    (
        "chamber_secretary",
        Source::Regex(r"SECRETARIO\s*GENERAL\s*DE\s*LA\s*C[ÁA]MARA\s*www\.camara\.gov\.co"),
    ),
    (
        "legislative_branch_banner",
        Source::Regex(r"RAMA\s*LEGISLATIVA\s*DEL\s*PODER\s*P[ÚU]BLICO"),
    ),
    // Upper case heading only: the chamber name inside titles is content.
    (
        "chamber_name_banner",
        Source::Heading(
            r"(?-i:C\s*[ÁA]\s*M\s*A\s*R\s*A\s*D\s*E\s*R\s*E\s*P\s*R\s*E\s*S\s*E\s*N\s*T\s*A\s*N\s*T\s*E\s*S)",
        ),
    ),
    (
        "table_of_contents",
        Source::Regex(r"##\s*C\s*O\s*N\s*T\s*E\s*N\s*I\s*D\s*O\s*Gaceta\s*n[úu]mero\s*\d+\s*-.*"),
    ),
];

static GAZETTE_PROFILE: LazyLock<CleaningProfile> = LazyLock::new(|| {
    let mut profile = CleaningProfile::empty(DEFAULT_HEADING_MARKER);
    for (name, source) in GAZETTE_BOILERPLATE {
        let rule = match source {
            Source::Regex(pattern) => BoilerplateRule::regex(name, pattern),
            Source::Spaced(phrase) => BoilerplateRule::spaced(name, phrase),
            Source::Heading(pattern) => {
                BoilerplateRule::heading(name, pattern, DEFAULT_HEADING_MARKER)
            }
        };
        profile
            .rules
            .push(rule.expect("Invalid built-in boilerplate pattern"));
    }
    profile
});

/// One compiled boilerplate pattern.
#[derive(Debug, Clone)]
pub struct BoilerplateRule {
    name: String,
    regex: Regex,
    replacement: String,
}

impl BoilerplateRule {
    /// Compile a raw pattern (case-insensitive, `.` matches newlines).
    pub fn regex(name: &str, pattern: &str) -> Result<Self, ExtractionError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| ExtractionError::InvalidPattern {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            name: name.to_string(),
            regex,
            replacement: " ".to_string(),
        })
    }

    /// Compile a literal phrase that may appear letter-spaced or glued.
    pub fn spaced(name: &str, phrase: &str) -> Result<Self, ExtractionError> {
        Self::regex(name, &spaced_pattern(phrase))
    }

    /// Compile a pattern that only matches a heading opened by `marker`.
    /// The marker survives so the heading still becomes a paragraph break.
    pub fn heading(name: &str, pattern: &str, marker: &str) -> Result<Self, ExtractionError> {
        let anchored = format!(r"{}\s*(?:{pattern})", regex::escape(marker));
        Ok(Self::regex(name, &anchored)?.with_replacement(&format!("{marker} ")))
    }

    /// Text inserted in place of each match (a single space by default).
    pub fn with_replacement(mut self, replacement: &str) -> Self {
        self.replacement = replacement.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match with the rule's replacement.
    pub fn strip(&self, text: &str) -> String {
        self.regex
            .replace_all(text, regex::NoExpand(&self.replacement))
            .into_owned()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// `"ISSN"` → `I\s*S\s*S\s*N`; whitespace in the phrase becomes `\s*` too.
pub fn spaced_pattern(phrase: &str) -> String {
    phrase
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(r"\s*")
}

/// Ordered boilerplate table plus the heading marker for one document series.
#[derive(Debug, Clone)]
pub struct CleaningProfile {
    heading_marker: String,
    rules: Vec<BoilerplateRule>,
}

impl CleaningProfile {
    /// Built-in profile for the "Gaceta del Congreso" series.
    pub fn gazette() -> Self {
        GAZETTE_PROFILE.clone()
    }

    /// Profile with no boilerplate rules.
    pub fn empty(heading_marker: &str) -> Self {
        Self {
            heading_marker: heading_marker.to_string(),
            rules: Vec::new(),
        }
    }

    /// Append a raw-regex rule.
    pub fn with_regex(mut self, name: &str, pattern: &str) -> Result<Self, ExtractionError> {
        self.rules.push(BoilerplateRule::regex(name, pattern)?);
        Ok(self)
    }

    /// Append a letter-spacing-tolerant literal rule.
    pub fn with_spaced(mut self, name: &str, phrase: &str) -> Result<Self, ExtractionError> {
        self.rules.push(BoilerplateRule::spaced(name, phrase)?);
        Ok(self)
    }

    /// Append a rule that only matches as a heading.
    pub fn with_heading(mut self, name: &str, pattern: &str) -> Result<Self, ExtractionError> {
        let rule = BoilerplateRule::heading(name, pattern, &self.heading_marker)?;
        self.rules.push(rule);
        Ok(self)
    }

    /// Drop every rule with this name.
    pub fn without(mut self, name: &str) -> Self {
        self.rules.retain(|r| r.name != name);
        self
    }

    pub fn heading_marker(&self) -> &str {
        &self.heading_marker
    }

    pub fn rules(&self) -> &[BoilerplateRule] {
        &self.rules
    }

    /// Build a profile from its JSON description.
    pub fn from_json(json: &str) -> Result<Self, ExtractionError> {
        let file: ProfileFile = serde_json::from_str(json)
            .map_err(|e| ExtractionError::ProfileParse(e.to_string()))?;

        let marker = file
            .heading_marker
            .unwrap_or_else(|| DEFAULT_HEADING_MARKER.to_string());
        if marker.trim().is_empty() {
            return Err(ExtractionError::ProfileParse(
                "heading_marker must not be blank".into(),
            ));
        }

        file.boilerplate
            .iter()
            .try_fold(Self::empty(&marker), |mut profile, entry| {
                let rule = if entry.heading {
                    BoilerplateRule::heading(&entry.name, &entry.pattern, &marker)?
                } else if entry.spaced {
                    BoilerplateRule::spaced(&entry.name, &entry.pattern)?
                } else {
                    BoilerplateRule::regex(&entry.name, &entry.pattern)?
                };
                let rule = match &entry.replacement {
                    Some(replacement) => rule.with_replacement(replacement),
                    None => rule,
                };
                profile.rules.push(rule);
                Ok(profile)
            })
    }

    /// Load a profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ExtractionError> {
        let json = std::fs::read_to_string(path)?;
        let profile = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            rules = profile.rules.len(),
            "Cleaning profile loaded"
        );
        Ok(profile)
    }

    /// The JSON form of this profile (every rule as a raw regex).
    pub fn to_json(&self) -> Result<String, ExtractionError> {
        let file = ProfileFile {
            heading_marker: Some(self.heading_marker.clone()),
            boilerplate: self
                .rules
                .iter()
                .map(|r| BoilerplateEntry {
                    name: r.name.clone(),
                    pattern: r.as_str().to_string(),
                    spaced: false,
                    heading: false,
                    replacement: (r.replacement != " ").then(|| r.replacement.clone()),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| ExtractionError::ProfileParse(e.to_string()))
    }
}

impl Default for CleaningProfile {
    fn default() -> Self {
        Self::gazette()
    }
}

/// On-disk profile description.
#[derive(Debug, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    heading_marker: Option<String>,
    #[serde(default)]
    boilerplate: Vec<BoilerplateEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BoilerplateEntry {
    name: String,
    pattern: String,
    #[serde(default)]
    spaced: bool,
    #[serde(default)]
    heading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    replacement: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> BoilerplateRule {
        CleaningProfile::gazette()
            .rules()
            .iter()
            .find(|r| r.name() == name)
            .cloned()
            .unwrap_or_else(|| panic!("no rule named {name}"))
    }

    #[test]
    fn gazette_table_compiles_in_order() {
        let profile = CleaningProfile::gazette();
        let names: Vec<&str> = profile.rules().iter().map(|r| r.name()).collect();
        assert_eq!(names.len(), GAZETTE_BOILERPLATE.len());
        assert_eq!(names.first(), Some(&"volume_banner"));
        assert_eq!(names.last(), Some(&"table_of_contents"));
        assert_eq!(profile.heading_marker(), "##");
    }

    #[test]
    fn volume_banner_any_roman_numeral() {
        let r = rule("volume_banner");
        assert!(r.is_match("AÑO XXXIV - Nº 1540"));
        assert!(r.is_match("AÑO XXXV - Nº 12"));
        assert!(r.is_match("AÑO XXXIV - No. 1403"));
    }

    #[test]
    fn volume_banner_ignores_prose() {
        let r = rule("volume_banner");
        assert!(!r.is_match("en el año civil - no 5 se"));
        assert!(!r.is_match("año xxxiv - nº 7"));
    }

    #[test]
    fn directors_label_needs_colon() {
        let r = rule("directors_label");
        assert!(r.is_match("DIRECTORES:"));
        assert!(r.is_match("DIRECTOR :"));
        assert!(r.is_match("DIRECTOR:"));
        assert!(!r.is_match("el director de la imprenta"));
    }

    #[test]
    fn series_banner_tolerates_letter_spacing() {
        let r = rule("series_banner");
        assert!(r.is_match("Gaceta del Congreso"));
        assert!(r.is_match("Gacet ad e lC ong"));
        assert!(r.is_match("G a c e t a d e l C o n g"));
    }

    #[test]
    fn dateline_stops_at_year() {
        let r = rule("dateline");
        let out = r.strip("Bogotá, D. C., jueves, 14 de agosto de 2025 PROYECTO");
        assert_eq!(out.trim(), "PROYECTO");
    }

    #[test]
    fn issn_spaced_and_glued() {
        let r = rule("issn");
        assert!(r.is_match("I S S N  0 1 2 3  -  9 0 6 6"));
        assert!(r.is_match("ISS N0 123  -  9066"));
        assert!(r.is_match("ISSN 0123-9066"));
    }

    #[test]
    fn page_count_banner_glued() {
        let r = rule("page_count_banner");
        assert!(r.is_match("EDICIÓN  DE  16  PÁGINAS"));
        assert!(r.is_match("EDICIÓNDE23PÁGINAS"));
    }

    #[test]
    fn chamber_banner_is_upper_case_heading_only() {
        let r = rule("chamber_name_banner");
        assert!(r.is_match("## CÁMAR AD ER EPRESENTANTES"));
        assert!(!r.is_match("aprobado por la Cámara de Representantes"));
        assert!(!r.is_match("## Cámara de Representantes"));
        assert!(!r.is_match("NÚMERO 101 DE 2025 CÁMARA DE REPRESENTANTES por"));
    }

    #[test]
    fn heading_rule_keeps_marker() {
        let r = rule("chamber_name_banner");
        assert_eq!(
            r.strip("fin ## CÁMAR AD ER EPRESENTANTESPROYECTO"),
            "fin ## PROYECTO"
        );
    }

    #[test]
    fn table_of_contents_runs_to_end() {
        let r = rule("table_of_contents");
        let out = r.strip("Cuerpo. ## CONTENIDO Gaceta número 1403 - jueves\nPágs.\n1");
        assert_eq!(out.trim(), "Cuerpo.");
    }

    #[test]
    fn spaced_pattern_escapes_and_spaces() {
        assert_eq!(spaced_pattern("ISSN"), r"I\s*S\s*S\s*N");
        assert_eq!(spaced_pattern("a.b"), r"a\s*\.\s*b");
        assert_eq!(spaced_pattern("de la"), r"d\s*e\s*l\s*a");
    }

    #[test]
    fn builder_appends_and_removes() {
        let profile = CleaningProfile::empty("##")
            .with_regex("footer", r"P[áa]gina\s*\d+")
            .unwrap()
            .with_spaced("banner", "BOLETÍN OFICIAL")
            .unwrap();
        assert_eq!(profile.rules().len(), 2);
        assert!(profile.rules()[1].is_match("B O L E T Í N  O F I C I A L"));

        let profile = profile.without("footer");
        assert_eq!(profile.rules().len(), 1);
        assert_eq!(profile.rules()[0].name(), "banner");
    }

    #[test]
    fn invalid_pattern_is_reported_with_name() {
        let result = CleaningProfile::empty("##").with_regex("broken", r"(unclosed");
        match result {
            Err(ExtractionError::InvalidPattern { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn profile_from_json() {
        let json = r##"{
            "heading_marker": "#",
            "boilerplate": [
                { "name": "banner", "pattern": "BOLETÍN", "spaced": true },
                { "name": "footer", "pattern": "Página\\s+\\d+" },
                { "name": "seccion", "pattern": "ANEXOS", "heading": true }
            ]
        }"##;
        let profile = CleaningProfile::from_json(json).unwrap();
        assert_eq!(profile.heading_marker(), "#");
        assert_eq!(profile.rules().len(), 3);
        assert!(profile.rules()[0].is_match("B O L E T Í N"));
        assert!(profile.rules()[1].is_match("página 3"));
        assert!(profile.rules()[2].is_match("# ANEXOS"));
        assert!(!profile.rules()[2].is_match("los ANEXOS"));
        assert_eq!(profile.rules()[2].replacement(), "# ");
    }

    #[test]
    fn profile_json_defaults_marker() {
        let profile = CleaningProfile::from_json(r#"{ "boilerplate": [] }"#).unwrap();
        assert_eq!(profile.heading_marker(), DEFAULT_HEADING_MARKER);
        assert!(profile.rules().is_empty());
    }

    #[test]
    fn profile_json_rejects_blank_marker() {
        let result = CleaningProfile::from_json(r#"{ "heading_marker": "  " }"#);
        assert!(matches!(result, Err(ExtractionError::ProfileParse(_))));
    }

    #[test]
    fn profile_json_rejects_bad_pattern() {
        let json = r#"{ "boilerplate": [ { "name": "x", "pattern": "[" } ] }"#;
        assert!(matches!(
            CleaningProfile::from_json(json),
            Err(ExtractionError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn gazette_profile_survives_json_export() {
        let json = CleaningProfile::gazette().to_json().unwrap();
        let reloaded = CleaningProfile::from_json(&json).unwrap();
        assert_eq!(reloaded.rules().len(), CleaningProfile::gazette().rules().len());
        assert!(reloaded.rules().iter().any(|r| r.name() == "issn"));

        let chamber = reloaded
            .rules()
            .iter()
            .find(|r| r.name() == "chamber_name_banner")
            .unwrap();
        assert_eq!(chamber.replacement(), "## ");
        assert_eq!(chamber.strip("## CÁMARADEREPRESENTANTES"), "## ");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perfil.json");
        std::fs::write(&path, r#"{ "boilerplate": [ { "name": "a", "pattern": "x" } ] }"#)
            .unwrap();
        let profile = CleaningProfile::load(&path).unwrap();
        assert_eq!(profile.rules().len(), 1);

        assert!(CleaningProfile::load(&dir.path().join("missing.json")).is_err());
    }
}
