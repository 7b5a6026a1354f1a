//! OCR artifact cleaner for gazette text.
//!
//! The markdown a converter produces from a scanned gazette carries image
//! placeholders, letter-spaced banners ("A Ñ O", "I S S N"), words torn
//! apart by column gaps and a masthead repeated on every page. The cleaner
//! removes all of that in a fixed order and keeps section headings as
//! paragraph breaks.
//!
//! Pure text in, text out: no I/O, no state between calls.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::boilerplate::CleaningProfile;
use super::ExtractionError;

/// Image placeholders and HTML comments left by the converter. Replaced by a
/// line break so the gap left behind is not read as a split word.
static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<img\b[^>]*>").expect("Invalid markup regex")
});

/// Two word characters separated by a horizontal gap of two or more.
/// Line breaks are left alone so paragraphs are never glued together.
static WIDE_GAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w)[^\S\r\n]{2,}(\w)").expect("Invalid wide gap regex")
});

/// Three or more single letters or digits separated by single spaces.
static LETTER_SPACED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[\p{L}\p{N}](?: [\p{L}\p{N}]){2,}\b").expect("Invalid letter run regex")
});

/// Four isolated capitals or digits in a row.
static ISOLATED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([\p{Lu}\p{N}])[^\S\r\n]([\p{Lu}\p{N}])[^\S\r\n]([\p{Lu}\p{N}])[^\S\r\n]([\p{Lu}\p{N}])\b",
    )
    .expect("Invalid isolated quad regex")
});

/// Two isolated capitals or digits in a row.
static ISOLATED_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([\p{Lu}\p{N}])[^\S\r\n]([\p{Lu}\p{N}])\b").expect("Invalid isolated pair regex")
});

/// Words that link numbers in citations ("numerales 1 y 2", "1 a 5").
const NUMBER_LINKS: [&str; 4] = ["y", "o", "e", "a"];

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// The cleaning passes, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningRule {
    Markup,
    WideGaps,
    LetterSpacedRuns,
    IsolatedCapitals,
    Boilerplate,
    Whitespace,
    Headings,
}

impl CleaningRule {
    pub const ORDER: [CleaningRule; 7] = [
        Self::Markup,
        Self::WideGaps,
        Self::LetterSpacedRuns,
        Self::IsolatedCapitals,
        Self::Boilerplate,
        Self::Whitespace,
        Self::Headings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::WideGaps => "wide_gaps",
            Self::LetterSpacedRuns => "letter_spaced_runs",
            Self::IsolatedCapitals => "isolated_capitals",
            Self::Boilerplate => "boilerplate",
            Self::Whitespace => "whitespace",
            Self::Headings => "headings",
        }
    }
}

/// Removes OCR artifacts and series boilerplate from converted gazette text.
#[derive(Debug, Clone)]
pub struct OcrArtifactCleaner {
    profile: CleaningProfile,
    heading: Regex,
}

impl OcrArtifactCleaner {
    pub fn new(profile: CleaningProfile) -> Result<Self, ExtractionError> {
        let marker = regex::escape(profile.heading_marker());
        let heading = Regex::new(&format!(r"(?:\s*{marker})+\s*")).map_err(|e| {
            ExtractionError::InvalidPattern {
                name: "heading_marker".into(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self { profile, heading })
    }

    pub fn profile(&self) -> &CleaningProfile {
        &self.profile
    }

    /// Run every rule in [`CleaningRule::ORDER`].
    ///
    /// The output has single spaces between words, no leading or trailing
    /// whitespace, and `\n\n` where section headings were. Markup is
    /// replaced by a line break rather than a space, so the gap closer never
    /// joins the words around a removed tag. Consecutive heading markers
    /// yield one break and breaks at either end are trimmed
    /// (`"## ## Texto"` gives `"Texto"`).
    ///
    /// It is not meant to be cleaned a second time: the restored paragraph
    /// breaks would be collapsed again.
    pub fn clean(&self, raw: &str) -> String {
        let mut text = raw.to_string();
        for rule in CleaningRule::ORDER {
            let before = text.len();
            text = self.apply(rule, &text);
            tracing::debug!(
                rule = rule.as_str(),
                before,
                after = text.len(),
                "Cleaning rule applied"
            );
        }
        text
    }

    /// Run a single rule.
    pub fn apply(&self, rule: CleaningRule, text: &str) -> String {
        match rule {
            CleaningRule::Markup => MARKUP.replace_all(text, "\n").into_owned(),
            CleaningRule::WideGaps => close_wide_gaps(text),
            CleaningRule::LetterSpacedRuns => LETTER_SPACED_RUN
                .replace_all(text, |caps: &regex::Captures| join_letter_run(&caps[0]))
                .into_owned(),
            CleaningRule::IsolatedCapitals => {
                let text = ISOLATED_QUAD.replace_all(text, "${1}${2}${3}${4}");
                ISOLATED_PAIR.replace_all(&text, "${1}${2}").into_owned()
            }
            CleaningRule::Boilerplate => self
                .profile
                .rules()
                .iter()
                .fold(text.to_string(), |acc, rule| rule.strip(&acc)),
            CleaningRule::Whitespace => collapse_whitespace(text),
            CleaningRule::Headings => self
                .heading
                .replace_all(text, "\n\n")
                .trim()
                .to_string(),
        }
    }
}

impl Default for OcrArtifactCleaner {
    fn default() -> Self {
        Self::new(CleaningProfile::gazette()).expect("Invalid default heading marker")
    }
}

static DEFAULT_CLEANER: LazyLock<OcrArtifactCleaner> = LazyLock::new(OcrArtifactCleaner::default);

/// Clean gazette text with the built-in profile.
pub fn clean_gazette_text(raw: &str) -> String {
    DEFAULT_CLEANER.clean(raw)
}

/// Every run of whitespace becomes one space; ends are trimmed.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Remove the spaces of a letter-spaced run, unless the run lists numbers
/// ("1 y 2", "3 o 4 o 5").
fn join_letter_run(run: &str) -> String {
    let tokens: Vec<&str> = run.split(' ').collect();
    let lists_numbers = tokens.len() % 2 == 1
        && tokens.iter().enumerate().all(|(i, token)| {
            if i % 2 == 0 {
                token.chars().all(char::is_numeric)
            } else {
                NUMBER_LINKS.contains(token)
            }
        });
    if lists_numbers {
        run.to_string()
    } else {
        run.replace(' ', "")
    }
}

/// Repeat until no gap is left: each pass can expose a new one
/// ("a  b  c" needs two).
fn close_wide_gaps(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = match WIDE_GAP.replace_all(&current, "${1}${2}") {
            Cow::Borrowed(_) => break,
            Cow::Owned(next) => next,
        };
        current = next;
    }
    current
}
