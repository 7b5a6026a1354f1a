use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::IndexError;
use crate::pipeline::export::GazetteRecord;

/// Counts returned by one bulk load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub indexed: usize,
    pub failed: usize,
    /// One line per rejected document.
    pub errors: Vec<String>,
}

impl BulkOutcome {
    pub fn merge(&mut self, other: BulkOutcome) {
        self.indexed += other.indexed;
        self.failed += other.failed;
        self.errors.extend(other.errors);
    }
}

/// Persistence/search collaborator (allows mocking for tests).
///
/// Rejected documents are counted in the outcome, never returned as `Err`;
/// `Err` means the whole request failed.
pub trait DocumentIndex {
    fn index_bulk(&self, index: &str, records: &[GazetteRecord]) -> Result<BulkOutcome, IndexError>;

    fn refresh(&self, index: &str) -> Result<(), IndexError>;
}

// ── Mock for testing ──────────────────────────────────────

/// In-memory index that rejects records whose gazette number is listed.
#[derive(Default)]
pub struct MockIndex {
    stored: Mutex<Vec<(String, GazetteRecord)>>,
    reject_numbers: Vec<String>,
}

impl MockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(mut self, gazette_number: &str) -> Self {
        self.reject_numbers.push(gazette_number.to_string());
        self
    }

    pub fn stored(&self) -> Vec<(String, GazetteRecord)> {
        self.stored.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl DocumentIndex for MockIndex {
    fn index_bulk(&self, index: &str, records: &[GazetteRecord]) -> Result<BulkOutcome, IndexError> {
        let mut outcome = BulkOutcome::default();
        let mut stored = self
            .stored
            .lock()
            .map_err(|_| IndexError::HttpClient("mock index poisoned".into()))?;

        for record in records {
            if self.reject_numbers.contains(&record.identity.gazette_number) {
                outcome.failed += 1;
                outcome
                    .errors
                    .push(format!("{}: rejected", record.document_key()));
            } else {
                stored.push((index.to_string(), record.clone()));
                outcome.indexed += 1;
            }
        }
        Ok(outcome)
    }

    fn refresh(&self, _index: &str) -> Result<(), IndexError> {
        Ok(())
    }
}
