pub mod candidates;
pub mod loader;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use candidates::{qualifying_candidates, CandidateCount};
pub use loader::{load_from_path, load_from_reader, LoadError};

pub const CANDIDATE_COLUMN: &str = "Candidat";
pub const DATE_COLUMN: &str = "Date de publication";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndorsementRecord {
    pub candidate: String,
    pub publication_date: NaiveDate,
}

impl EndorsementRecord {
    pub fn new(candidate: impl Into<String>, publication_date: NaiveDate) -> Self {
        Self {
            candidate: candidate.into(),
            publication_date,
        }
    }
}

/// Endorsement records in file order. Built once, never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndorsementTable {
    records: Vec<EndorsementRecord>,
}

impl EndorsementTable {
    pub fn new(records: Vec<EndorsementRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[EndorsementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn for_candidate<'a>(
        &'a self,
        candidate: &'a str,
    ) -> impl Iterator<Item = &'a EndorsementRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| record.candidate == candidate)
    }
}

impl FromIterator<EndorsementRecord> for EndorsementTable {
    fn from_iter<I: IntoIterator<Item = EndorsementRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
