use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::EndorsementTable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateCount {
    pub candidate: String,
    pub endorsements: usize,
}

/// Candidates with strictly more than `threshold` records, most endorsed first.
///
/// Equal counts keep the order in which the candidates first appear in the table.
pub fn qualifying_candidates(table: &EndorsementTable, threshold: usize) -> Vec<CandidateCount> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CandidateCount> = Vec::new();
    for record in table.records() {
        let idx = *position
            .entry(record.candidate.as_str())
            .or_insert_with(|| {
                counts.push(CandidateCount {
                    candidate: record.candidate.clone(),
                    endorsements: 0,
                });
                counts.len() - 1
            });
        counts[idx].endorsements += 1;
    }

    // sort_by is stable, so first-encounter order survives among ties
    counts.sort_by(|a, b| b.endorsements.cmp(&a.endorsements));
    counts.retain(|c| c.endorsements > threshold);
    counts
}
