//! Candidate selection and validation.

use tracing::info;

use crate::domain::{CandidateSelector, PollTable};
use crate::error::PollError;

/// Resolve a candidate selector against the table's columns.
///
/// `All` yields every candidate column in native order. Explicit names keep
/// their supplied order; the first unknown name fails the whole call, before
/// any aggregation work happens.
pub fn validate_candidates(
    table: &PollTable,
    selector: &CandidateSelector,
) -> Result<Vec<String>, PollError> {
    let names = match selector {
        CandidateSelector::All => table.candidates.clone(),
        CandidateSelector::Names(names) => {
            for name in names {
                if table.candidate_index(name).is_none() {
                    return Err(PollError::UnknownCandidate { name: name.clone() });
                }
            }
            names.clone()
        }
    };
    info!(candidates = ?names, "aggregating polls for candidates");
    Ok(names)
}
