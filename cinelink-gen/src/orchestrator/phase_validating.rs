//! Phase 3: VALIDATING
//!
//! Verify-then-trust for every origin: deterministic groups are re-checked by
//! the Verification Engine, suggestions go through the Suggestion Validator.
//! Deterministic groups come first, in priority order, followed by accepted
//! suggestions in input order.

use super::statistics::RunStatistics;
use super::Generator;
use crate::types::RejectionReason;
use cinelink_common::models::{CandidateGroup, FilmId, FilmRecord, Suggestion};
use std::collections::HashMap;
use tracing::{info, warn};

impl Generator {
    /// Phase 3: VALIDATING - keep only groups that pass verification
    pub(super) fn phase_validating(
        &self,
        raw_pool: &[FilmRecord],
        films: &HashMap<FilmId, &FilmRecord>,
        discovered: Vec<CandidateGroup>,
        suggestions: &[Suggestion],
        stats: &mut RunStatistics,
    ) -> Vec<CandidateGroup> {
        let mut verified = Vec::with_capacity(discovered.len() + suggestions.len());

        for group in discovered {
            let members: Vec<&FilmRecord> = group
                .film_ids
                .iter()
                .filter_map(|id| films.get(id).copied())
                .collect();
            let result = self.engine.verify_group(&group, &members);
            if result.valid {
                verified.push(group);
            } else {
                warn!(
                    connection = %group.connection,
                    film_ids = ?group.film_ids,
                    issues = ?result.issues,
                    "Deterministic group failed verification"
                );
                self.reject(&group.connection, &group.film_ids, RejectionReason::FailedVerification(result.issues), stats);
            }
        }

        let mut suggested = 0;
        for suggestion in suggestions {
            match self
                .validator
                .validate(suggestion, raw_pool, |id| films.contains_key(&id))
            {
                Ok(group) => {
                    suggested += 1;
                    verified.push(group);
                }
                Err(reason) => {
                    let film_ids = resolvable_ids(suggestion, raw_pool);
                    self.reject(&suggestion.connection, &film_ids, reason, stats);
                }
            }
        }

        info!(
            verified = verified.len(),
            suggestions_accepted = suggested,
            rejected = stats.total_rejected(),
            "Phase 3: VALIDATING complete"
        );

        verified
    }
}

/// Film ids a suggestion's in-range indices point at, for diagnostics
fn resolvable_ids(suggestion: &Suggestion, raw_pool: &[FilmRecord]) -> Vec<FilmId> {
    suggestion
        .film_indices
        .iter()
        .filter_map(|&i| usize::try_from(i).ok().and_then(|i| raw_pool.get(i)))
        .map(|f| f.id)
        .collect()
}
