//! Phase 4: DEDUPING
//!
//! Excludes recently used connections, then runs the Dedup & Overlap Filter
//! strictly in order over what remains.

use super::statistics::RunStatistics;
use super::Generator;
use crate::dedup::dedup_groups;
use crate::types::RejectionReason;
use cinelink_common::models::CandidateGroup;
use std::collections::HashSet;
use tracing::info;

/// Key used to compare connection texts against the recent set
pub fn normalize_connection(connection: &str) -> String {
    connection.trim().to_lowercase()
}

impl Generator {
    /// Phase 4: DEDUPING - drop recent, duplicate and overlapping groups
    pub(super) fn phase_deduping(
        &self,
        groups: Vec<CandidateGroup>,
        stats: &mut RunStatistics,
    ) -> Vec<CandidateGroup> {
        let recent: HashSet<String> = self
            .config
            .recent_connections
            .iter()
            .map(|c| normalize_connection(c))
            .filter(|c| !c.is_empty())
            .collect();

        let mut fresh = Vec::with_capacity(groups.len());
        for group in groups {
            if recent.contains(&normalize_connection(&group.connection)) {
                self.reject(&group.connection, &group.film_ids, RejectionReason::RecentlyUsed, stats);
            } else {
                fresh.push(group);
            }
        }

        let (kept, rejected) = dedup_groups(fresh);
        for (group, reason) in rejected {
            self.reject(&group.connection, &group.film_ids, reason, stats);
        }

        stats.accepted = kept.len();
        info!(
            accepted = stats.accepted,
            recently_used = stats.rejected("recently-used"),
            duplicates = stats.rejected("duplicate-fingerprint"),
            overlapping = stats.rejected("high-overlap"),
            "Phase 4: DEDUPING complete"
        );

        kept
    }
}
