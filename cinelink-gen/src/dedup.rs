//! Dedup & Overlap Filter
//!
//! Greedy single pass in input order: a group is rejected when its exact film
//! set was already seen, or when it shares [`MAX_SHARED_FILMS`] or more films
//! with any accepted group. Earlier groups win ties, so callers sort first.

use crate::types::RejectionReason;
use cinelink_common::models::{CandidateGroup, FilmId, GROUP_SIZE};
use std::collections::HashSet;

/// Shared-film count at which a candidate is too similar to an accepted group
pub const MAX_SHARED_FILMS: usize = 3;

/// Stateful accumulator of accepted groups
#[derive(Debug, Default)]
pub struct OverlapFilter {
    seen: HashSet<[FilmId; GROUP_SIZE]>,
    accepted: Vec<[FilmId; GROUP_SIZE]>,
}

impl OverlapFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate; on success it becomes part of the accepted set
    pub fn offer(&mut self, group: &CandidateGroup) -> Result<(), RejectionReason> {
        let fingerprint = group.fingerprint();
        if self.seen.contains(&fingerprint) {
            return Err(RejectionReason::DuplicateFingerprint);
        }

        if let Some(shared) = self
            .accepted
            .iter()
            .map(|ids| group.film_ids.iter().filter(|id| ids.contains(id)).count())
            .find(|&shared| shared >= MAX_SHARED_FILMS)
        {
            return Err(RejectionReason::HighOverlap { shared });
        }

        self.seen.insert(fingerprint);
        self.accepted.push(fingerprint);
        Ok(())
    }

    /// Number of accepted groups
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Filter a list in order, returning survivors and the rejections
pub fn dedup_groups(
    groups: Vec<CandidateGroup>,
) -> (Vec<CandidateGroup>, Vec<(CandidateGroup, RejectionReason)>) {
    let mut filter = OverlapFilter::new();
    let mut kept = Vec::with_capacity(groups.len());
    let mut rejected = Vec::new();

    for group in groups {
        match filter.offer(&group) {
            Ok(()) => kept.push(group),
            Err(reason) => rejected.push((group, reason)),
        }
    }

    (kept, rejected)
}
