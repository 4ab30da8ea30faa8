//! Phase 5: SELECTING
//!
//! Caps the batch at `max_groups_per_batch`. With diversity preferred, groups
//! are taken round-robin across buckets keyed by category and connection
//! family, in first-appearance order, each bucket shuffled with the run's RNG.
//! A plot suggestion and a setting suggestion land in different buckets, as do
//! a genre group and a thematic suggestion. Otherwise the list is truncated.

use super::Generator;
use cinelink_common::models::{CandidateGroup, Category};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

impl Generator {
    /// Phase 5: SELECTING - apply the batch cap
    pub(super) fn phase_selecting<R: Rng + ?Sized>(
        &self,
        mut groups: Vec<CandidateGroup>,
        rng: &mut R,
    ) -> Vec<CandidateGroup> {
        let max = self.config.max_groups_per_batch;
        let available = groups.len();

        let selected = if available <= max {
            groups
        } else if self.config.prefer_diversity {
            select_diverse(groups, max, rng)
        } else {
            groups.truncate(max);
            groups
        };

        info!(
            available = available,
            selected = selected.len(),
            max_groups = max,
            "Phase 5: SELECTING complete"
        );

        selected
    }
}

/// Round-robin pick of up to `max` groups across category/family buckets
pub fn select_diverse<R: Rng + ?Sized>(
    groups: Vec<CandidateGroup>,
    max: usize,
    rng: &mut R,
) -> Vec<CandidateGroup> {
    let mut buckets: Vec<((Category, String), Vec<CandidateGroup>)> = Vec::new();
    for group in groups {
        let key = (group.category, group.connection_type.family().to_string());
        match buckets.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(group),
            None => buckets.push((key, vec![group])),
        }
    }

    let mut queues: Vec<std::vec::IntoIter<CandidateGroup>> = buckets
        .into_iter()
        .map(|(_, mut members)| {
            members.shuffle(&mut *rng);
            members.into_iter()
        })
        .collect();

    let mut selected = Vec::with_capacity(max);
    while selected.len() < max {
        let before = selected.len();
        for queue in queues.iter_mut() {
            if selected.len() >= max {
                break;
            }
            if let Some(group) = queue.next() {
                selected.push(group);
            }
        }
        if selected.len() == before {
            break;
        }
    }

    selected
}
