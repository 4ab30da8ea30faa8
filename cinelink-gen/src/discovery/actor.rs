//! Actor groups: films sharing a top-billed cast member

use super::{bucket_films, chunk_groups};
use crate::types::Discoverer;
use cinelink_common::config::DiscovererKind;
use cinelink_common::models::{
    CandidateGroup, Category, ConnectionType, FilmRecord, VerificationDescriptor,
    VerificationParams, VerificationType,
};

/// Cast entries with billing order below this count as top-billed
pub const TOP_BILLED_LIMIT: u32 = 5;

/// Groups films by top-billed cast members
#[derive(Debug, Default)]
pub struct ActorDiscoverer;

impl ActorDiscoverer {
    pub fn new() -> Self {
        Self
    }
}

impl Discoverer for ActorDiscoverer {
    fn name(&self) -> &'static str {
        "Actor"
    }

    fn kind(&self) -> DiscovererKind {
        DiscovererKind::Actor
    }

    fn analyze(&self, pool: &[FilmRecord]) -> Vec<CandidateGroup> {
        bucket_films(pool, |film| {
            film.top_billed(TOP_BILLED_LIMIT)
                .map(|c| (c.id, c.name.clone()))
                .collect::<Vec<_>>()
        })
        .into_iter()
        .flat_map(|bucket| {
            let connection = format!("Starring {}", bucket.label);
            chunk_groups(&bucket.films).into_iter().map(move |film_ids| {
                CandidateGroup::deterministic(
                    film_ids,
                    ConnectionType::Actor,
                    connection.clone(),
                    Category::Cast,
                    VerificationDescriptor::new(
                        VerificationType::Actor,
                        VerificationParams::person(bucket.key),
                    ),
                )
            })
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn films_with_actor_at(order: u32) -> Vec<FilmRecord> {
        (1..=4)
            .map(|id| FilmRecord::new(id, format!("Film {}", id), 1990).with_cast(42, "Frances McDormand", order))
            .collect()
    }

    #[test]
    fn test_low_billing_ignored() {
        assert!(ActorDiscoverer::new().analyze(&films_with_actor_at(10)).is_empty());
        assert!(ActorDiscoverer::new().analyze(&films_with_actor_at(5)).is_empty());
    }

    #[test]
    fn test_top_billed_grouped() {
        let groups = ActorDiscoverer::new().analyze(&films_with_actor_at(4));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].connection, "Starring Frances McDormand");
        assert_eq!(groups[0].verification.verification_params.person_id, Some(42));
        assert_eq!(groups[0].category, Category::Cast);
    }

    #[test]
    fn test_mixed_billing_counts_only_top_entries() {
        let mut pool = films_with_actor_at(0);
        pool[3].cast[0].billing_order = 7;
        assert!(ActorDiscoverer::new().analyze(&pool).is_empty());
    }
}
