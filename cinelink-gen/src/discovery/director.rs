//! Director groups: films sharing a credited director

use super::{bucket_films, chunk_groups};
use crate::types::Discoverer;
use cinelink_common::config::DiscovererKind;
use cinelink_common::models::{
    CandidateGroup, Category, ConnectionType, FilmRecord, VerificationDescriptor,
    VerificationParams, VerificationType,
};

/// Groups films by each crew member with job "Director"
#[derive(Debug, Default)]
pub struct DirectorDiscoverer;

impl DirectorDiscoverer {
    pub fn new() -> Self {
        Self
    }
}

impl Discoverer for DirectorDiscoverer {
    fn name(&self) -> &'static str {
        "Director"
    }

    fn kind(&self) -> DiscovererKind {
        DiscovererKind::Director
    }

    fn analyze(&self, pool: &[FilmRecord]) -> Vec<CandidateGroup> {
        bucket_films(pool, |film| {
            film.directors()
                .map(|d| (d.id, d.name.clone()))
                .collect::<Vec<_>>()
        })
        .into_iter()
        .flat_map(|bucket| {
            let connection = format!("Directed by {}", bucket.label);
            chunk_groups(&bucket.films).into_iter().map(move |film_ids| {
                CandidateGroup::deterministic(
                    film_ids,
                    ConnectionType::Director,
                    connection.clone(),
                    Category::Crew,
                    VerificationDescriptor::new(
                        VerificationType::Director,
                        VerificationParams::person(bucket.key),
                    ),
                )
            })
        })
        .collect()
    }
}
