//! Genre groups: films sharing a primary (first-listed) genre
//!
//! Only the first-listed genre is considered. Verification still checks the
//! full genre set, which a primary-genre match always satisfies.

use super::{bucket_films, chunk_groups};
use crate::types::Discoverer;
use cinelink_common::config::DiscovererKind;
use cinelink_common::models::{
    CandidateGroup, Category, ConnectionType, FilmRecord, VerificationDescriptor,
    VerificationParams, VerificationType,
};

/// Groups films by primary genre
#[derive(Debug, Default)]
pub struct GenreDiscoverer;

impl GenreDiscoverer {
    pub fn new() -> Self {
        Self
    }
}

impl Discoverer for GenreDiscoverer {
    fn name(&self) -> &'static str {
        "Genre"
    }

    fn kind(&self) -> DiscovererKind {
        DiscovererKind::Genre
    }

    fn analyze(&self, pool: &[FilmRecord]) -> Vec<CandidateGroup> {
        bucket_films(pool, |film| film.primary_genre().map(|g| (g.id, g.name.clone())))
            .into_iter()
            .flat_map(|bucket| {
                let connection = format!("{} films", bucket.label);
                chunk_groups(&bucket.films).into_iter().map(move |film_ids| {
                    CandidateGroup::deterministic(
                        film_ids,
                        ConnectionType::Genre,
                        connection.clone(),
                        Category::Thematic,
                        VerificationDescriptor::new(
                            VerificationType::GenreIncludes,
                            VerificationParams::genre(bucket.key),
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

    #[test]
    fn test_secondary_genres_ignored() {
        let pool: Vec<FilmRecord> = (1..=4)
            .map(|id| {
                FilmRecord::new(id, format!("Film {}", id), 2001)
                    .with_genre(100 + id as u32, format!("Primary {}", id))
                    .with_genre(27, "Horror")
            })
            .collect();
        assert!(GenreDiscoverer::new().analyze(&pool).is_empty());
    }

    #[test]
    fn test_primary_genre_grouped() {
        let pool: Vec<FilmRecord> = (1..=9)
            .map(|id| FilmRecord::new(id, format!("Film {}", id), 2001).with_genre(27, "Horror"))
            .collect();
        let groups = GenreDiscoverer::new().analyze(&pool);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].connection, "Horror films");
        assert_eq!(groups[0].verification.verification_type, VerificationType::GenreIncludes);
        assert_eq!(groups[0].verification.verification_params.genre_id, Some(27));
    }

    #[test]
    fn test_films_without_genres_skipped() {
        let pool: Vec<FilmRecord> = (1..=4)
            .map(|id| FilmRecord::new(id, format!("Film {}", id), 2001))
            .collect();
        assert!(GenreDiscoverer::new().analyze(&pool).is_empty());
    }
}
