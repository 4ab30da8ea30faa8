//! Phase 1: FILTERING
//!
//! Drops records repeating an earlier film id, then applies the configured
//! pool filters. A filtered pool under the minimum size aborts the run.

use super::statistics::RunStatistics;
use super::Generator;
use crate::error::GenerationError;
use cinelink_common::config::PoolFilters;
use cinelink_common::models::{FilmId, FilmRecord};
use std::collections::HashSet;
use tracing::{debug, info, warn};

impl Generator {
    /// Phase 1: FILTERING - build the run's film pool
    pub(super) fn phase_filtering(
        &self,
        raw_pool: &[FilmRecord],
        stats: &mut RunStatistics,
    ) -> Result<Vec<FilmRecord>, GenerationError> {
        stats.pool_size = raw_pool.len();

        let filters = &self.config.pool_filters;
        let mut seen: HashSet<FilmId> = HashSet::with_capacity(raw_pool.len());
        let mut filtered = Vec::with_capacity(raw_pool.len());

        for film in raw_pool {
            if !seen.insert(film.id) {
                stats.duplicate_films += 1;
                debug!(film_id = film.id, title = %film.title, "Duplicate film id dropped");
                continue;
            }
            if passes_filters(film, filters) {
                filtered.push(film.clone());
            }
        }

        if stats.duplicate_films > 0 {
            warn!(duplicates = stats.duplicate_films, "Pool contained repeated film ids");
        }

        stats.filtered_count = filtered.len();
        info!(
            pool_size = stats.pool_size,
            filtered_count = stats.filtered_count,
            "Phase 1: FILTERING complete"
        );

        if filtered.len() < self.config.min_pool_size {
            return Err(GenerationError::InsufficientPool {
                available: filtered.len(),
                required: self.config.min_pool_size,
            });
        }

        Ok(filtered)
    }
}

/// Whether a film passes every configured filter
///
/// Missing vote counts or popularity never satisfy a minimum and always
/// satisfy a maximum.
pub fn passes_filters(film: &FilmRecord, filters: &PoolFilters) -> bool {
    if filters.min_year.is_some_and(|min| film.release_year < min) {
        return false;
    }
    if filters.max_year.is_some_and(|max| film.release_year > max) {
        return false;
    }
    if let Some(min) = filters.min_vote_count {
        if !film.vote_count.is_some_and(|v| v >= min) {
            return false;
        }
    }
    if let Some(max) = filters.max_vote_count {
        if film.vote_count.is_some_and(|v| v > max) {
            return false;
        }
    }
    if let Some(min) = filters.min_popularity {
        if !film.popularity.is_some_and(|p| p >= min) {
            return false;
        }
    }
    if !filters.allowed_genres.is_empty()
        && !filters.allowed_genres.iter().any(|g| film.has_genre(*g))
    {
        return false;
    }
    !filters.excluded_genres.iter().any(|g| film.has_genre(*g))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film() -> FilmRecord {
        FilmRecord::new(1, "Heat", 1995)
            .with_genre(80, "Crime")
            .with_vote_count(7000)
            .with_popularity(40.0)
    }

    #[test]
    fn test_no_filters_pass_everything() {
        assert!(passes_filters(&FilmRecord::new(1, "Bare", 1900), &PoolFilters::default()));
    }

    #[test]
    fn test_year_range() {
        let filters = PoolFilters {
            min_year: Some(1990),
            max_year: Some(1995),
            ..Default::default()
        };
        assert!(passes_filters(&film(), &filters));
        assert!(!passes_filters(&FilmRecord::new(2, "Alien", 1979), &filters));
        assert!(!passes_filters(&FilmRecord::new(3, "Ronin", 1998), &filters));
    }

    #[test]
    fn test_missing_votes_fail_minimum_pass_maximum() {
        let bare = FilmRecord::new(2, "Obscure", 2001);
        let min = PoolFilters {
            min_vote_count: Some(10),
            ..Default::default()
        };
        let max = PoolFilters {
            max_vote_count: Some(10),
            ..Default::default()
        };
        assert!(!passes_filters(&bare, &min));
        assert!(passes_filters(&bare, &max));
        assert!(passes_filters(&film(), &min));
        assert!(!passes_filters(&film(), &max));
    }

    #[test]
    fn test_min_popularity() {
        let filters = PoolFilters {
            min_popularity: Some(50.0),
            ..Default::default()
        };
        assert!(!passes_filters(&film(), &filters));
        assert!(!passes_filters(&FilmRecord::new(2, "Unknown", 2001), &filters));
    }

    #[test]
    fn test_genre_allow_and_deny() {
        let allow = PoolFilters {
            allowed_genres: vec![27, 80],
            ..Default::default()
        };
        let deny = PoolFilters {
            excluded_genres: vec![80],
            ..Default::default()
        };
        assert!(passes_filters(&film(), &allow));
        assert!(!passes_filters(&FilmRecord::new(2, "No genres", 2001), &allow));
        assert!(!passes_filters(&film(), &deny));
    }
}
