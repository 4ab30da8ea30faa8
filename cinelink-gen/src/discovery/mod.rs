//! Deterministic Discoverer
//!
//! Scans the full pool and emits groups that are true by construction, so they
//! need no external claims. Four independent discoverers:
//!
//! | Discoverer     | Key                              | Verification      |
//! |----------------|----------------------------------|-------------------|
//! | Director       | crew member with job "Director"  | `director`        |
//! | Actor          | cast member with billing order <5 | `actor`          |
//! | TitlePattern   | catalogue word in lowercase title | `title-contains` |
//! | Genre          | first-listed genre only          | `genre-includes`  |
//!
//! Every key with `n >= 4` films yields `floor(n / 4)` disjoint groups, chunked
//! in pool order; the remainder is dropped.
//!
//! # Priority
//! director > actor > title-pattern subtypes (catalogue order) > genre. Used as
//! a stable tie-break when capping (`max_discovered_groups`), not as a
//! correctness rule.

mod actor;
mod director;
mod genre;
mod title_pattern;

pub use actor::{ActorDiscoverer, TOP_BILLED_LIMIT};
pub use director::DirectorDiscoverer;
pub use genre::GenreDiscoverer;
pub use title_pattern::{catalogue_words, TitlePatternDiscoverer};

use crate::types::Discoverer;
use cinelink_common::config::DiscovererKind;
use cinelink_common::models::{CandidateGroup, ConnectionType, FilmId, FilmRecord, GROUP_SIZE};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Instantiate discoverers for the enabled kinds (duplicates ignored)
pub fn discoverers_for(kinds: &[DiscovererKind]) -> Vec<Arc<dyn Discoverer>> {
    let mut seen = Vec::new();
    let mut discoverers: Vec<Arc<dyn Discoverer>> = Vec::new();
    for kind in kinds {
        if seen.contains(kind) {
            continue;
        }
        seen.push(*kind);
        let discoverer: Arc<dyn Discoverer> = match kind {
            DiscovererKind::Director => Arc::new(DirectorDiscoverer::new()),
            DiscovererKind::Actor => Arc::new(ActorDiscoverer::new()),
            DiscovererKind::Title => Arc::new(TitlePatternDiscoverer::new()),
            DiscovererKind::Genre => Arc::new(GenreDiscoverer::new()),
        };
        discoverers.push(discoverer);
    }
    discoverers
}

/// Selection priority of a group's connection type (lower sorts first)
pub fn priority(connection_type: &ConnectionType) -> (u8, u8) {
    match connection_type {
        ConnectionType::Director => (0, 0),
        ConnectionType::Actor => (1, 0),
        ConnectionType::TitlePattern(category) => (2, *category as u8),
        ConnectionType::Genre => (3, 0),
        ConnectionType::Suggested(_) => (4, 0),
    }
}

/// Stable sort by priority; order within a priority level is preserved
pub fn sort_by_priority(groups: &mut [CandidateGroup]) {
    groups.sort_by_key(|g| priority(&g.connection_type));
}

/// Priority-sort discovered groups and apply an optional cap
pub fn rank_and_cap(groups: &mut Vec<CandidateGroup>, max_groups: Option<usize>) {
    sort_by_priority(groups);
    if let Some(max) = max_groups {
        if groups.len() > max {
            debug!(found = groups.len(), max = max, "Capping discovered groups");
            groups.truncate(max);
        }
    }
}

/// Films sharing one attribute value, in first-encounter order
pub(crate) struct KeyedFilms<'a, K> {
    pub key: K,
    pub label: String,
    pub films: Vec<&'a FilmRecord>,
}

/// Bucket films by attribute keys, preserving first-encounter order
///
/// `keys_of` may yield the same key twice for one film (e.g. a doubled
/// credit); the film is recorded once per key.
pub(crate) fn bucket_films<'a, K, F, I>(pool: &'a [FilmRecord], keys_of: F) -> Vec<KeyedFilms<'a, K>>
where
    K: Hash + Eq + Copy,
    F: Fn(&'a FilmRecord) -> I,
    I: IntoIterator<Item = (K, String)>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<KeyedFilms<'a, K>> = Vec::new();

    for film in pool {
        for (key, label) in keys_of(film) {
            let slot = *index.entry(key).or_insert_with(|| {
                buckets.push(KeyedFilms {
                    key,
                    label,
                    films: Vec::new(),
                });
                buckets.len() - 1
            });
            let bucket = &mut buckets[slot];
            if !bucket.films.iter().any(|f| f.id == film.id) {
                bucket.films.push(film);
            }
        }
    }

    buckets
}

/// Split films into disjoint groups of four; a remainder under four is dropped
pub(crate) fn chunk_groups(films: &[&FilmRecord]) -> Vec<[FilmId; GROUP_SIZE]> {
    films
        .chunks_exact(GROUP_SIZE)
        .map(|chunk| [chunk[0].id, chunk[1].id, chunk[2].id, chunk[3].id])
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::filler_pool;
    use super::*;
    use crate::verification::VerificationEngine;
    use cinelink_common::models::{Genre, TitlePatternCategory};
    use std::collections::BTreeSet;

    /// Run discoverers in list order, then rank and cap
    fn discover(
        pool: &[FilmRecord],
        discoverers: &[Arc<dyn Discoverer>],
        max_groups: Option<usize>,
    ) -> Vec<CandidateGroup> {
        let mut groups: Vec<CandidateGroup> = discoverers.iter().flat_map(|d| d.analyze(pool)).collect();
        rank_and_cap(&mut groups, max_groups);
        groups
    }

    fn mixed_pool() -> Vec<FilmRecord> {
        let mut pool = filler_pool(30, 1);
        for (i, film) in pool.iter_mut().enumerate().take(8) {
            film.crew.clear();
            film.crew.push(cinelink_common::models::CrewMember {
                id: 525,
                name: "Christopher Nolan".to_string(),
                job: "Director".to_string(),
            });
            film.title = format!("Night {}", i);
        }
        for film in pool.iter_mut().skip(10).take(4) {
            film.cast.push(cinelink_common::models::CastMember {
                id: 31,
                name: "Tom Hanks".to_string(),
                billing_order: 1,
            });
        }
        for film in pool.iter_mut().skip(20).take(4) {
            film.genres.insert(
                0,
                Genre {
                    id: 18,
                    name: "Drama".to_string(),
                },
            );
        }
        pool
    }

    #[test]
    fn test_chunk_groups_drops_remainder() {
        let pool = filler_pool(11, 1);
        let refs: Vec<&FilmRecord> = pool.iter().collect();
        let groups = chunk_groups(&refs);
        assert_eq!(groups, vec![[1, 2, 3, 4], [5, 6, 7, 8]]);
    }

    #[test]
    fn test_bucket_films_dedupes_repeated_keys() {
        let pool = vec![FilmRecord::new(1, "Twice", 2000)
            .with_director(7, "Same")
            .with_director(7, "Same")];
        let buckets = bucket_films(&pool, |f| f.directors().map(|d| (d.id, d.name.clone())).collect::<Vec<_>>());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].films.len(), 1);
    }

    #[test]
    fn test_discover_orders_by_priority() {
        let pool = mixed_pool();
        let discoverers = discoverers_for(&[DiscovererKind::Title, DiscovererKind::Actor, DiscovererKind::Director]);
        let groups = discover(&pool, &discoverers, None);

        let types: Vec<&ConnectionType> = groups.iter().map(|g| &g.connection_type).collect();
        assert_eq!(
            types,
            vec![
                &ConnectionType::Director,
                &ConnectionType::Director,
                &ConnectionType::Actor,
                &ConnectionType::TitlePattern(TitlePatternCategory::Time),
                &ConnectionType::TitlePattern(TitlePatternCategory::Time),
            ]
        );
    }

    #[test]
    fn test_discover_cap_applies_after_sort() {
        let pool = mixed_pool();
        let discoverers = discoverers_for(&[DiscovererKind::Actor, DiscovererKind::Director]);
        let groups = discover(&pool, &discoverers, Some(2));
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.connection_type == ConnectionType::Director));
    }

    #[test]
    fn test_discoverers_for_ignores_duplicates() {
        let discoverers = discoverers_for(&[DiscovererKind::Genre, DiscovererKind::Genre]);
        assert_eq!(discoverers.len(), 1);
        assert_eq!(discoverers[0].kind(), DiscovererKind::Genre);
    }

    #[test]
    fn test_discovered_groups_verify_with_own_descriptor() {
        let pool = mixed_pool();
        let discoverers = discoverers_for(&DiscovererKind::ALL);
        let groups = discover(&pool, &discoverers, None);

        let families: BTreeSet<&str> = groups.iter().map(|g| g.connection_type.family()).collect();
        assert_eq!(
            families,
            BTreeSet::from(["actor", "director", "genre", "title-pattern"])
        );

        let engine = VerificationEngine::new();
        for group in &groups {
            let films: Vec<&FilmRecord> = group
                .film_ids
                .iter()
                .map(|id| pool.iter().find(|f| f.id == *id).unwrap())
                .collect();
            let result = engine.verify_group(group, &films);
            assert!(result.valid, "{} failed: {:?}", group.connection, result.issues);
        }
    }
}
