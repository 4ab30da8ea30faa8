//! Integration tests for the Generator Orchestrator

use cinelink_common::config::{DiscovererKind, GeneratorConfig};
use cinelink_common::models::{
    ConnectionType, Difficulty, FilmRecord, GroupColor, GroupSource, Suggestion, VerificationType,
};
use cinelink_gen::{GenerationError, GenerationEvent, GenerationPhase, Generator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

const NOLAN: u64 = 525;
const HANKS: u64 = 31;

/// Film with no attribute shared with any other filler film
fn filler(id: u64) -> FilmRecord {
    FilmRecord::new(id, format!("Untitled {}", id), 1950 + (id % 70) as i32)
        .with_director(900_000 + id, format!("Director {}", id))
        .with_cast(800_000 + id, format!("Actor {}", id), 0)
        .with_genre(5_000 + id as u32, format!("Genre {}", id))
        .with_vote_count(1_000)
}

/// 100 films; the first eight are directed by one person
fn director_pool() -> Vec<FilmRecord> {
    (1..=100)
        .map(|id| {
            if id <= 8 {
                let mut film = filler(id);
                film.crew.clear();
                film.with_director(NOLAN, "Christopher Nolan")
            } else {
                filler(id)
            }
        })
        .collect()
}

/// Director pool plus an actor billed second in films 21-28
fn director_and_actor_pool() -> Vec<FilmRecord> {
    director_pool()
        .into_iter()
        .map(|film| {
            if (21..=28).contains(&film.id) {
                film.with_cast(HANKS, "Tom Hanks", 1)
            } else {
                film
            }
        })
        .collect()
}

fn heist_suggestion(indices: Vec<i64>) -> Suggestion {
    Suggestion {
        connection: "Heist plots".to_string(),
        film_indices: indices,
        difficulty: Some("hard".to_string()),
        explanation: "Every film is built around a robbery".to_string(),
        verification_type: Some("overview-keywords".to_string()),
        verification_params: Some(json!({"keywords": ["heist", "robbery"]})),
        category: Some("plot".to_string()),
        connection_type: None,
    }
}

/// Give the listed films heist overviews and distinct real titles
fn with_heist_overviews(mut pool: Vec<FilmRecord>, ids: &[u64]) -> Vec<FilmRecord> {
    const TITLES: [&str; 4] = ["Heat", "Thief", "Ronin", "Inside Man"];
    for (film, title) in pool.iter_mut().filter(|f| ids.contains(&f.id)).zip(TITLES) {
        film.title = title.to_string();
        film.overview = "A crew plans one last heist.".to_string();
    }
    pool
}

#[tokio::test]
async fn test_single_director_pool_yields_two_director_groups() {
    let generator = Generator::new(GeneratorConfig::default());
    let output = generator.generate(director_pool(), &[]).await.unwrap();

    assert_eq!(output.statistics.filtered_count, 100);
    assert_eq!(output.statistics.total_found, 2);
    assert_eq!(output.groups.len(), 2);
    for formatted in &output.groups {
        assert_eq!(formatted.group.connection_type, ConnectionType::Director);
        assert_eq!(formatted.group.connection, "Directed by Christopher Nolan");
        assert_eq!(formatted.group.verification.verification_type, VerificationType::Director);
        assert_eq!(formatted.group.verification.verification_params.person_id, Some(NOLAN));
        assert_eq!(formatted.group.source, GroupSource::Deterministic);
        assert!(formatted.verified);
    }
    assert_eq!(output.groups[0].group.film_ids, [1, 2, 3, 4]);
    assert_eq!(output.groups[1].group.film_ids, [5, 6, 7, 8]);
    assert_ne!(output.groups[0].id, output.groups[1].id);
}

#[tokio::test]
async fn test_discovery_cap_keeps_highest_priority_groups() {
    let config = GeneratorConfig {
        max_discovered_groups: Some(2),
        ..Default::default()
    };
    let output = Generator::new(config)
        .generate(director_and_actor_pool(), &[])
        .await
        .unwrap();

    assert_eq!(output.statistics.deterministic_found, 2);
    assert_eq!(output.groups.len(), 2);
    assert!(output
        .groups
        .iter()
        .all(|g| g.group.connection_type == ConnectionType::Director));
}

#[tokio::test]
async fn test_small_pool_is_fatal() {
    let pool: Vec<FilmRecord> = (1..=10).map(filler).collect();
    let err = Generator::new(GeneratorConfig::default())
        .generate(pool, &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GenerationError::InsufficientPool {
            available: 10,
            required: 20
        }
    ));
}

#[tokio::test]
async fn test_pool_filters_count_toward_minimum() {
    let config = GeneratorConfig {
        pool_filters: cinelink_common::config::PoolFilters {
            min_vote_count: Some(5_000),
            ..Default::default()
        },
        ..Default::default()
    };
    let err = Generator::new(config).generate(director_pool(), &[]).await.unwrap_err();
    assert!(matches!(err, GenerationError::InsufficientPool { available: 0, .. }));
}

#[tokio::test]
async fn test_no_sources_is_fatal() {
    let generator = Generator::with_discoverers(GeneratorConfig::default(), Vec::new());
    let err = generator.generate(director_pool(), &[]).await.unwrap_err();
    assert!(matches!(err, GenerationError::NoSources));

    let config = GeneratorConfig {
        enabled_discoverers: Vec::new(),
        ..Default::default()
    };
    let err = Generator::new(config).generate(director_pool(), &[]).await.unwrap_err();
    assert!(matches!(err, GenerationError::NoSources));
}

#[tokio::test]
async fn test_invalid_config_is_fatal() {
    let config = GeneratorConfig {
        max_groups_per_batch: 0,
        ..Default::default()
    };
    let err = Generator::new(config).generate(director_pool(), &[]).await.unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Common(cinelink_common::Error::Config(_))
    ));
}

#[tokio::test]
async fn test_suggestions_only_run() {
    let pool = with_heist_overviews(director_pool(), &[40, 41, 42, 43]);
    let generator = Generator::with_discoverers(GeneratorConfig::default(), Vec::new());
    let suggestions = vec![
        heist_suggestion(vec![39, 40, 41, 42]),
        heist_suggestion(vec![39, 40, 41]),
        heist_suggestion(vec![39, 40, 41, 50]),
    ];

    let output = generator.generate(pool, &suggestions).await.unwrap();

    assert_eq!(output.groups.len(), 1);
    let formatted = &output.groups[0];
    assert_eq!(formatted.group.film_ids, [40, 41, 42, 43]);
    assert_eq!(formatted.group.source, GroupSource::AiThematic);
    assert_eq!(formatted.difficulty, Difficulty::Hard);
    assert_eq!(formatted.color, GroupColor::Blue);
    assert_eq!(formatted.difficulty_score, 0.625);

    let stats = &output.statistics;
    assert_eq!(stats.total_found, 3);
    assert_eq!(stats.rejected("malformed"), 1);
    assert_eq!(stats.rejected("failed-verification"), 1);
}

#[tokio::test]
async fn test_suggestion_overlapping_deterministic_group_rejected() {
    // Indices 0-2 are films 1-3, already in the first director group
    let pool = with_heist_overviews(director_pool(), &[1, 2, 3, 60]);
    let output = Generator::new(GeneratorConfig::default())
        .generate(pool, &[heist_suggestion(vec![0, 1, 2, 59])])
        .await
        .unwrap();

    assert_eq!(output.groups.len(), 2);
    assert!(output
        .groups
        .iter()
        .all(|g| g.group.source == GroupSource::Deterministic));
    assert_eq!(output.statistics.rejected("high-overlap"), 1);
}

#[tokio::test]
async fn test_suggestion_referencing_filtered_film_rejected() {
    let mut pool = with_heist_overviews(director_pool(), &[40, 41, 42, 43]);
    pool[42].release_year = 1900;
    let config = GeneratorConfig {
        pool_filters: cinelink_common::config::PoolFilters {
            min_year: Some(1940),
            ..Default::default()
        },
        ..Default::default()
    };

    let output = Generator::new(config)
        .generate(pool, &[heist_suggestion(vec![39, 40, 41, 42])])
        .await
        .unwrap();

    assert_eq!(output.statistics.filtered_count, 99);
    assert_eq!(output.statistics.rejected("malformed"), 1);
    assert!(output.groups.iter().all(|g| g.group.source == GroupSource::Deterministic));
}

#[tokio::test]
async fn test_recent_connections_excluded() {
    let config = GeneratorConfig {
        recent_connections: vec!["  directed by CHRISTOPHER NOLAN ".to_string()],
        ..Default::default()
    };
    let output = Generator::new(config).generate(director_pool(), &[]).await.unwrap();

    assert!(output.groups.is_empty());
    assert_eq!(output.statistics.rejected("recently-used"), 2);
    assert_eq!(output.statistics.returned, 0);
}

#[tokio::test]
async fn test_duplicate_film_ids_dropped() {
    let mut pool = director_pool();
    pool.push(filler(50));
    let output = Generator::new(GeneratorConfig::default())
        .generate(pool, &[])
        .await
        .unwrap();

    assert_eq!(output.statistics.pool_size, 101);
    assert_eq!(output.statistics.duplicate_films, 1);
    assert_eq!(output.statistics.filtered_count, 100);
}

#[tokio::test]
async fn test_diversity_cap_mixes_families() {
    let config = GeneratorConfig {
        max_groups_per_batch: 2,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(3);
    let output = Generator::new(config)
        .generate_with_rng(director_and_actor_pool(), &[], &mut rng)
        .await
        .unwrap();

    assert_eq!(output.statistics.accepted, 4);
    assert_eq!(output.groups.len(), 2);
    assert_eq!(output.groups[0].group.connection_type, ConnectionType::Director);
    assert_eq!(output.groups[1].group.connection_type, ConnectionType::Actor);
}

#[tokio::test]
async fn test_cap_without_diversity_truncates_in_priority_order() {
    let config = GeneratorConfig {
        max_groups_per_batch: 2,
        prefer_diversity: false,
        ..Default::default()
    };
    let output = Generator::new(config)
        .generate(director_and_actor_pool(), &[])
        .await
        .unwrap();

    assert_eq!(output.groups.len(), 2);
    assert!(output
        .groups
        .iter()
        .all(|g| g.group.connection_type == ConnectionType::Director));
}

#[tokio::test]
async fn test_seeded_shuffle_is_reproducible() {
    let config = GeneratorConfig {
        shuffle_pool: true,
        seed: Some(1234),
        ..Default::default()
    };

    let first = Generator::new(config.clone())
        .generate(director_and_actor_pool(), &[])
        .await
        .unwrap();
    let second = Generator::new(config)
        .generate(director_and_actor_pool(), &[])
        .await
        .unwrap();

    let ids = |output: &cinelink_gen::GenerationOutput| -> Vec<[u64; 4]> {
        output.groups.iter().map(|g| g.group.film_ids).collect()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.groups.len(), 4);
}

#[tokio::test]
async fn test_explicit_discoverer_list() {
    let discoverers: Vec<Arc<dyn cinelink_gen::Discoverer>> =
        cinelink_gen::discovery::discoverers_for(&[DiscovererKind::Actor]);
    let output = Generator::with_discoverers(GeneratorConfig::default(), discoverers)
        .generate(director_and_actor_pool(), &[])
        .await
        .unwrap();

    assert_eq!(output.groups.len(), 2);
    assert!(output
        .groups
        .iter()
        .all(|g| g.group.connection == "Starring Tom Hanks"));
}

#[tokio::test]
async fn test_events_follow_state_machine() {
    let (tx, mut rx) = mpsc::channel(1024);
    let generator = Generator::new(GeneratorConfig::default()).with_events(tx);
    generator.generate(director_pool(), &[]).await.unwrap();
    drop(generator);

    let mut phases = Vec::new();
    let mut discoverers_completed = 0;
    let mut completed = None;
    while let Some(event) = rx.recv().await {
        match event {
            GenerationEvent::PhaseChanged { phase, .. } => phases.push(phase),
            GenerationEvent::DiscovererCompleted { .. } => discoverers_completed += 1,
            GenerationEvent::Completed { returned, .. } => completed = Some(returned),
            GenerationEvent::GroupRejected { .. } => {}
        }
    }

    assert_eq!(
        phases,
        vec![
            GenerationPhase::Filtering,
            GenerationPhase::Discovering,
            GenerationPhase::Validating,
            GenerationPhase::Deduping,
            GenerationPhase::Selecting,
            GenerationPhase::Done,
        ]
    );
    assert_eq!(discoverers_completed, 4);
    assert_eq!(completed, Some(2));
}
