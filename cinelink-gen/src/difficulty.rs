//! Difficulty Assigner
//!
//! Maps each accepted group to a strength score in `[0.0, 1.0]` and from there
//! to a difficulty band and color.
//!
//! # Scoring
//! - Suggested groups: the author's declared label maps to the band midpoint
//! - Deterministic groups: a base score per connection type (actor and
//!   director connections skew easy) plus an obscurity bonus from the average
//!   vote count of the group's films
//!
//! # Bands
//! | score        | difficulty | color  |
//! |--------------|------------|--------|
//! | < 0.25       | easy       | yellow |
//! | 0.25 - 0.50  | medium     | green  |
//! | 0.50 - 0.75  | hard       | blue   |
//! | >= 0.75      | hardest    | purple |
//!
//! Scores outside the range (or NaN) clamp to the nearest band.

use cinelink_common::models::{
    CandidateGroup, ConnectionType, Difficulty, FilmRecord, GroupColor, GroupSource,
};

const EASY_UPPER: f64 = 0.25;
const MEDIUM_UPPER: f64 = 0.50;
const HARD_UPPER: f64 = 0.75;

/// Weight of the obscurity bonus for deterministic groups
const OBSCURITY_WEIGHT: f64 = 0.4;

/// Actor and director groups never leave the easy/medium bands
const PERSON_OBSCURITY_WEIGHT: f64 = 0.2;

/// Obscurity when no film in the group has a vote count
const UNKNOWN_OBSCURITY: f64 = 0.5;

/// log10 of the vote count treated as fully familiar
const FAMILIAR_LOG_VOTES: f64 = 5.0;

/// Band for a score; total over all inputs
pub fn band_for_score(score: f64) -> (Difficulty, GroupColor) {
    let difficulty = if score.is_nan() || score < EASY_UPPER {
        Difficulty::Easy
    } else if score < MEDIUM_UPPER {
        Difficulty::Medium
    } else if score < HARD_UPPER {
        Difficulty::Hard
    } else {
        Difficulty::Hardest
    };
    (difficulty, difficulty.color())
}

/// Fixed score for a declared difficulty label (band midpoint)
pub fn score_for_label(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 0.125,
        Difficulty::Medium => 0.375,
        Difficulty::Hard => 0.625,
        Difficulty::Hardest => 0.875,
    }
}

/// Base score for deterministic connection types
fn base_score(connection_type: &ConnectionType) -> f64 {
    match connection_type {
        ConnectionType::Actor => 0.10,
        ConnectionType::Director => 0.15,
        ConnectionType::Genre => 0.45,
        ConnectionType::TitlePattern(_) => 0.55,
        ConnectionType::Suggested(_) => score_for_label(Difficulty::Medium),
    }
}

fn obscurity_weight(connection_type: &ConnectionType) -> f64 {
    match connection_type {
        ConnectionType::Actor | ConnectionType::Director => PERSON_OBSCURITY_WEIGHT,
        _ => OBSCURITY_WEIGHT,
    }
}

/// Group score and band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyAssignment {
    pub score: f64,
    pub difficulty: Difficulty,
    pub color: GroupColor,
}

/// Difficulty Assigner
#[derive(Debug, Clone, Copy, Default)]
pub struct DifficultyAssigner;

impl DifficultyAssigner {
    pub fn new() -> Self {
        Self
    }

    /// Score one group; `films` are the group's four records
    pub fn assign(&self, group: &CandidateGroup, films: &[&FilmRecord]) -> DifficultyAssignment {
        let raw = match (group.source, group.declared_difficulty) {
            (GroupSource::AiThematic, Some(declared)) => score_for_label(declared),
            (GroupSource::AiThematic, None) => score_for_label(Difficulty::Medium),
            (GroupSource::Deterministic, _) => {
                base_score(&group.connection_type)
                    + obscurity_weight(&group.connection_type) * obscurity(films)
            }
        };
        let score = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };
        let (difficulty, color) = band_for_score(score);

        DifficultyAssignment {
            score,
            difficulty,
            color,
        }
    }
}

/// 0.0 for blockbusters, 1.0 for films nobody voted on
fn obscurity(films: &[&FilmRecord]) -> f64 {
    let counts: Vec<f64> = films.iter().filter_map(|f| f.vote_count).map(|v| v as f64).collect();
    if counts.is_empty() {
        return UNKNOWN_OBSCURITY;
    }
    let average = counts.iter().sum::<f64>() / counts.len() as f64;
    let familiarity = ((average + 1.0).log10() / FAMILIAR_LOG_VOTES).clamp(0.0, 1.0);
    1.0 - familiarity
}
