//! Verification Engine
//!
//! Stateless predicate evaluator: checks one claimed attribute against each
//! film of a group. A group is valid only when every film passes.
//!
//! # Verification Types
//! - `overview-keywords`: any (default) or all keywords appear in the overview
//! - `title-contains`: case-insensitive substring of the title
//! - `title-pattern`: case-insensitive regex searched in the title
//! - `genre-includes`: genre id present in the film's genre set
//! - `director` / `actor`: person credited as director / anywhere in the cast
//! - `decade`: `floor(year / 10) * 10` equals the claimed decade
//! - `year-range`: release year inside the (possibly open) range
//!
//! Malformed parameters and invalid regexes fail every film with a reason;
//! the engine never returns an error or panics on untrusted descriptors.

mod rules;

pub use rules::VerificationRule;

use cinelink_common::models::{
    CandidateGroup, FilmId, FilmRecord, VerificationParams, VerificationType, GROUP_SIZE,
};
use serde::Serialize;
use tracing::debug;

/// Per-film verification outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmCheck {
    pub film_id: FilmId,
    pub title: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Aggregate verification outcome for a group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub connection: String,
    /// AND over all films (and exactly four films supplied)
    pub valid: bool,
    pub films: Vec<FilmCheck>,
    /// One diagnostic per failing film, keyed by title
    pub issues: Vec<String>,
}

/// Verification Engine
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationEngine;

impl VerificationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Verify a claimed connection against a group of films
    pub fn verify(
        &self,
        connection: &str,
        verification_type: VerificationType,
        params: &VerificationParams,
        films: &[&FilmRecord],
    ) -> VerificationResult {
        let rule = VerificationRule::compile(verification_type, params);

        let checks: Vec<FilmCheck> = films
            .iter()
            .map(|film| {
                let outcome = match &rule {
                    Ok(rule) => rule.check(film),
                    Err(reason) => Err(reason.clone()),
                };
                FilmCheck {
                    film_id: film.id,
                    title: film.title.clone(),
                    passed: outcome.is_ok(),
                    reason: outcome.err(),
                }
            })
            .collect();

        let mut issues: Vec<String> = checks
            .iter()
            .filter_map(|c| c.reason.as_ref().map(|r| format!("{}: {}", c.title, r)))
            .collect();

        if films.len() != GROUP_SIZE {
            issues.push(format!(
                "Expected {} films, got {}",
                GROUP_SIZE,
                films.len()
            ));
        }

        let valid = films.len() == GROUP_SIZE && checks.iter().all(|c| c.passed);

        debug!(
            connection = %connection,
            verification_type = %verification_type,
            valid = valid,
            failures = issues.len(),
            "Verification complete"
        );

        VerificationResult {
            connection: connection.to_string(),
            valid,
            films: checks,
            issues,
        }
    }

    /// Verify a group using its own descriptor
    pub fn verify_group(&self, group: &CandidateGroup, films: &[&FilmRecord]) -> VerificationResult {
        self.verify(
            &group.connection,
            group.verification.verification_type,
            &group.verification.verification_params,
            films,
        )
    }
}
