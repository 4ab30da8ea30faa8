//! Suggestion Validator
//!
//! Quality gate for externally generated suggestions. Suggestions are untrusted:
//! each one is checked by an ordered rule list and the first failing rule
//! decides the rejection reason.
//!
//! # Rule Order
//! 1. **Malformed**: not exactly four indices, index out of bounds or repeated,
//!    repeated film, film removed by pool filters, empty connection text
//! 2. **Franchise clustering**: see [`franchise`]
//! 3. **Trivial pattern**: see [`trivial`]
//! 4. **False title claim**: see [`title_claims`]
//! 5. **Missing verification**: no usable verification descriptor
//! 6. **Failed verification**: Verification Engine rejects any film
//!
//! A rejected suggestion is dropped, never raised as an error.
//!
//! # Example
//! ```rust,ignore
//! let validator = SuggestionValidator::new();
//! match validator.validate(&suggestion, &films, |id| retained.contains(&id)) {
//!     Ok(group) => accepted.push(group),
//!     Err(reason) => debug!(reason = %reason, "Suggestion rejected"),
//! }
//! ```

pub mod franchise;
pub mod title_claims;
pub mod trivial;

pub use franchise::detect_franchise_clustering;
pub use title_claims::{check_title_claims, TitleClaim};
pub use trivial::detect_trivial_pattern;

use crate::types::RejectionReason;
use crate::verification::{VerificationEngine, VerificationRule};
use cinelink_common::models::{
    CandidateGroup, Category, ConnectionType, Difficulty, FilmId, FilmRecord, GroupSource,
    Suggestion, VerificationDescriptor, VerificationParams, VerificationType, GROUP_SIZE,
};
use tracing::debug;

/// Connection type given to suggestions that don't name one
pub const DEFAULT_SUGGESTED_TYPE: &str = "ai-thematic";

/// Suggestion Validator
#[derive(Debug, Clone, Default)]
pub struct SuggestionValidator {
    engine: VerificationEngine,
}

impl SuggestionValidator {
    pub fn new() -> Self {
        Self {
            engine: VerificationEngine::new(),
        }
    }

    /// Validate one suggestion
    ///
    /// `films` is the array the suggestion's indices refer to. `is_retained`
    /// reports whether a film survived pool filtering.
    pub fn validate<F>(
        &self,
        suggestion: &Suggestion,
        films: &[FilmRecord],
        is_retained: F,
    ) -> Result<CandidateGroup, RejectionReason>
    where
        F: Fn(FilmId) -> bool,
    {
        let connection = suggestion.connection.trim();

        // Rule 1: well-formed
        let selected = resolve_films(suggestion, films, &is_retained)?;
        if connection.is_empty() {
            return Err(RejectionReason::Malformed("Empty connection text".to_string()));
        }
        let titles: Vec<&str> = selected.iter().map(|f| f.title.as_str()).collect();

        // Rule 2: franchise clustering
        if let Some(detail) = detect_franchise_clustering(connection, &titles) {
            return Err(RejectionReason::FranchiseClustering(detail));
        }

        // Rule 3: trivial pattern
        if let Some(detail) = detect_trivial_pattern(connection) {
            return Err(RejectionReason::TrivialPattern(detail));
        }

        // Rule 4: structural title claims
        if let Some(detail) = check_title_claims(connection, &titles) {
            return Err(RejectionReason::FalseTitleClaim(detail));
        }

        // Rule 5: usable descriptor
        let verification = parse_descriptor(suggestion)?;

        // Rule 6: every film passes
        let result = self.engine.verify(
            connection,
            verification.verification_type,
            &verification.verification_params,
            &selected,
        );
        if !result.valid {
            return Err(RejectionReason::FailedVerification(result.issues));
        }

        let film_ids = CandidateGroup::checked_ids(&selected.iter().map(|f| f.id).collect::<Vec<_>>())
            .map_err(|e| RejectionReason::Malformed(e.to_string()))?;

        debug!(
            connection = %connection,
            film_ids = ?film_ids,
            verification_type = %verification.verification_type,
            "Suggestion accepted"
        );

        Ok(CandidateGroup {
            film_ids,
            connection_type: suggestion
                .connection_type
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| ConnectionType::from(s.to_string()))
                .unwrap_or_else(|| ConnectionType::Suggested(DEFAULT_SUGGESTED_TYPE.to_string())),
            connection: connection.to_string(),
            category: parse_or_default(suggestion.category.as_deref(), Category::Thematic),
            verification,
            source: GroupSource::AiThematic,
            declared_difficulty: Some(parse_or_default(suggestion.difficulty.as_deref(), Difficulty::Medium)),
            explanation: Some(suggestion.explanation.trim().to_string()).filter(|e| !e.is_empty()),
        })
    }
}

/// Map indices to films, rejecting anything malformed
fn resolve_films<'a, F>(
    suggestion: &Suggestion,
    films: &'a [FilmRecord],
    is_retained: &F,
) -> Result<Vec<&'a FilmRecord>, RejectionReason>
where
    F: Fn(FilmId) -> bool,
{
    let indices = &suggestion.film_indices;
    if indices.len() != GROUP_SIZE {
        return Err(RejectionReason::Malformed(format!(
            "Expected {} film indices, got {}",
            GROUP_SIZE,
            indices.len()
        )));
    }

    let mut selected: Vec<&FilmRecord> = Vec::with_capacity(GROUP_SIZE);
    for (position, &index) in indices.iter().enumerate() {
        let film = usize::try_from(index)
            .ok()
            .and_then(|i| films.get(i))
            .ok_or_else(|| {
                RejectionReason::Malformed(format!(
                    "Film index {} out of bounds (pool size {})",
                    index,
                    films.len()
                ))
            })?;

        if indices[..position].contains(&index) {
            return Err(RejectionReason::Malformed(format!("Film index {} repeated", index)));
        }
        if selected.iter().any(|f| f.id == film.id) {
            return Err(RejectionReason::Malformed(format!("Film '{}' selected twice", film.title)));
        }
        if !is_retained(film.id) {
            return Err(RejectionReason::Malformed(format!(
                "Film '{}' excluded by pool filters",
                film.title
            )));
        }
        selected.push(film);
    }

    Ok(selected)
}

/// Parse the loosely typed descriptor into something the engine can run
fn parse_descriptor(suggestion: &Suggestion) -> Result<VerificationDescriptor, RejectionReason> {
    let type_name = suggestion
        .verification_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RejectionReason::MissingVerification("No verificationType supplied".to_string()))?;

    let verification_type: VerificationType = type_name.parse().map_err(|_| {
        RejectionReason::MissingVerification(format!("Unknown verificationType '{}'", type_name))
    })?;

    let raw_params = suggestion
        .verification_params
        .as_ref()
        .filter(|v| !v.is_null())
        .ok_or_else(|| RejectionReason::MissingVerification("No verificationParams supplied".to_string()))?;

    let params: VerificationParams = serde_json::from_value(raw_params.clone()).map_err(|e| {
        RejectionReason::MissingVerification(format!("Unusable verificationParams: {}", e))
    })?;

    // Params must carry what the type needs ("director" without personId)
    VerificationRule::compile(verification_type, &params).map_err(|reason| {
        RejectionReason::MissingVerification(format!("Unusable verificationParams: {}", reason))
    })?;

    Ok(VerificationDescriptor::new(verification_type, params))
}

fn parse_or_default<T: std::str::FromStr>(value: Option<&str>, default: T) -> T {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}
