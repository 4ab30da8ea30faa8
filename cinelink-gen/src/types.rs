//! Core trait and shared types for the generation pipeline
//!
//! - `Discoverer`: pluggable deterministic group source (Director, Actor,
//!   TitlePattern, Genre), selected per call via configuration
//! - `RejectionReason`: why a candidate group was dropped (never an error)

use cinelink_common::config::DiscovererKind;
use cinelink_common::models::{CandidateGroup, FilmRecord};
use serde::Serialize;
use std::fmt;

/// Deterministic group discoverer
///
/// Implementations scan a read-only pool and return groups that are true by
/// construction. They must not depend on pool order for correctness, only for
/// which films chunk together.
///
/// # Example
/// ```rust,ignore
/// use cinelink_gen::types::Discoverer;
///
/// struct DecadeDiscoverer;
///
/// impl Discoverer for DecadeDiscoverer {
///     fn name(&self) -> &'static str { "Decade" }
///     fn kind(&self) -> DiscovererKind { DiscovererKind::Genre }
///     fn analyze(&self, pool: &[FilmRecord]) -> Vec<CandidateGroup> {
///         // group by decade, chunk into fours
///         Vec::new()
///     }
/// }
/// ```
pub trait Discoverer: Send + Sync {
    /// Discoverer name for logging and events
    fn name(&self) -> &'static str;

    /// Configuration selector this discoverer answers to
    fn kind(&self) -> DiscovererKind;

    /// Scan the pool and return candidate groups
    fn analyze(&self, pool: &[FilmRecord]) -> Vec<CandidateGroup>;
}

/// Why a candidate group was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum RejectionReason {
    /// Wrong film count, out-of-bounds or repeated index, or film filtered out
    Malformed(String),
    /// Sequels or a named franchise grouped together
    FranchiseClustering(String),
    /// Low-information connection such as "one-word titles"
    TrivialPattern(String),
    /// Structural title claim contradicted by the literal titles
    FalseTitleClaim(String),
    /// No usable verification descriptor
    MissingVerification(String),
    /// Verification Engine rejected one or more films
    FailedVerification(Vec<String>),
    /// Connection text used recently
    RecentlyUsed,
    /// Identical film set already accepted
    DuplicateFingerprint,
    /// Shares too many films with an accepted group
    HighOverlap { shared: usize },
}

impl RejectionReason {
    /// Stable short code for counters and logs
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::Malformed(_) => "malformed",
            RejectionReason::FranchiseClustering(_) => "franchise-clustering",
            RejectionReason::TrivialPattern(_) => "trivial-pattern",
            RejectionReason::FalseTitleClaim(_) => "false-title-claim",
            RejectionReason::MissingVerification(_) => "missing-verification",
            RejectionReason::FailedVerification(_) => "failed-verification",
            RejectionReason::RecentlyUsed => "recently-used",
            RejectionReason::DuplicateFingerprint => "duplicate-fingerprint",
            RejectionReason::HighOverlap { .. } => "high-overlap",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Malformed(detail)
            | RejectionReason::FranchiseClustering(detail)
            | RejectionReason::TrivialPattern(detail)
            | RejectionReason::FalseTitleClaim(detail)
            | RejectionReason::MissingVerification(detail) => {
                write!(f, "{}: {}", self.code(), detail)
            }
            RejectionReason::FailedVerification(issues) => {
                write!(f, "{}: {}", self.code(), issues.join("; "))
            }
            RejectionReason::HighOverlap { shared } => {
                write!(f, "{}: {} shared films", self.code(), shared)
            }
            RejectionReason::RecentlyUsed | RejectionReason::DuplicateFingerprint => {
                f.write_str(self.code())
            }
        }
    }
}
