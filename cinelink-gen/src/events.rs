//! Generation progress events
//!
//! Sent over an optional bounded channel. The generator never waits on a slow
//! or dropped receiver for correctness; send failures are ignored.

use cinelink_common::models::FilmId;
use serde::Serialize;

/// Generator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPhase {
    Filtering,
    Discovering,
    Validating,
    Deduping,
    Selecting,
    Done,
}

impl GenerationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationPhase::Filtering => "filtering",
            GenerationPhase::Discovering => "discovering",
            GenerationPhase::Validating => "validating",
            GenerationPhase::Deduping => "deduping",
            GenerationPhase::Selecting => "selecting",
            GenerationPhase::Done => "done",
        }
    }
}

/// Progress event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GenerationEvent {
    /// Generator entered a new state
    PhaseChanged {
        phase: GenerationPhase,
        /// Unix timestamp (seconds since epoch)
        timestamp: i64,
    },

    /// One discoverer finished scanning the pool
    DiscovererCompleted {
        discoverer: String,
        groups_found: usize,
    },

    /// A candidate group was dropped
    GroupRejected {
        connection: String,
        film_ids: Vec<FilmId>,
        /// Rejection code (e.g. "high-overlap")
        reason: String,
        detail: String,
    },

    /// Run finished
    Completed {
        total_found: usize,
        accepted: usize,
        returned: usize,
        duration_ms: u64,
    },
}
