//! Run statistics
//!
//! Counters collected across all phases of one generation run and returned
//! alongside the groups.

use crate::types::RejectionReason;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatistics {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Films in the raw pool
    pub pool_size: usize,
    /// Raw records dropped for repeating an earlier film id
    pub duplicate_films: usize,
    /// Films remaining after pool filters
    pub filtered_count: usize,
    /// Groups produced by the discoverers
    pub deterministic_found: usize,
    /// Suggestions supplied by the caller
    pub suggestions_received: usize,
    /// Candidates from discovery plus suggestions
    pub total_found: usize,
    /// Rejections keyed by reason code
    pub rejections: BTreeMap<String, usize>,
    /// Groups surviving dedup
    pub accepted: usize,
    /// Groups in the returned batch
    pub returned: usize,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: None,
            pool_size: 0,
            duplicate_films: 0,
            filtered_count: 0,
            deterministic_found: 0,
            suggestions_received: 0,
            total_found: 0,
            rejections: BTreeMap::new(),
            accepted: 0,
            returned: 0,
        }
    }

    pub fn record_rejection(&mut self, reason: &RejectionReason) {
        *self.rejections.entry(reason.code().to_string()).or_insert(0) += 1;
    }

    /// Rejections for one reason code
    pub fn rejected(&self, code: &str) -> usize {
        self.rejections.get(code).copied().unwrap_or(0)
    }

    pub fn total_rejected(&self) -> usize {
        self.rejections.values().sum()
    }

    /// One-line summary for logs and the CLI
    pub fn display_string(&self) -> String {
        format!(
            "{} of {} films kept, {} candidates found, {} rejected, {} accepted, {} returned",
            self.filtered_count,
            self.pool_size,
            self.total_found,
            self.total_rejected(),
            self.accepted,
            self.returned
        )
    }
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new()
    }
}
