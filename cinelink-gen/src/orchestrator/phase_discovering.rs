//! Phase 2: DISCOVERING
//!
//! Each enabled discoverer scans the shared read-only pool on the blocking
//! thread pool. Results are concatenated in discoverer-list order and then
//! stably sorted by connection priority, so the output does not depend on
//! which task finished first. `max_discovered_groups` caps the sorted list.

use super::Generator;
use crate::discovery::rank_and_cap;
use crate::error::GenerationError;
use crate::events::GenerationEvent;
use cinelink_common::models::{CandidateGroup, FilmRecord};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info};

impl Generator {
    /// Phase 2: DISCOVERING - run all discoverers concurrently
    pub(super) async fn phase_discovering(
        &self,
        pool: Arc<Vec<FilmRecord>>,
    ) -> Result<Vec<CandidateGroup>, GenerationError> {
        let tasks = self.discoverers.iter().map(|discoverer| {
            let discoverer = Arc::clone(discoverer);
            let pool = Arc::clone(&pool);
            tokio::task::spawn_blocking(move || {
                let groups = discoverer.analyze(&pool);
                (discoverer.name(), groups)
            })
        });

        let mut groups = Vec::new();
        for joined in join_all(tasks).await {
            let (name, found) = joined?;
            debug!(discoverer = name, groups = found.len(), "Discoverer finished");
            self.emit_event(GenerationEvent::DiscovererCompleted {
                discoverer: name.to_string(),
                groups_found: found.len(),
            });
            groups.extend(found);
        }

        rank_and_cap(&mut groups, self.config.max_discovered_groups);

        info!(
            discoverers = self.discoverers.len(),
            groups = groups.len(),
            "Phase 2: DISCOVERING complete"
        );

        Ok(groups)
    }
}
