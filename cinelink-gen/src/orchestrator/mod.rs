//! Generator Orchestrator
//!
//! Runs one generation call over a read-only film pool snapshot.
//!
//! # State Progression
//! FILTERING → DISCOVERING → VALIDATING → DEDUPING → SELECTING → DONE
//!
//! Each state is handled by a dedicated `phase_*` method in its own module.
//! Only two conditions abort a run: a filtered pool under the minimum size
//! ([`GenerationError::InsufficientPool`]) and nothing to generate from
//! ([`GenerationError::NoSources`]). Every other problem is a counted,
//! logged rejection and the run continues.
//!
//! # Randomness
//! Pool shuffling and the diversity cap draw from an injected RNG. Pass a
//! seeded `StdRng` to [`Generator::generate_with_rng`] (or set `seed` in the
//! config) for reproducible output.
//!
//! # Example
//! ```rust,ignore
//! let generator = Generator::new(config).with_events(tx);
//! let output = generator.generate(pool, &suggestions).await?;
//! println!("{}", output.statistics.display_string());
//! ```

mod phase_deduping;
mod phase_discovering;
mod phase_filtering;
mod phase_selecting;
mod phase_validating;
pub mod statistics;

pub use phase_deduping::normalize_connection;
pub use phase_filtering::passes_filters;
pub use phase_selecting::select_diverse;
pub use statistics::RunStatistics;

use crate::difficulty::DifficultyAssigner;
use crate::discovery::discoverers_for;
use crate::error::GenerationError;
use crate::events::{GenerationEvent, GenerationPhase};
use crate::types::{Discoverer, RejectionReason};
use crate::validators::SuggestionValidator;
use crate::verification::VerificationEngine;
use chrono::Utc;
use cinelink_common::config::GeneratorConfig;
use cinelink_common::models::{FilmId, FilmRecord, FormattedGroup, Suggestion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Result of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    pub groups: Vec<FormattedGroup>,
    pub statistics: RunStatistics,
}

/// Generator Orchestrator
pub struct Generator {
    config: GeneratorConfig,
    discoverers: Vec<Arc<dyn Discoverer>>,
    engine: VerificationEngine,
    validator: SuggestionValidator,
    assigner: DifficultyAssigner,
    event_tx: Option<mpsc::Sender<GenerationEvent>>,
}

impl Generator {
    /// Generator using the discoverers enabled in `config`
    pub fn new(config: GeneratorConfig) -> Self {
        let discoverers = discoverers_for(&config.enabled_discoverers);
        Self::with_discoverers(config, discoverers)
    }

    /// Generator with an explicit discoverer list
    ///
    /// `config.enabled_discoverers` is ignored; the list is used as given.
    pub fn with_discoverers(config: GeneratorConfig, discoverers: Vec<Arc<dyn Discoverer>>) -> Self {
        Self {
            config,
            discoverers,
            engine: VerificationEngine::new(),
            validator: SuggestionValidator::new(),
            assigner: DifficultyAssigner::new(),
            event_tx: None,
        }
    }

    /// Attach a progress event channel
    pub fn with_events(mut self, event_tx: mpsc::Sender<GenerationEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run a generation call, seeding the RNG from config (or entropy)
    pub async fn generate(
        &self,
        pool: Vec<FilmRecord>,
        suggestions: &[Suggestion],
    ) -> Result<GenerationOutput, GenerationError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with_rng(pool, suggestions, &mut rng).await
    }

    /// Run a generation call with an injected RNG
    ///
    /// Suggestion `filmIndices` refer to positions in `pool` as passed here.
    pub async fn generate_with_rng<R: Rng + Send + ?Sized>(
        &self,
        pool: Vec<FilmRecord>,
        suggestions: &[Suggestion],
        rng: &mut R,
    ) -> Result<GenerationOutput, GenerationError> {
        let start_time = Instant::now();
        let mut stats = RunStatistics::new();
        stats.suggestions_received = suggestions.len();

        self.config.validate()?;

        info!(
            run_id = %stats.run_id,
            pool_size = pool.len(),
            suggestions = suggestions.len(),
            discoverers = self.discoverers.len(),
            "Starting generation run"
        );

        if self.discoverers.is_empty() && suggestions.is_empty() {
            return Err(GenerationError::NoSources);
        }

        // Phase 1: FILTERING
        self.transition(GenerationPhase::Filtering);
        let mut filtered = self.phase_filtering(&pool, &mut stats)?;
        if self.config.shuffle_pool {
            filtered.shuffle(&mut *rng);
            debug!("Filtered pool shuffled");
        }
        let filtered = Arc::new(filtered);

        // Phase 2: DISCOVERING
        self.transition(GenerationPhase::Discovering);
        let discovered = self.phase_discovering(Arc::clone(&filtered)).await?;
        stats.deterministic_found = discovered.len();
        stats.total_found = discovered.len() + suggestions.len();

        let films: HashMap<FilmId, &FilmRecord> = filtered.iter().map(|f| (f.id, f)).collect();

        // Phase 3: VALIDATING
        self.transition(GenerationPhase::Validating);
        let verified = self.phase_validating(&pool, &films, discovered, suggestions, &mut stats);

        // Phase 4: DEDUPING
        self.transition(GenerationPhase::Deduping);
        let accepted = self.phase_deduping(verified, &mut stats);

        // Phase 5: SELECTING
        self.transition(GenerationPhase::Selecting);
        let selected = self.phase_selecting(accepted, rng);

        let created_at = Utc::now();
        let groups: Vec<FormattedGroup> = selected
            .into_iter()
            .map(|group| {
                let members: Vec<&FilmRecord> = group
                    .film_ids
                    .iter()
                    .filter_map(|id| films.get(id).copied())
                    .collect();
                let assignment = self.assigner.assign(&group, &members);
                FormattedGroup {
                    id: Uuid::new_v4(),
                    group,
                    difficulty_score: assignment.score,
                    difficulty: assignment.difficulty,
                    color: assignment.color,
                    verified: true,
                    created_at,
                }
            })
            .collect();

        stats.returned = groups.len();
        stats.completed_at = Some(Utc::now());
        self.transition(GenerationPhase::Done);

        let duration_ms = start_time.elapsed().as_millis() as u64;
        self.emit_event(GenerationEvent::Completed {
            total_found: stats.total_found,
            accepted: stats.accepted,
            returned: stats.returned,
            duration_ms,
        });

        info!(
            run_id = %stats.run_id,
            duration_ms = duration_ms,
            summary = %stats.display_string(),
            "Generation run complete"
        );

        Ok(GenerationOutput {
            groups,
            statistics: stats,
        })
    }

    fn transition(&self, phase: GenerationPhase) {
        debug!(phase = phase.as_str(), "Generator state transition");
        self.emit_event(GenerationEvent::PhaseChanged {
            phase,
            timestamp: Utc::now().timestamp(),
        });
    }

    /// Count, log and announce a dropped group
    fn reject(&self, connection: &str, film_ids: &[FilmId], reason: RejectionReason, stats: &mut RunStatistics) {
        debug!(
            connection = %connection,
            film_ids = ?film_ids,
            reason = %reason,
            "Group rejected"
        );
        stats.record_rejection(&reason);
        self.emit_event(GenerationEvent::GroupRejected {
            connection: connection.to_string(),
            film_ids: film_ids.to_vec(),
            reason: reason.code().to_string(),
            detail: reason.to_string(),
        });
    }

    /// Send event if a channel is attached; a full or closed channel drops it
    fn emit_event(&self, event: GenerationEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.try_send(event);
        }
    }
}
