//! cinelink-gen: film connection-group discovery and verification
//!
//! Builds puzzle groups of four films sharing a verifiable connection, from
//! deterministic discovery over a film pool and from externally suggested
//! groups. No group reaches the output without passing the Verification
//! Engine.

pub mod dedup;
pub mod difficulty;
pub mod discovery;
pub mod error;
pub mod events;
pub mod input;
pub mod orchestrator;
pub mod types;
pub mod validators;
pub mod verification;

pub use error::GenerationError;
pub use events::{GenerationEvent, GenerationPhase};
pub use orchestrator::{GenerationOutput, Generator, RunStatistics};
pub use types::{Discoverer, RejectionReason};
pub use validators::SuggestionValidator;
pub use verification::{VerificationEngine, VerificationResult};
