//! Error types for cinelink-gen
//!
//! Only two conditions abort a generation run: a filtered pool below the
//! minimum size, and nothing to generate from. Group rejections are
//! [`RejectionReason`](crate::types::RejectionReason) values, never errors.

use thiserror::Error;

/// Fatal generation error
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Filtered pool smaller than the configured minimum
    #[error("Filtered pool has {available} films, at least {required} required")]
    InsufficientPool { available: usize, required: usize },

    /// No discoverer enabled and no suggestions supplied
    #[error("No discovery sources: enable a discoverer or supply suggestions")]
    NoSources,

    /// Discovery task panicked or was cancelled
    #[error("Discovery task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// cinelink-common error; contradictory configuration arrives as
    /// `Common(Error::Config(..))`
    #[error("{0}")]
    Common(#[from] cinelink_common::Error),
}
