//! # Cinelink Common Library
//!
//! Shared code for the cinelink connection-group generator including:
//! - Film and group data model (wire format shared with the persistence layer)
//! - Common error types
//! - TOML bootstrap configuration and its resolution chain

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{CandidateGroup, FilmId, FilmRecord, FormattedGroup};
