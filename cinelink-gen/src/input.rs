//! JSON file contracts
//!
//! - Pool: array of FilmRecord from the metadata collaborator
//! - Suggestions: array of loosely typed suggestion objects
//! - Output: `{ "groups": [...], "statistics": {...} }`
//!
//! Individual suggestions are parsed leniently: an entry that is not even a
//! suggestion-shaped object is skipped with a warning instead of failing the
//! whole batch.

use crate::orchestrator::GenerationOutput;
use cinelink_common::models::{FilmRecord, Suggestion};
use cinelink_common::{Error, Result};
use std::path::Path;
use tracing::{info, warn};

/// Read the film pool
pub fn load_pool(path: &Path) -> Result<Vec<FilmRecord>> {
    let content = std::fs::read_to_string(path)?;
    let pool: Vec<FilmRecord> = serde_json::from_str(&content).map_err(|e| {
        Error::InvalidInput(format!("Invalid film pool {}: {}", path.display(), e))
    })?;
    info!(path = %path.display(), films = pool.len(), "Loaded film pool");
    Ok(pool)
}

/// Read a suggestion batch
pub fn load_suggestions(path: &Path) -> Result<Vec<Suggestion>> {
    let content = std::fs::read_to_string(path)?;
    parse_suggestions(&content)
}

/// Parse a suggestion batch, skipping entries that aren't suggestion objects
pub fn parse_suggestions(content: &str) -> Result<Vec<Suggestion>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(content)
        .map_err(|e| Error::InvalidInput(format!("Suggestions must be a JSON array: {}", e)))?;

    let total = raw.len();
    let suggestions: Vec<Suggestion> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<Suggestion>(value) {
            Ok(suggestion) => Some(suggestion),
            Err(e) => {
                warn!(index = i, error = %e, "Skipping unparseable suggestion");
                None
            }
        })
        .collect();

    info!(parsed = suggestions.len(), total = total, "Loaded suggestions");
    Ok(suggestions)
}

/// Write generation output as pretty JSON, to a file or stdout
pub fn write_output(output: &GenerationOutput, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(output)?;
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, json)?;
            info!(path = %path.display(), groups = output.groups.len(), "Wrote output");
        }
        None => println!("{}", json),
    }
    Ok(())
}
