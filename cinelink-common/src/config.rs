//! Configuration loading and config file resolution
//!
//! TOML bootstrap configuration, resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. `CINELINK_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/cinelink/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing config file never stops the generator: it logs a warning and
//! continues with defaults. An unreadable or malformed file is an error.

use crate::models::GenreId;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "CINELINK_CONFIG";

/// Default maximum number of groups returned per batch
pub const DEFAULT_MAX_GROUPS_PER_BATCH: usize = 50;

/// Default minimum filtered pool size
pub const DEFAULT_MIN_POOL_SIZE: usize = 20;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Generator configuration (optional)
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Discoverer selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscovererKind {
    Director,
    Actor,
    Title,
    Genre,
}

impl DiscovererKind {
    pub const ALL: [DiscovererKind; 4] = [
        DiscovererKind::Director,
        DiscovererKind::Actor,
        DiscovererKind::Title,
        DiscovererKind::Genre,
    ];
}

/// Film pool filters applied before discovery
///
/// Films lacking a vote count or popularity never pass a minimum filter on
/// that field but always pass the corresponding maximum filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolFilters {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_vote_count: Option<u64>,
    pub max_vote_count: Option<u64>,
    pub min_popularity: Option<f64>,
    /// When non-empty, a film must carry at least one of these genres
    pub allowed_genres: Vec<GenreId>,
    /// A film carrying any of these genres is dropped
    pub excluded_genres: Vec<GenreId>,
}

/// Per-run generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub pool_filters: PoolFilters,
    pub max_groups_per_batch: usize,
    /// Cap on discovered groups, applied after the priority sort
    pub max_discovered_groups: Option<usize>,
    /// Filtered pools smaller than this abort the run
    pub min_pool_size: usize,
    pub enabled_discoverers: Vec<DiscovererKind>,
    /// Connection texts used recently; matching groups are excluded
    pub recent_connections: Vec<String>,
    /// Round-robin across connection families when capping
    pub prefer_diversity: bool,
    /// Shuffle the filtered pool before discovery
    pub shuffle_pool: bool,
    /// RNG seed; a fresh entropy seed is used when absent
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            pool_filters: PoolFilters::default(),
            max_groups_per_batch: DEFAULT_MAX_GROUPS_PER_BATCH,
            max_discovered_groups: None,
            min_pool_size: DEFAULT_MIN_POOL_SIZE,
            enabled_discoverers: DiscovererKind::ALL.to_vec(),
            recent_connections: Vec::new(),
            prefer_diversity: true,
            shuffle_pool: false,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Reject contradictory settings
    pub fn validate(&self) -> Result<()> {
        if self.max_groups_per_batch == 0 {
            return Err(Error::Config("max_groups_per_batch must be at least 1".to_string()));
        }
        if self.max_discovered_groups == Some(0) {
            return Err(Error::Config("max_discovered_groups must be at least 1".to_string()));
        }
        let filters = &self.pool_filters;
        if let (Some(min), Some(max)) = (filters.min_year, filters.max_year) {
            if min > max {
                return Err(Error::Config(format!("min_year {} is after max_year {}", min, max)));
            }
        }
        if let (Some(min), Some(max)) = (filters.min_vote_count, filters.max_vote_count) {
            if min > max {
                return Err(Error::Config(format!(
                    "min_vote_count {} exceeds max_vote_count {}",
                    min, max
                )));
            }
        }
        if let Some(genre) = filters
            .allowed_genres
            .iter()
            .find(|g| filters.excluded_genres.contains(g))
        {
            return Err(Error::Config(format!(
                "Genre {} is both allowed and excluded",
                genre
            )));
        }
        Ok(())
    }
}

/// Resolve which config file to read, if any
///
/// Returns `None` when neither the CLI nor the environment names a file and
/// no file exists at the platform default location.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|p| p.exists())
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cinelink").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    let config: TomlConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Resolve and load configuration, falling back to compiled defaults
///
/// A file named on the command line must exist. A file named by the
/// environment variable that does not exist only produces a warning.
pub fn load_or_default(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            info!(path = %path.display(), "Loaded configuration");
            Ok(config)
        }
        Some(path) if cli_arg.is_some() => Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        ))),
        Some(path) => {
            warn!(path = %path.display(), "Config file not found, using defaults");
            Ok(TomlConfig::default())
        }
        None => {
            info!("No config file found, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Write config to disk atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path)?;
    Ok(())
}
