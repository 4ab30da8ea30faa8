//! cinelink-gen - Main entry point
//!
//! Reads a film pool (and optionally a suggestion batch) from JSON, runs one
//! generation call and writes the verified groups plus run statistics.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cinelink_common::config::{load_or_default, TomlConfig};
use cinelink_gen::input::{load_pool, load_suggestions, write_output};
use cinelink_gen::{GenerationEvent, Generator};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for cinelink-gen
#[derive(Parser, Debug)]
#[command(name = "cinelink-gen")]
#[command(about = "Film connection-group discovery and verification")]
#[command(version)]
struct Args {
    /// Film pool JSON (array of film records)
    #[arg(short, long, env = "CINELINK_POOL")]
    pool: PathBuf,

    /// Suggestion batch JSON; indices refer to the pool file order
    #[arg(short, long, env = "CINELINK_SUGGESTIONS")]
    suggestions: Option<PathBuf>,

    /// Config file (overrides CINELINK_CONFIG and the platform default)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum groups returned
    #[arg(long)]
    max_groups: Option<usize>,

    /// Recently used connection text to exclude (repeatable)
    #[arg(long = "recent")]
    recent: Vec<String>,

    /// Shuffle the filtered pool before discovery
    #[arg(long)]
    shuffle: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before the subscriber exists; log its resolution to a
    // temporary stderr subscriber
    let bootstrap = tracing_subscriber::fmt().with_writer(std::io::stderr).finish();
    let mut config: TomlConfig = tracing::subscriber::with_default(bootstrap, || {
        load_or_default(args.config.as_deref())
    })
    .context("Failed to load configuration")?;

    let default_filter = format!("cinelink_gen={0},cinelink_common={0}", config.logging.level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    apply_overrides(&mut config, &args);
    info!(
        pool = %args.pool.display(),
        max_groups = config.generator.max_groups_per_batch,
        seed = ?config.generator.seed,
        "Starting cinelink-gen"
    );

    let pool = load_pool(&args.pool).context("Failed to load film pool")?;
    let suggestions = match &args.suggestions {
        Some(path) => load_suggestions(path).context("Failed to load suggestions")?,
        None => Vec::new(),
    };

    let (event_tx, mut event_rx) = mpsc::channel::<GenerationEvent>(256);
    let event_logger = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(event = ?event, "Generation event");
        }
    });

    let generator = Generator::new(config.generator).with_events(event_tx);
    let output = generator
        .generate(pool, &suggestions)
        .await
        .context("Generation failed")?;
    drop(generator);
    let _ = event_logger.await;

    info!("{}", output.statistics.display_string());
    write_output(&output, args.output.as_deref()).context("Failed to write output")?;

    Ok(())
}

/// CLI values win over the config file
fn apply_overrides(config: &mut TomlConfig, args: &Args) {
    let generator = &mut config.generator;
    if let Some(seed) = args.seed {
        generator.seed = Some(seed);
    }
    if let Some(max_groups) = args.max_groups {
        generator.max_groups_per_batch = max_groups;
    }
    if args.shuffle {
        generator.shuffle_pool = true;
    }
    generator.recent_connections.extend(args.recent.iter().cloned());
}
