//! Canary main entry point
//!
//! This is the command-line interface for the Canary business record miner.

use anyhow::Context;
use canary::config::{load_config_with_hash, Config};
use canary::crawler::run_crawl;
use canary::frontier::SqliteFrontier;
use canary::sink::SqliteRecordSink;
use canary::{Site, TargetId};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Canary: a frontier-driven business record miner
///
/// Canary claims business identifiers from a shared frontier, assembles and
/// validates one record per business, and feeds every business it discovers
/// along the way back into the frontier.
#[derive(Parser, Debug)]
#[command(name = "canary")]
#[command(version = "1.0.0")]
#[command(about = "A frontier-driven business record miner", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Add a target identifier to the frontier before crawling (repeatable)
    #[arg(long = "seed", value_name = "ID")]
    seeds: Vec<String>,

    /// Stop after attempting this many targets
    #[arg(long, value_name = "N")]
    max_targets: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the endpoints that would be used
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show frontier and record statistics and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let seeds = cli
        .seeds
        .iter()
        .map(|s| TargetId::new(s.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .context("invalid --seed")?;

    if cli.dry_run {
        handle_dry_run(&config, &seeds)
    } else if cli.stats {
        handle_stats(&config).await
    } else {
        handle_crawl(config, &seeds, cli.max_targets).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("canary=info,warn"),
            1 => EnvFilter::new("canary=debug,info"),
            2 => EnvFilter::new("canary=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the endpoint shapes
fn handle_dry_run(config: &Config, seeds: &[TargetId]) -> anyhow::Result<()> {
    let site = Site::from_config(&config.site)?;
    let example = match seeds.first() {
        Some(seed) => seed.clone(),
        None => TargetId::new("example-business")?,
    };

    println!("=== Canary Dry Run ===\n");

    println!("Site:");
    println!("  Origin: {}", site.origin());
    println!("  Entity type: {}", site.entity_type());
    println!("  Link key: {}", site.link_key());

    println!("\nEndpoints (for {}):", example);
    println!("  Page: {}", site.page_url(&example)?);
    println!("  Payload: {}", site.props_url(&example)?);

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout_secs);

    println!("\nStores:");
    println!("  Frontier: {}", config.frontier.database_path);
    println!("  Records: {}", config.output.records_path);
    println!("  Audit files: {}", config.output.audit_dir);

    println!("\n✓ Configuration is valid");
    println!("✓ Would seed {} targets", seeds.len());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the stores
async fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use canary::output::{load_statistics, print_statistics};

    println!("Frontier: {}", config.frontier.database_path);
    println!("Records: {}\n", config.output.records_path);

    let frontier = SqliteFrontier::open(Path::new(&config.frontier.database_path))?;
    let sink = SqliteRecordSink::open(Path::new(&config.output.records_path))?;

    let stats = load_statistics(&frontier, &sink).await?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    seeds: &[TargetId],
    max_targets: Option<u64>,
) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} ({} seeds on the command line)",
        config.site.origin,
        seeds.len()
    );

    match run_crawl(config, seeds, max_targets).await {
        Ok(stats) => {
            tracing::info!(
                "Crawl completed successfully: {} records stored, {} new targets queued",
                stats.completed,
                stats.added
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
