//! Beast-Tally main entry point
//!
//! This is the command-line interface for the Beast-Tally letter census.

use anyhow::Context;
use beast_tally::collector::run_collection;
use beast_tally::config::{load_optional_config, Config};
use beast_tally::output::{print_tally, read_tally_csv, CsvDestination};
use beast_tally::url::validate_source_url;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Beast-Tally: counts category entries per leading letter
///
/// Walks a paginated category listing, counts distinct entries for each
/// leading letter of the target alphabet, and writes the totals to a CSV
/// file as `letter,count` rows.
#[derive(Parser, Debug)]
#[command(name = "beast-tally")]
#[command(version)]
#[command(about = "Counts category entries per leading letter", long_about = None)]
struct Cli {
    /// Listing page to start from (defaults to the configured start-url)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// CSV file to write (defaults to the configured destination)
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate inputs and show what would be collected without fetching
    #[arg(long, conflicts_with = "show")]
    dry_run: bool,

    /// Print an existing tally file and exit
    #[arg(long, conflicts_with = "dry_run")]
    show: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_optional_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from {}", path.display());
    }

    let url = cli.url.unwrap_or_else(|| config.site.start_url.clone());
    let output = cli.output.unwrap_or_else(|| config.output.destination.clone());

    if cli.dry_run {
        handle_dry_run(&config, &url, &output)
    } else if cli.show {
        handle_show(&output)
    } else {
        handle_collect(&config, &url, &output, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("beast_tally=info,warn"),
            1 => EnvFilter::new("beast_tally=debug,info"),
            2 => EnvFilter::new("beast_tally=trace,debug"),
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

/// Handles --dry-run: validates inputs and prints the plan
fn handle_dry_run(config: &Config, url: &str, output: &str) -> anyhow::Result<()> {
    let destination = CsvDestination::new(output)?;
    validate_source_url(url, &config.site.allowed_domain)?;

    println!("=== Beast-Tally Dry Run ===\n");

    println!("Source:");
    println!("  Start URL: {}", url);
    println!("  Origin: {}", config.site.origin);
    println!("  Allowed domain: {}", config.site.allowed_domain);

    println!("\nFetcher:");
    println!("  User agent: {}", config.user_agent.header_value());
    println!("  Max attempts: {}", config.fetch.max_attempts);
    println!("  Backoff unit: {}ms", config.fetch.backoff_unit_ms);

    println!("\nListing:");
    println!("  Container: {}", config.listing.container_selector);
    println!("  Letter groups: {}", config.listing.group_selector);
    println!("  Next page link: \"{}\"", config.listing.next_page_text);
    println!(
        "  Alphabet ({} letters): {}",
        config.listing.alphabet.chars().count(),
        config.listing.alphabet
    );

    println!("\nOutput:");
    println!("  Destination: {}", destination);

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles --show: prints a previously written tally
fn handle_show(output: &str) -> anyhow::Result<()> {
    let destination = CsvDestination::new(output)?;
    let tally = read_tally_csv(destination.path())
        .with_context(|| format!("reading {}", destination))?;

    println!("File: {}\n", destination);
    print_tally(&tally);
    Ok(())
}

/// Handles the main collection run
async fn handle_collect(config: &Config, url: &str, output: &str, quiet: bool) -> anyhow::Result<()> {
    match run_collection(config, url, output).await {
        Ok(tally) => {
            if !quiet {
                print_tally(&tally);
                if !tally.is_empty() {
                    println!("\n✓ Results written to: {}", output);
                }
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Collection failed: {}", e);
            Err(e.into())
        }
    }
}
