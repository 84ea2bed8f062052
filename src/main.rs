//! SERP Harvest main entry point
//!
//! This is the command-line interface for the SERP Harvest batch exporter.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serp_harvest::config::{load_config_with_hash, validate, Config, Credentials};
use serp_harvest::keywords::load_keywords;
use serp_harvest::output::{
    print_summary, write_batch_outputs, ConsoleProgress, ProgressReporter, SilentProgress,
};
use serp_harvest::pipeline::harvest;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code after Ctrl-C, following the shell convention for SIGINT
const EXIT_INTERRUPTED: u8 = 130;

/// SERP Harvest: a bounded-concurrency SERP batch exporter
///
/// Fetches organic results, AI overview citations and AI mode answers for
/// every keyword in the input file and writes them as CSV and JSON.
/// API credentials are read from the environment variables named in the
/// configuration (SERP_API_USERNAME and SERP_API_PASSWORD by default).
#[derive(Parser, Debug)]
#[command(name = "serp-harvest")]
#[command(version)]
#[command(about = "A bounded-concurrency SERP batch exporter", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Keywords file, one keyword per line
    #[arg(long, value_name = "FILE", global = true)]
    keywords: Option<PathBuf>,

    /// Directory receiving the csv/ and json/ outputs
    #[arg(long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Skip the AI mode fetch for every keyword
    #[arg(long, global = true)]
    no_ai_mode: bool,

    /// Validate config and keywords without calling the API
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the batch (default)
    Run,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the progress line on stdout stays readable.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("serp_harvest=info,warn"),
            1 => EnvFilter::new("serp_harvest=debug,info"),
            2 => EnvFilter::new("serp_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let command = cli.command.unwrap_or(Command::Run);
    let config = load_effective_config(&cli)?;

    // Keywords are checked before any network activity
    let keywords_path = PathBuf::from(&config.input.keywords_path);
    let keywords = load_keywords(&keywords_path)?;
    tracing::info!(
        "Loaded {} keywords from {}",
        keywords.len(),
        keywords_path.display()
    );

    if cli.dry_run {
        handle_dry_run(&config, &keywords);
        return Ok(ExitCode::SUCCESS);
    }

    match command {
        Command::Run => handle_run(config, keywords, cli.quiet).await,
    }
}

/// Loads the config file (or defaults) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(path) = &cli.keywords {
        config.input.keywords_path = path.display().to_string();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }
    if cli.no_ai_mode {
        config.api.ai_mode = false;
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config, keywords: &[String]) {
    println!("=== SERP Harvest Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Location code: {}", config.api.location_code);
    println!("  Language code: {}", config.api.language_code);
    println!("  Device / OS: {} / {}", config.api.device, config.api.os);
    println!("  Depth: {}", config.api.depth);
    println!(
        "  AI mode: {}",
        if config.api.ai_mode { "enabled" } else { "disabled" }
    );

    println!("\nFetch:");
    println!(
        "  Max concurrent requests: {}",
        config.fetch.max_concurrent_requests
    );
    println!("  Request timeout: {}s", config.fetch.request_timeout_secs);
    println!("  Max retries: {}", config.fetch.max_retries);
    println!("  Retry delay base: {}ms", config.fetch.retry_delay_base_ms);

    println!("\nCredentials:");
    for var in [
        &config.credentials.username_env,
        &config.credentials.password_env,
    ] {
        let status = match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => "set",
            _ => "NOT SET",
        };
        println!("  {}: {}", var, status);
    }

    println!("\nOutput directory: {}", config.output.directory);

    println!("\nKeywords ({}):", keywords.len());
    for keyword in keywords.iter().take(10) {
        println!("  - {}", keyword);
    }
    if keywords.len() > 10 {
        println!("  ... and {} more", keywords.len() - 10);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main batch operation
async fn handle_run(config: Config, keywords: Vec<String>, quiet: bool) -> anyhow::Result<ExitCode> {
    let credentials = Credentials::from_env(&config.credentials)?;

    tracing::info!(
        "Processing {} keywords with {} concurrent requests, {}s timeout",
        keywords.len(),
        config.fetch.max_concurrent_requests,
        config.fetch.request_timeout_secs
    );
    tracing::info!(
        "Google AI mode: {}",
        if config.api.ai_mode { "enabled" } else { "disabled" }
    );

    let reporter: Box<dyn ProgressReporter> = if quiet {
        Box::new(SilentProgress)
    } else {
        Box::new(ConsoleProgress)
    };

    let result = harvest(
        &config,
        &credentials,
        keywords,
        reporter.as_ref(),
        shutdown_signal(),
    )
    .await?;

    let paths = write_batch_outputs(
        Path::new(&config.output.directory),
        result.started_at,
        &result.rows,
    )
    .context("Failed to write results")?;

    if !quiet {
        print_summary(&result.stats, result.elapsed);
        println!("Wrote {} total rows to:", result.rows.len());
        println!("  CSV:  {}", paths.csv.display());
        println!("  JSON: {}", paths.json.display());
    }

    if result.interrupted {
        tracing::warn!(
            "Batch interrupted; output holds only the {} keywords that finished",
            result.stats.completed
        );
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
