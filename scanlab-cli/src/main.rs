//! ScanLab CLI — scan, report, exchange and allocation commands.
//!
//! Commands:
//! - `scan` — score a snapshot file and write the hand-off document
//! - `report` — print a hand-off document (missing or broken input is not fatal)
//! - `exchanges` — list the usable exchange profiles from a config
//! - `allocate` — scan and spread the ranked targets across exchanges

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use scanlab_runner::{
    load_correlation, load_snapshots, ExchangeRegistry, HandoffDocument, LoggingConfig, ScanJob,
    ScanOutcome, ScanlabConfig,
};

#[derive(Parser)]
#[command(
    name = "scanlab",
    about = "ScanLab CLI — multi-factor market scanner and target allocator"
)]
struct Cli {
    /// Log level when RUST_LOG is unset (overrides the config file).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a snapshot file and write the hand-off document.
    Scan {
        #[command(flatten)]
        input: ScanInput,

        /// Hand-off document destination.
        #[arg(long, default_value = "handoff.json")]
        output: PathBuf,

        /// Print per-symbol scan records as JSON to stdout.
        #[arg(long, default_value_t = false)]
        records: bool,
    },
    /// Print a hand-off document.
    Report {
        /// Hand-off document to read.
        #[arg(long, default_value = "handoff.json")]
        input: PathBuf,
    },
    /// List usable exchange profiles.
    Exchanges {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Scan and allocate targets across exchanges; prints JSON.
    Allocate {
        #[command(flatten)]
        input: ScanInput,
    },
}

#[derive(clap::Args)]
struct ScanInput {
    /// Path to a TOML config file. Defaults apply without one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of market snapshots.
    #[arg(long)]
    snapshots: PathBuf,

    /// JSON correlation matrix.
    #[arg(long)]
    correlation: Option<PathBuf>,

    /// Total balance to size against (overrides `ranker.total_balance`).
    #[arg(long)]
    balance: Option<f64>,

    /// Score symbols in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Commands::Scan { input, .. } | Commands::Allocate { input } => input.config.as_deref(),
        Commands::Exchanges { config } => config.as_deref(),
        Commands::Report { .. } => None,
    };
    let config = load_config(config_path)?;
    init_logging(&config.logging, cli.log_level.as_deref());

    match cli.command {
        Commands::Scan {
            input,
            output,
            records,
        } => run_scan(&config, &input, &output, records),
        Commands::Report { input } => run_report(&input),
        Commands::Exchanges { .. } => run_exchanges(&config),
        Commands::Allocate { input } => run_allocate(&config, &input),
    }
}

fn load_config(path: Option<&Path>) -> Result<ScanlabConfig> {
    match path {
        Some(path) => ScanlabConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ScanlabConfig::default()),
    }
}

fn init_logging(config: &LoggingConfig, level: Option<&str>) {
    let mut logging = config.clone();
    if let Some(level) = level {
        logging.level = level.to_string();
    }
    logging.init();
}

fn execute(config: &ScanlabConfig, input: &ScanInput) -> Result<ScanOutcome> {
    let job = ScanJob::from_config(config)
        .context("building scan job")?
        .with_parallelism(input.parallel || config.scanner.parallel);

    let snapshots = load_snapshots(&input.snapshots).context("loading snapshots")?;
    let correlation = input
        .correlation
        .as_deref()
        .map(load_correlation)
        .transpose()
        .context("loading correlation matrix")?;

    let balance = input.balance.unwrap_or(config.ranker.total_balance);
    if balance.is_nan() || balance < 0.0 {
        anyhow::bail!("--balance must not be negative");
    }
    Ok(job.run_with_balance(snapshots, correlation.as_ref(), balance))
}

fn run_scan(config: &ScanlabConfig, input: &ScanInput, output: &Path, records: bool) -> Result<()> {
    let outcome = execute(config, input)?;
    outcome
        .handoff
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;

    if records {
        println!("{}", serde_json::to_string_pretty(&outcome.records)?);
    } else {
        print!("{}", outcome.handoff.render_report());
    }
    info!(output = %output.display(), "scan finished");
    Ok(())
}

fn run_report(input: &Path) -> Result<()> {
    match HandoffDocument::load_or_degraded(input) {
        Some(doc) => print!("{}", doc.render_report()),
        None => println!("no readable hand-off document at {}", input.display()),
    }
    Ok(())
}

fn run_exchanges(config: &ScanlabConfig) -> Result<()> {
    let registry = ExchangeRegistry::new(config.exchanges.iter().cloned());
    if registry.is_empty() {
        println!("no usable exchanges configured");
        return Ok(());
    }
    for p in registry.iter() {
        println!(
            "{:<12} priority {:>2}  max_positions {:>3}  allocation {:>6.2}%{}",
            p.name,
            p.priority,
            p.max_positions,
            p.capital_allocation,
            if p.sandbox { "  [sandbox]" } else { "" }
        );
    }
    println!(
        "total capital allocation: {:.2}%",
        registry.total_capital_allocation()
    );
    Ok(())
}

fn run_allocate(config: &ScanlabConfig, input: &ScanInput) -> Result<()> {
    let outcome = execute(config, input)?;
    println!("{}", serde_json::to_string_pretty(&outcome.allocations)?);
    Ok(())
}
