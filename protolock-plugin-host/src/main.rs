//! protolock plugin runner
//!
//! Runs the configured plugins over a pair of lock snapshots and prints
//! every warning they report, one per line, as `filepath: message`.
//!
//! Usage:
//!   protolock-plugins --current proto.lock --updated proto.lock.next --plugins ./my-plugin
//!
//! Exit status is 0 when no plugin reported a warning, 1 when at least one
//! did, and 2 when a plugin could not be run or broke the exchange.
//!
//! When the `--current` lock does not exist yet, the updated snapshot is
//! recorded as the current one and no plugin runs. With `--commit`, a
//! passing check replaces the current lock with the updated one.

use anyhow::{Context, Result};
use clap::Parser;
use protolock_plugin_host::{DEFAULT_CONFIG_FILE, HostConfig, PluginChain, Report};
use protolock_types::{Data, Protolock};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "protolock-plugins")]
#[command(about = "Run protolock plugins over the current and updated lock snapshots")]
struct Args {
    /// Lock file holding the accepted snapshot, created from --updated if missing
    #[arg(long)]
    current: PathBuf,

    /// Lock file holding the proposed snapshot
    #[arg(long)]
    updated: PathBuf,

    /// Plugin config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Extra plugin executables, comma separated, run after configured ones
    #[arg(long, value_delimiter = ',')]
    plugins: Vec<PathBuf>,

    /// Replace the current lock with the updated one when no warnings are reported
    #[arg(long)]
    commit: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    // stdout carries the report; logs go to stderr.
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match run(&args).await {
        Ok(Outcome::Initialized) => ExitCode::SUCCESS,
        Ok(Outcome::Checked(report)) => {
            for warning in &report.warnings {
                println!("{warning}");
            }
            if report.passed() {
                info!(plugins = report.plugins_run, "Plugin checks passed");
                ExitCode::SUCCESS
            } else {
                info!(warnings = report.warnings.len(), "Plugin checks reported warnings");
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

enum Outcome {
    /// No current lock existed; the updated one was recorded in its place.
    Initialized,
    Checked(Report),
}

async fn run(args: &Args) -> Result<Outcome> {
    let config = HostConfig::load_from(&args.config)?
        .with_executables(args.plugins.iter().map(PathBuf::as_path));
    let (updated_raw, updated) = load_lock(&args.updated)?;

    if !args.current.exists() {
        write_lock(&args.current, &updated_raw)?;
        info!(
            current = %args.current.display(),
            definitions = updated.definitions.len(),
            "No current lock, recorded updated snapshot"
        );
        return Ok(Outcome::Initialized);
    }

    let (_, current) = load_lock(&args.current)?;
    let chain = PluginChain::from_config(&config);
    if chain.plugins().is_empty() {
        info!("No plugins configured");
    }
    let report = chain.run(Data::new(current, updated)).await?;

    if args.commit && report.passed() {
        write_lock(&args.current, &updated_raw)?;
        info!(current = %args.current.display(), "Committed updated snapshot");
    }
    Ok(Outcome::Checked(report))
}

fn load_lock(path: &Path) -> Result<(Vec<u8>, Protolock)> {
    let contents =
        fs::read(path).with_context(|| format!("failed to read lock file {}", path.display()))?;
    let lock = serde_json::from_slice(&contents)
        .with_context(|| format!("failed to parse lock file {}", path.display()))?;
    Ok((contents, lock))
}

fn write_lock(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("failed to write lock file {}", path.display()))
}
