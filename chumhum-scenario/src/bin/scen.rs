//! Runs scenario files against an in-memory chain.
//!
//! ```text
//! scen [--config scenario.toml] [--network development] [--dry-run] FILES...
//! ```
//!
//! Logging follows `RUST_LOG`, defaulting to `info`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chumhum_core::config::ScenarioConfig;
use chumhum_core::memory_chain::MemoryChain;
use chumhum_scenario::runner::{new_world, run_file};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scen", about = "Run ChumHum scenario files")]
struct Cli {
  /// TOML scenario configuration.
  #[arg(long, short)]
  config: Option<PathBuf>,

  /// Network name, overriding the configuration.
  #[arg(long, short)]
  network: Option<String>,

  /// Log transactions instead of sending them.
  #[arg(long)]
  dry_run: bool,

  /// Scenario files, each run against a fresh world.
  #[arg(required = true)]
  files: Vec<PathBuf>,
}

fn config(cli: &Cli) -> Result<ScenarioConfig> {
  let mut config = match &cli.config {
    Some(path) => ScenarioConfig::load(path)?,
    None => ScenarioConfig::default().with_env()?,
  };
  if let Some(network) = &cli.network {
    config.network.clone_from(network);
  }
  config.dry_run |= cli.dry_run;
  Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let config = config(&cli)?;
  info!(network = %config.network, dry_run = config.dry_run, "Running {} scenario file(s)", cli.files.len());

  let mut failed = 0usize;
  for file in &cli.files {
    let world = new_world(&config, Arc::new(MemoryChain::new())).await?;
    match run_file(world, file).await {
      Ok(world) => info!("{}: ok ({} action(s))", file.display(), world.actions().len()),
      Err(e) => {
        failed += 1;
        error!("{}: {e:#}", file.display());
      }
    }
  }

  if failed > 0 {
    return Err(anyhow!("{failed} of {} scenario file(s) failed", cli.files.len()));
  }
  Ok(())
}
