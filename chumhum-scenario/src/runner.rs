//! Scenario runner
//!
//! Applies events one at a time. After each top-level event, a failed
//! invokation recorded by that event aborts the run unless `AllowFailures`
//! is in effect.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chumhum_core::chain::Chain;
use chumhum_core::config::ScenarioConfig;
use chumhum_core::error::ScenarioError;
use chumhum_core::event::{parse_script, Event};
use chumhum_core::networks::load_networks;
use chumhum_core::world::World;
use tracing::{debug, warn};

use crate::event::process_event;
use crate::registry::registry;

/// A world with every ChumHum family registered and any saved networks
/// loaded.
///
/// # Errors
/// * Configured accounts or aliases are invalid
/// * Saved networks files are malformed
pub async fn new_world(config: &ScenarioConfig, chain: Arc<dyn Chain>) -> Result<World> {
  let world = World::new(chain, registry(), config)?;
  load_networks(world).await
}

/// Runs a single top-level event.
///
/// # Errors
/// * The event fails to process
/// * It recorded a failed invokation and failures are not allowed
pub async fn run_event(world: World, event: Event) -> Result<World> {
  debug!("Processing `{event}`");
  let before = world.actions().len();
  let world = process_event(world, event, None).await?;
  let failed = world.actions()[before.min(world.actions().len())..]
    .iter()
    .filter_map(|action| action.invokation.as_ref())
    .find_map(|invokation| invokation.error.clone());
  match failed {
    Some(error) if world.allow_failures() => {
      warn!("Allowed failure: {error}");
      Ok(world)
    }
    Some(error) => Err(ScenarioError::InvokationFailed(error.to_string()).into()),
    None => Ok(world),
  }
}

/// Runs every line of `script` in order.
///
/// # Errors
/// The script does not parse, or an event fails as in [`run_event`].
pub async fn run_script(world: World, script: &str) -> Result<World> {
  let mut world = world;
  for event in parse_script(script)? {
    let line = event.to_string();
    world = run_event(world, event)
      .await
      .with_context(|| format!("running `{line}`"))?;
  }
  Ok(world)
}

/// # Errors
/// The file cannot be read, or the script fails as in [`run_script`].
pub async fn run_file(world: World, path: &Path) -> Result<World> {
  let script = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;
  run_script(world, &script)
    .await
    .with_context(|| format!("in {}", path.display()))
}
