//! Contract registration and the networks files
//!
//! Deployed contracts are recorded in two files per network under the
//! configured networks directory:
//! - `<network>.json` - the contract data tree
//! - `<network>-abi.json` - contract name to function signatures

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value as Json};
use tracing::{debug, info, warn};

use crate::contract::{Abi, Contract};
use crate::world::World;

/// Data stored at one contract data path.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractIndex {
  pub path: Vec<String>,
  pub data: Json,
}

impl ContractIndex {
  #[must_use]
  pub fn new<S: AsRef<str>>(path: &[S], data: Json) -> Self {
    Self {
      path: path.iter().map(|s| s.as_ref().to_string()).collect(),
      data,
    }
  }
}

/// Registers `contract` as `name`: indexes it by address, records its ABI,
/// sets `Contracts.<name>` and writes each index entry.
#[must_use]
pub fn store_contract(
  world: World,
  mut contract: Contract,
  name: &str,
  indices: Vec<ContractIndex>,
) -> World {
  contract.name = name.to_string();
  let address = contract.address;
  let mut world = world.index_contract(contract).set_contract_data(
    &["Contracts".to_string(), name.to_string()],
    json!(address.to_string()),
  );
  for index in indices {
    world = world.set_contract_data(&index.path, index.data);
  }
  world
}

/// [`store_contract`], then persists the networks files.
///
/// # Errors
/// Networks files cannot be written.
pub async fn store_and_save_contract(
  world: World,
  contract: Contract,
  name: &str,
  indices: Vec<ContractIndex>,
) -> Result<World> {
  let world = store_contract(world, contract, name, indices);
  save_networks(&world).await?;
  Ok(world)
}

/// Re-registers `target`'s address under `target_name` with the union of
/// the ABIs recorded for `a` and `b`, and points `Contracts.<target_name>` at
/// it. Used after a proxy adopts an implementation so calls through the
/// proxy see both interfaces.
///
/// # Errors
/// * No ABI recorded for `a` or `b`
/// * Networks files cannot be written
pub async fn merge_contract_abi(
  world: World,
  target_name: &str,
  target: &Contract,
  a: &str,
  b: &str,
) -> Result<World> {
  let abi_a = world
    .abi(a)
    .ok_or_else(|| anyhow!("no ABI recorded for {a}"))?;
  let abi_b = world
    .abi(b)
    .ok_or_else(|| anyhow!("no ABI recorded for {b}"))?;
  let merged = Arc::new(abi_a.merge(abi_b));
  let contract = Contract::new(target_name, target.address, merged);
  let world = world.index_contract(contract).set_contract_data(
    &["Contracts".to_string(), target_name.to_string()],
    json!(target.address.to_string()),
  );
  save_networks(&world).await?;
  Ok(world)
}

fn network_files(dir: &Path, network: &str) -> (PathBuf, PathBuf) {
  (
    dir.join(format!("{network}.json")),
    dir.join(format!("{network}-abi.json")),
  )
}

/// Writes the networks files, unless in dry-run mode or no directory is
/// configured.
///
/// # Errors
/// Directory or files cannot be written.
pub async fn save_networks(world: &World) -> Result<()> {
  let Some(dir) = world.networks_dir() else {
    return Ok(());
  };
  if world.dry_run() {
    debug!("Dry run: not saving networks files");
    return Ok(());
  }
  let (data_path, abi_path) = network_files(dir, world.network());
  let abis: BTreeMap<&String, &[String]> = world
    .abis()
    .map(|(name, abi)| (name, abi.signatures()))
    .collect();
  tokio::fs::create_dir_all(dir)
    .await
    .with_context(|| format!("creating {}", dir.display()))?;
  tokio::fs::write(&data_path, serde_json::to_string_pretty(world.contract_data())?)
    .await
    .with_context(|| format!("writing {}", data_path.display()))?;
  tokio::fs::write(&abi_path, serde_json::to_string_pretty(&abis)?)
    .await
    .with_context(|| format!("writing {}", abi_path.display()))?;
  debug!("Saved networks to {}", data_path.display());
  Ok(())
}

/// Loads the networks files into `world`, indexing every `Contracts` entry
/// that has a recorded ABI. Missing files leave the world unchanged.
///
/// # Errors
/// Files exist but are malformed.
pub async fn load_networks(world: World) -> Result<World> {
  let Some(dir) = world.networks_dir().cloned() else {
    return Ok(world);
  };
  let (data_path, abi_path) = network_files(&dir, world.network());
  if !tokio::fs::try_exists(&data_path)
    .await
    .with_context(|| format!("checking {}", data_path.display()))?
  {
    return Ok(world);
  }
  let data: Json = serde_json::from_str(
    &tokio::fs::read_to_string(&data_path)
      .await
      .with_context(|| format!("reading {}", data_path.display()))?,
  )
  .with_context(|| format!("parsing {}", data_path.display()))?;
  let has_abis = tokio::fs::try_exists(&abi_path)
    .await
    .with_context(|| format!("checking {}", abi_path.display()))?;
  let abis: BTreeMap<String, Vec<String>> = if has_abis {
    let contents = tokio::fs::read_to_string(&abi_path)
      .await
      .with_context(|| format!("reading {}", abi_path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", abi_path.display()))?
  } else {
    BTreeMap::new()
  };

  let mut world = world.replace_contract_data(data.clone());
  for (name, signatures) in &abis {
    world = world.set_abi(name, Arc::new(Abi::parse(signatures)?));
  }
  let contracts = data
    .get("Contracts")
    .and_then(Json::as_object)
    .cloned()
    .unwrap_or_default();
  for (name, address) in contracts {
    let Some(address) = address.as_str().and_then(|a| Address::from_str(a).ok()) else {
      warn!("Skipping {name}: invalid address {address} in {}", data_path.display());
      continue;
    };
    let Some(abi) = world.abi(&name).cloned() else {
      warn!("Skipping {name}: no ABI recorded in {}", abi_path.display());
      continue;
    };
    world = world.index_contract(Contract::new(name, address, abi));
  }
  info!(
    "Loaded {} contract(s) for {} from {}",
    world.contracts().count(),
    world.network(),
    dir.display()
  );
  Ok(world)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ScenarioConfig;
  use crate::memory_chain::MemoryChain;
  use crate::registry::Registry;

  fn world(dir: Option<PathBuf>) -> Result<World> {
    let config = ScenarioConfig {
      networks_dir: dir,
      ..ScenarioConfig::default()
    };
    World::new(Arc::new(MemoryChain::new()), Registry::default(), &config)
  }

  fn contract(name: &str, byte: u8, sigs: &[&str]) -> Result<Contract> {
    Ok(Contract::new(
      name,
      Address::with_last_byte(byte),
      Arc::new(Abi::parse(sigs)?),
    ))
  }

  #[tokio::test]
  async fn stored_contracts_are_indexed_and_named() -> Result<()> {
    let world = store_contract(
      world(None)?,
      contract("BUMScenario", 1, &["name() returns (string)"])?,
      "BUM",
      vec![ContractIndex::new(&["Tokens", "BUM"], json!({"symbol": "BUM"}))],
    );
    let stored = world.contract_at(Address::with_last_byte(1)).cloned();
    assert_eq!(stored.map(|c| c.name), Some("BUM".to_string()));
    assert_eq!(
      world.contract_data()["Contracts"]["BUM"],
      json!(Address::with_last_byte(1).to_string())
    );
    assert_eq!(world.contract_data()["Tokens"]["BUM"]["symbol"], json!("BUM"));
    assert!(world.abi("bum").is_some());
    Ok(())
  }

  #[tokio::test]
  async fn merge_combines_both_abis_at_target_address() -> Result<()> {
    let proxy = contract("BUMUnitroller", 1, &["admin() returns (address)"])?;
    let implementation = contract("Std", 2, &["mintBUM(uint256) returns (uint256)"])?;
    let world = store_contract(world(None)?, proxy.clone(), "BUMUnitroller", vec![]);
    let world = store_contract(world, implementation, "Std", vec![]);
    let world =
      merge_contract_abi(world, "BUMController", &proxy, "BUMUnitroller", "Std")
        .await?;
    let merged = world.contract_at(proxy.address).cloned().expect("indexed");
    assert_eq!(merged.name, "BUMController");
    assert_eq!(merged.abi.signatures().len(), 2);
    assert_eq!(
      world.contract_data()["Contracts"]["BUMController"],
      json!(proxy.address.to_string())
    );
    assert!(merge_contract_abi(world, "X", &proxy, "Nope", "Std").await.is_err());
    Ok(())
  }

  #[tokio::test]
  async fn networks_files_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let saved = store_and_save_contract(
      world(Some(dir.path().to_path_buf()))?,
      contract("CHUM", 7, &["balanceOf(address) returns (uint256)"])?,
      "CHUM",
      vec![],
    )
    .await?;
    assert!(dir.path().join("development.json").exists());
    assert!(dir.path().join("development-abi.json").exists());

    let loaded = load_networks(world(Some(dir.path().to_path_buf()))?).await?;
    assert_eq!(loaded.contract_data(), saved.contract_data());
    let chum = loaded.contract_at(Address::with_last_byte(7)).cloned();
    assert_eq!(chum.map(|c| c.name.to_lowercase()), Some("chum".to_string()));
    Ok(())
  }

  #[tokio::test]
  async fn dry_run_does_not_write() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let world = world(Some(dir.path().to_path_buf()))?.set_dry_run(true);
    store_and_save_contract(world, contract("CHUM", 7, &[])?, "CHUM", vec![])
      .await?;
    assert!(!dir.path().join("development.json").exists());
    Ok(())
  }

  #[tokio::test]
  async fn unusable_contract_entries_are_skipped() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let chum = Address::with_last_byte(7);
    let data = json!({
      "Contracts": {
        "BUM": "not an address",
        "CHUM": chum.to_string(),
        "Ghost": Address::with_last_byte(8).to_string(),
      }
    });
    std::fs::write(dir.path().join("development.json"), data.to_string())?;
    std::fs::write(
      dir.path().join("development-abi.json"),
      json!({"CHUM": ["balanceOf(address) returns (uint256)"]}).to_string(),
    )?;

    let loaded = load_networks(world(Some(dir.path().to_path_buf()))?).await?;
    assert_eq!(loaded.contracts().count(), 1);
    assert!(loaded.contract_at(chum).is_some());
    assert!(loaded.contract_at(Address::with_last_byte(8)).is_none());
    assert_eq!(loaded.contract_data(), &data);
    Ok(())
  }
}
