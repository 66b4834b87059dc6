//! The world
//!
//! Immutable scenario state threaded through every event. Updates consume a
//! world and return a new one; fields are `Arc`-shared so snapshots are cheap
//! and earlier snapshots never observe later changes.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::Result;
use serde_json::{Map, Value as Json};
use tracing::info;

use crate::chain::Chain;
use crate::config::{ScenarioConfig, LOCAL_NETWORKS};
use crate::contract::{Abi, Contract};
use crate::invokation::Invokation;
use crate::registry::Registry;
use crate::verify::Verifier;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
  pub name: String,
  pub address: Address,
}

/// Audit log entry appended by every command.
#[derive(Clone, Debug)]
pub struct Action {
  pub log: String,
  pub invokation: Option<Arc<Invokation>>,
}

#[derive(Clone)]
pub struct World {
  chain: Arc<dyn Chain>,
  registry: Arc<Registry>,
  verifier: Option<Arc<dyn Verifier>>,
  verify_api_key: Option<String>,
  network: String,
  dry_run: bool,
  allow_failures: bool,
  default_from: Option<Address>,
  accounts: Arc<Vec<Account>>,
  aliases: Arc<BTreeMap<String, Address>>,
  contract_data: Arc<Json>,
  contract_index: Arc<BTreeMap<Address, Contract>>,
  abis: Arc<BTreeMap<String, Arc<Abi>>>,
  actions: Arc<Vec<Action>>,
  last_invokation: Option<Arc<Invokation>>,
  last_contract: Option<Contract>,
  networks_dir: Option<PathBuf>,
}

impl World {
  /// # Errors
  /// Configured account or alias addresses do not parse.
  pub fn new(
    chain: Arc<dyn Chain>,
    registry: Registry,
    config: &ScenarioConfig,
  ) -> Result<Self> {
    let accounts: Vec<Account> = config
      .accounts()?
      .into_iter()
      .map(|(name, address)| Account { name, address })
      .collect();
    let default_from = accounts
      .iter()
      .find(|a| a.name.eq_ignore_ascii_case(&config.default_from))
      .or_else(|| accounts.first())
      .map(|a| a.address);
    Ok(Self {
      chain,
      registry: Arc::new(registry),
      verifier: None,
      verify_api_key: config.verify_api_key.clone(),
      network: config.network.clone(),
      dry_run: config.dry_run,
      allow_failures: false,
      default_from,
      accounts: Arc::new(accounts),
      aliases: Arc::new(config.aliases()?.into_iter().collect()),
      contract_data: Arc::new(Json::Object(Map::new())),
      contract_index: Arc::new(BTreeMap::new()),
      abis: Arc::new(BTreeMap::new()),
      actions: Arc::new(Vec::new()),
      last_invokation: None,
      last_contract: None,
      networks_dir: config.networks_dir.clone(),
    })
  }

  #[must_use]
  pub fn with_verifier(mut self, verifier: Arc<dyn Verifier>) -> Self {
    self.verifier = Some(verifier);
    self
  }

  // ==========================================================================
  // ACCESSORS
  // ==========================================================================

  #[must_use]
  pub fn chain(&self) -> &Arc<dyn Chain> {
    &self.chain
  }

  #[must_use]
  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  #[must_use]
  pub fn verifier(&self) -> Option<&Arc<dyn Verifier>> {
    self.verifier.as_ref()
  }

  #[must_use]
  pub fn verify_api_key(&self) -> Option<&str> {
    self.verify_api_key.as_deref()
  }

  #[must_use]
  pub fn network(&self) -> &str {
    &self.network
  }

  #[must_use]
  pub fn is_local_network(&self) -> bool {
    LOCAL_NETWORKS.contains(&self.network.as_str())
  }

  #[must_use]
  pub fn dry_run(&self) -> bool {
    self.dry_run
  }

  #[must_use]
  pub fn allow_failures(&self) -> bool {
    self.allow_failures
  }

  #[must_use]
  pub fn default_from(&self) -> Option<Address> {
    self.default_from
  }

  #[must_use]
  pub fn accounts(&self) -> &[Account] {
    &self.accounts
  }

  #[must_use]
  pub fn account(&self, name: &str) -> Option<&Account> {
    self
      .accounts
      .iter()
      .find(|a| a.name.eq_ignore_ascii_case(name))
  }

  #[must_use]
  pub fn alias(&self, name: &str) -> Option<Address> {
    self
      .aliases
      .iter()
      .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
      .map(|(_, address)| *address)
  }

  #[must_use]
  pub fn contract_data(&self) -> &Json {
    &self.contract_data
  }

  #[must_use]
  pub fn contract_at(&self, address: Address) -> Option<&Contract> {
    self.contract_index.get(&address)
  }

  pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
    self.contract_index.values()
  }

  #[must_use]
  pub fn abi(&self, name: &str) -> Option<&Arc<Abi>> {
    self.abis.get(&name.to_lowercase())
  }

  pub fn abis(&self) -> impl Iterator<Item = (&String, &Arc<Abi>)> {
    self.abis.iter()
  }

  #[must_use]
  pub fn actions(&self) -> &[Action] {
    &self.actions
  }

  #[must_use]
  pub fn last_invokation(&self) -> Option<&Invokation> {
    self.last_invokation.as_deref()
  }

  #[must_use]
  pub fn last_contract(&self) -> Option<&Contract> {
    self.last_contract.as_ref()
  }

  #[must_use]
  pub fn networks_dir(&self) -> Option<&PathBuf> {
    self.networks_dir.as_ref()
  }

  /// Account name, alias, or the address itself.
  #[must_use]
  pub fn describe_user(&self, address: Address) -> String {
    if let Some(account) = self.accounts.iter().find(|a| a.address == address) {
      return account.name.clone();
    }
    self
      .aliases
      .iter()
      .find(|(_, a)| **a == address)
      .map_or_else(|| address.to_string(), |(alias, _)| alias.clone())
  }

  // ==========================================================================
  // UPDATES
  // ==========================================================================

  /// Appends an action to the audit log. An invokation becomes the last
  /// invokation, checked by `Assert` and by failure handling.
  #[must_use]
  pub fn add_action(
    mut self,
    log: impl Into<String>,
    invokation: Option<Invokation>,
  ) -> Self {
    let log = log.into();
    info!("{log}");
    let invokation = invokation.map(Arc::new);
    if let Some(invokation) = &invokation {
      self.last_invokation = Some(invokation.clone());
    }
    Arc::make_mut(&mut self.actions).push(Action { log, invokation });
    self
  }

  #[must_use]
  pub fn set_allow_failures(mut self, allow: bool) -> Self {
    self.allow_failures = allow;
    self
  }

  #[must_use]
  pub fn set_dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }

  #[must_use]
  pub fn set_network(mut self, network: impl Into<String>) -> Self {
    self.network = network.into();
    self
  }

  #[must_use]
  pub fn add_alias(mut self, name: impl Into<String>, address: Address) -> Self {
    Arc::make_mut(&mut self.aliases).insert(name.into(), address);
    self
  }

  /// Writes `data` at `path`, creating intermediate objects. Objects merge
  /// into existing objects key by key; anything else replaces.
  #[must_use]
  pub fn set_contract_data(mut self, path: &[String], data: Json) -> Self {
    let mut node = Arc::make_mut(&mut self.contract_data);
    for key in path {
      if !node.is_object() {
        *node = Json::Object(Map::new());
      }
      node = match node {
        Json::Object(map) => map.entry(key.clone()).or_insert(Json::Null),
        other => other,
      };
    }
    merge_json(node, data);
    self
  }

  #[must_use]
  pub fn replace_contract_data(mut self, data: Json) -> Self {
    self.contract_data = Arc::new(data);
    self
  }

  /// Indexes `contract` by address and records its ABI under its name.
  #[must_use]
  pub fn index_contract(mut self, contract: Contract) -> Self {
    Arc::make_mut(&mut self.abis)
      .insert(contract.name.to_lowercase(), contract.abi.clone());
    Arc::make_mut(&mut self.contract_index)
      .insert(contract.address, contract.clone());
    self.last_contract = Some(contract);
    self
  }

  #[must_use]
  pub fn set_abi(mut self, name: &str, abi: Arc<Abi>) -> Self {
    Arc::make_mut(&mut self.abis).insert(name.to_lowercase(), abi);
    self
  }
}

fn merge_json(target: &mut Json, data: Json) {
  match (target, data) {
    (Json::Object(existing), Json::Object(incoming)) => {
      for (key, value) in incoming {
        merge_json(existing.entry(key).or_insert(Json::Null), value);
      }
    }
    (target, data) => *target = data,
  }
}

impl std::fmt::Debug for World {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("World")
      .field("network", &self.network)
      .field("dry_run", &self.dry_run)
      .field("allow_failures", &self.allow_failures)
      .field("contracts", &self.contract_index.len())
      .field("actions", &self.actions.len())
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::memory_chain::MemoryChain;

  fn world() -> World {
    World::new(
      Arc::new(MemoryChain::new()),
      Registry::default(),
      &ScenarioConfig::default(),
    )
    .expect("default world")
  }

  #[test]
  fn updates_do_not_leak_into_snapshots() {
    let before = world();
    let after = before.clone().add_action("did something", None);
    assert!(before.actions().is_empty());
    assert_eq!(after.actions().len(), 1);
  }

  #[test]
  fn contract_data_merges_objects() {
    let path = |p: &[&str]| p.iter().map(ToString::to_string).collect::<Vec<_>>();
    let world = world()
      .set_contract_data(&path(&["Tokens", "BUM"]), json!({"address": "0x1"}))
      .set_contract_data(&path(&["Tokens", "BUM"]), json!({"decimals": 18}))
      .set_contract_data(&path(&["Contracts", "BUM"]), json!("0x1"));
    assert_eq!(
      world.contract_data(),
      &json!({
        "Tokens": {"BUM": {"address": "0x1", "decimals": 18}},
        "Contracts": {"BUM": "0x1"}
      })
    );
  }

  #[test]
  fn describe_user_prefers_account_names() {
    let world = world();
    let geoff = world.account("geoff").map(|a| a.address).expect("Geoff");
    assert_eq!(world.describe_user(geoff), "Geoff");
    let other = Address::with_last_byte(9);
    let world = world.add_alias("Treasury", other);
    assert_eq!(world.describe_user(other), "Treasury");
    assert_eq!(world.alias("treasury"), Some(other));
  }

  #[test]
  fn default_sender_is_root() {
    let world = world();
    assert_eq!(world.default_from(), world.account("Root").map(|a| a.address));
    assert!(world.is_local_network());
  }
}
