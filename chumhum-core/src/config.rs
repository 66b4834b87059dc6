//! Scenario configuration
//!
//! Loaded from TOML, then overridden by `SCENARIO_*` environment variables:
//!
//! ```toml
//! network = "development"
//! dry_run = false
//! networks_dir = "networks"
//! default_from = "Root"
//!
//! [accounts]
//! Root = "0x..."
//!
//! [aliases]
//! Treasury = "0x..."
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy::primitives::{keccak256, Address};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const NETWORK_ENV: &str = "SCENARIO_NETWORK";
pub const DRY_RUN_ENV: &str = "SCENARIO_DRY_RUN";
pub const NETWORKS_DIR_ENV: &str = "SCENARIO_NETWORKS_DIR";

/// Networks treated as local chains: scenario variants are deployed and
/// verification is skipped.
pub const LOCAL_NETWORKS: [&str; 3] = ["development", "test", "coverage"];

/// Named accounts available when none are configured.
pub const DEFAULT_ACCOUNTS: [&str; 7] =
  ["Root", "Bank", "Geoff", "Torrey", "Robert", "Coburn", "Jared"];

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
  pub network: String,
  pub dry_run: bool,
  pub networks_dir: Option<PathBuf>,
  pub default_from: String,
  pub verify_api_key: Option<String>,
  pub accounts: BTreeMap<String, String>,
  pub aliases: BTreeMap<String, String>,
}

impl Default for ScenarioConfig {
  fn default() -> Self {
    Self {
      network: "development".to_string(),
      dry_run: false,
      networks_dir: None,
      default_from: "Root".to_string(),
      verify_api_key: None,
      accounts: BTreeMap::new(),
      aliases: BTreeMap::new(),
    }
  }
}

impl ScenarioConfig {
  /// # Errors
  /// Malformed TOML or unknown keys.
  pub fn from_toml_str(s: &str) -> Result<Self> {
    toml::from_str(s).context("invalid scenario config")
  }

  /// Reads a TOML file and applies environment overrides.
  ///
  /// # Errors
  /// File unreadable or malformed.
  pub fn load(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .with_context(|| format!("reading {}", path.display()))?;
    Self::from_toml_str(&contents)?.with_env()
  }

  /// Applies `SCENARIO_NETWORK`, `SCENARIO_DRY_RUN` and
  /// `SCENARIO_NETWORKS_DIR`.
  ///
  /// # Errors
  /// `SCENARIO_DRY_RUN` is not a boolean.
  pub fn with_env(self) -> Result<Self> {
    self.with_overrides(|key| std::env::var(key).ok())
  }

  fn with_overrides(
    mut self,
    var: impl Fn(&str) -> Option<String>,
  ) -> Result<Self> {
    if let Some(network) = var(NETWORK_ENV) {
      self.network = network;
    }
    if let Some(dry_run) = var(DRY_RUN_ENV) {
      self.dry_run = dry_run
        .parse()
        .map_err(|_| anyhow!("{DRY_RUN_ENV} must be true or false"))?;
    }
    if let Some(dir) = var(NETWORKS_DIR_ENV) {
      self.networks_dir = Some(PathBuf::from(dir));
    }
    Ok(self)
  }

  #[must_use]
  pub fn is_local_network(&self) -> bool {
    LOCAL_NETWORKS.contains(&self.network.as_str())
  }

  /// Configured accounts, or the default named accounts with addresses
  /// derived from their names.
  ///
  /// # Errors
  /// A configured address does not parse.
  pub fn accounts(&self) -> Result<Vec<(String, Address)>> {
    if self.accounts.is_empty() {
      return Ok(
        DEFAULT_ACCOUNTS
          .iter()
          .map(|name| (name.to_string(), account_address(name)))
          .collect(),
      );
    }
    parse_addresses(&self.accounts)
  }

  /// # Errors
  /// An alias address does not parse.
  pub fn aliases(&self) -> Result<Vec<(String, Address)>> {
    parse_addresses(&self.aliases)
  }
}

/// Deterministic address for a named test account.
#[must_use]
pub fn account_address(name: &str) -> Address {
  Address::from_word(keccak256(format!("account:{}", name.to_lowercase())))
}

fn parse_addresses(
  entries: &BTreeMap<String, String>,
) -> Result<Vec<(String, Address)>> {
  entries
    .iter()
    .map(|(name, address)| {
      Address::from_str(address)
        .map(|a| (name.clone(), a))
        .with_context(|| format!("invalid address for {name}: {address}"))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_toml() -> Result<()> {
    let config = ScenarioConfig::from_toml_str(
      r#"
        network = "mainnet"
        dry_run = true
        [aliases]
        Treasury = "0x0000000000000000000000000000000000000001"
      "#,
    )?;
    assert_eq!(config.network, "mainnet");
    assert!(config.dry_run);
    assert!(!config.is_local_network());
    assert_eq!(config.aliases()?[0].1, Address::with_last_byte(1));
    assert_eq!(config.default_from, "Root");
    Ok(())
  }

  #[test]
  fn rejects_unknown_keys() {
    assert!(ScenarioConfig::from_toml_str("netwrk = \"x\"").is_err());
  }

  #[test]
  fn env_overrides_apply() -> Result<()> {
    let config = ScenarioConfig::default().with_overrides(|key| match key {
      NETWORK_ENV => Some("test".to_string()),
      DRY_RUN_ENV => Some("true".to_string()),
      _ => None,
    })?;
    assert_eq!(config.network, "test");
    assert!(config.dry_run);
    assert!(config.is_local_network());
    let bad = ScenarioConfig::default()
      .with_overrides(|key| (key == DRY_RUN_ENV).then(|| "maybe".to_string()));
    assert!(bad.is_err());
    Ok(())
  }

  #[test]
  fn default_accounts_are_distinct() -> Result<()> {
    let accounts = ScenarioConfig::default().accounts()?;
    assert_eq!(accounts.len(), DEFAULT_ACCOUNTS.len());
    assert_eq!(accounts[0].0, "Root");
    assert_ne!(accounts[0].1, accounts[1].1);
    Ok(())
  }
}
