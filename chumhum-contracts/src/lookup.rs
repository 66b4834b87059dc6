//! Typed contract lookups
//!
//! Every getter has the `(World, Event)` shape expected by
//! [`chumhum_core::command::Arg::new`], so families declare e.g.
//! `Arg::new("comptroller", get_comptroller).implicit()`.

use anyhow::{anyhow, Result};
use chumhum_core::contract::Contract;
use chumhum_core::event::Event;
use chumhum_core::lookup::{get_contract_data, get_world_contract};
use chumhum_core::world::World;
use paste::paste;
use serde_json::Value as Json;

/// Contract, the name it was looked up by, and its contract data.
pub type ContractData = (Contract, String, Json);

fn name_arg(event: &Event) -> Result<String> {
  event
    .clone()
    .unwrap_single()
    .as_atom()
    .map(str::to_string)
    .ok_or_else(|| anyhow!("expected a contract name, got {event}"))
}

/// Singleton contract stored at a fixed contract data path.
macro_rules! world_contract {
  ($fn:ident, [$($key:literal),+]) => {
    paste! {
      #[doc = "Resolves `" $($key " ")+ "` from contract data."]
      ///
      /// # Errors
      /// Not deployed.
      pub async fn [<get_ $fn>](world: World, _event: Event) -> Result<Contract> {
        get_world_contract(&world, &[&[$($key),+]])
      }
    }
  };
}

/// Named contract stored under `<section>.<name>.address`, with a `_data`
/// variant returning its whole contract data entry.
macro_rules! named_contract {
  ($fn:ident, $section:literal) => {
    paste! {
      #[doc = "Resolves a named `" $section "` entry from the next token."]
      ///
      /// # Errors
      /// Token is not a name, or nothing is deployed under it.
      pub async fn [<get_ $fn>](world: World, event: Event) -> Result<Contract> {
        let name = name_arg(&event)?;
        get_world_contract(&world, &[&[$section, &name, "address"]])
      }

      /// # Errors
      /// Nothing is deployed under `name`.
      pub fn [<get_ $fn _data>](world: &World, name: &str) -> Result<ContractData> {
        let contract = get_world_contract(world, &[&[$section, name, "address"]])?;
        let data = get_contract_data(world, &[&[$section, name]])
          .cloned()
          .unwrap_or(Json::Null);
        Ok((contract, name.to_string(), data))
      }
    }
  };
}

world_contract!(comptroller, ["Contracts", "Comptroller"]);
world_contract!(unitroller, ["Contracts", "Unitroller"]);
world_contract!(bum_unitroller, ["Contracts", "BUMUnitroller"]);
world_contract!(bum_controller, ["Contracts", "BUMController"]);
world_contract!(bum_vault, ["Contracts", "BUMVault"]);
world_contract!(bum_vault_proxy, ["Contracts", "BUMVaultProxy"]);
world_contract!(maximillion, ["Contracts", "Maximillion"]);
world_contract!(price_oracle, ["Contracts", "PriceOracle"]);
world_contract!(price_oracle_proxy, ["Contracts", "PriceOracleProxy"]);
world_contract!(bum, ["BUM", "address"]);
world_contract!(chum, ["CHUM", "address"]);

named_contract!(bum_controller_impl, "BUMController");
named_contract!(bum_vault_impl, "BUMVault");
named_contract!(ctoken, "cTokens");

/// # Errors
/// BUM is not deployed.
pub fn get_bum_data(world: &World) -> Result<ContractData> {
  token_data(world, "BUM")
}

/// # Errors
/// CHUM is not deployed.
pub fn get_chum_data(world: &World) -> Result<ContractData> {
  token_data(world, "CHUM")
}

fn token_data(world: &World, section: &str) -> Result<ContractData> {
  let contract = get_world_contract(world, &[&[section, "address"]])?;
  let data = get_contract_data(world, &[&[section]])
    .cloned()
    .unwrap_or(Json::Null);
  Ok((contract, section.to_string(), data))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use alloy::primitives::Address;
  use chumhum_core::config::ScenarioConfig;
  use chumhum_core::contract::Abi;
  use chumhum_core::memory_chain::MemoryChain;
  use chumhum_core::networks::{store_contract, ContractIndex};
  use chumhum_core::registry::Registry;
  use serde_json::json;

  use super::*;

  fn world() -> Result<World> {
    let world = World::new(
      Arc::new(MemoryChain::new()),
      Registry::default(),
      &ScenarioConfig::default(),
    )?;
    let impl_address = Address::with_last_byte(2);
    let world = store_contract(
      world,
      Contract::new("BUMControllerScenario", impl_address, Arc::new(Abi::default())),
      "ScenImpl",
      vec![ContractIndex::new(
        &["BUMController", "ScenImpl"],
        json!({
          "address": impl_address.to_string(),
          "contract": "BUMControllerScenario",
          "description": "Scenario BUMController Impl"
        }),
      )],
    );
    let bum = Address::with_last_byte(3);
    Ok(store_contract(
      world,
      Contract::new("BUMScenario", bum, Arc::new(Abi::default())),
      "BUM",
      vec![ContractIndex::new(
        &["BUM"],
        json!({"address": bum.to_string(), "symbol": "BUM"}),
      )],
    ))
  }

  #[tokio::test]
  async fn named_lookups_read_the_next_token() -> Result<()> {
    let world = world()?;
    let found = get_bum_controller_impl(world.clone(), Event::atom("scenimpl")).await?;
    assert_eq!(found.address, Address::with_last_byte(2));
    let (_, name, data) = get_bum_controller_impl_data(&world, "ScenImpl")?;
    assert_eq!(name, "ScenImpl");
    assert_eq!(data["contract"], json!("BUMControllerScenario"));
    assert!(get_bum_controller_impl(world, Event::atom("Other")).await.is_err());
    Ok(())
  }

  #[tokio::test]
  async fn singletons_resolve_from_fixed_paths() -> Result<()> {
    let world = world()?;
    let bum = get_bum(world.clone(), Event::empty()).await?;
    assert_eq!(bum.name, "BUM");
    let (_, _, data) = get_bum_data(&world)?;
    assert_eq!(data["symbol"], json!("BUM"));
    assert!(get_comptroller(world, Event::empty()).await.is_err());
    Ok(())
  }
}
