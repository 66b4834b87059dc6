//! Contract lookup
//!
//! Contract data is a nested JSON object keyed by paths such as
//! `["Contracts", "Comptroller"]` or `["cTokens", "cBAT", "address"]`. Keys
//! match case-insensitively after trimming.

use std::str::FromStr;

use alloy::primitives::Address;
use anyhow::Result;
use itertools::Itertools;
use serde_json::Value as Json;

use crate::contract::Contract;
use crate::error::ScenarioError;
use crate::world::World;

/// Returns the data at the first path in `indices` that resolves. A string
/// met before the path is exhausted is returned as is, so
/// `["Contracts", "X", "address"]` resolves when `Contracts.X` is an address.
#[must_use]
pub fn get_contract_data<'a>(
  world: &'a World,
  indices: &[&[&str]],
) -> Option<&'a Json> {
  indices
    .iter()
    .find_map(|path| walk(world.contract_data(), path))
}

fn walk<'a>(root: &'a Json, path: &[&str]) -> Option<&'a Json> {
  let mut node = root;
  for key in path {
    match node {
      Json::String(_) => return Some(node),
      Json::Object(map) => {
        let key = key.trim();
        node = map
          .iter()
          .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
          .map(|(_, v)| v)?;
      }
      _ => return None,
    }
  }
  Some(node)
}

fn describe_paths(indices: &[&[&str]]) -> String {
  indices
    .iter()
    .map(|path| format!("[{}]", path.join(", ")))
    .join(" or ")
}

/// # Errors
/// No path resolves to a string.
pub fn get_contract_data_string(
  world: &World,
  indices: &[&[&str]],
) -> Result<String> {
  match get_contract_data(world, indices) {
    Some(Json::String(s)) => Ok(s.clone()),
    Some(other) => Err(
      ScenarioError::Lookup {
        path: describe_paths(indices),
        reason: format!("expected a string, found {other}"),
      }
      .into(),
    ),
    None => Err(
      ScenarioError::Lookup {
        path: describe_paths(indices),
        reason: "not found".to_string(),
      }
      .into(),
    ),
  }
}

/// # Errors
/// No contract indexed at `address`.
pub fn get_world_contract_by_address(
  world: &World,
  address: Address,
) -> Result<Contract> {
  world.contract_at(address).cloned().ok_or_else(|| {
    ScenarioError::Lookup {
      path: address.to_string(),
      reason: format!(
        "no contract indexed at this address; known: {}",
        world.contracts().map(|c| &c.name).join(", ")
      ),
    }
    .into()
  })
}

/// Resolves a contract through its address in contract data.
///
/// # Errors
/// * No path resolves to an address
/// * No contract indexed at the resolved address
pub fn get_world_contract(world: &World, indices: &[&[&str]]) -> Result<Contract> {
  let raw = get_contract_data_string(world, indices)?;
  let address = Address::from_str(&raw).map_err(|_| ScenarioError::Lookup {
    path: describe_paths(indices),
    reason: format!("`{raw}` is not an address"),
  })?;
  get_world_contract_by_address(world, address)
}

/// Resolves a user-facing name to an address: `Zero`, a literal hex
/// address, an alias, an account name, or a deployed contract by name.
///
/// # Errors
/// Nothing matches `name`.
pub fn get_address(world: &World, name: &str) -> Result<Address> {
  let name = name.trim();
  if name.eq_ignore_ascii_case("zero") {
    return Ok(Address::ZERO);
  }
  if name.starts_with("0x") {
    return Address::from_str(name).map_err(|_| {
      ScenarioError::InvalidValue {
        expected: "address".to_string(),
        got: name.to_string(),
      }
      .into()
    });
  }
  if let Some(address) = world.alias(name) {
    return Ok(address);
  }
  if let Some(account) = world.account(name) {
    return Ok(account.address);
  }
  let indices: [&[&str]; 5] = [
    &["Contracts", name],
    &["cTokens", name, "address"],
    &["CTokenDelegate", name, "address"],
    &["Tokens", name, "address"],
    &["Comptroller", name, "address"],
  ];
  let raw = get_contract_data_string(world, &indices).map_err(|_| {
    ScenarioError::Lookup {
      path: name.to_string(),
      reason: "unknown account, alias or contract".to_string(),
    }
  })?;
  Address::from_str(&raw).map_err(|_| {
    ScenarioError::InvalidValue {
      expected: "address".to_string(),
      got: raw,
    }
    .into()
  })
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use serde_json::json;

  use super::*;
  use crate::config::ScenarioConfig;
  use crate::contract::Abi;
  use crate::memory_chain::MemoryChain;
  use crate::registry::Registry;

  fn world() -> World {
    let world = World::new(
      Arc::new(MemoryChain::new()),
      Registry::default(),
      &ScenarioConfig::default(),
    )
    .expect("default world");
    let bum = Address::with_last_byte(0xb0);
    world
      .replace_contract_data(json!({
        "Contracts": {"BUM": bum.to_string()},
        "cTokens": {"cBAT": {"address": Address::with_last_byte(0xba).to_string()}},
        "Tokens": {"BUM": {"address": bum.to_string(), "symbol": "BUM"}}
      }))
      .index_contract(Contract::new("BUM", bum, Arc::new(Abi::default())))
  }

  #[test]
  fn keys_match_case_insensitively() {
    let world = world();
    let data = get_contract_data(&world, &[&[" tokens ", "bum", "SYMBOL"]]);
    assert_eq!(data, Some(&json!("BUM")));
  }

  #[test]
  fn first_resolving_path_wins() -> Result<()> {
    let world = world();
    let address = get_contract_data_string(
      &world,
      &[&["Missing"], &["cTokens", "cBAT", "address"]],
    )?;
    assert_eq!(address, Address::with_last_byte(0xba).to_string());
    Ok(())
  }

  #[test]
  fn strings_short_circuit_longer_paths() -> Result<()> {
    let world = world();
    let contract = get_world_contract(&world, &[&["Contracts", "BUM", "address"]])?;
    assert_eq!(contract.name, "BUM");
    Ok(())
  }

  #[test]
  fn get_address_resolution_order() -> Result<()> {
    let world = world();
    assert_eq!(get_address(&world, "Zero")?, Address::ZERO);
    assert_eq!(
      get_address(&world, "0x00000000000000000000000000000000000000ff")?,
      Address::with_last_byte(0xff)
    );
    assert_eq!(get_address(&world, "cbat")?, Address::with_last_byte(0xba));
    assert_eq!(get_address(&world, "BUM")?, Address::with_last_byte(0xb0));
    let geoff = world.account("Geoff").map(|a| a.address);
    assert_eq!(Some(get_address(&world, "geoff")?), geoff);
    let err = get_address(&world, "Nobody").unwrap_err();
    assert!(matches!(
      err.downcast_ref::<ScenarioError>(),
      Some(ScenarioError::Lookup { .. })
    ));
    Ok(())
  }

  #[test]
  fn missing_contract_lists_known_names() {
    let world = world();
    let err =
      get_world_contract_by_address(&world, Address::with_last_byte(1)).unwrap_err();
    assert!(err.to_string().contains("BUM"));
  }
}
