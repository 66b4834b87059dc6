//! Contract builders
//!
//! Each family declares its deploy variants as [`Fetcher`]s producing a
//! [`Plan`]. [`build`] picks the variant from the `Deploy` parameters,
//! deploys the artifact and registers the contract in the world and the
//! networks files.

mod bum;
mod bum_controller_impl;
mod bum_unitroller;
mod bum_vault_impl;
mod bum_vault_proxy;
mod chum;
mod comptroller;
mod maximillion;

use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use anyhow::{Context, Result};
use chumhum_core::command::{get_fetcher_value, Arg, Fetcher};
use chumhum_core::contract::{Abi, Contract};
use chumhum_core::core_value::get_string_v;
use chumhum_core::event::Event;
use chumhum_core::invokation::{deploy, Deployed, Invokation};
use chumhum_core::networks::{store_and_save_contract, ContractIndex};
use chumhum_core::world::World;
use serde_json::{json, Map, Value as Json};

pub use bum::build_bum;
pub use bum_controller_impl::build_bum_controller_impl;
pub use bum_unitroller::build_bum_unitroller;
pub use bum_vault_impl::build_bum_vault_impl;
pub use bum_vault_proxy::build_bum_vault_proxy;
pub use chum::build_chum;
pub use comptroller::build_comptroller;
pub use maximillion::build_maximillion;

/// What a deploy variant wants deployed and where to record it.
#[derive(Clone, Debug)]
pub struct Plan {
  pub artifact: String,
  pub args: Vec<DynSolValue>,
  /// Contract name in the world, `Contracts.<name>` points at it.
  pub name: String,
  pub description: String,
  pub paths: Vec<Vec<String>>,
  /// Extra fields written next to `address`, `contract` and `description`.
  pub extra: Map<String, Json>,
}

impl Plan {
  #[must_use]
  pub fn new(artifact: &str, name: &str, description: &str) -> Self {
    Self {
      artifact: artifact.to_string(),
      args: vec![],
      name: name.to_string(),
      description: description.to_string(),
      paths: vec![],
      extra: Map::new(),
    }
  }

  #[must_use]
  pub fn args(mut self, args: Vec<DynSolValue>) -> Self {
    self.args = args;
    self
  }

  #[must_use]
  pub fn path(mut self, path: &[&str]) -> Self {
    self.paths.push(path.iter().map(|s| (*s).to_string()).collect());
    self
  }

  #[must_use]
  pub fn extra(mut self, key: &str, value: Json) -> Self {
    self.extra.insert(key.to_string(), value);
    self
  }

  fn data(&self, address: Address) -> Json {
    let mut data = self.extra.clone();
    data.insert("address".to_string(), json!(address.to_string()));
    data.insert("contract".to_string(), json!(self.artifact));
    data.insert("description".to_string(), json!(self.description));
    Json::Object(data)
  }
}

/// A deployed and registered contract.
#[derive(Debug)]
pub struct Built {
  pub world: World,
  pub contract: Contract,
  pub invokation: Invokation,
  pub description: String,
}

/// Resolves the deploy variant, deploys it and stores the contract.
///
/// # Errors
/// * No variant matches `params`
/// * Deployment fails or the invokation reports an error
/// * Networks files cannot be written
pub async fn build(
  kind: &str,
  fetchers: &[Fetcher<Plan>],
  world: World,
  from: Address,
  params: Event,
  abi: Arc<Abi>,
) -> Result<Built> {
  let plan = get_fetcher_value(kind, fetchers, world.clone(), params).await?;
  let Deployed {
    contract,
    invokation,
  } = deploy(&world, from, &plan.artifact, plan.args.clone(), abi).await?;
  invokation
    .ensure_success()
    .with_context(|| format!("{kind}: deploying {}", plan.artifact))?;

  let data = plan.data(contract.address);
  let indices = plan
    .paths
    .iter()
    .map(|path| ContractIndex::new(path, data.clone()))
    .collect();
  let contract = Contract::new(&plan.name, contract.address, contract.abi);
  let world =
    store_and_save_contract(world, contract.clone(), &plan.name, indices).await?;
  Ok(Built {
    world,
    contract,
    invokation,
    description: plan.description,
  })
}

// ============================================================================
// VARIANTS
// ============================================================================

/// Scenario / Standard / Borked artifact selection shared by Comptroller and
/// the proxy implementations. `Default` picks Scenario on local networks.
#[derive(Clone, Copy, Debug)]
pub struct Variants {
  /// Artifact base name and contract data section, e.g. `BUMController`.
  pub section: &'static str,
  /// Description suffix, e.g. `BUMController Impl`.
  pub label: &'static str,
  /// Whether each deployment takes a `name` and is stored under it.
  pub named: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Variant {
  Scenario,
  Standard,
  Borked,
}

impl Variant {
  fn as_str(self) -> &'static str {
    match self {
      Variant::Scenario => "Scenario",
      Variant::Standard => "Standard",
      Variant::Borked => "Borked",
    }
  }

  fn artifact(self, section: &str) -> String {
    match self {
      Variant::Standard => section.to_string(),
      other => format!("{section}{}", other.as_str()),
    }
  }
}

impl Variants {
  fn plan(self, variant: Variant, name: Option<String>) -> Plan {
    let description = format!("{} {}", variant.as_str(), self.label);
    let artifact = variant.artifact(self.section);
    match name {
      Some(name) => {
        Plan::new(&artifact, &name, &description).path(&[self.section, name.as_str()])
      }
      None => Plan::new(&artifact, self.section, &description).path(&[self.section]),
    }
  }

  fn args(self) -> Vec<Arg> {
    if self.named {
      vec![Arg::new("name", get_string_v)]
    } else {
      vec![]
    }
  }

  fn fetcher(self, variant: Variant, doc: &str) -> Fetcher<Plan> {
    Fetcher::new(doc, variant.as_str(), self.args(), move |_world, mut args| {
      let name = if self.named { args.take_opt::<String>("name") } else { Ok(None) };
      async move { Ok(self.plan(variant, name?)) }
    })
  }

  #[must_use]
  pub fn fetchers(self) -> Vec<Fetcher<Plan>> {
    let (section, label) = (self.section, self.label);
    let name = if self.named { " name:<String>" } else { "" };
    let example = if self.named { " MyImpl" } else { "" };
    let kind = if self.named {
      format!("{section}Impl")
    } else {
      section.to_string()
    };
    vec![
      self.fetcher(
        Variant::Scenario,
        &format!(
          "
            #### Scenario

            * \"Scenario{name}\" - The {label} scenario contract for local testing
              * E.g. \"{kind} Deploy Scenario{example}\"
          "
        ),
      ),
      self.fetcher(
        Variant::Standard,
        &format!(
          "
            #### Standard

            * \"Standard{name}\" - The standard {label} contract
              * E.g. \"{kind} Deploy Standard{example}\"
          "
        ),
      ),
      self.fetcher(
        Variant::Borked,
        &format!(
          "
            #### Borked

            * \"Borked{name}\" - A borked {label} for testing failures
              * E.g. \"{kind} Deploy Borked{example}\"
          "
        ),
      ),
      Fetcher::new(
        &format!(
          "
            #### Default

            * \"{name}\" - Scenario {label} on local networks, Standard otherwise
              * E.g. \"{kind} Deploy{example}\"
          "
        ),
        "Default",
        self.args(),
        move |world, mut args| {
          let name = if self.named { args.take_opt::<String>("name") } else { Ok(None) };
          let variant = if world.is_local_network() {
            Variant::Scenario
          } else {
            Variant::Standard
          };
          async move { Ok(self.plan(variant, name?)) }
        },
      )
      .catchall(),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn variant_artifacts() {
    assert_eq!(Variant::Scenario.artifact("BUMVault"), "BUMVaultScenario");
    assert_eq!(Variant::Standard.artifact("BUMVault"), "BUMVault");
    assert_eq!(Variant::Borked.artifact("Comptroller"), "ComptrollerBorked");
  }

  #[test]
  fn named_plans_are_stored_under_their_name() {
    let variants = Variants {
      section: "BUMController",
      label: "BUMController Impl",
      named: true,
    };
    let plan = variants.plan(Variant::Borked, Some("MyBork".to_string()));
    assert_eq!(plan.name, "MyBork");
    assert_eq!(plan.description, "Borked BUMController Impl");
    assert_eq!(plan.paths, vec![vec!["BUMController", "MyBork"]]);

    let data = plan.data(Address::with_last_byte(7));
    assert_eq!(data["contract"], json!("BUMControllerBorked"));
    assert_eq!(data["address"], json!(Address::with_last_byte(7).to_string()));
  }
}
