use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::kinds::{ContractKind, CHUM};
use chumhum_core::command::{Arg, Fetcher};
use chumhum_core::core_value::get_address_v;
use chumhum_core::event::Event;
use chumhum_core::world::World;
use serde_json::json;

use super::{build, Built, Plan};

fn token_plan(artifact: &str, account: Address) -> Plan {
  let description = if artifact == "CHUM" { "Standard CHUM" } else { "Scenario CHUM" };
  Plan::new(artifact, "CHUM", description)
    .args(vec![DynSolValue::Address(account)])
    .path(&["CHUM"])
    .path(&["Tokens", "CHUM"])
    .extra("symbol", json!("CHUM"))
    .extra("name", json!("ChumHum Governance Token"))
    .extra("decimals", json!(18))
}

fn fetchers() -> Vec<Fetcher<Plan>> {
  vec![
    Fetcher::new(
      "
        #### Scenario

        * \"CHUM Deploy Scenario account:<Address>\" - Deploys Scenario CHUM Token
          * E.g. \"CHUM Deploy Scenario Geoff\"
      ",
      "Scenario",
      vec![Arg::new("account", get_address_v)],
      |_world, mut args| async move { Ok(token_plan("CHUMScenario", args.take("account")?)) },
    ),
    Fetcher::new(
      "
        #### CHUM

        * \"CHUM Deploy account:<Address>\" - Deploys CHUM Token, minting the supply to account
          * E.g. \"CHUM Deploy Geoff\"
      ",
      "CHUM",
      vec![Arg::new("account", get_address_v)],
      |world, mut args| async move {
        let artifact = if world.is_local_network() { "CHUMScenario" } else { "CHUM" };
        Ok(token_plan(artifact, args.take("account")?))
      },
    )
    .catchall(),
  ]
}

/// # Errors
/// See [`build`].
pub async fn build_chum(world: World, from: Address, params: Event) -> Result<Built> {
  build("DeployCHUM", &fetchers(), world, from, params, CHUM::abi()?).await
}
