use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::kinds::{ContractKind, BUM};
use chumhum_core::command::{Arg, Fetcher};
use chumhum_core::core_value::get_number_v;
use chumhum_core::event::Event;
use chumhum_core::value::Number;
use chumhum_core::world::World;
use serde_json::json;

use super::{build, Built, Plan};

/// Chain id baked into the token's permit domain when none is given.
const DEFAULT_CHAIN_ID: u64 = 137;

fn token_plan(artifact: &str, chain_id: Number) -> Result<Plan> {
  let description = if artifact == "BUM" { "Standard BUM" } else { "Scenario BUM" };
  Ok(
    Plan::new(artifact, "BUM", description)
      .args(vec![DynSolValue::Uint(chain_id.encode()?, 256)])
      .path(&["BUM"])
      .path(&["Tokens", "BUM"])
      .extra("symbol", json!("BUM"))
      .extra("name", json!("BUM Stablecoin"))
      .extra("decimals", json!(18)),
  )
}

fn fetchers() -> Vec<Fetcher<Plan>> {
  vec![
    Fetcher::new(
      "
        #### Scenario

        * \"BUM Deploy Scenario chainId:<Number>\" - Deploys Scenario BUM Token
          * E.g. \"BUM Deploy Scenario 56\"
      ",
      "Scenario",
      vec![Arg::new("chainId", get_number_v)],
      |_world, mut args| async move { token_plan("BUMScenario", args.take("chainId")?) },
    ),
    Fetcher::new(
      "
        #### BUM

        * \"BUM Deploy\" - Deploys BUM Token, the scenario token on local networks
          * E.g. \"BUM Deploy\"
      ",
      "BUM",
      vec![],
      |world, _args| async move {
        let artifact = if world.is_local_network() { "BUMScenario" } else { "BUM" };
        token_plan(artifact, Number::from_u64(DEFAULT_CHAIN_ID))
      },
    )
    .catchall(),
  ]
}

/// # Errors
/// See [`build`].
pub async fn build_bum(world: World, from: Address, params: Event) -> Result<Built> {
  build("DeployBUM", &fetchers(), world, from, params, BUM::abi()?).await
}
