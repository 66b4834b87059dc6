use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::kinds::{ContractKind, Maximillion};
use chumhum_core::command::{Arg, Fetcher};
use chumhum_core::core_value::get_address_v;
use chumhum_core::event::Event;
use chumhum_core::world::World;
use serde_json::json;

use super::{build, Built, Plan};

fn fetchers() -> Vec<Fetcher<Plan>> {
  vec![Fetcher::new(
    "
      #### Maximillion

      * \"cMatic:<Address>\" - Maximum Matic repays contract
        * E.g. \"Maximillion Deploy cMATIC\"
    ",
    "Maximillion",
    vec![Arg::new("cMatic", get_address_v)],
    |_world, mut args| async move {
      let c_matic: Address = args.take("cMatic")?;
      Ok(
        Plan::new("Maximillion", "Maximillion", "Maximillion")
          .args(vec![DynSolValue::Address(c_matic)])
          .path(&["Maximillion"])
          .extra("cMaticAddress", json!(c_matic.to_string())),
      )
    },
  )
  .catchall()]
}

/// # Errors
/// See [`build`].
pub async fn build_maximillion(
  world: World,
  from: Address,
  params: Event,
) -> Result<Built> {
  build(
    "DeployMaximillion",
    &fetchers(),
    world,
    from,
    params,
    Maximillion::abi()?,
  )
  .await
}
