use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::kinds::{BUMUnitroller, ContractKind};
use chumhum_core::command::Fetcher;
use chumhum_core::event::Event;
use chumhum_core::world::World;

use super::{build, Built, Plan};

fn fetchers() -> Vec<Fetcher<Plan>> {
  vec![Fetcher::new(
    "
      #### BUMUnitroller

      * \"\" - The BUMController proxy
        * E.g. \"BUMUnitroller Deploy\"
    ",
    "BUMUnitroller",
    vec![],
    |_world, _args| async {
      Ok(Plan::new("BUMUnitroller", "BUMUnitroller", "BUMUnitroller").path(&["BUMUnitroller"]))
    },
  )
  .catchall()]
}

/// # Errors
/// See [`build`].
pub async fn build_bum_unitroller(
  world: World,
  from: Address,
  params: Event,
) -> Result<Built> {
  build(
    "DeployBUMUnitroller",
    &fetchers(),
    world,
    from,
    params,
    BUMUnitroller::abi()?,
  )
  .await
}
