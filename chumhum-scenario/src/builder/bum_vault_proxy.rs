use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::kinds::{BUMVaultProxy, ContractKind};
use chumhum_core::command::Fetcher;
use chumhum_core::event::Event;
use chumhum_core::world::World;

use super::{build, Built, Plan};

fn fetchers() -> Vec<Fetcher<Plan>> {
  vec![Fetcher::new(
    "
      #### BUMVaultProxy

      * \"\" - The BUMVault proxy
        * E.g. \"BUMVaultProxy Deploy\"
    ",
    "BUMVaultProxy",
    vec![],
    |_world, _args| async {
      Ok(Plan::new("BUMVaultProxy", "BUMVaultProxy", "BUMVaultProxy").path(&["BUMVaultProxy"]))
    },
  )
  .catchall()]
}

/// # Errors
/// See [`build`].
pub async fn build_bum_vault_proxy(
  world: World,
  from: Address,
  params: Event,
) -> Result<Built> {
  build(
    "DeployBUMVaultProxy",
    &fetchers(),
    world,
    from,
    params,
    BUMVaultProxy::abi()?,
  )
  .await
}
