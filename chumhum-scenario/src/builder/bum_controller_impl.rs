use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::kinds::{BUMController, BUMControllerImpl, ContractKind};
use chumhum_core::event::Event;
use chumhum_core::world::World;

use super::{build, Built, Variants};

const VARIANTS: Variants = Variants {
  section: "BUMController",
  label: "BUMController Impl",
  named: true,
};

/// Deploys a BUMController implementation, stored at `BUMController.<name>`.
/// Also backs `BUMController Deploy`.
///
/// # Errors
/// See [`build`].
pub async fn build_bum_controller_impl(
  world: World,
  from: Address,
  params: Event,
) -> Result<Built> {
  let abi = Arc::new(BUMController::abi()?.merge(&*BUMControllerImpl::abi()?));
  build(
    "DeployBUMControllerImpl",
    &VARIANTS.fetchers(),
    world,
    from,
    params,
    abi,
  )
  .await
}
