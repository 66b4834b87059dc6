use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::kinds::{Comptroller, ContractKind};
use chumhum_core::event::Event;
use chumhum_core::world::World;

use super::{build, Built, Variants};

const VARIANTS: Variants = Variants {
  section: "Comptroller",
  label: "Comptroller",
  named: false,
};

/// # Errors
/// See [`build`].
pub async fn build_comptroller(
  world: World,
  from: Address,
  params: Event,
) -> Result<Built> {
  build(
    "DeployComptroller",
    &VARIANTS.fetchers(),
    world,
    from,
    params,
    Comptroller::abi()?,
  )
  .await
}
