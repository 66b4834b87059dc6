use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::kinds::{BUMVault, BUMVaultImpl, ContractKind};
use chumhum_core::event::Event;
use chumhum_core::world::World;

use super::{build, Built, Variants};

const VARIANTS: Variants = Variants {
  section: "BUMVault",
  label: "BUMVault Impl",
  named: true,
};

/// Deploys a BUMVault implementation, stored at `BUMVault.<name>`.
///
/// # Errors
/// See [`build`].
pub async fn build_bum_vault_impl(
  world: World,
  from: Address,
  params: Event,
) -> Result<Built> {
  let abi = Arc::new(BUMVault::abi()?.merge(&*BUMVaultImpl::abi()?));
  build("DeployBUMVaultImpl", &VARIANTS.fetchers(), world, from, params, abi).await
}
