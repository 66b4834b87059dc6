use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::lookup::{get_bum_vault_impl, get_bum_vault_impl_data, get_bum_vault_proxy};
use chumhum_contracts::reporter::BUM_VAULT_ERROR_REPORTER;
use chumhum_core::command::{process_command_event, Command};
use chumhum_core::event::Event;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::implementation::{implementation_commands, Implementation};
use crate::builder::build_bum_vault_impl;

const IMPLEMENTATION: Implementation = Implementation {
  family: "BUMVaultImpl",
  target: "BUMVault",
  proxy: "BUMVaultProxy",
  reporter: BUM_VAULT_ERROR_REPORTER,
  become_verbs: &["Become"],
  data: get_bum_vault_impl_data,
};

#[must_use]
pub fn bum_vault_impl_commands() -> Vec<Command> {
  implementation_commands(
    IMPLEMENTATION,
    get_bum_vault_proxy,
    get_bum_vault_impl,
    build_bum_vault_impl,
  )
}

pub fn process_bum_vault_impl_event(
  world: World,
  event: Event,
  from: Option<Address>,
) -> BoxFuture<'static, Result<World>> {
  async move {
    process_command_event("BUMVaultImpl", &bum_vault_impl_commands(), world, event, from).await
  }
  .boxed()
}
