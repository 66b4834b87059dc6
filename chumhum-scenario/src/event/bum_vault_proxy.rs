use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::lookup::{get_bum_vault_impl, get_bum_vault_proxy};
use chumhum_contracts::reporter::BUM_VAULT_ERROR_REPORTER;
use chumhum_core::command::{process_command_event, Command};
use chumhum_core::event::Event;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::proxy::{proxy_commands, Proxy};
use crate::builder::build_bum_vault_proxy;

const PROXY: Proxy = Proxy {
  family: "BUMVaultProxy",
  target: "bumvault",
  reporter: BUM_VAULT_ERROR_REPORTER,
};

#[must_use]
pub fn bum_vault_proxy_commands() -> Vec<Command> {
  proxy_commands(
    PROXY,
    get_bum_vault_proxy,
    get_bum_vault_impl,
    build_bum_vault_proxy,
  )
}

pub fn process_bum_vault_proxy_event(
  world: World,
  event: Event,
  from: Option<Address>,
) -> BoxFuture<'static, Result<World>> {
  async move {
    process_command_event("BUMVaultProxy", &bum_vault_proxy_commands(), world, event, from)
      .await
  }
  .boxed()
}
