use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::lookup::{get_bum_controller_impl, get_bum_unitroller};
use chumhum_contracts::reporter::BUM_CONTROLLER_ERROR_REPORTER;
use chumhum_core::command::{process_command_event, Command};
use chumhum_core::event::Event;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::proxy::{proxy_commands, Proxy};
use crate::builder::build_bum_unitroller;

const PROXY: Proxy = Proxy {
  family: "BUMUnitroller",
  target: "bumcontroller",
  reporter: BUM_CONTROLLER_ERROR_REPORTER,
};

#[must_use]
pub fn bum_unitroller_commands() -> Vec<Command> {
  proxy_commands(
    PROXY,
    get_bum_unitroller,
    get_bum_controller_impl,
    build_bum_unitroller,
  )
}

pub fn process_bum_unitroller_event(
  world: World,
  event: Event,
  from: Option<Address>,
) -> BoxFuture<'static, Result<World>> {
  async move {
    process_command_event("BUMUnitroller", &bum_unitroller_commands(), world, event, from)
      .await
  }
  .boxed()
}
