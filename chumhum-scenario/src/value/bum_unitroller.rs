use anyhow::Result;
use chumhum_contracts::lookup::get_bum_unitroller;
use chumhum_core::command::{get_fetcher_value, Fetcher};
use chumhum_core::event::Event;
use chumhum_core::value::Value;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::proxy::proxy_fetchers;

#[must_use]
pub fn bum_unitroller_fetchers() -> Vec<Fetcher<Value>> {
  proxy_fetchers(
    "BUMUnitroller",
    get_bum_unitroller,
    "bumcontrollerImplementation",
    "pendingBUMControllerImplementation",
  )
}

pub fn get_bum_unitroller_value(
  world: World,
  event: Event,
) -> BoxFuture<'static, Result<Value>> {
  async move {
    get_fetcher_value("BUMUnitroller", &bum_unitroller_fetchers(), world, event).await
  }
  .boxed()
}
