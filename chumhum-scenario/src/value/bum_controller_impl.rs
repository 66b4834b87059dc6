use anyhow::Result;
use chumhum_contracts::lookup::get_bum_controller_impl;
use chumhum_core::command::{get_fetcher_value, Fetcher};
use chumhum_core::event::Event;
use chumhum_core::value::Value;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::named_address_fetcher;

#[must_use]
pub fn bum_controller_impl_fetchers() -> Vec<Fetcher<Value>> {
  vec![named_address_fetcher("BUMControllerImpl", get_bum_controller_impl)]
}

pub fn get_bum_controller_impl_value(
  world: World,
  event: Event,
) -> BoxFuture<'static, Result<Value>> {
  async move {
    get_fetcher_value(
      "BUMControllerImpl",
      &bum_controller_impl_fetchers(),
      world,
      event,
    )
    .await
  }
  .boxed()
}
