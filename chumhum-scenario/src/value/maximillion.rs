use anyhow::Result;
use chumhum_contracts::lookup::get_maximillion;
use chumhum_core::command::{get_fetcher_value, Fetcher};
use chumhum_core::event::Event;
use chumhum_core::value::Value;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::address_fetcher;

#[must_use]
pub fn maximillion_fetchers() -> Vec<Fetcher<Value>> {
  vec![address_fetcher("Maximillion", get_maximillion)]
}

pub fn get_maximillion_value(
  world: World,
  event: Event,
) -> BoxFuture<'static, Result<Value>> {
  async move { get_fetcher_value("Maximillion", &maximillion_fetchers(), world, event).await }
    .boxed()
}
