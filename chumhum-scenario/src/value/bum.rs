use anyhow::Result;
use chumhum_contracts::lookup::get_bum;
use chumhum_core::command::{get_fetcher_value, Fetcher};
use chumhum_core::event::Event;
use chumhum_core::value::Value;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::token::token_fetchers;

#[must_use]
pub fn bum_fetchers() -> Vec<Fetcher<Value>> {
  token_fetchers("BUM", get_bum)
}

pub fn get_bum_value(world: World, event: Event) -> BoxFuture<'static, Result<Value>> {
  async move { get_fetcher_value("BUM", &bum_fetchers(), world, event).await }.boxed()
}
