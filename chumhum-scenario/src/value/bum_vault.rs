use anyhow::Result;
use chumhum_contracts::lookup::get_bum_vault;
use chumhum_core::command::{get_fetcher_value, Fetcher};
use chumhum_core::event::Event;
use chumhum_core::value::Value;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::address_fetcher;

#[must_use]
pub fn bum_vault_fetchers() -> Vec<Fetcher<Value>> {
  vec![address_fetcher("BUMVault", get_bum_vault)]
}

pub fn get_bum_vault_value(world: World, event: Event) -> BoxFuture<'static, Result<Value>> {
  async move { get_fetcher_value("BUMVault", &bum_vault_fetchers(), world, event).await }
    .boxed()
}
