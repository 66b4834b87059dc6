use anyhow::Result;
use chumhum_contracts::lookup::get_bum_vault_proxy;
use chumhum_core::command::{get_fetcher_value, Fetcher};
use chumhum_core::event::Event;
use chumhum_core::value::Value;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::proxy::proxy_fetchers;

#[must_use]
pub fn bum_vault_proxy_fetchers() -> Vec<Fetcher<Value>> {
  proxy_fetchers(
    "BUMVaultProxy",
    get_bum_vault_proxy,
    "bumvaultImplementation",
    "pendingBUMVaultImplementation",
  )
}

pub fn get_bum_vault_proxy_value(
  world: World,
  event: Event,
) -> BoxFuture<'static, Result<Value>> {
  async move {
    get_fetcher_value("BUMVaultProxy", &bum_vault_proxy_fetchers(), world, event).await
  }
  .boxed()
}
