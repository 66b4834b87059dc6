//! Fetchers shared by the delegating proxies.

use std::future::Future;

use anyhow::Result;
use chumhum_core::command::{Arg, Fetcher};
use chumhum_core::contract::Contract;
use chumhum_core::event::Event;
use chumhum_core::invokation::read_address;
use chumhum_core::value::Value;
use chumhum_core::world::World;

use super::address_fetcher;

/// Reader for a proxy: `(verb, method, description)`.
type Reader = (&'static str, &'static str, &'static str);

pub(super) fn proxy_fetchers<G, GFut>(
  family: &'static str,
  getter: G,
  implementation: &'static str,
  pending_implementation: &'static str,
) -> Vec<Fetcher<Value>>
where
  G: Fn(World, Event) -> GFut + Copy + Send + Sync + 'static,
  GFut: Future<Output = Result<Contract>> + Send + 'static,
{
  let readers: [Reader; 4] = [
    ("Admin", "admin", "the admin"),
    ("PendingAdmin", "pendingAdmin", "the pending admin"),
    ("Implementation", implementation, "the current implementation"),
    (
      "PendingImplementation",
      pending_implementation,
      "the pending implementation",
    ),
  ];
  let mut fetchers = vec![address_fetcher(family, getter)];
  fetchers.extend(readers.into_iter().map(|(verb, method, description)| {
    Fetcher::new(
      &format!(
        "
          #### {verb}

          * \"{family} {verb}\" - Returns {description} of {family}
            * E.g. \"{family} {verb}\"
        "
      ),
      verb,
      vec![Arg::new("proxy", getter).implicit()],
      move |world, mut args| async move {
        let proxy: Contract = args.take("proxy")?;
        Ok(Value::Address(read_address(&world, &proxy, method, vec![]).await?))
      },
    )
  }));
  fetchers
}
