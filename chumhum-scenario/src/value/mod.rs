//! Value fetchers
//!
//! One fetcher family per contract, registered under the family name so
//! that `(BUM TokenBalance Geoff)` resolves wherever a value is expected.

mod bum;
mod bum_controller;
mod bum_controller_impl;
mod bum_unitroller;
mod bum_vault;
mod bum_vault_impl;
mod bum_vault_proxy;
mod chum;
mod comptroller;
mod maximillion;
mod proxy;
mod token;

use std::future::Future;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::U256;
use anyhow::{anyhow, Result};
use chumhum_core::command::{Arg, Fetcher};
use chumhum_core::contract::Contract;
use chumhum_core::event::Event;
use chumhum_core::value::Value;
use chumhum_core::world::World;

pub use self::bum::{bum_fetchers, get_bum_value};
pub use self::bum_controller::{bum_controller_fetchers, get_bum_controller_value};
pub use self::bum_controller_impl::{
  bum_controller_impl_fetchers, get_bum_controller_impl_value,
};
pub use self::bum_unitroller::{bum_unitroller_fetchers, get_bum_unitroller_value};
pub use self::bum_vault::{bum_vault_fetchers, get_bum_vault_value};
pub use self::bum_vault_impl::{bum_vault_impl_fetchers, get_bum_vault_impl_value};
pub use self::bum_vault_proxy::{bum_vault_proxy_fetchers, get_bum_vault_proxy_value};
pub use self::chum::{chum_fetchers, get_chum_value};
pub use self::comptroller::{comptroller_fetchers, get_comptroller_value};
pub use self::maximillion::{get_maximillion_value, maximillion_fetchers};

/// Output `index` of a read as a raw integer.
fn uint_at(outputs: &[DynSolValue], index: usize, method: &str) -> Result<U256> {
  outputs
    .get(index)
    .and_then(DynSolValue::as_uint)
    .map(|(value, _)| value)
    .ok_or_else(|| anyhow!("{method} returned no integer at output {index}"))
}

/// `<Family> Address` for contracts resolved by `getter`.
fn address_fetcher<G, GFut>(family: &str, getter: G) -> Fetcher<Value>
where
  G: Fn(World, Event) -> GFut + Send + Sync + 'static,
  GFut: Future<Output = Result<Contract>> + Send + 'static,
{
  Fetcher::new(
    &format!(
      "
        #### Address

        * \"{family} Address\" - Returns the address of {family}
          * E.g. \"{family} Address\"
      "
    ),
    "Address",
    vec![Arg::new("contract", getter).implicit()],
    |_world, mut args| async move {
      let contract: Contract = args.take("contract")?;
      Ok(Value::Address(contract.address))
    },
  )
}

/// `<Family> <Name> Address` for named implementations.
fn named_address_fetcher<G, GFut>(family: &str, getter: G) -> Fetcher<Value>
where
  G: Fn(World, Event) -> GFut + Send + Sync + 'static,
  GFut: Future<Output = Result<Contract>> + Send + 'static,
{
  Fetcher::new(
    &format!(
      "
        #### Address

        * \"{family} <Impl> Address\" - Returns the address of the named implementation
          * E.g. \"{family} Standard Address\"
      "
    ),
    "Address",
    vec![Arg::new("impl", getter)],
    |_world, mut args| async move {
      let contract: Contract = args.take("impl")?;
      Ok(Value::Address(contract.address))
    },
  )
  .name_pos(1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn uint_outputs_by_index() -> Result<()> {
    let outputs = vec![
      DynSolValue::Uint(U256::ZERO, 256),
      DynSolValue::Uint(U256::from(7u64), 256),
    ];
    assert_eq!(uint_at(&outputs, 1, "getAccountLiquidity")?, U256::from(7u64));
    assert!(uint_at(&outputs, 2, "getAccountLiquidity").is_err());
    Ok(())
  }
}
