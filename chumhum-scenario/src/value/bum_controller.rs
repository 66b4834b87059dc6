use alloy::primitives::{Address, U256};
use anyhow::{anyhow, Result};
use chumhum_contracts::lookup::get_bum_controller;
use chumhum_core::command::{get_fetcher_value, Arg, Fetcher};
use chumhum_core::contract::Contract;
use chumhum_core::core_value::get_address_v;
use chumhum_core::event::Event;
use chumhum_core::invokation::{read, read_address};
use chumhum_core::value::{Number, Value};
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::{address_fetcher, uint_at};
use crate::event::address;

/// BUM `account` may still mint.
///
/// # Errors
/// The controller reports a non-zero error code.
async fn get_mintable_bum(world: &World, bum_controller: &Contract, account: Address) -> Result<Number> {
  let outputs = read(world, bum_controller, "getMintableBUM", vec![address(account)]).await?;
  let error = uint_at(&outputs, 0, "getMintableBUM")?;
  if error != U256::ZERO {
    return Err(anyhow!("Failed to get mintable bum: error code = {error}"));
  }
  Ok(Number::from_u256(uint_at(&outputs, 1, "getMintableBUM")?))
}

#[must_use]
pub fn bum_controller_fetchers() -> Vec<Fetcher<Value>> {
  vec![
    address_fetcher("BUMController", get_bum_controller),
    Fetcher::new(
      "
        #### MintableBUM

        * \"BUMController MintableBUM <User>\" - Returns a given user's mintable bum amount
          * E.g. \"BUMController MintableBUM Geoff\"
      ",
      "MintableBUM",
      vec![
        Arg::new("bumcontroller", get_bum_controller).implicit(),
        Arg::new("account", get_address_v),
      ],
      |world, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        let account: Address = args.take("account")?;
        Ok(Value::Number(
          get_mintable_bum(&world, &bum_controller, account).await?,
        ))
      },
    ),
    Fetcher::new(
      "
        #### Admin

        * \"BUMController Admin\" - Returns the BUMController's admin
          * E.g. \"BUMController Admin\"
      ",
      "Admin",
      vec![Arg::new("bumcontroller", get_bum_controller).implicit()],
      |world, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        Ok(Value::Address(
          read_address(&world, &bum_controller, "admin", vec![]).await?,
        ))
      },
    ),
    Fetcher::new(
      "
        #### PendingAdmin

        * \"BUMController PendingAdmin\" - Returns the pending admin of the BUMController
          * E.g. \"BUMController PendingAdmin\"
      ",
      "PendingAdmin",
      vec![Arg::new("bumcontroller", get_bum_controller).implicit()],
      |world, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        Ok(Value::Address(
          read_address(&world, &bum_controller, "pendingAdmin", vec![]).await?,
        ))
      },
    ),
  ]
}

pub fn get_bum_controller_value(
  world: World,
  event: Event,
) -> BoxFuture<'static, Result<Value>> {
  async move {
    get_fetcher_value("BUMController", &bum_controller_fetchers(), world, event).await
  }
  .boxed()
}
