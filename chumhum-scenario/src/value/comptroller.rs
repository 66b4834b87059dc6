use alloy::primitives::{Address, U256};
use anyhow::{anyhow, Result};
use chumhum_contracts::lookup::{get_comptroller, get_ctoken};
use chumhum_core::command::{get_fetcher_value, Arg, Fetcher};
use chumhum_core::contract::Contract;
use chumhum_core::core_value::get_address_v;
use chumhum_core::event::Event;
use chumhum_core::invokation::{read, read_address, read_bool, read_number};
use chumhum_core::value::{Number, Value};
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::{address_fetcher, uint_at};
use crate::event::address;

/// Liquidity minus shortfall, negative when the account is underwater.
async fn get_liquidity(world: &World, comptroller: &Contract, account: Address) -> Result<Number> {
  let outputs = read(
    world,
    comptroller,
    "getAccountLiquidity",
    vec![address(account)],
  )
  .await?;
  let error = uint_at(&outputs, 0, "getAccountLiquidity")?;
  if error != U256::ZERO {
    return Err(anyhow!("Failed to compute account liquidity: error code = {error}"));
  }
  let liquidity = Number::from_u256(uint_at(&outputs, 1, "getAccountLiquidity")?);
  let shortfall = Number::from_u256(uint_at(&outputs, 2, "getAccountLiquidity")?);
  liquidity.sub(shortfall)
}

#[derive(Clone, Copy)]
enum Output {
  Address,
  Number,
}

/// No-argument reader: `Comptroller <verb>`.
fn reader(verb: &'static str, method: &'static str, doc: &str, output: Output) -> Fetcher<Value> {
  Fetcher::new(
    doc,
    verb,
    vec![Arg::new("comptroller", get_comptroller).implicit()],
    move |world, mut args| async move {
      let comptroller: Contract = args.take("comptroller")?;
      match output {
        Output::Address => Ok(Value::Address(
          read_address(&world, &comptroller, method, vec![]).await?,
        )),
        Output::Number => Ok(Value::Number(
          read_number(&world, &comptroller, method, vec![]).await?,
        )),
      }
    },
  )
}

/// Per-account reader: `Comptroller <verb> <User>`.
fn account_reader(verb: &'static str, method: &'static str, doc: &str) -> Fetcher<Value> {
  Fetcher::new(
    doc,
    verb,
    vec![
      Arg::new("comptroller", get_comptroller).implicit(),
      Arg::new("account", get_address_v),
    ],
    move |world, mut args| async move {
      let comptroller: Contract = args.take("comptroller")?;
      let account: Address = args.take("account")?;
      Ok(Value::Number(
        read_number(&world, &comptroller, method, vec![address(account)]).await?,
      ))
    },
  )
}

#[allow(clippy::too_many_lines)]
#[must_use]
pub fn comptroller_fetchers() -> Vec<Fetcher<Value>> {
  vec![
    address_fetcher("Comptroller", get_comptroller),
    reader(
      "Admin",
      "admin",
      "
        #### Admin

        * \"Comptroller Admin\" - Returns the Comptrollers's admin
          * E.g. \"Comptroller Admin\"
      ",
      Output::Address,
    ),
    reader(
      "PendingAdmin",
      "pendingAdmin",
      "
        #### PendingAdmin

        * \"Comptroller PendingAdmin\" - Returns the pending admin of the Comptroller
          * E.g. \"Comptroller PendingAdmin\"
      ",
      Output::Address,
    ),
    reader(
      "Implementation",
      "comptrollerImplementation",
      "
        #### Implementation

        * \"Comptroller Implementation\" - Returns the Comptroller implementation behind the Unitroller
          * E.g. \"Comptroller Implementation\"
      ",
      Output::Address,
    ),
    Fetcher::new(
      "
        #### Liquidity

        * \"Comptroller Liquidity <User>\" - Returns a given user's trued up liquidity
          * E.g. \"Comptroller Liquidity Geoff\"
      ",
      "Liquidity",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("account", get_address_v),
      ],
      |world, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let account: Address = args.take("account")?;
        Ok(Value::Number(get_liquidity(&world, &comptroller, account).await?))
      },
    ),
    account_reader(
      "MembershipLength",
      "membershipLength",
      "
        #### MembershipLength

        * \"Comptroller MembershipLength <User>\" - Returns a given user's length of membership
          * E.g. \"Comptroller MembershipLength Geoff\"
      ",
    ),
    Fetcher::new(
      "
        #### CheckMembership

        * \"Comptroller CheckMembership <User> <CToken>\" - Returns one if user is in asset, zero otherwise.
          * E.g. \"Comptroller CheckMembership Geoff cZRX\"
      ",
      "CheckMembership",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("account", get_address_v),
        Arg::new("cToken", get_ctoken),
      ],
      |world, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let account: Address = args.take("account")?;
        let ctoken: Contract = args.take("cToken")?;
        Ok(Value::Bool(
          read_bool(
            &world,
            &comptroller,
            "checkMembership",
            vec![address(account), address(ctoken.address)],
          )
          .await?,
        ))
      },
    ),
    account_reader(
      "MintedBUMs",
      "mintedBUMs",
      "
        #### MintedBUMs

        * \"Comptroller MintedBUMs <User>\" - Returns the BUM minted by a given user
          * E.g. \"Comptroller MintedBUMs Geoff\"
      ",
    ),
    Fetcher::new(
      "
        #### ProtocolPaused

        * \"Comptroller ProtocolPaused\" - Returns whether the protocol is paused
          * E.g. \"Comptroller ProtocolPaused\"
      ",
      "ProtocolPaused",
      vec![Arg::new("comptroller", get_comptroller).implicit()],
      |world, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        Ok(Value::Bool(
          read_bool(&world, &comptroller, "protocolPaused", vec![]).await?,
        ))
      },
    ),
    reader(
      "CloseFactor",
      "closeFactorMantissa",
      "
        #### CloseFactor

        * \"Comptroller CloseFactor\" - Returns the Comptroller's close factor
          * E.g. \"Comptroller CloseFactor\"
      ",
      Output::Number,
    ),
    reader(
      "LiquidationIncentive",
      "liquidationIncentiveMantissa",
      "
        #### LiquidationIncentive

        * \"Comptroller LiquidationIncentive\" - Returns the Comptroller's liquidation incentive
          * E.g. \"Comptroller LiquidationIncentive\"
      ",
      Output::Number,
    ),
    reader(
      "BorrowCapGuardian",
      "borrowCapGuardian",
      "
        #### BorrowCapGuardian

        * \"Comptroller BorrowCapGuardian\" - Returns the Comptrollers's borrow cap guardian
          * E.g. \"Comptroller BorrowCapGuardian\"
      ",
      Output::Address,
    ),
    reader(
      "ChumHumRate",
      "chumhumRate",
      "
        #### ChumHumRate

        * \"Comptroller ChumHumRate\" - Returns the rate CHUM is distributed at per block
          * E.g. \"Comptroller ChumHumRate\"
      ",
      Output::Number,
    ),
  ]
}

pub fn get_comptroller_value(
  world: World,
  event: Event,
) -> BoxFuture<'static, Result<Value>> {
  async move { get_fetcher_value("Comptroller", &comptroller_fetchers(), world, event).await }
    .boxed()
}
