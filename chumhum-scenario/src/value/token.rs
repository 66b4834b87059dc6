//! Fetchers shared by the ERC-20 style tokens, BUM and CHUM.

use std::future::Future;

use alloy::primitives::Address;
use anyhow::Result;
use chumhum_core::command::{Arg, Fetcher};
use chumhum_core::contract::Contract;
use chumhum_core::core_value::get_address_v;
use chumhum_core::event::Event;
use chumhum_core::invokation::{read_number, read_string};
use chumhum_core::value::Value;
use chumhum_core::world::World;

use super::address_fetcher;
use crate::event::address;

#[allow(clippy::too_many_lines)]
pub(super) fn token_fetchers<G, GFut>(family: &'static str, getter: G) -> Vec<Fetcher<Value>>
where
  G: Fn(World, Event) -> GFut + Copy + Send + Sync + 'static,
  GFut: Future<Output = Result<Contract>> + Send + 'static,
{
  vec![
    address_fetcher(family, getter),
    Fetcher::new(
      &format!(
        "
          #### Name

          * \"{family} Name\" - Returns the name of the {family} token
            * E.g. \"{family} Name\"
        "
      ),
      "Name",
      vec![Arg::new("token", getter).implicit()],
      |world, mut args| async move {
        let token: Contract = args.take("token")?;
        Ok(Value::String(read_string(&world, &token, "name", vec![]).await?))
      },
    ),
    Fetcher::new(
      &format!(
        "
          #### Symbol

          * \"{family} Symbol\" - Returns the symbol of the {family} token
            * E.g. \"{family} Symbol\"
        "
      ),
      "Symbol",
      vec![Arg::new("token", getter).implicit()],
      |world, mut args| async move {
        let token: Contract = args.take("token")?;
        Ok(Value::String(read_string(&world, &token, "symbol", vec![]).await?))
      },
    ),
    Fetcher::new(
      &format!(
        "
          #### Decimals

          * \"{family} Decimals\" - Returns the number of decimals of the {family} token
            * E.g. \"{family} Decimals\"
        "
      ),
      "Decimals",
      vec![Arg::new("token", getter).implicit()],
      |world, mut args| async move {
        let token: Contract = args.take("token")?;
        Ok(Value::Number(read_number(&world, &token, "decimals", vec![]).await?))
      },
    ),
    Fetcher::new(
      &format!(
        "
          #### TotalSupply

          * \"{family} TotalSupply\" - Returns {family} token's total supply
        "
      ),
      "TotalSupply",
      vec![Arg::new("token", getter).implicit()],
      |world, mut args| async move {
        let token: Contract = args.take("token")?;
        Ok(Value::Number(read_number(&world, &token, "totalSupply", vec![]).await?))
      },
    ),
    Fetcher::new(
      &format!(
        "
          #### TokenBalance

          * \"{family} TokenBalance <Address>\" - Returns the {family} token balance of a given address
            * E.g. \"{family} TokenBalance Geoff\" - Returns Geoff's {family} balance
        "
      ),
      "TokenBalance",
      vec![
        Arg::new("token", getter).implicit(),
        Arg::new("address", get_address_v),
      ],
      |world, mut args| async move {
        let token: Contract = args.take("token")?;
        let owner: Address = args.take("address")?;
        Ok(Value::Number(
          read_number(&world, &token, "balanceOf", vec![address(owner)]).await?,
        ))
      },
    ),
    Fetcher::new(
      &format!(
        "
          #### Allowance

          * \"{family} Allowance owner:<Address> spender:<Address>\" - Returns the {family} allowance from owner to spender
            * E.g. \"{family} Allowance Geoff Torrey\" - Returns the {family} allowance of Geoff to Torrey
        "
      ),
      "Allowance",
      vec![
        Arg::new("token", getter).implicit(),
        Arg::new("owner", get_address_v),
        Arg::new("spender", get_address_v),
      ],
      |world, mut args| async move {
        let token: Contract = args.take("token")?;
        let owner: Address = args.take("owner")?;
        let spender: Address = args.take("spender")?;
        Ok(Value::Number(
          read_number(
            &world,
            &token,
            "allowance",
            vec![address(owner), address(spender)],
          )
          .await?,
        ))
      },
    ),
  ]
}
