use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use anyhow::{anyhow, Result};
use chumhum_contracts::lookup::get_chum;
use chumhum_core::command::{get_fetcher_value, Arg, Fetcher};
use chumhum_core::contract::Contract;
use chumhum_core::core_value::{get_address_v, get_number_v};
use chumhum_core::event::Event;
use chumhum_core::invokation::{read, read_number};
use chumhum_core::value::{Number, Value};
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::token::token_fetchers;
use super::uint_at;
use crate::event::{address, uint};

/// Checkpoint `(fromBlock, votes)` number `index` of `account`.
async fn checkpoint(
  world: &World,
  chum: &Contract,
  account: Address,
  index: u32,
) -> Result<(U256, U256)> {
  let outputs = read(
    world,
    chum,
    "checkpoints",
    vec![address(account), DynSolValue::Uint(U256::from(index), 32)],
  )
  .await?;
  Ok((
    uint_at(&outputs, 0, "checkpoints")?,
    uint_at(&outputs, 1, "checkpoints")?,
  ))
}

async fn num_checkpoints(world: &World, chum: &Contract, account: Address) -> Result<u32> {
  let outputs = read(world, chum, "numCheckpoints", vec![address(account)]).await?;
  let count = uint_at(&outputs, 0, "numCheckpoints")?;
  u32::try_from(count).map_err(|_| anyhow!("checkpoint count {count} out of range"))
}

#[allow(clippy::too_many_lines)]
#[must_use]
pub fn chum_fetchers() -> Vec<Fetcher<Value>> {
  let mut fetchers = token_fetchers("CHUM", get_chum);
  fetchers.extend([
    Fetcher::new(
      "
        #### GetCurrentVotes

        * \"CHUM GetCurrentVotes account:<Address>\" - Returns the current CHUM votes balance for an account
          * E.g. \"CHUM GetCurrentVotes Geoff\" - Returns the current CHUM vote balance of Geoff
      ",
      "GetCurrentVotes",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("account", get_address_v),
      ],
      |world, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let account: Address = args.take("account")?;
        Ok(Value::Number(
          read_number(&world, &chum, "getCurrentVotes", vec![address(account)]).await?,
        ))
      },
    ),
    Fetcher::new(
      "
        #### GetPriorVotes

        * \"CHUM GetPriorVotes account:<Address> blockNumber:<Number>\" - Returns the current CHUM votes balance at given block
          * E.g. \"CHUM GetPriorVotes Geoff 5\" - Returns the CHUM vote balance for Geoff at block 5
      ",
      "GetPriorVotes",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("account", get_address_v),
        Arg::new("blockNumber", get_number_v),
      ],
      |world, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let account: Address = args.take("account")?;
        let block: Number = args.take("blockNumber")?;
        Ok(Value::Number(
          read_number(
            &world,
            &chum,
            "getPriorVotes",
            vec![address(account), uint(block)?],
          )
          .await?,
        ))
      },
    ),
    Fetcher::new(
      "
        #### GetCurrentVotesBlock

        * \"CHUM GetCurrentVotesBlock account:<Address>\" - Returns the current CHUM votes checkpoint block for an account
          * E.g. \"CHUM GetCurrentVotesBlock Geoff\" - Returns the current CHUM votes checkpoint block for Geoff
      ",
      "GetCurrentVotesBlock",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("account", get_address_v),
      ],
      |world, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let account: Address = args.take("account")?;
        let count = num_checkpoints(&world, &chum, account).await?;
        let last = count
          .checked_sub(1)
          .ok_or_else(|| anyhow!("{} has no CHUM checkpoints", world.describe_user(account)))?;
        let (from_block, _) = checkpoint(&world, &chum, account, last).await?;
        Ok(Value::Number(Number::from_u256(from_block)))
      },
    ),
    Fetcher::new(
      "
        #### VotesLength

        * \"CHUM VotesLength account:<Address>\" - Returns the CHUM vote checkpoint array length
          * E.g. \"CHUM VotesLength Geoff\" - Returns the CHUM vote checkpoint array length of Geoff
      ",
      "VotesLength",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("account", get_address_v),
      ],
      |world, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let account: Address = args.take("account")?;
        Ok(Value::Number(
          read_number(&world, &chum, "numCheckpoints", vec![address(account)]).await?,
        ))
      },
    ),
    Fetcher::new(
      "
        #### AllVotes

        * \"CHUM AllVotes account:<Address>\" - Returns information about all votes an account has had
          * E.g. \"CHUM AllVotes Geoff\" - Returns the CHUM vote checkpoint array
      ",
      "AllVotes",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("account", get_address_v),
      ],
      |world, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let account: Address = args.take("account")?;
        let count = num_checkpoints(&world, &chum, account).await?;
        let mut votes = Vec::with_capacity(count as usize);
        for index in 0..count {
          let (from_block, amount) = checkpoint(&world, &chum, account, index).await?;
          let plural = if amount == U256::from(1u64) { "" } else { "s" };
          votes.push(Value::String(format!(
            "Block {from_block}: {amount} vote{plural}"
          )));
        }
        Ok(Value::List(votes))
      },
    ),
  ]);
  fetchers
}

pub fn get_chum_value(world: World, event: Event) -> BoxFuture<'static, Result<Value>> {
  async move { get_fetcher_value("CHUM", &chum_fetchers(), world, event).await }.boxed()
}
