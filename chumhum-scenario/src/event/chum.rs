use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::lookup::get_chum;
use chumhum_core::command::{process_command_event, Arg, Command};
use chumhum_core::contract::Contract;
use chumhum_core::core_value::{get_address_v, get_event_v, get_number_v, get_string_v};
use chumhum_core::event::Event;
use chumhum_core::invokation::NO_ERROR_REPORTER;
use chumhum_core::value::Number;
use chumhum_core::verify::verify_contract;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::{address, addresses, call_and_log, show_addresses, uint};
use crate::builder::build_chum;

async fn gen_chum(world: World, from: Address, params: Event) -> Result<World> {
  let built = build_chum(world, from, params).await?;
  Ok(built.world.add_action(
    format!(
      "Deployed CHUM ({}) to address {}",
      built.description, built.contract.address
    ),
    Some(built.invokation),
  ))
}

/// Plain token transfer style command: `<verb> <address> <amount>`.
fn transfer_like(
  doc: &str,
  name: &str,
  method: &'static str,
  describe: fn(&World, Address, Address, &Number) -> String,
) -> Command {
  Command::new(
    doc,
    name,
    vec![
      Arg::new("chum", get_chum).implicit(),
      Arg::new("address", get_address_v),
      Arg::new("amount", get_number_v),
    ],
    move |world, from, mut args| async move {
      let chum: Contract = args.take("chum")?;
      let to: Address = args.take("address")?;
      let amount: Number = args.take("amount")?;
      let log = describe(&world, from, to, &amount);
      call_and_log(
        world,
        from,
        &chum,
        method,
        vec![address(to), uint(amount)?],
        &NO_ERROR_REPORTER,
        log,
      )
      .await
    },
  )
}

#[allow(clippy::too_many_lines)]
#[must_use]
pub fn chum_commands() -> Vec<Command> {
  vec![
    Command::new(
      "
        #### Deploy

        * \"Deploy ...params\" - Generates a new CHUM token
          * E.g. \"CHUM Deploy Geoff\"
      ",
      "Deploy",
      vec![Arg::new("params", get_event_v).variadic()],
      |world, from, mut args| async move { gen_chum(world, from, args.take("params")?).await },
    ),
    Command::view(
      "
        #### Verify

        * \"<CHUM> Verify apiKey:<String> contractName:<String>=CHUM\" - Verifies CHUM token on the block explorer
          * E.g. \"CHUM Verify \"myApiKey\"\"
      ",
      "Verify",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("apiKey", get_string_v),
        Arg::new("contractName", get_string_v).default("CHUM".to_string()),
      ],
      |world, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let api_key: String = args.take("apiKey")?;
        let contract_name: String = args.take("contractName")?;
        verify_contract(world, &api_key, &chum.name, &contract_name, chum.address).await
      },
    ),
    transfer_like(
      "
        #### Approve

        * \"CHUM Approve spender:<Address> <Amount>\" - Adds an allowance between user and address
          * E.g. \"CHUM Approve Geoff 1.0e18\"
      ",
      "Approve",
      "approve",
      |world, from, _spender, amount| {
        format!(
          "Approved CHUM token for {} of {}",
          world.describe_user(from),
          amount.show()
        )
      },
    ),
    transfer_like(
      "
        #### Transfer

        * \"CHUM Transfer recipient:<User> <Amount>\" - Transfers a number of tokens via \"transfer\" as given user to recipient (this does not depend on allowance)
          * E.g. \"CHUM Transfer Torrey 1.0e18\"
      ",
      "Transfer",
      "transfer",
      |world, from, to, amount| {
        format!(
          "Transferred {} CHUM tokens from {} to {}",
          amount.show(),
          world.describe_user(from),
          world.describe_user(to)
        )
      },
    ),
    Command::new(
      "
        #### TransferFrom

        * \"CHUM TransferFrom owner:<User> spender:<User> <Amount>\" - Transfers a number of tokens via \"transferFrom\" to recipient (this depends on allowances)
          * E.g. \"CHUM TransferFrom Geoff Torrey 1.0e18\"
      ",
      "TransferFrom",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("owner", get_address_v),
        Arg::new("spender", get_address_v),
        Arg::new("amount", get_number_v),
      ],
      |world, from, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let owner: Address = args.take("owner")?;
        let spender: Address = args.take("spender")?;
        let amount: Number = args.take("amount")?;
        let log = format!(
          "\"Transferred from\" {} CHUM tokens from {} to {}",
          amount.show(),
          world.describe_user(owner),
          world.describe_user(spender)
        );
        call_and_log(
          world,
          from,
          &chum,
          "transferFrom",
          vec![address(owner), address(spender), uint(amount)?],
          &NO_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### TransferScenario

        * \"CHUM TransferScenario recipients:<User[]> <Amount>\" - Transfers a number of tokens via \"transfer\" to the given recipients (this does not depend on allowance)
          * E.g. \"CHUM TransferScenario (Jared Torrey) 10\"
      ",
      "TransferScenario",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("recipients", get_address_v).mapped(),
        Arg::new("amount", get_number_v),
      ],
      |world, from, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let recipients: Vec<Address> = args.take("recipients")?;
        let amount: Number = args.take("amount")?;
        let log = format!(
          "Transferred {} CHUM tokens from {} to {}",
          amount.show(),
          world.describe_user(from),
          show_addresses(&world, &recipients)
        );
        call_and_log(
          world,
          from,
          &chum,
          "transferScenario",
          vec![addresses(&recipients), uint(amount)?],
          &NO_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### TransferFromScenario

        * \"CHUM TransferFromScenario froms:<User[]> <Amount>\" - Transfers a number of tokens via \"transferFrom\" from the given users to msg.sender (this depends on allowance)
          * E.g. \"CHUM TransferFromScenario (Jared Torrey) 10\"
      ",
      "TransferFromScenario",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("froms", get_address_v).mapped(),
        Arg::new("amount", get_number_v),
      ],
      |world, from, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let froms: Vec<Address> = args.take("froms")?;
        let amount: Number = args.take("amount")?;
        let log = format!(
          "Transferred {} CHUM tokens from {} to {}",
          amount.show(),
          show_addresses(&world, &froms),
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &chum,
          "transferFromScenario",
          vec![addresses(&froms), uint(amount)?],
          &NO_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### Delegate

        * \"CHUM Delegate account:<Address>\" - Delegates votes to a given account
          * E.g. \"CHUM Delegate Torrey\"
      ",
      "Delegate",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("account", get_address_v),
      ],
      |world, from, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let account: Address = args.take("account")?;
        let log = format!(
          "\"Delegated from\" {} to {}",
          world.describe_user(from),
          world.describe_user(account)
        );
        call_and_log(
          world,
          from,
          &chum,
          "delegate",
          vec![address(account)],
          &NO_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### SetBlockNumber

        * \"CHUM SetBlockNumber <Seconds>\" - Sets the blockTimestamp of the CHUM Harness
          * E.g. \"CHUM SetBlockNumber 500\"
      ",
      "SetBlockNumber",
      vec![
        Arg::new("chum", get_chum).implicit(),
        Arg::new("blockNumber", get_number_v),
      ],
      |world, from, mut args| async move {
        let chum: Contract = args.take("chum")?;
        let block_number: Number = args.take("blockNumber")?;
        call_and_log(
          world,
          from,
          &chum,
          "setBlockNumber",
          vec![uint(block_number)?],
          &NO_ERROR_REPORTER,
          format!("Set CHUM blockNumber to {}", block_number.show()),
        )
        .await
      },
    ),
  ]
}

pub fn process_chum_event(
  world: World,
  event: Event,
  from: Option<Address>,
) -> BoxFuture<'static, Result<World>> {
  async move { process_command_event("CHUM", &chum_commands(), world, event, from).await }
    .boxed()
}
