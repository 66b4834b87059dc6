use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::lookup::get_bum;
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
use crate::builder::build_bum;

async fn gen_bum(world: World, from: Address, params: Event) -> Result<World> {
  let built = build_bum(world, from, params).await?;
  Ok(built.world.add_action(
    format!(
      "Deployed BUM ({}) to address {}",
      built.description, built.contract.address
    ),
    Some(built.invokation),
  ))
}

#[allow(clippy::too_many_lines)]
#[must_use]
pub fn bum_commands() -> Vec<Command> {
  vec![
    Command::new(
      "
        #### Deploy

        * \"Deploy ...params\" - Generates a new BUM token
          * E.g. \"BUM Deploy\"
      ",
      "Deploy",
      vec![Arg::new("params", get_event_v).variadic()],
      |world, from, mut args| async move { gen_bum(world, from, args.take("params")?).await },
    ),
    Command::view(
      "
        #### Verify

        * \"<BUM> Verify apiKey:<String> contractName:<String>=BUM\" - Verifies BUM token on the block explorer
          * E.g. \"BUM Verify \"myApiKey\"\"
      ",
      "Verify",
      vec![
        Arg::new("bum", get_bum).implicit(),
        Arg::new("apiKey", get_string_v),
        Arg::new("contractName", get_string_v).default("BUM".to_string()),
      ],
      |world, mut args| async move {
        let bum: Contract = args.take("bum")?;
        let api_key: String = args.take("apiKey")?;
        let contract_name: String = args.take("contractName")?;
        verify_contract(world, &api_key, &bum.name, &contract_name, bum.address).await
      },
    ),
    Command::new(
      "
        #### Approve

        * \"BUM Approve spender:<Address> <Amount>\" - Adds an allowance between user and address
          * E.g. \"BUM Approve Geoff 1.0e18\"
      ",
      "Approve",
      vec![
        Arg::new("bum", get_bum).implicit(),
        Arg::new("spender", get_address_v),
        Arg::new("amount", get_number_v),
      ],
      |world, from, mut args| async move {
        let bum: Contract = args.take("bum")?;
        let spender: Address = args.take("spender")?;
        let amount: Number = args.take("amount")?;
        let log = format!(
          "Approved BUM token for {} of {}",
          world.describe_user(from),
          amount.show()
        );
        call_and_log(
          world,
          from,
          &bum,
          "approve",
          vec![address(spender), uint(amount)?],
          &NO_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### Faucet

        * \"BUM Faucet recipient:<User> <Amount>\" - Adds an arbitrary balance to given user
          * E.g. \"BUM Faucet Geoff 1.0e18\"
      ",
      "Faucet",
      vec![
        Arg::new("bum", get_bum).implicit(),
        Arg::new("recipient", get_address_v),
        Arg::new("amount", get_number_v),
      ],
      |world, from, mut args| async move {
        let bum: Contract = args.take("bum")?;
        let recipient: Address = args.take("recipient")?;
        let amount: Number = args.take("amount")?;
        let log = format!(
          "Fauceted {} BUM tokens to {}",
          amount.show(),
          world.describe_user(recipient)
        );
        call_and_log(
          world,
          from,
          &bum,
          "allocateTo",
          vec![address(recipient), uint(amount)?],
          &NO_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### Transfer

        * \"BUM Transfer recipient:<User> <Amount>\" - Transfers a number of tokens via \"transfer\" as given user to recipient (this does not depend on allowance)
          * E.g. \"BUM Transfer Torrey 1.0e18\"
      ",
      "Transfer",
      vec![
        Arg::new("bum", get_bum).implicit(),
        Arg::new("recipient", get_address_v),
        Arg::new("amount", get_number_v),
      ],
      |world, from, mut args| async move {
        let bum: Contract = args.take("bum")?;
        let recipient: Address = args.take("recipient")?;
        let amount: Number = args.take("amount")?;
        let log = format!(
          "Transferred {} BUM tokens from {} to {}",
          amount.show(),
          world.describe_user(from),
          world.describe_user(recipient)
        );
        call_and_log(
          world,
          from,
          &bum,
          "transfer",
          vec![address(recipient), uint(amount)?],
          &NO_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### TransferFrom

        * \"BUM TransferFrom owner:<User> spender:<User> <Amount>\" - Transfers a number of tokens via \"transferFrom\" to recipient (this depends on allowances)
          * E.g. \"BUM TransferFrom Geoff Torrey 1.0e18\"
      ",
      "TransferFrom",
      vec![
        Arg::new("bum", get_bum).implicit(),
        Arg::new("owner", get_address_v),
        Arg::new("spender", get_address_v),
        Arg::new("amount", get_number_v),
      ],
      |world, from, mut args| async move {
        let bum: Contract = args.take("bum")?;
        let owner: Address = args.take("owner")?;
        let spender: Address = args.take("spender")?;
        let amount: Number = args.take("amount")?;
        let log = format!(
          "\"Transferred from\" {} BUM tokens from {} to {}",
          amount.show(),
          world.describe_user(owner),
          world.describe_user(spender)
        );
        call_and_log(
          world,
          from,
          &bum,
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

        * \"BUM TransferScenario recipients:<User[]> <Amount>\" - Transfers a number of tokens via \"transfer\" to the given recipients (this does not depend on allowance)
          * E.g. \"BUM TransferScenario (Jared Torrey) 10\"
      ",
      "TransferScenario",
      vec![
        Arg::new("bum", get_bum).implicit(),
        Arg::new("recipients", get_address_v).mapped(),
        Arg::new("amount", get_number_v),
      ],
      |world, from, mut args| async move {
        let bum: Contract = args.take("bum")?;
        let recipients: Vec<Address> = args.take("recipients")?;
        let amount: Number = args.take("amount")?;
        let log = format!(
          "Transferred {} BUM tokens from {} to {}",
          amount.show(),
          world.describe_user(from),
          show_addresses(&world, &recipients)
        );
        call_and_log(
          world,
          from,
          &bum,
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

        * \"BUM TransferFromScenario froms:<User[]> <Amount>\" - Transfers a number of tokens via \"transferFrom\" from the given users to msg.sender (this depends on allowance)
          * E.g. \"BUM TransferFromScenario (Jared Torrey) 10\"
      ",
      "TransferFromScenario",
      vec![
        Arg::new("bum", get_bum).implicit(),
        Arg::new("froms", get_address_v).mapped(),
        Arg::new("amount", get_number_v),
      ],
      |world, from, mut args| async move {
        let bum: Contract = args.take("bum")?;
        let froms: Vec<Address> = args.take("froms")?;
        let amount: Number = args.take("amount")?;
        let log = format!(
          "Transferred {} BUM tokens from {} to {}",
          amount.show(),
          show_addresses(&world, &froms),
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &bum,
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
        #### Rely

        * \"BUM Rely rely:<Address>\" - Adds rely address
          * E.g. \"BUM Rely 0xXX...\"
      ",
      "Rely",
      vec![
        Arg::new("bum", get_bum).implicit(),
        Arg::new("address", get_address_v),
      ],
      |world, from, mut args| async move {
        let bum: Contract = args.take("bum")?;
        let relied: Address = args.take("address")?;
        let log = format!("Add rely to BUM token to {}", world.describe_user(relied));
        call_and_log(
          world,
          from,
          &bum,
          "rely",
          vec![address(relied)],
          &NO_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
  ]
}

pub fn process_bum_event(
  world: World,
  event: Event,
  from: Option<Address>,
) -> BoxFuture<'static, Result<World>> {
  async move { process_command_event("BUM", &bum_commands(), world, event, from).await }
    .boxed()
}
