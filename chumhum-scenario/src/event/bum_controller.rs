use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::lookup::{get_bum_controller, get_ctoken};
use chumhum_contracts::reporter::BUM_CONTROLLER_ERROR_REPORTER;
use chumhum_core::command::{process_command_event, Arg, Command};
use chumhum_core::contract::Contract;
use chumhum_core::core_value::{get_address_v, get_event_v, get_number_v};
use chumhum_core::event::Event;
use chumhum_core::value::Number;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::{address, amount_or_max, call_and_log, send_command, uint};
use crate::builder::build_bum_controller_impl;

async fn gen_bum_controller(world: World, from: Address, params: Event) -> Result<World> {
  let built = build_bum_controller_impl(world, from, params).await?;
  Ok(built.world.add_action(
    format!(
      "Added BUMController ({}) at address {}",
      built.description, built.contract.address
    ),
    Some(built.invokation),
  ))
}

#[allow(clippy::too_many_lines)]
#[must_use]
pub fn bum_controller_commands() -> Vec<Command> {
  vec![
    Command::new(
      "
        #### Deploy

        * \"BUMController Deploy ...bumcontrollerParams\" - Generates a new BUMController (not as Impl)
          * E.g. \"BUMController Deploy YesNo\"
      ",
      "Deploy",
      vec![Arg::new("bumcontrollerParams", get_event_v).variadic()],
      |world, from, mut args| async move {
        gen_bum_controller(world, from, args.take("bumcontrollerParams")?).await
      },
    ),
    send_command("BUMController", get_bum_controller),
    Command::new(
      "
        #### SetComptroller

        * \"BUMController SetComptroller comptroller:<Address>\" - Sets the comptroller address
          * E.g. \"BUMController SetComptroller 0x...\"
      ",
      "SetComptroller",
      vec![
        Arg::new("bumcontroller", get_bum_controller).implicit(),
        Arg::new("comptroller", get_address_v),
      ],
      |world, from, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        let comptroller: Address = args.take("comptroller")?;
        let log = format!(
          "Set Comptroller to {comptroller} as {}",
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &bum_controller,
          "_setComptroller",
          vec![address(comptroller)],
          &BUM_CONTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### Mint

        * \"BUMController Mint amount:<Number>\" - Mint the given amount of BUM as specified user
          * E.g. \"BUMController Mint 1.0e18\"
      ",
      "Mint",
      vec![
        Arg::new("bumcontroller", get_bum_controller).implicit(),
        Arg::new("amount", get_number_v),
      ],
      |world, from, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        let amount: Number = args.take("amount")?;
        let log = format!(
          "BUMController: {} borrows {}",
          world.describe_user(from),
          amount.show()
        );
        call_and_log(
          world,
          from,
          &bum_controller,
          "mintBUM",
          vec![uint(amount)?],
          &BUM_CONTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### Repay

        * \"BUMController Repay amount:<Number>\" - Repays BUM in the given amount as specified user
          * E.g. \"BUMController Repay 1.0e18\"
          * E.g. \"BUMController Repay\" - Repays everything
      ",
      "Repay",
      vec![
        Arg::new("bumcontroller", get_bum_controller).implicit(),
        Arg::new("amount", get_number_v).nullable(),
      ],
      |world, from, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        let (amount, shown) = amount_or_max(args.take_opt("amount")?)?;
        let log = format!(
          "BUMController: {} repays {shown} of borrow",
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &bum_controller,
          "repayBUM",
          vec![amount],
          &BUM_CONTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### LiquidateBUM

        * \"BUMController LiquidateBUM borrower:<User> CTokenCollateral:<Address> repayAmount:<Number>\" - Liquidates repayAmount of BUM seizing collateral token
          * E.g. \"BUMController LiquidateBUM Geoff cBAT 1.0e18\"
      ",
      "LiquidateBUM",
      vec![
        Arg::new("bumcontroller", get_bum_controller).implicit(),
        Arg::new("borrower", get_address_v),
        Arg::new("collateral", get_ctoken),
        Arg::new("repayAmount", get_number_v).nullable(),
      ],
      |world, from, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        let borrower: Address = args.take("borrower")?;
        let collateral: Contract = args.take("collateral")?;
        let (amount, shown) = amount_or_max(args.take_opt("repayAmount")?)?;
        let log = format!(
          "BUMController: {} liquidates {shown} from of {}, seizing {}.",
          world.describe_user(from),
          world.describe_user(borrower),
          collateral.name
        );
        call_and_log(
          world,
          from,
          &bum_controller,
          "liquidateBUM",
          vec![address(borrower), amount, address(collateral.address)],
          &BUM_CONTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### SetTreasuryData

        * \"BUMController SetTreasuryData <guardian> <address> <rate>\" - Sets Treasury Data
          * E.g. \"BUMController SetTreasuryData 0x.. 0x.. 1e18\"
      ",
      "SetTreasuryData",
      vec![
        Arg::new("bumcontroller", get_bum_controller).implicit(),
        Arg::new("guardian", get_address_v),
        Arg::new("address", get_address_v),
        Arg::new("percent", get_number_v),
      ],
      |world, from, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        let guardian: Address = args.take("guardian")?;
        let treasury: Address = args.take("address")?;
        let percent: Number = args.take("percent")?;
        call_and_log(
          world,
          from,
          &bum_controller,
          "_setTreasuryData",
          vec![address(guardian), address(treasury), uint(percent)?],
          &BUM_CONTROLLER_ERROR_REPORTER,
          format!(
            "Set treasury data to guardian: {guardian}, address: {treasury}, percent: {}",
            percent.show()
          ),
        )
        .await
      },
    ),
    Command::new(
      "
        #### Initialize

        * \"BUMController Initialize\" - Call Initialize
          * E.g. \"BUMController Initialize\"
      ",
      "Initialize",
      vec![Arg::new("bumcontroller", get_bum_controller).implicit()],
      |world, from, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        call_and_log(
          world,
          from,
          &bum_controller,
          "initialize",
          vec![],
          &BUM_CONTROLLER_ERROR_REPORTER,
          "Initizlied the BUMController".to_string(),
        )
        .await
      },
    ),
    Command::new(
      "
        #### SetPendingAdmin

        * \"BUMController SetPendingAdmin newPendingAdmin:<Address>\" - Sets the pending admin
          * E.g. \"BUMController SetPendingAdmin Geoff\"
      ",
      "SetPendingAdmin",
      vec![
        Arg::new("bumcontroller", get_bum_controller).implicit(),
        Arg::new("newPendingAdmin", get_address_v),
      ],
      |world, from, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        let pending: Address = args.take("newPendingAdmin")?;
        let log = format!(
          "BUMController: {} sets pending admin to {pending}",
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &bum_controller,
          "_setPendingAdmin",
          vec![address(pending)],
          &BUM_CONTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### AcceptAdmin

        * \"BUMController AcceptAdmin\" - Accepts admin as the pending admin
          * E.g. \"From Geoff (BUMController AcceptAdmin)\"
      ",
      "AcceptAdmin",
      vec![Arg::new("bumcontroller", get_bum_controller).implicit()],
      |world, from, mut args| async move {
        let bum_controller: Contract = args.take("bumcontroller")?;
        let log = format!("BUMController: {} accepts admin", world.describe_user(from));
        call_and_log(
          world,
          from,
          &bum_controller,
          "_acceptAdmin",
          vec![],
          &BUM_CONTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
  ]
}

pub fn process_bum_controller_event(
  world: World,
  event: Event,
  from: Option<Address>,
) -> BoxFuture<'static, Result<World>> {
  async move {
    process_command_event("BUMController", &bum_controller_commands(), world, event, from)
      .await
  }
  .boxed()
}
