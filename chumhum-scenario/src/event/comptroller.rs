//! `Comptroller ...` events: market listing, risk parameters, ChumHum
//! reward distribution and the BUM mint hooks.

use std::future::Future;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::lookup::{get_comptroller, get_ctoken};
use chumhum_contracts::reporter::COMPTROLLER_ERROR_REPORTER;
use chumhum_core::command::{process_command_event, Arg, Command};
use chumhum_core::contract::{decode_call, show_sol, Contract};
use chumhum_core::core_value::{
  get_address_v, get_bool_v, get_event_v, get_exp_number_v, get_number_v, get_percent_v,
  get_string_v,
};
use chumhum_core::event::Event;
use chumhum_core::invokation::{invoke, read};
use chumhum_core::value::{Number, Value};
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;
use itertools::Itertools;
use tracing::info;

use super::{address, addresses, call_and_log, send_command, uint};
use crate::builder::build_comptroller;

async fn gen_comptroller(world: World, from: Address, params: Event) -> Result<World> {
  let built = build_comptroller(world, from, params).await?;
  Ok(built.world.add_action(
    format!(
      "Added Comptroller ({}) at address {}",
      built.description, built.contract.address
    ),
    Some(built.invokation),
  ))
}

/// Single numeric parameter setter: `Comptroller <verb> <n>`.
fn set_number<G, GFut>(
  doc: &str,
  name: &str,
  getter: G,
  method: &'static str,
  describe: fn(&Number) -> String,
) -> Command
where
  G: Fn(World, Event) -> GFut + Send + Sync + 'static,
  GFut: Future<Output = Result<Number>> + Send + 'static,
{
  Command::new(
    doc,
    name,
    vec![
      Arg::new("comptroller", get_comptroller).implicit(),
      Arg::new("value", getter),
    ],
    move |world, from, mut args| async move {
      let comptroller: Contract = args.take("comptroller")?;
      let value: Number = args.take("value")?;
      call_and_log(
        world,
        from,
        &comptroller,
        method,
        vec![uint(value)?],
        &COMPTROLLER_ERROR_REPORTER,
        describe(&value),
      )
      .await
    },
  )
}

/// Single market setter: `Comptroller <verb> <cToken>`.
fn on_market(
  doc: &str,
  name: &str,
  method: &'static str,
  describe: fn(&Contract) -> String,
) -> Command {
  Command::new(
    doc,
    name,
    vec![
      Arg::new("comptroller", get_comptroller).implicit(),
      Arg::new("cToken", get_ctoken),
    ],
    move |world, from, mut args| async move {
      let comptroller: Contract = args.take("comptroller")?;
      let ctoken: Contract = args.take("cToken")?;
      call_and_log(
        world,
        from,
        &comptroller,
        method,
        vec![address(ctoken.address)],
        &COMPTROLLER_ERROR_REPORTER,
        describe(&ctoken),
      )
      .await
    },
  )
}

/// Prints the liquidity of every account that ever entered a market.
async fn print_liquidity(world: World, comptroller: &Contract) -> Result<World> {
  let entered = world
    .chain()
    .past_events(comptroller.address, "MarketEntered")
    .await?;
  let accounts: Vec<Address> = entered
    .iter()
    .filter_map(|log| log.field("account").and_then(DynSolValue::as_address))
    .unique()
    .collect();
  info!("Liquidity:");
  let scale = Number::pow10(18)?;
  for account in accounts {
    let outputs = read(
      &world,
      comptroller,
      "getAccountLiquidity",
      vec![address(account)],
    )
    .await?;
    let liquidity = match outputs.get(1) {
      Some(value) => Value::from_sol(value)?.as_number()?.div(scale)?,
      None => Number::from_u64(0),
    };
    info!("\t{}: {}e18", world.describe_user(account), liquidity.show());
  }
  Ok(world)
}

#[allow(clippy::too_many_lines)]
#[must_use]
pub fn comptroller_commands() -> Vec<Command> {
  vec![
    Command::new(
      "
        #### Deploy

        * \"Comptroller Deploy ...comptrollerParams\" - Generates a new Comptroller (not as Impl)
          * E.g. \"Comptroller Deploy YesNo\"
      ",
      "Deploy",
      vec![Arg::new("comptrollerParams", get_event_v).variadic()],
      |world, from, mut args| async move {
        gen_comptroller(world, from, args.take("comptrollerParams")?).await
      },
    ),
    Command::new(
      "
        #### SetProtocolPaused

        * \"Comptroller SetProtocolPaused <Bool>\" - Pauses or unpaused protocol
          * E.g. \"Comptroller SetProtocolPaused True\"
      ",
      "SetProtocolPaused",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("isPaused", get_bool_v),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let paused: bool = args.take("isPaused")?;
        call_and_log(
          world,
          from,
          &comptroller,
          "_setProtocolPaused",
          vec![DynSolValue::Bool(paused)],
          &COMPTROLLER_ERROR_REPORTER,
          format!("Comptroller: set protocol paused to {paused}"),
        )
        .await
      },
    ),
    Command::new(
      "
        #### SupportMarket

        * \"Comptroller SupportMarket <CToken>\" - Adds support in the Comptroller for the given cToken
          * E.g. \"Comptroller SupportMarket cZRX\"
      ",
      "SupportMarket",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("cToken", get_ctoken),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let ctoken: Contract = args.take("cToken")?;
        if world.dry_run() {
          info!("Dry run: Supporting market `{}`", ctoken.address);
          return Ok(world);
        }
        call_and_log(
          world,
          from,
          &comptroller,
          "_supportMarket",
          vec![address(ctoken.address)],
          &COMPTROLLER_ERROR_REPORTER,
          format!("Supported market {}", ctoken.name),
        )
        .await
      },
    ),
    on_market(
      "
        #### UnList

        * \"Comptroller UnList <CToken>\" - Mock unlists a given market in tests
          * E.g. \"Comptroller UnList cZRX\"
      ",
      "UnList",
      "unlist",
      |ctoken| format!("Unlisted market {}", ctoken.name),
    ),
    Command::new(
      "
        #### EnterMarkets

        * \"Comptroller EnterMarkets (<CToken> ...)\" - User enters the given markets
          * E.g. \"Comptroller EnterMarkets (cZRX cMATIC)\"
      ",
      "EnterMarkets",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("cTokens", get_ctoken).mapped(),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let ctokens: Vec<Contract> = args.take("cTokens")?;
        let assets: Vec<Address> = ctokens.iter().map(|c| c.address).collect();
        let log = format!(
          "Called enter assets {} as {}",
          assets.iter().join(","),
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &comptroller,
          "enterMarkets",
          vec![addresses(&assets)],
          &COMPTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### ExitMarket

        * \"Comptroller ExitMarket <CToken>\" - User exits the given markets
          * E.g. \"Comptroller ExitMarket cZRX\"
      ",
      "ExitMarket",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("cToken", get_ctoken),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let ctoken: Contract = args.take("cToken")?;
        let log = format!(
          "Called exit market {} as {}",
          ctoken.address,
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &comptroller,
          "exitMarket",
          vec![address(ctoken.address)],
          &COMPTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    set_number(
      "
        #### SetMaxAssets

        * \"Comptroller SetMaxAssets <Number>\" - Sets (or resets) the max allowed asset count
          * E.g. \"Comptroller SetMaxAssets 4\"
      ",
      "SetMaxAssets",
      get_number_v,
      "_setMaxAssets",
      |n| format!("Set max assets to {}", n.show()),
    ),
    set_number(
      "
        #### LiquidationIncentive

        * \"Comptroller LiquidationIncentive <Number>\" - Sets the liquidation incentive
          * E.g. \"Comptroller LiquidationIncentive 1.1\"
      ",
      "LiquidationIncentive",
      get_exp_number_v,
      "_setLiquidationIncentive",
      |n| format!("Set liquidation incentive to {}", n.show()),
    ),
    Command::new(
      "
        #### SetPriceOracle

        * \"Comptroller SetPriceOracle oracle:<Address>\" - Sets the price oracle address
          * E.g. \"Comptroller SetPriceOracle 0x...\"
      ",
      "SetPriceOracle",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("priceOracle", get_address_v),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let oracle: Address = args.take("priceOracle")?;
        let log = format!(
          "Set price oracle for to {oracle} as {}",
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &comptroller,
          "_setPriceOracle",
          vec![address(oracle)],
          &COMPTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### SetCollateralFactor

        * \"Comptroller SetCollateralFactor <CToken> <Number>\" - Sets the collateral factor for given cToken to number
          * E.g. \"Comptroller SetCollateralFactor cZRX 0.1\"
      ",
      "SetCollateralFactor",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("cToken", get_ctoken),
        Arg::new("collateralFactor", get_exp_number_v),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let ctoken: Contract = args.take("cToken")?;
        let factor: Number = args.take("collateralFactor")?;
        call_and_log(
          world,
          from,
          &comptroller,
          "_setCollateralFactor",
          vec![address(ctoken.address), uint(factor)?],
          &COMPTROLLER_ERROR_REPORTER,
          format!(
            "Set collateral factor for {} to {}",
            ctoken.name,
            factor.show()
          ),
        )
        .await
      },
    ),
    set_number(
      "
        #### SetCloseFactor

        * \"Comptroller SetCloseFactor <Number>\" - Sets the close factor to given percentage
          * E.g. \"Comptroller SetCloseFactor 0.2\"
      ",
      "SetCloseFactor",
      get_percent_v,
      "_setCloseFactor",
      |n| format!("Set close factor to {}", n.show()),
    ),
    set_number(
      "
        #### SetBUMMintRate

        * \"Comptroller SetBUMMintRate <Number>\" - Sets the BUM mint rate to given value
          * E.g. \"Comptroller SetBUMMintRate 5e4\"
      ",
      "SetBUMMintRate",
      get_number_v,
      "_setBUMMintRate",
      |n| format!("Set bum mint rate to {}", n.show()),
    ),
    Command::new(
      "
        #### SetBUMController

        * \"Comptroller SetBUMController bumcontroller:<Address>\" - Sets the BUMController address
          * E.g. \"Comptroller SetBUMController 0x...\"
      ",
      "SetBUMController",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("bumcontroller", get_address_v),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let bum_controller: Address = args.take("bumcontroller")?;
        let log = format!(
          "Set BUMController to {bum_controller} as {}",
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &comptroller,
          "_setBUMController",
          vec![address(bum_controller)],
          &COMPTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    set_number(
      "
        #### SetChumHumBUMVaultRate

        * \"Comptroller SetChumHumBUMVaultRate <Number>\" - Sets the CHUM rate streamed to the BUM vault
          * E.g. \"Comptroller SetChumHumBUMVaultRate 5e4\"
      ",
      "SetChumHumBUMVaultRate",
      get_number_v,
      "_setChumHumBUMVaultRate",
      |n| format!("Set bum mint rate to {}", n.show()),
    ),
    Command::new(
      "
        #### SetPendingAdmin

        * \"Comptroller SetPendingAdmin newPendingAdmin:<Address>\" - Sets the pending admin for the Comptroller
          * E.g. \"Comptroller SetPendingAdmin Geoff\"
      ",
      "SetPendingAdmin",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("newPendingAdmin", get_address_v),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let pending: Address = args.take("newPendingAdmin")?;
        let log = format!(
          "Comptroller: {} sets pending admin to {pending}",
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &comptroller,
          "_setPendingAdmin",
          vec![address(pending)],
          &COMPTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### AcceptAdmin

        * \"Comptroller AcceptAdmin\" - Accepts admin for the Comptroller
          * E.g. \"From Geoff (Comptroller AcceptAdmin)\"
      ",
      "AcceptAdmin",
      vec![Arg::new("comptroller", get_comptroller).implicit()],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let log = format!("Comptroller: {} accepts admin", world.describe_user(from));
        call_and_log(
          world,
          from,
          &comptroller,
          "_acceptAdmin",
          vec![],
          &COMPTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### FastForward

        * \"FastForward n:<Number> Blocks\" - Moves the mocked block number forward \"n\" blocks
          * E.g. \"Comptroller FastForward 5 Blocks\" - Move block number forward 5 blocks.
      ",
      "FastForward",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("blocks", get_number_v),
        Arg::new("_keyword", get_string_v),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let blocks: Number = args.take("blocks")?;
        let call = comptroller.method("fastForward", vec![uint(blocks)?])?;
        let invokation =
          invoke(&world, &comptroller, call, from, &COMPTROLLER_ERROR_REPORTER).await?;
        let block = invokation.value().map_or_else(String::new, show_sol);
        Ok(world.add_action(
          format!("Fast forward {} blocks to #{block}", blocks.show()),
          Some(invokation),
        ))
      },
    ),
    Command::view(
      "
        #### Liquidity

        * \"Comptroller Liquidity\" - Prints liquidity of all minters or borrowers
      ",
      "Liquidity",
      vec![Arg::new("comptroller", get_comptroller).implicit()],
      |world, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        print_liquidity(world, &comptroller).await
      },
    ),
    Command::view(
      "
        #### Decode

        * \"Decode input:<String>\" - Prints information about a call to a Comptroller contract
      ",
      "Decode",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("input", get_string_v),
      ],
      |world, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let input: String = args.take("input")?;
        info!("Decoded: {}", decode_call(&comptroller.abi, &input)?);
        Ok(world)
      },
    ),
    send_command("Comptroller", get_comptroller),
    Command::new(
      "
        #### AddChumHumMarkets

        * \"Comptroller AddChumHumMarkets (<Address> ...)\" - Makes a market CHUM-enabled
          * E.g. \"Comptroller AddChumHumMarkets (cZRX cBAT)\"
      ",
      "AddChumHumMarkets",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("cTokens", get_ctoken).mapped(),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let ctokens: Vec<Contract> = args.take("cTokens")?;
        let markets: Vec<Address> = ctokens.iter().map(|c| c.address).collect();
        call_and_log(
          world,
          from,
          &comptroller,
          "_addChumHumMarkets",
          vec![addresses(&markets)],
          &COMPTROLLER_ERROR_REPORTER,
          format!(
            "Added ChumHum markets {}",
            ctokens.iter().map(|c| &c.name).join(",")
          ),
        )
        .await
      },
    ),
    on_market(
      "
        #### DropChumHumMarket

        * \"Comptroller DropChumHumMarket <Address>\" - Makes a market CHUM-disabled
          * E.g. \"Comptroller DropChumHumMarket cZRX\"
      ",
      "DropChumHumMarket",
      "_dropChumHumMarket",
      |ctoken| format!("Drop ChumHum market {}", ctoken.name),
    ),
    Command::new(
      "
        #### RefreshChumHumSpeeds

        * \"Comptroller RefreshChumHumSpeeds\" - Recalculates all the CHUM market speeds
          * E.g. \"Comptroller RefreshChumHumSpeeds\"
      ",
      "RefreshChumHumSpeeds",
      vec![Arg::new("comptroller", get_comptroller).implicit()],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        call_and_log(
          world,
          from,
          &comptroller,
          "refreshChumHumSpeeds",
          vec![],
          &COMPTROLLER_ERROR_REPORTER,
          "Refreshed ChumHum speeds".to_string(),
        )
        .await
      },
    ),
    Command::new(
      "
        #### ClaimChumHum

        * \"Comptroller ClaimChumHum <holder>\" - Claims chum
          * E.g. \"Comptroller ClaimChumHum Geoff\"
      ",
      "ClaimChumHum",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("holder", get_address_v),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let holder: Address = args.take("holder")?;
        call_and_log(
          world,
          from,
          &comptroller,
          "claimChumHum",
          vec![address(holder)],
          &COMPTROLLER_ERROR_REPORTER,
          format!("CHUM claimed by {holder}"),
        )
        .await
      },
    ),
    set_number(
      "
        #### SetChumHumRate

        * \"Comptroller SetChumHumRate <rate>\" - Sets CHUM rate
          * E.g. \"Comptroller SetChumHumRate 1e18\"
      ",
      "SetChumHumRate",
      get_number_v,
      "_setChumHumRate",
      |n| format!("CHUM rate set to {}", n.show()),
    ),
    Command::new(
      "
        #### SetChumHumSpeed

        * \"Comptroller SetChumHumSpeed <cToken> <rate>\" - Sets CHUM speed for market
          * E.g. \"Comptroller SetChumHumSpeed cToken 1000\"
      ",
      "SetChumHumSpeed",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("cToken", get_ctoken),
        Arg::new("speed", get_number_v),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let ctoken: Contract = args.take("cToken")?;
        let speed: Number = args.take("speed")?;
        call_and_log(
          world,
          from,
          &comptroller,
          "_setChumHumSpeed",
          vec![address(ctoken.address), uint(speed)?],
          &COMPTROLLER_ERROR_REPORTER,
          format!(
            "ChumHum speed for market {} set to {}",
            ctoken.address,
            speed.show()
          ),
        )
        .await
      },
    ),
    Command::new(
      "
        #### SetMarketBorrowCaps

        * \"Comptroller SetMarketBorrowCaps (<CToken> ...) (<borrowCap> ...)\" - Sets Market Borrow Caps
          * E.g \"Comptroller SetMarketBorrowCaps (cZRX cUSDC) (10000.0e18, 1000.0e6)\"
      ",
      "SetMarketBorrowCaps",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("cTokens", get_ctoken).mapped(),
        Arg::new("borrowCaps", get_number_v).mapped(),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let ctokens: Vec<Contract> = args.take("cTokens")?;
        let caps: Vec<Number> = args.take("borrowCaps")?;
        let markets: Vec<Address> = ctokens.iter().map(|c| c.address).collect();
        let encoded = caps.iter().map(|c| uint(*c)).collect::<Result<Vec<_>>>()?;
        let log = format!(
          "Borrow caps on {} set to {}",
          ctokens.iter().map(|c| &c.name).join(","),
          caps.iter().map(Number::show).join(",")
        );
        call_and_log(
          world,
          from,
          &comptroller,
          "_setMarketBorrowCaps",
          vec![addresses(&markets), DynSolValue::Array(encoded)],
          &COMPTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### SetBorrowCapGuardian

        * \"Comptroller SetBorrowCapGuardian newBorrowCapGuardian:<Address>\" - Sets the Borrow Cap Guardian for the Comptroller
          * E.g. \"Comptroller SetBorrowCapGuardian Geoff\"
      ",
      "SetBorrowCapGuardian",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("newBorrowCapGuardian", get_address_v),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let guardian: Address = args.take("newBorrowCapGuardian")?;
        let log = format!(
          "Comptroller: {} sets borrow cap guardian to {guardian}",
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &comptroller,
          "_setBorrowCapGuardian",
          vec![address(guardian)],
          &COMPTROLLER_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### SetTreasuryData

        * \"Comptroller SetTreasuryData <guardian> <address> <rate>\" - Sets Treasury Data
          * E.g. \"Comptroller SetTreasuryData 0x.. 0x.. 1e18\"
      ",
      "SetTreasuryData",
      vec![
        Arg::new("comptroller", get_comptroller).implicit(),
        Arg::new("guardian", get_address_v),
        Arg::new("address", get_address_v),
        Arg::new("percent", get_number_v),
      ],
      |world, from, mut args| async move {
        let comptroller: Contract = args.take("comptroller")?;
        let guardian: Address = args.take("guardian")?;
        let treasury: Address = args.take("address")?;
        let percent: Number = args.take("percent")?;
        call_and_log(
          world,
          from,
          &comptroller,
          "_setTreasuryData",
          vec![address(guardian), address(treasury), uint(percent)?],
          &COMPTROLLER_ERROR_REPORTER,
          format!(
            "Set treasury data to guardian: {guardian}, address: {treasury}, percent: {}",
            percent.show()
          ),
        )
        .await
      },
    ),
  ]
}

pub fn process_comptroller_event(
  world: World,
  event: Event,
  from: Option<Address>,
) -> BoxFuture<'static, Result<World>> {
  async move {
    process_command_event("Comptroller", &comptroller_commands(), world, event, from).await
  }
  .boxed()
}
