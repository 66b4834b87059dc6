//! Commands shared by the two delegating proxies, `BUMUnitroller` (in front
//! of BUMController) and `BUMVaultProxy` (in front of BUMVault).

use std::future::Future;

use alloy::primitives::Address;
use anyhow::Result;
use chumhum_core::command::{Arg, Command};
use chumhum_core::contract::Contract;
use chumhum_core::core_value::{get_address_v, get_event_v, get_string_v};
use chumhum_core::event::Event;
use chumhum_core::invokation::ErrorReporter;
use chumhum_core::verify::verify_contract;
use chumhum_core::world::World;

use super::{address, call_and_log};
use crate::builder::Built;

#[derive(Clone, Copy)]
pub(super) struct Proxy {
  /// Family name, also the stored contract name.
  pub family: &'static str,
  /// What the proxy delegates to, as written in action logs.
  pub target: &'static str,
  pub reporter: ErrorReporter,
}

pub(super) fn proxy_commands<P, PFut, I, IFut, B, BFut>(
  proxy: Proxy,
  get_proxy: P,
  get_impl: I,
  build: B,
) -> Vec<Command>
where
  P: Fn(World, Event) -> PFut + Copy + Send + Sync + 'static,
  PFut: Future<Output = Result<Contract>> + Send + 'static,
  I: Fn(World, Event) -> IFut + Copy + Send + Sync + 'static,
  IFut: Future<Output = Result<Contract>> + Send + 'static,
  B: Fn(World, Address, Event) -> BFut + Copy + Send + Sync + 'static,
  BFut: Future<Output = Result<Built>> + Send + 'static,
{
  let Proxy {
    family,
    target,
    reporter,
  } = proxy;
  vec![
    Command::new(
      &format!(
        "
          #### Deploy

          * \"{family} Deploy ...params\" - Generates a new {family}
            * E.g. \"{family} Deploy\"
        "
      ),
      "Deploy",
      vec![Arg::new("params", get_event_v).variadic()],
      move |world, from, mut args| async move {
        let built = build(world, from, args.take("params")?).await?;
        Ok(built.world.add_action(
          format!(
            "Added {family} ({}) at address {}",
            built.description, built.contract.address
          ),
          Some(built.invokation),
        ))
      },
    ),
    Command::view(
      &format!(
        "
          #### Verify

          * \"{family} Verify apiKey:<String>\" - Verifies {family} on the block explorer
            * E.g. \"{family} Verify \"myApiKey\"\"
        "
      ),
      "Verify",
      vec![
        Arg::new("proxy", get_proxy).implicit(),
        Arg::new("apiKey", get_string_v),
      ],
      move |world, mut args| async move {
        let contract: Contract = args.take("proxy")?;
        let api_key: String = args.take("apiKey")?;
        verify_contract(world, &api_key, family, family, contract.address).await
      },
    ),
    Command::new(
      &format!(
        "
          #### AcceptAdmin

          * \"AcceptAdmin\" - Accept admin for this {family}
            * E.g. \"{family} AcceptAdmin\"
        "
      ),
      "AcceptAdmin",
      vec![Arg::new("proxy", get_proxy).implicit()],
      move |world, from, mut args| async move {
        let contract: Contract = args.take("proxy")?;
        let log = format!("Accept admin as {}", world.describe_user(from));
        call_and_log(world, from, &contract, "_acceptAdmin", vec![], &reporter, log).await
      },
    ),
    Command::new(
      &format!(
        "
          #### SetPendingAdmin

          * \"SetPendingAdmin admin:<Admin>\" - Sets the pending admin for this {family}
            * E.g. \"{family} SetPendingAdmin Jared\"
        "
      ),
      "SetPendingAdmin",
      vec![
        Arg::new("proxy", get_proxy).implicit(),
        Arg::new("pendingAdmin", get_address_v),
      ],
      move |world, from, mut args| async move {
        let contract: Contract = args.take("proxy")?;
        let pending: Address = args.take("pendingAdmin")?;
        let log = format!("Set pending admin to {}", world.describe_user(pending));
        call_and_log(
          world,
          from,
          &contract,
          "_setPendingAdmin",
          vec![address(pending)],
          &reporter,
          log,
        )
        .await
      },
    ),
    Command::new(
      &format!(
        "
          #### SetPendingImpl

          * \"SetPendingImpl impl:<Impl>\" - Sets the pending {target} implementation for this {family}
            * E.g. \"{family} SetPendingImpl MyScenImpl\" - Sets the pending implementation to MyScenImpl
        "
      ),
      "SetPendingImpl",
      vec![
        Arg::new("proxy", get_proxy).implicit(),
        Arg::new("impl", get_impl),
      ],
      move |world, from, mut args| async move {
        let contract: Contract = args.take("proxy")?;
        let implementation: Contract = args.take("impl")?;
        call_and_log(
          world,
          from,
          &contract,
          "_setPendingImplementation",
          vec![address(implementation.address)],
          &reporter,
          format!("Set pending {target} impl to {}", implementation.name),
        )
        .await
      },
    ),
  ]
}
