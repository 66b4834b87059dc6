use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::lookup::get_bum_vault;
use chumhum_contracts::reporter::BUM_VAULT_ERROR_REPORTER;
use chumhum_core::command::{process_command_event, Arg, Command};
use chumhum_core::contract::Contract;
use chumhum_core::core_value::{get_address_v, get_event_v};
use chumhum_core::event::Event;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use super::{address, call_and_log, send_command};
use crate::builder::build_bum_vault_impl;

#[must_use]
pub fn bum_vault_commands() -> Vec<Command> {
  vec![
    Command::new(
      "
        #### Deploy

        * \"BUMVault Deploy ...bumVaultParams\" - Generates a new BUMVault (not as Impl)
          * E.g. \"BUMVault Deploy Standard MyVault\"
      ",
      "Deploy",
      vec![Arg::new("bumVaultParams", get_event_v).variadic()],
      |world, from, mut args| async move {
        let built = build_bum_vault_impl(world, from, args.take("bumVaultParams")?).await?;
        Ok(built.world.add_action(
          format!(
            "Added BUMVault ({}) at address {}",
            built.description, built.contract.address
          ),
          Some(built.invokation),
        ))
      },
    ),
    send_command("BUMVault", get_bum_vault),
    Command::new(
      "
        #### SetPendingAdmin

        * \"BUMVault SetPendingAdmin newPendingAdmin:<Address>\" - Sets the pending admin
          * E.g. \"BUMVault SetPendingAdmin Geoff\"
      ",
      "SetPendingAdmin",
      vec![
        Arg::new("bumVault", get_bum_vault).implicit(),
        Arg::new("newPendingAdmin", get_address_v),
      ],
      |world, from, mut args| async move {
        let bum_vault: Contract = args.take("bumVault")?;
        let pending: Address = args.take("newPendingAdmin")?;
        let log = format!(
          "BUMVault: {} sets pending admin to {pending}",
          world.describe_user(from)
        );
        call_and_log(
          world,
          from,
          &bum_vault,
          "_setPendingAdmin",
          vec![address(pending)],
          &BUM_VAULT_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
    Command::new(
      "
        #### AcceptAdmin

        * \"BUMVault AcceptAdmin\" - Accepts admin as the pending admin
          * E.g. \"From Geoff (BUMVault AcceptAdmin)\"
      ",
      "AcceptAdmin",
      vec![Arg::new("bumVault", get_bum_vault).implicit()],
      |world, from, mut args| async move {
        let bum_vault: Contract = args.take("bumVault")?;
        let log = format!("BUMVault: {} accepts admin", world.describe_user(from));
        call_and_log(
          world,
          from,
          &bum_vault,
          "_acceptAdmin",
          vec![],
          &BUM_VAULT_ERROR_REPORTER,
          log,
        )
        .await
      },
    ),
  ]
}

pub fn process_bum_vault_event(
  world: World,
  event: Event,
  from: Option<Address>,
) -> BoxFuture<'static, Result<World>> {
  async move { process_command_event("BUMVault", &bum_vault_commands(), world, event, from).await }
    .boxed()
}
