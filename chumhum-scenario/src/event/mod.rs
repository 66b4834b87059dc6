//! Event processors
//!
//! One command family per contract. Every family exposes its commands (for
//! help output) and a processor with the [`EventProcessor`] shape so it can
//! be registered under its family name.
//!
//! [`EventProcessor`]: chumhum_core::registry::EventProcessor

mod bum;
mod bum_controller;
mod bum_controller_impl;
mod bum_unitroller;
mod bum_vault;
mod bum_vault_impl;
mod bum_vault_proxy;
mod chum;
mod comptroller;
mod core_events;
mod implementation;
mod maximillion;
mod proxy;

use std::future::Future;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use anyhow::Result;
use chumhum_core::command::{Arg, Command};
use chumhum_core::contract::{Call, Contract};
use chumhum_core::core_value::{get_core_value, get_string_v};
use chumhum_core::event::Event;
use chumhum_core::invokation::{invoke, ErrorReporter, NO_ERROR_REPORTER};
use chumhum_core::value::{Number, Value};
use chumhum_core::world::World;

pub use self::bum::{bum_commands, process_bum_event};
pub use self::bum_controller::{bum_controller_commands, process_bum_controller_event};
pub use self::bum_controller_impl::{
  bum_controller_impl_commands, process_bum_controller_impl_event,
};
pub use self::bum_unitroller::{bum_unitroller_commands, process_bum_unitroller_event};
pub use self::bum_vault::{bum_vault_commands, process_bum_vault_event};
pub use self::bum_vault_impl::{bum_vault_impl_commands, process_bum_vault_impl_event};
pub use self::bum_vault_proxy::{bum_vault_proxy_commands, process_bum_vault_proxy_event};
pub use self::chum::{chum_commands, process_chum_event};
pub use self::comptroller::{comptroller_commands, process_comptroller_event};
pub use self::core_events::{core_commands, process_event};
pub use self::maximillion::{maximillion_commands, process_maximillion_event};

// ============================================================================
// ENCODING
// ============================================================================

pub(crate) fn uint(n: Number) -> Result<DynSolValue> {
  Ok(DynSolValue::Uint(n.encode()?, 256))
}

pub(crate) fn address(a: Address) -> DynSolValue {
  DynSolValue::Address(a)
}

fn addresses(all: &[Address]) -> DynSolValue {
  DynSolValue::Array(all.iter().copied().map(DynSolValue::Address).collect())
}

/// Amount to encode, `uint256(-1)` meaning "everything" when absent.
fn amount_or_max(amount: Option<Number>) -> Result<(DynSolValue, String)> {
  match amount {
    Some(n) => Ok((uint(n)?, n.show())),
    None => Ok((DynSolValue::Uint(U256::MAX, 256), "max".to_string())),
  }
}

fn show_addresses(world: &World, all: &[Address]) -> String {
  all
    .iter()
    .map(|a| world.describe_user(*a))
    .collect::<Vec<_>>()
    .join(", ")
}

// ============================================================================
// SHARED COMMANDS
// ============================================================================

/// Calls `method` on `contract` as `from` and records the action.
///
/// # Errors
/// Method not in the ABI or the transaction could not be sent. Contract
/// failures are recorded in the invokation instead.
async fn call_and_log(
  world: World,
  from: Address,
  contract: &Contract,
  method: &str,
  args: Vec<DynSolValue>,
  reporter: &ErrorReporter,
  log: String,
) -> Result<World> {
  let call = contract.method(method, args)?;
  let invokation = invoke(&world, contract, call, from, reporter).await?;
  Ok(world.add_action(log, Some(invokation)))
}

/// `<Family> Send signature ...args` - sends a raw call built from a
/// signature, for functions outside the family ABI.
fn send_command<F, Fut>(family: &str, contract: F) -> Command
where
  F: Fn(World, Event) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Contract>> + Send + 'static,
{
  Command::new(
    &format!(
      "
        #### Send

        * \"{family} Send signature:<String> ...callArgs\" - Sends any transaction to {family}
          * E.g. \"{family} Send \\\"setAdmin(address)\\\" (Address Geoff)\"
      "
    ),
    "Send",
    vec![
      Arg::new("contract", contract).implicit(),
      Arg::new("signature", get_string_v),
      Arg::new("callArgs", get_core_value).variadic().mapped(),
    ],
    |world, from, mut args| async move {
      let contract: Contract = args.take("contract")?;
      let signature: String = args.take("signature")?;
      let values: Vec<Value> = args.take("callArgs")?;
      let call = Call::from_signature(&signature, &values)?;
      let log = format!(
        "Sent {call} to {} as {}",
        contract.name,
        world.describe_user(from)
      );
      let invokation =
        invoke(&world, &contract, call, from, &NO_ERROR_REPORTER).await?;
      Ok(world.add_action(log, Some(invokation)))
    },
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn absent_amounts_encode_as_max() -> Result<()> {
    let (encoded, shown) = amount_or_max(None)?;
    assert_eq!(encoded, DynSolValue::Uint(U256::MAX, 256));
    assert_eq!(shown, "max");
    let (encoded, _) = amount_or_max(Some(Number::from_u64(5)))?;
    assert_eq!(encoded, DynSolValue::Uint(U256::from(5u64), 256));
    Ok(())
  }
}
