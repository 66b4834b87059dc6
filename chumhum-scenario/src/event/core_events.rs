//! Core events
//!
//! Verbs understood regardless of contract family (`From`, `Assert`,
//! `Read`, ...). Anything else is dispatched to the registered family named
//! by the first token.

use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use chumhum_core::command::{process_command_event, Arg, Command};
use chumhum_core::core_value::{
  get_address_v, get_bool_v, get_core_value, get_event_v, get_string_v, get_value,
};
use chumhum_core::error::ScenarioError;
use chumhum_core::event::Event;
use chumhum_core::invokation::InvokationError;
use chumhum_core::value::Value;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;
use itertools::Itertools;
use tracing::info;

const DEFAULT_HISTORY: usize = 5;

async fn get_count(_world: World, event: Event) -> Result<usize> {
  match event.unwrap_single() {
    Event::Atom(token) => token.parse().map_err(|_| {
      ScenarioError::InvalidValue {
        expected: "count".to_string(),
        got: token,
      }
      .into()
    }),
    other => Err(
      ScenarioError::InvalidValue {
        expected: "count".to_string(),
        got: other.to_string(),
      }
      .into(),
    ),
  }
}

fn assertion(message: String) -> anyhow::Error {
  ScenarioError::Assertion(message).into()
}

// ============================================================================
// ASSERTIONS
// ============================================================================

#[allow(clippy::too_many_lines)]
fn assertion_commands() -> Vec<Command> {
  vec![
    Command::view(
      "
        #### Equal

        * \"Equal given:<Value> expected:<Value>\" - Asserts that given matches expected.
          * E.g. \"Assert Equal (Exactly 0) Zero\"
          * E.g. \"Assert Equal (BUM TokenBalance Geoff) (Exp 100)\"
      ",
      "Equal",
      vec![Arg::new("given", get_value), Arg::new("expected", get_value)],
      |world, mut args| async move {
        let given: Value = args.take("given")?;
        let expected: Value = args.take("expected")?;
        if !given.compare(&expected) {
          return Err(assertion(format!(
            "expected {} to equal {}",
            given.show(),
            expected.show()
          )));
        }
        Ok(world)
      },
    ),
    Command::view(
      "
        #### True

        * \"True given:<Bool>\" - Asserts that given is true.
          * E.g. \"Assert True (Comptroller CheckMembership Geoff cZRX)\"
      ",
      "True",
      vec![Arg::new("given", get_bool_v)],
      |world, mut args| async move {
        if !args.take::<bool>("given")? {
          return Err(assertion("expected true, got false".to_string()));
        }
        Ok(world)
      },
    ),
    Command::view(
      "
        #### False

        * \"False given:<Bool>\" - Asserts that given is false.
          * E.g. \"Assert False (Comptroller ProtocolPaused)\"
      ",
      "False",
      vec![Arg::new("given", get_bool_v)],
      |world, mut args| async move {
        if args.take::<bool>("given")? {
          return Err(assertion("expected false, got true".to_string()));
        }
        Ok(world)
      },
    ),
    Command::view(
      "
        #### Success

        * \"Success\" - Asserts that the last invokation was successful
          * E.g. \"Assert Success\"
      ",
      "Success",
      vec![],
      |world, _args| async move {
        if let Some(error) = world.last_invokation().and_then(|i| i.error.as_ref()) {
          return Err(assertion(format!("expected success, got {error}")));
        }
        Ok(world)
      },
    ),
    Command::view(
      "
        #### Failure

        * \"Failure error:<String> info:<String>\" - Asserts that the last invokation failed with the given error
          * E.g. \"Assert Failure UNAUTHORIZED SET_PENDING_ADMIN_OWNER_CHECK\"
      ",
      "Failure",
      vec![
        Arg::new("error", get_string_v),
        Arg::new("info", get_string_v).nullable(),
      ],
      |world, mut args| async move {
        let expected_error: String = args.take("error")?;
        let expected_info: Option<String> = args.take_opt("info")?;
        match world.last_invokation().and_then(|i| i.error.as_ref()) {
          Some(InvokationError::Failure { error, info, .. })
            if error.eq_ignore_ascii_case(&expected_error)
              && expected_info
                .as_ref()
                .map_or(true, |expected| info.eq_ignore_ascii_case(expected)) =>
          {
            Ok(world)
          }
          Some(other) => Err(assertion(format!(
            "expected failure {expected_error}, got {other}"
          ))),
          None => Err(assertion(format!(
            "expected failure {expected_error}, but the last invokation succeeded"
          ))),
        }
      },
    ),
    Command::view(
      "
        #### Revert

        * \"Revert message:<String>\" - Asserts that the last invokation reverted, optionally with the given reason
          * E.g. \"Assert Revert\"
          * E.g. \"Assert Revert \"only admin can set comptroller\"\"
      ",
      "Revert",
      vec![Arg::new("reason", get_string_v).nullable()],
      |world, mut args| async move {
        let expected: Option<String> = args.take_opt("reason")?;
        match world.last_invokation().and_then(|i| i.error.as_ref()) {
          Some(InvokationError::Revert { reason, .. })
            if expected.as_ref().map_or(true, |expected| {
              reason.trim() == expected.trim()
                || reason.trim_start_matches("revert").trim() == expected.trim()
            }) =>
          {
            Ok(world)
          }
          Some(other) => Err(assertion(format!("expected revert, got {other}"))),
          None => Err(assertion(
            "expected revert, but the last invokation succeeded".to_string(),
          )),
        }
      },
    ),
  ]
}

// ============================================================================
// CORE COMMANDS
// ============================================================================

#[allow(clippy::too_many_lines)]
#[must_use]
pub fn core_commands() -> Vec<Command> {
  vec![
    Command::view(
      "
        #### From

        * \"From <User> <Event>\" - Runs event as the given user
          * E.g. \"From Geoff (BUM Transfer Torrey 1e18)\"
      ",
      "From",
      vec![
        Arg::new("user", get_address_v),
        Arg::new("event", get_event_v).variadic(),
      ],
      |world, mut args| async move {
        let user: Address = args.take("user")?;
        let event: Event = args.take("event")?;
        process_event(world, event.unwrap_single(), Some(user)).await
      },
    ),
    Command::view(
      "
        #### AllowFailures

        * \"AllowFailures\" - Failed invokations no longer abort the run
      ",
      "AllowFailures",
      vec![],
      |world, _args| async move {
        info!("Allowing failures");
        Ok(world.set_allow_failures(true))
      },
    ),
    Command::view(
      "
        #### Alias

        * \"Alias name:<String> address:<Address>\" - Names an address
          * E.g. \"Alias Treasury 0x00000000000000000000000000000000000000ff\"
      ",
      "Alias",
      vec![
        Arg::new("name", get_string_v),
        Arg::new("address", get_address_v),
      ],
      |world, mut args| async move {
        let name: String = args.take("name")?;
        let address: Address = args.take("address")?;
        Ok(world.add_alias(name, address))
      },
    ),
    Command::view(
      "
        #### Read

        * \"Read <Value>\" - Prints the value
          * E.g. \"Read (BUM TokenBalance Geoff)\"
      ",
      "Read",
      vec![Arg::new("value", get_core_value).variadic()],
      |world, mut args| async move {
        let value: Value = args.take("value")?;
        info!("{}", value.show());
        Ok(world)
      },
    ),
    Command::view(
      "
        #### Print

        * \"Print message:<String>\" - Prints the message
          * E.g. \"Print \"Hello\"\"
      ",
      "Print",
      vec![Arg::new("message", get_string_v)],
      |world, mut args| async move {
        let message: String = args.take("message")?;
        info!("{message}");
        Ok(world)
      },
    ),
    Command::view(
      "
        #### Inspect

        * \"Inspect\" - Prints the world state
      ",
      "Inspect",
      vec![],
      |world, _args| async move {
        info!("{world:?}");
        Ok(world)
      },
    ),
    Command::view(
      "
        #### History

        * \"History n:<Number>=5\" - Prints the last n actions
          * E.g. \"History 10\"
      ",
      "History",
      vec![Arg::new("n", get_count).default(DEFAULT_HISTORY)],
      |world, mut args| async move {
        let n: usize = args.take("n")?;
        let actions = world.actions();
        for action in &actions[actions.len().saturating_sub(n)..] {
          info!("{}", action.log);
        }
        Ok(world)
      },
    ),
    Command::view(
      "
        #### Assert

        * \"Assert <Assertion>\" - Fails the run unless the assertion holds
          * E.g. \"Assert Equal (BUM TotalSupply) Zero\"
          * E.g. \"Assert Failure UNAUTHORIZED SET_PENDING_ADMIN_OWNER_CHECK\"
      ",
      "Assert",
      vec![Arg::new("assertion", get_event_v).variadic()],
      |world, mut args| async move {
        let assertion: Event = args.take("assertion")?;
        process_command_event("Assertion", &assertion_commands(), world, assertion, None).await
      },
    ),
  ]
}

/// Runs one event: a core command, or a family event dispatched by name.
///
/// # Errors
/// * Neither a core command nor a registered family matches
/// * The event itself fails
pub fn process_event(
  world: World,
  event: Event,
  from: Option<Address>,
) -> BoxFuture<'static, Result<World>> {
  async move {
    let commands = core_commands();
    if commands.iter().any(|command| command.matches(&event)) {
      return process_command_event("Core", &commands, world, event, from).await;
    }
    let family = event.name().and_then(|name| world.registry().event(name));
    match family {
      Some(process) => {
        let rest = Event::List(event.into_elements().into_iter().skip(1).collect());
        process(world, rest, from).await
      }
      None if event.is_empty() => Err(anyhow!("empty event")),
      None => {
        let names: Vec<String> = commands
          .iter()
          .map(|command| command.name().to_string())
          .chain(world.registry().event_families().map(str::to_string))
          .collect();
        let available = names.iter().map(|name| format!("  {name}")).join("\n");
        Err(
          ScenarioError::UnknownCommand {
            kind: "Core".to_string(),
            event: event.to_string(),
            available,
          }
          .into(),
        )
      }
    }
  }
  .boxed()
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use chumhum_core::config::ScenarioConfig;
  use chumhum_core::memory_chain::MemoryChain;

  use super::*;

  #[tokio::test]
  async fn history_count_parses_atoms() -> Result<()> {
    let world = World::new(
      Arc::new(MemoryChain::new()),
      crate::registry::registry(),
      &ScenarioConfig::default(),
    )?;
    assert_eq!(get_count(world.clone(), Event::atom("3")).await?, 3);
    assert!(get_count(world, Event::atom("three")).await.is_err());
    Ok(())
  }
}
