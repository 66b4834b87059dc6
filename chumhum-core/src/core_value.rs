//! Core value resolvers
//!
//! Typed getters turning event tokens into values. A bare atom is read
//! literally (a number, an address name); a nested list is evaluated as a
//! value expression such as `(Exp 1.5)`, `(Sum 1 2)` or `(BUM TotalSupply)`.

use std::str::FromStr;

use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::command::{get_fetcher_value, Arg, Fetcher};
use crate::error::ScenarioError;
use crate::event::Event;
use crate::lookup::get_address;
use crate::value::{Number, Value};
use crate::world::World;

/// Evaluates a value expression: a core fetcher, a registered contract
/// family, or a literal.
pub fn get_core_value(world: World, event: Event) -> BoxFuture<'static, Result<Value>> {
  async move {
    let event = event.unwrap_single();
    if let Event::List(items) = &event {
      let family = items
        .first()
        .and_then(Event::as_atom)
        .and_then(|name| world.registry().value(name));
      if let Some(family) = family {
        let rest = Event::List(items[1..].to_vec());
        return family(world, rest).await;
      }
    }
    get_fetcher_value("Core", &core_fetchers(), world, event).await
  }
  .boxed()
}

fn literal(token: &str) -> Value {
  if let Ok(n) = Number::from_str(token) {
    return Value::Number(n);
  }
  if token.starts_with("0x") {
    if let Ok(address) = Address::from_str(token) {
      return Value::Address(address);
    }
  }
  Value::String(token.to_string())
}

// ============================================================================
// TYPED GETTERS
// ============================================================================

/// Any value.
///
/// # Errors
/// Expression fails to evaluate.
pub async fn get_value(world: World, event: Event) -> Result<Value> {
  get_core_value(world, event).await
}

/// Address by name, literal hex, or an expression yielding an address.
///
/// # Errors
/// Unknown name or non-address expression.
pub async fn get_address_v(world: World, event: Event) -> Result<Address> {
  match event.unwrap_single() {
    Event::Atom(name) => get_address(&world, &name),
    list => get_core_value(world, list).await?.as_address(),
  }
}

/// # Errors
/// Not a number.
pub async fn get_number_v(world: World, event: Event) -> Result<Number> {
  match event.unwrap_single() {
    Event::Atom(token) => token.parse(),
    list => get_core_value(world, list).await?.as_number(),
  }
}

/// Number scaled to an `Exp` mantissa, `0.5` becomes `0.5e18`.
///
/// # Errors
/// Not a number or out of range.
pub async fn get_exp_number_v(world: World, event: Event) -> Result<Number> {
  get_number_v(world, event).await?.exp()
}

/// Percentage as an `Exp` mantissa, `50%` and `50` both become `0.5e18`.
///
/// # Errors
/// Not a number or out of range.
pub async fn get_percent_v(world: World, event: Event) -> Result<Number> {
  let number = match event.unwrap_single() {
    Event::Atom(token) => token.trim_end_matches('%').parse::<Number>()?,
    list => get_core_value(world, list).await?.as_number()?,
  };
  number.div(Number::from_u64(100))?.exp()
}

/// # Errors
/// Non-string expression.
pub async fn get_string_v(world: World, event: Event) -> Result<String> {
  match event.unwrap_single() {
    Event::Atom(s) => Ok(s),
    list => get_core_value(world, list).await?.as_string(),
  }
}

/// # Errors
/// Not `True`/`False` or a boolean expression.
pub async fn get_bool_v(world: World, event: Event) -> Result<bool> {
  match event.unwrap_single() {
    Event::Atom(token) if token.eq_ignore_ascii_case("true") => Ok(true),
    Event::Atom(token) if token.eq_ignore_ascii_case("false") => Ok(false),
    Event::Atom(token) => Err(
      ScenarioError::InvalidValue {
        expected: "bool".to_string(),
        got: token,
      }
      .into(),
    ),
    list => get_core_value(world, list).await?.as_bool(),
  }
}

/// The raw event, unevaluated.
///
/// # Errors
/// Never fails.
pub async fn get_event_v(_world: World, event: Event) -> Result<Event> {
  Ok(event)
}

// ============================================================================
// CORE FETCHERS
// ============================================================================

fn binary(
  name: &'static str,
  doc: &'static str,
  op: fn(Number, Number) -> Result<Number>,
) -> Fetcher<Value> {
  Fetcher::new(
    doc,
    name,
    vec![Arg::new("a", get_number_v), Arg::new("b", get_number_v)],
    move |_world, mut args| async move {
      let a: Number = args.take("a")?;
      let b: Number = args.take("b")?;
      op(a, b).map(Value::Number)
    },
  )
}

#[allow(clippy::too_many_lines)]
fn core_fetchers() -> Vec<Fetcher<Value>> {
  vec![
    Fetcher::new(
      "
        #### True

        * \"True\" - Returns true
      ",
      "True",
      vec![],
      |_world, _args| async { Ok(Value::Bool(true)) },
    ),
    Fetcher::new(
      "
        #### False

        * \"False\" - Returns false
      ",
      "False",
      vec![],
      |_world, _args| async { Ok(Value::Bool(false)) },
    ),
    Fetcher::new(
      "
        #### Zero

        * \"Zero\" - Returns 0
      ",
      "Zero",
      vec![],
      |_world, _args| async { Ok(Value::Number(Number::ZERO)) },
    ),
    Fetcher::new(
      "
        #### Nothing

        * \"Nothing\" - Returns no value
      ",
      "Nothing",
      vec![],
      |_world, _args| async { Ok(Value::Nothing) },
    ),
    Fetcher::new(
      "
        #### Exactly

        * \"Exactly <Number>\" - Returns the number as is
          * E.g. \"Exactly 1.0e18\"
      ",
      "Exactly",
      vec![Arg::new("n", get_number_v)],
      |_world, mut args| async move { Ok(Value::Number(args.take("n")?)) },
    ),
    Fetcher::new(
      "
        #### Exp

        * \"Exp <Number>\" - Scales a number by 1e18
          * E.g. \"Exp 0.5\" is 0.5e18
      ",
      "Exp",
      vec![Arg::new("n", get_exp_number_v)],
      |_world, mut args| async move { Ok(Value::Number(args.take("n")?)) },
    ),
    Fetcher::new(
      "
        #### Percent

        * \"Percent <Number>\" - A percentage as an Exp mantissa
          * E.g. \"Percent 25\" is 0.25e18
      ",
      "Percent",
      vec![Arg::new("n", get_percent_v)],
      |_world, mut args| async move { Ok(Value::Number(args.take("n")?)) },
    ),
    Fetcher::new(
      "
        #### Address

        * \"Address <User>\" - Resolves an account, alias or contract address
          * E.g. \"Address Geoff\"
      ",
      "Address",
      vec![Arg::new("who", get_address_v)],
      |_world, mut args| async move { Ok(Value::Address(args.take("who")?)) },
    ),
    binary(
      "Sum",
      "
        #### Sum

        * \"Sum a b\" - Adds two numbers
      ",
      Number::add,
    ),
    binary(
      "Sub",
      "
        #### Sub

        * \"Sub a b\" - Subtracts b from a
      ",
      Number::sub,
    ),
    binary(
      "Mul",
      "
        #### Mul

        * \"Mul a b\" - Multiplies two numbers
      ",
      Number::mul,
    ),
    binary(
      "Div",
      "
        #### Div

        * \"Div a b\" - Divides a by b, failing on zero
      ",
      Number::div,
    ),
    Fetcher::new(
      "
        #### Equal

        * \"Equal a b\" - Whether two values are equal
          * E.g. \"Equal (BUM Symbol) BUM\"
      ",
      "Equal",
      vec![Arg::new("a", get_value), Arg::new("b", get_value)],
      |_world, mut args| async move {
        let a: Value = args.take("a")?;
        let b: Value = args.take("b")?;
        Ok(Value::Bool(a.compare(&b)))
      },
    ),
    Fetcher::new(
      "
        #### LastContract

        * \"LastContract\" - Address of the most recently deployed contract
      ",
      "LastContract",
      vec![],
      |world, _args| async move {
        world
          .last_contract()
          .map(|c| Value::Address(c.address))
          .ok_or_else(|| anyhow!("no contract deployed yet"))
      },
    ),
    Fetcher::new(
      "
        #### Default

        * \"<Literal>\" - A number, hex address, or string
          * E.g. \"1.0e18\", \"0x...\", \"Geoff\"
      ",
      "Default",
      vec![Arg::new("literal", get_event_v)],
      |_world, mut args| async move {
        match args.take::<Event>("literal")? {
          Event::Atom(token) => Ok(literal(&token)),
          event => Ok(Value::Event(event)),
        }
      },
    )
    .catchall(),
  ]
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::config::ScenarioConfig;
  use crate::event::parse_event;
  use crate::memory_chain::MemoryChain;
  use crate::registry::Registry;

  fn family(_world: World, event: Event) -> BoxFuture<'static, Result<Value>> {
    async move { Ok(Value::String(format!("family saw {event}"))) }.boxed()
  }

  fn world() -> World {
    World::new(
      Arc::new(MemoryChain::new()),
      Registry::default().with_values("Token", family),
      &ScenarioConfig::default(),
    )
    .expect("default world")
  }

  async fn eval(expr: &str) -> Result<Value> {
    get_core_value(world(), parse_event(expr)?).await
  }

  #[tokio::test]
  async fn arithmetic_nests() -> Result<()> {
    assert_eq!(eval("Sum 1 (Mul 2 3)").await?, Value::Number(Number::from_u64(7)));
    assert_eq!(
      eval("Exp 1.5").await?,
      Value::Number("1.5e18".parse::<Number>()?)
    );
    assert_eq!(
      eval("Percent 25").await?,
      Value::Number("0.25e18".parse::<Number>()?)
    );
    assert!(eval("Div 1 0").await.is_err());
    Ok(())
  }

  #[tokio::test]
  async fn literals_fall_through_to_the_catchall() -> Result<()> {
    assert_eq!(eval("1e3").await?, Value::Number(Number::from_u64(1000)));
    assert_eq!(eval("Geoff").await?, Value::String("Geoff".to_string()));
    assert_eq!(
      eval("0x0000000000000000000000000000000000000001").await?,
      Value::Address(Address::with_last_byte(1))
    );
    Ok(())
  }

  #[tokio::test]
  async fn families_receive_the_rest_of_the_event() -> Result<()> {
    assert_eq!(
      eval("token TotalSupply").await?,
      Value::String("family saw (TotalSupply)".to_string())
    );
    Ok(())
  }

  #[tokio::test]
  async fn equal_compares_values() -> Result<()> {
    assert_eq!(eval("Equal (Exp 1) 1e18").await?, Value::Bool(true));
    assert_eq!(eval("Equal Geoff Torrey").await?, Value::Bool(false));
    Ok(())
  }

  #[tokio::test]
  async fn typed_getters() -> Result<()> {
    let world = world();
    let geoff = world.account("Geoff").map(|a| a.address);
    assert_eq!(
      Some(get_address_v(world.clone(), Event::atom("Geoff")).await?),
      geoff
    );
    assert_eq!(
      Some(get_address_v(world.clone(), parse_event("Address Geoff")?).await?),
      geoff
    );
    assert!(get_bool_v(world.clone(), Event::atom("TRUE")).await?);
    assert!(get_bool_v(world.clone(), Event::atom("yes")).await.is_err());
    assert_eq!(
      get_percent_v(world, Event::atom("50%")).await?,
      "0.5e18".parse::<Number>()?
    );
    Ok(())
  }
}
