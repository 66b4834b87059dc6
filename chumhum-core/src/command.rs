//! Arg / Command / Fetcher framework
//!
//! A verb declares its name, the position of that name within an event, and
//! an ordered list of [`Arg`]s. Incoming events are matched against a family
//! of verbs; the first verb whose name matches (case-insensitively) parses
//! its arguments from the remaining tokens and runs its handler.
//!
//! Argument options:
//! - `implicit` - resolved from the world alone, consumes no token
//! - `variadic` - consumes every remaining token
//! - `mapped` - resolves each element of a list token separately
//! - `nullable` - absent when no tokens remain
//! - `default` - used when no tokens remain
//! - `rescue` - used when the getter fails
//!
//! Fetchers additionally support a `catchall` verb, tried with the whole
//! event when no name matches.

use std::any::{type_name, Any};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use itertools::Itertools;

use crate::error::ScenarioError;
use crate::event::Event;
use crate::world::World;

type Erased = Box<dyn Any + Send>;
type Getter =
  Arc<dyn Fn(World, Event) -> BoxFuture<'static, Result<Erased>> + Send + Sync>;
type Fallback = Arc<dyn Fn() -> Erased + Send + Sync>;

fn fallback<T: Clone + Send + Sync + 'static>(value: T) -> Fallback {
  Arc::new(move || Box::new(value.clone()) as Erased)
}

// ============================================================================
// ARG
// ============================================================================

pub struct Arg {
  name: String,
  single: Getter,
  each: Getter,
  implicit: bool,
  variadic: bool,
  mapped: bool,
  nullable: bool,
  default: Option<Fallback>,
  rescue: Option<Fallback>,
}

impl Arg {
  /// Declares an argument resolved by `getter`. Mapped arguments resolve to
  /// `Vec<T>`, all others to `T`.
  pub fn new<T, F, Fut>(name: &str, getter: F) -> Self
  where
    T: Send + 'static,
    F: Fn(World, Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    let getter = Arc::new(getter);
    let single_getter = getter.clone();
    let single: Getter = Arc::new(move |world: World, event: Event| {
      let fut = (*single_getter)(world, event);
      async move { fut.await.map(|v| Box::new(v) as Erased) }.boxed()
    });
    let each: Getter = Arc::new(move |world: World, event: Event| {
      let getter = getter.clone();
      async move {
        let mut values: Vec<T> = Vec::new();
        for item in event.into_elements() {
          values.push((*getter)(world.clone(), item).await?);
        }
        Ok(Box::new(values) as Erased)
      }
      .boxed()
    });
    Self {
      name: name.to_string(),
      single,
      each,
      implicit: false,
      variadic: false,
      mapped: false,
      nullable: false,
      default: None,
      rescue: None,
    }
  }

  #[must_use]
  pub fn implicit(mut self) -> Self {
    self.implicit = true;
    self
  }

  #[must_use]
  pub fn variadic(mut self) -> Self {
    self.variadic = true;
    self
  }

  #[must_use]
  pub fn mapped(mut self) -> Self {
    self.mapped = true;
    self
  }

  #[must_use]
  pub fn nullable(mut self) -> Self {
    self.nullable = true;
    self
  }

  #[must_use]
  pub fn default<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
    self.default = Some(fallback(value));
    self
  }

  #[must_use]
  pub fn rescue<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
    self.rescue = Some(fallback(value));
    self
  }

  #[must_use]
  pub fn name(&self) -> &str {
    &self.name
  }

  fn getter(&self) -> &Getter {
    if self.mapped {
      &self.each
    } else {
      &self.single
    }
  }

  async fn resolve(
    &self,
    world: &World,
    rest: &mut VecDeque<Event>,
    command: &str,
  ) -> Result<Option<Erased>> {
    if self.nullable && rest.is_empty() {
      return Ok(None);
    }
    let resolved = if self.implicit {
      (self.single)(world.clone(), Event::empty()).await
    } else if self.variadic {
      if rest.is_empty() {
        if let Some(default) = &self.default {
          return Ok(Some(default()));
        }
      }
      let remaining = Event::List(rest.drain(..).collect());
      (self.getter())(world.clone(), remaining).await
    } else {
      match rest.pop_front() {
        Some(token) => (self.getter())(world.clone(), token).await,
        None => {
          return match &self.default {
            Some(default) => Ok(Some(default())),
            None => Err(
              ScenarioError::MissingArgument {
                arg: self.name.clone(),
                command: command.to_string(),
              }
              .into(),
            ),
          };
        }
      }
    };
    match (resolved, &self.rescue) {
      (Ok(value), _) => Ok(Some(value)),
      (Err(_), Some(rescue)) => Ok(Some(rescue())),
      (Err(e), None) => {
        Err(e.context(format!("argument `{}` of {command}", self.name)))
      }
    }
  }
}

// ============================================================================
// ARGS
// ============================================================================

/// Resolved arguments, extracted by name and type.
pub struct Args {
  command: String,
  values: HashMap<String, Option<Erased>>,
}

impl Args {
  /// Removes a resolved argument.
  ///
  /// # Errors
  /// * Argument was never declared or resolved to absent
  /// * Argument has a different type
  pub fn take<T: 'static>(&mut self, name: &str) -> Result<T> {
    self.take_opt(name)?.ok_or_else(|| {
      ScenarioError::MissingArgument {
        arg: name.to_string(),
        command: self.command.clone(),
      }
      .into()
    })
  }

  /// Removes a nullable argument.
  ///
  /// # Errors
  /// Argument has a different type.
  pub fn take_opt<T: 'static>(&mut self, name: &str) -> Result<Option<T>> {
    match self.values.remove(name).flatten() {
      None => Ok(None),
      Some(boxed) => boxed.downcast::<T>().map(|v| Some(*v)).map_err(|_| {
        ScenarioError::ArgumentType {
          arg: name.to_string(),
          expected: type_name::<T>().to_string(),
        }
        .into()
      }),
    }
  }
}

// ============================================================================
// SIGNATURE
// ============================================================================

struct Signature {
  doc: String,
  name: String,
  args: Vec<Arg>,
  name_pos: usize,
  catchall: bool,
}

impl Signature {
  fn new(doc: &str, name: &str, args: Vec<Arg>) -> Self {
    Self {
      doc: doc.trim().to_string(),
      name: name.to_string(),
      args,
      name_pos: 0,
      catchall: false,
    }
  }

  fn matches(&self, event: &Event) -> bool {
    event
      .elements()
      .get(self.name_pos)
      .and_then(Event::as_atom)
      .is_some_and(|token| token.eq_ignore_ascii_case(&self.name))
  }

  async fn parse_args(
    &self,
    world: &World,
    event: Event,
    whole_event: bool,
  ) -> Result<Args> {
    let mut rest: VecDeque<Event> = event.into_elements().into();
    if !whole_event && self.name_pos < rest.len() {
      rest.remove(self.name_pos);
    }
    let mut values = HashMap::with_capacity(self.args.len());
    for arg in &self.args {
      let value = arg.resolve(world, &mut rest, &self.name).await?;
      values.insert(arg.name.clone(), value);
    }
    if !rest.is_empty() {
      return Err(
        ScenarioError::ExtraArguments {
          extra: rest.iter().join(" "),
          command: self.name.clone(),
        }
        .into(),
      );
    }
    Ok(Args {
      command: self.name.clone(),
      values,
    })
  }
}

fn unhandled<'a>(
  kind: &str,
  event: &Event,
  signatures: impl Iterator<Item = &'a Signature>,
) -> anyhow::Error {
  ScenarioError::UnknownCommand {
    kind: kind.to_string(),
    event: event.to_string(),
    available: signatures.map(|sig| format!("  {}", sig.name)).join("\n"),
  }
  .into()
}

// ============================================================================
// COMMAND
// ============================================================================

type CommandHandler = Arc<
  dyn Fn(World, Address, Args) -> BoxFuture<'static, Result<World>>
    + Send
    + Sync,
>;
type ViewHandler =
  Arc<dyn Fn(World, Args) -> BoxFuture<'static, Result<World>> + Send + Sync>;

enum Handler {
  Command(CommandHandler),
  View(ViewHandler),
}

/// A world-transforming verb. Commands act on behalf of a sender; views only
/// read and report.
pub struct Command {
  sig: Signature,
  handler: Handler,
}

impl Command {
  pub fn new<F, Fut>(doc: &str, name: &str, args: Vec<Arg>, handler: F) -> Self
  where
    F: Fn(World, Address, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<World>> + Send + 'static,
  {
    Self {
      sig: Signature::new(doc, name, args),
      handler: Handler::Command(Arc::new(move |world: World, from, args| {
        handler(world, from, args).boxed()
      })),
    }
  }

  pub fn view<F, Fut>(doc: &str, name: &str, args: Vec<Arg>, handler: F) -> Self
  where
    F: Fn(World, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<World>> + Send + 'static,
  {
    Self {
      sig: Signature::new(doc, name, args),
      handler: Handler::View(Arc::new(move |world: World, args: Args| {
        handler(world, args).boxed()
      })),
    }
  }

  #[must_use]
  pub fn name_pos(mut self, pos: usize) -> Self {
    self.sig.name_pos = pos;
    self
  }

  #[must_use]
  pub fn name(&self) -> &str {
    &self.sig.name
  }

  #[must_use]
  pub fn doc(&self) -> &str {
    &self.sig.doc
  }

  #[must_use]
  pub fn matches(&self, event: &Event) -> bool {
    self.sig.matches(event)
  }

  /// Parses arguments from `event` and runs the handler.
  ///
  /// # Errors
  /// * Argument resolution fails
  /// * No sender is available for a non-view command
  /// * Handler fails
  pub async fn process(
    &self,
    world: World,
    event: Event,
    from: Option<Address>,
  ) -> Result<World> {
    let args = self.sig.parse_args(&world, event, false).await?;
    match &self.handler {
      Handler::Command(handler) => {
        let from = from.or_else(|| world.default_from()).ok_or_else(|| {
          anyhow!("{} requires a sender, use `From <user> ...`", self.sig.name)
        })?;
        handler(world, from, args).await
      }
      Handler::View(handler) => handler(world, args).await,
    }
  }
}

/// Runs the first command matching `event`.
///
/// # Errors
/// * No command matches
/// * The matched command fails
pub async fn process_command_event(
  kind: &str,
  commands: &[Command],
  world: World,
  event: Event,
  from: Option<Address>,
) -> Result<World> {
  match commands.iter().find(|command| command.matches(&event)) {
    Some(command) => command.process(world, event, from).await,
    None => Err(unhandled(kind, &event, commands.iter().map(|c| &c.sig))),
  }
}

// ============================================================================
// FETCHER
// ============================================================================

type FetchHandler<V> =
  Arc<dyn Fn(World, Args) -> BoxFuture<'static, Result<V>> + Send + Sync>;

/// A value-producing verb.
pub struct Fetcher<V> {
  sig: Signature,
  handler: FetchHandler<V>,
}

impl<V: Send + 'static> Fetcher<V> {
  pub fn new<F, Fut>(doc: &str, name: &str, args: Vec<Arg>, handler: F) -> Self
  where
    F: Fn(World, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V>> + Send + 'static,
  {
    Self {
      sig: Signature::new(doc, name, args),
      handler: Arc::new(move |world: World, args: Args| {
        handler(world, args).boxed()
      }),
    }
  }

  /// Marks this fetcher as the family fallback. It receives the whole event
  /// as its arguments when no other fetcher matches by name.
  #[must_use]
  pub fn catchall(mut self) -> Self {
    self.sig.catchall = true;
    self
  }

  #[must_use]
  pub fn name_pos(mut self, pos: usize) -> Self {
    self.sig.name_pos = pos;
    self
  }

  #[must_use]
  pub fn name(&self) -> &str {
    &self.sig.name
  }

  #[must_use]
  pub fn doc(&self) -> &str {
    &self.sig.doc
  }

  async fn fetch(&self, world: World, event: Event, whole: bool) -> Result<V> {
    let args = self.sig.parse_args(&world, event, whole).await?;
    (self.handler)(world, args).await
  }
}

/// Resolves `event` through the first fetcher matching by name, falling back
/// to the catchall fetcher.
///
/// # Errors
/// * Neither a named nor a catchall fetcher applies
/// * The selected fetcher fails
pub async fn get_fetcher_value<V: Send + 'static>(
  kind: &str,
  fetchers: &[Fetcher<V>],
  world: World,
  event: Event,
) -> Result<V> {
  if let Some(fetcher) = fetchers.iter().find(|f| f.sig.matches(&event)) {
    return fetcher.fetch(world, event, false).await;
  }
  if let Some(fetcher) = fetchers.iter().find(|f| f.sig.catchall) {
    return fetcher.fetch(world, event, true).await;
  }
  Err(unhandled(kind, &event, fetchers.iter().map(|f| &f.sig)))
}

/// Markdown help for a command family.
#[must_use]
pub fn command_help(commands: &[Command]) -> String {
  commands.iter().map(Command::doc).join("\n\n")
}

/// Markdown help for a fetcher family.
#[must_use]
pub fn fetcher_help<V: Send + 'static>(fetchers: &[Fetcher<V>]) -> String {
  fetchers.iter().map(Fetcher::doc).join("\n\n")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ScenarioConfig;
  use crate::memory_chain::MemoryChain;
  use crate::registry::Registry;
  use crate::value::Number;

  async fn number(_world: World, event: Event) -> Result<Number> {
    event
      .as_atom()
      .ok_or_else(|| anyhow!("expected atom"))?
      .parse()
  }

  async fn network(world: World, _event: Event) -> Result<String> {
    Ok(world.network().to_string())
  }

  fn world() -> World {
    World::new(
      Arc::new(MemoryChain::new()),
      Registry::default(),
      &ScenarioConfig::default(),
    )
    .expect("default world")
  }

  fn fetchers() -> Vec<Fetcher<String>> {
    vec![
      Fetcher::new(
        "#### Pair",
        "Pair",
        vec![
          Arg::new("net", network).implicit(),
          Arg::new("a", number),
          Arg::new("b", number).default(Number::from_u64(7)),
        ],
        |_world, mut args| async move {
          let net: String = args.take("net")?;
          let a: Number = args.take("a")?;
          let b: Number = args.take("b")?;
          Ok(format!("{net}:{a}:{b}"))
        },
      ),
      Fetcher::new(
        "#### Many",
        "Many",
        vec![Arg::new("items", number).mapped().variadic()],
        |_world, mut args| async move {
          let items: Vec<Number> = args.take("items")?;
          Ok(items.iter().join("+"))
        },
      ),
      Fetcher::new(
        "#### Maybe",
        "Maybe",
        vec![Arg::new("n", number).nullable()],
        |_world, mut args| async move {
          let n: Option<Number> = args.take_opt("n")?;
          Ok(n.map_or_else(|| "none".to_string(), |n| n.show()))
        },
      ),
      Fetcher::new(
        "#### Rescued",
        "Rescued",
        vec![Arg::new("n", number).rescue(Number::ZERO)],
        |_world, mut args| async move {
          let n: Number = args.take("n")?;
          Ok(n.show())
        },
      ),
      Fetcher::new(
        "#### Default",
        "Default",
        vec![Arg::new("n", number)],
        |_world, mut args| async move {
          let n: Number = args.take("n")?;
          Ok(format!("catchall {n}"))
        },
      )
      .catchall(),
    ]
  }

  async fn fetch(line: &str) -> Result<String> {
    get_fetcher_value("Test", &fetchers(), world(), Event::words(line)).await
  }

  #[tokio::test]
  async fn implicit_and_default_args() -> Result<()> {
    assert_eq!(fetch("pair 1").await?, "development:1:7");
    assert_eq!(fetch("Pair 1 2").await?, "development:1:2");
    Ok(())
  }

  #[tokio::test]
  async fn variadic_mapped_consumes_rest() -> Result<()> {
    assert_eq!(fetch("Many 1 2 3").await?, "1+2+3");
    Ok(())
  }

  #[tokio::test]
  async fn nullable_and_rescue() -> Result<()> {
    assert_eq!(fetch("Maybe").await?, "none");
    assert_eq!(fetch("Maybe 4").await?, "4");
    assert_eq!(fetch("Rescued nope").await?, "0");
    Ok(())
  }

  #[tokio::test]
  async fn catchall_receives_whole_event() -> Result<()> {
    assert_eq!(fetch("42").await?, "catchall 42");
    Ok(())
  }

  #[tokio::test]
  async fn argument_errors() {
    let err = fetch("Pair").await.unwrap_err();
    assert!(matches!(
      err.downcast_ref::<ScenarioError>(),
      Some(ScenarioError::MissingArgument { arg, .. }) if arg == "a"
    ));
    let err = fetch("Pair 1 2 3").await.unwrap_err();
    assert!(matches!(
      err.downcast_ref::<ScenarioError>(),
      Some(ScenarioError::ExtraArguments { extra, .. }) if extra == "3"
    ));
  }

  #[tokio::test]
  async fn unknown_commands_list_available() {
    let commands = vec![Command::view("", "Noop", vec![], |world, _args| async move {
      Ok(world)
    })];
    let err = process_command_event(
      "Test",
      &commands,
      world(),
      Event::words("Other"),
      None,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("Noop"));
  }

  #[tokio::test]
  async fn name_position_selects_verb_token() -> Result<()> {
    let commands = vec![Command::view(
      "",
      "Address",
      vec![Arg::new("n", number)],
      |world, mut args| async move {
        let n: Number = args.take("n")?;
        Ok(world.add_action(format!("saw {n}"), None))
      },
    )
    .name_pos(1)];
    let world = process_command_event(
      "Test",
      &commands,
      world(),
      Event::words("5 address"),
      None,
    )
    .await?;
    assert_eq!(world.actions().last().map(|a| a.log.as_str()), Some("saw 5"));
    Ok(())
  }

  #[tokio::test]
  async fn mistyped_take_is_reported() -> Result<()> {
    let commands = vec![Command::view(
      "",
      "Typed",
      vec![Arg::new("n", number)],
      |_world, mut args| async move {
        let _: String = args.take("n")?;
        unreachable!()
      },
    )];
    let err = process_command_event(
      "Test",
      &commands,
      world(),
      Event::words("Typed 1"),
      None,
    )
    .await
    .unwrap_err();
    assert!(matches!(
      err.downcast_ref::<ScenarioError>(),
      Some(ScenarioError::ArgumentType { .. })
    ));
    Ok(())
  }
}
