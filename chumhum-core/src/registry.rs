//! Contract family registry
//!
//! Families (`BUM`, `Comptroller`, ...) live outside this crate. The registry
//! lets the core resolve `BUM Address` style values and dispatch
//! `Comptroller SetCloseFactor ...` style events without depending on them.

use alloy::primitives::Address;
use anyhow::Result;
use futures::future::BoxFuture;

use crate::event::Event;
use crate::value::Value;
use crate::world::World;

pub type ValueProcessor = fn(World, Event) -> BoxFuture<'static, Result<Value>>;
pub type EventProcessor =
  fn(World, Event, Option<Address>) -> BoxFuture<'static, Result<World>>;

#[derive(Clone, Default)]
pub struct Registry {
  values: Vec<(&'static str, ValueProcessor)>,
  events: Vec<(&'static str, EventProcessor)>,
}

impl Registry {
  #[must_use]
  pub fn with_values(mut self, name: &'static str, f: ValueProcessor) -> Self {
    self.values.push((name, f));
    self
  }

  #[must_use]
  pub fn with_events(mut self, name: &'static str, f: EventProcessor) -> Self {
    self.events.push((name, f));
    self
  }

  #[must_use]
  pub fn value(&self, name: &str) -> Option<ValueProcessor> {
    self
      .values
      .iter()
      .find(|(family, _)| family.eq_ignore_ascii_case(name))
      .map(|(_, f)| *f)
  }

  #[must_use]
  pub fn event(&self, name: &str) -> Option<EventProcessor> {
    self
      .events
      .iter()
      .find(|(family, _)| family.eq_ignore_ascii_case(name))
      .map(|(_, f)| *f)
  }

  pub fn event_families(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.events.iter().map(|(family, _)| *family)
  }
}
