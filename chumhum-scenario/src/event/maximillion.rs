use alloy::primitives::Address;
use anyhow::Result;
use chumhum_core::command::{process_command_event, Arg, Command};
use chumhum_core::core_value::get_event_v;
use chumhum_core::event::Event;
use chumhum_core::world::World;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::builder::build_maximillion;

#[must_use]
pub fn maximillion_commands() -> Vec<Command> {
  vec![Command::new(
    "
      #### Deploy

      * \"Maximillion Deploy cMatic:<Address>\" - Deploys Maximillion in front of the given cMatic market
        * E.g. \"Maximillion Deploy (Address cMATIC)\"
    ",
    "Deploy",
    vec![Arg::new("params", get_event_v).variadic()],
    |world, from, mut args| async move {
      let built = build_maximillion(world, from, args.take("params")?).await?;
      Ok(built.world.add_action(
        format!(
          "Added Maximillion ({}) at address {}",
          built.description, built.contract.address
        ),
        Some(built.invokation),
      ))
    },
  )]
}

pub fn process_maximillion_event(
  world: World,
  event: Event,
  from: Option<Address>,
) -> BoxFuture<'static, Result<World>> {
  async move {
    process_command_event("Maximillion", &maximillion_commands(), world, event, from).await
  }
  .boxed()
}
