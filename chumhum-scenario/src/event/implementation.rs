//! Commands shared by proxy implementations, `BUMControllerImpl` and
//! `BUMVaultImpl`. Apart from `Deploy`, the implementation name comes first:
//! `BUMControllerImpl MyImpl Become`.

use std::future::Future;

use alloy::primitives::Address;
use anyhow::Result;
use chumhum_contracts::lookup::ContractData;
use chumhum_core::command::{Arg, Command};
use chumhum_core::contract::Contract;
use chumhum_core::core_value::{get_event_v, get_string_v};
use chumhum_core::event::Event;
use chumhum_core::invokation::{invoke, ErrorReporter};
use chumhum_core::networks::merge_contract_abi;
use chumhum_core::verify::verify_contract;
use chumhum_core::world::World;

use super::address;
use crate::builder::Built;

#[derive(Clone, Copy)]
pub(super) struct Implementation {
  /// Family name, e.g. `BUMControllerImpl`.
  pub family: &'static str,
  /// Name the proxy is registered under once it adopts an implementation.
  pub target: &'static str,
  /// Proxy family, for help text.
  pub proxy: &'static str,
  pub reporter: ErrorReporter,
  /// Become verbs accepted, all calling `_become(proxy)`.
  pub become_verbs: &'static [&'static str],
  pub data: fn(&World, &str) -> Result<ContractData>,
}

/// Registers `proxy` under the target name with both ABIs merged. Skipped
/// on dry runs, where nothing was deployed to merge.
async fn merge_abi(
  world: World,
  implementation: Implementation,
  proxy: &Contract,
  implementation_contract: &Contract,
) -> Result<World> {
  if world.dry_run() {
    return Ok(world);
  }
  merge_contract_abi(
    world,
    implementation.target,
    proxy,
    &proxy.name,
    &implementation_contract.name,
  )
  .await
}

fn become_command<P, PFut, I, IFut>(
  implementation: Implementation,
  verb: &'static str,
  get_proxy: P,
  get_impl: I,
) -> Command
where
  P: Fn(World, Event) -> PFut + Copy + Send + Sync + 'static,
  PFut: Future<Output = Result<Contract>> + Send + 'static,
  I: Fn(World, Event) -> IFut + Copy + Send + Sync + 'static,
  IFut: Future<Output = Result<Contract>> + Send + 'static,
{
  let Implementation {
    family, target, ..
  } = implementation;
  Command::new(
    &format!(
      "
        #### {verb}

        * \"{family} <Impl> {verb}\" - Become the {target}, if possible.
          * E.g. \"{family} MyImpl {verb}\"
      "
    ),
    verb,
    vec![
      Arg::new("proxy", get_proxy).implicit(),
      Arg::new("impl", get_impl),
    ],
    move |world, from, mut args| async move {
      let proxy: Contract = args.take("proxy")?;
      let implementation_contract: Contract = args.take("impl")?;
      let call = implementation_contract.method("_become", vec![address(proxy.address)])?;
      let invokation = invoke(
        &world,
        &implementation_contract,
        call,
        from,
        &implementation.reporter,
      )
      .await?;
      let world = merge_abi(world, implementation, &proxy, &implementation_contract).await?;
      Ok(world.add_action(
        format!("Become {}'s {target} Impl", proxy.address),
        Some(invokation),
      ))
    },
  )
  .name_pos(1)
}

pub(super) fn implementation_commands<P, PFut, I, IFut, B, BFut>(
  implementation: Implementation,
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
  let Implementation {
    family,
    target,
    proxy,
    data,
    ..
  } = implementation;
  let mut commands = vec![
    Command::new(
      &format!(
        "
          #### Deploy

          * \"{family} Deploy ...params\" - Generates a new {target} implementation
            * E.g. \"{family} Deploy Scenario MyScen\"
        "
      ),
      "Deploy",
      vec![Arg::new("params", get_event_v).variadic()],
      move |world, from, mut args| async move {
        let built = build(world, from, args.take("params")?).await?;
        Ok(built.world.add_action(
          format!(
            "Added {target} Implementation ({}) at address {}",
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

          * \"{family} <Impl> Verify apiKey:<String>\" - Verifies the {target} implementation on the block explorer
            * E.g. \"{family} MyImpl Verify \"myApiKey\"\"
        "
      ),
      "Verify",
      vec![
        Arg::new("impl", get_string_v),
        Arg::new("apiKey", get_string_v),
      ],
      move |world, mut args| async move {
        let name: String = args.take("impl")?;
        let api_key: String = args.take("apiKey")?;
        let (contract, name, contract_data) = data(&world, &name)?;
        let model = contract_data["contract"]
          .as_str()
          .unwrap_or(target)
          .to_string();
        verify_contract(world, &api_key, &name, &model, contract.address).await
      },
    )
    .name_pos(1),
  ];
  commands.extend(
    implementation
      .become_verbs
      .iter()
      .map(|verb| become_command(implementation, *verb, get_proxy, get_impl)),
  );
  commands.push(
    Command::new(
      &format!(
        "
          #### MergeABI

          * \"{family} <Impl> MergeABI\" - Merges the ABI into {proxy}, as if it was a become.
            * E.g. \"{family} MyImpl MergeABI\"
        "
      ),
      "MergeABI",
      vec![
        Arg::new("proxy", get_proxy).implicit(),
        Arg::new("impl", get_impl),
      ],
      move |world, _from, mut args| async move {
        let proxy: Contract = args.take("proxy")?;
        let implementation_contract: Contract = args.take("impl")?;
        merge_abi(world, implementation, &proxy, &implementation_contract).await
      },
    )
    .name_pos(1),
  );
  commands
}
