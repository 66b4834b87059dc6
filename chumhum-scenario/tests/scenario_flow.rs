//! Scenario scripts run end to end against `MemoryChain`.

use std::sync::{Arc, Mutex};

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chumhum_contracts::lookup::{
  get_bum, get_bum_controller, get_bum_controller_impl_data, get_bum_unitroller, get_chum,
  get_comptroller,
};
use chumhum_core::config::ScenarioConfig;
use chumhum_core::error::ScenarioError;
use chumhum_core::event::Event;
use chumhum_core::lookup::get_address;
use chumhum_core::memory_chain::{MemoryChain, SendOutcome};
use chumhum_core::verify::Verifier;
use chumhum_core::world::World;
use chumhum_scenario::runner::{new_world, run_file, run_script};
use test_context::{test_context, AsyncTestContext};

struct ScenarioContext {
  chain: Arc<MemoryChain>,
  world: World,
}

impl AsyncTestContext for ScenarioContext {
  async fn setup() -> Self {
    Self::new(&ScenarioConfig::default())
      .await
      .expect("Failed to create ScenarioContext")
  }
}

impl ScenarioContext {
  async fn new(config: &ScenarioConfig) -> Result<Self> {
    let chain = Arc::new(MemoryChain::new());
    let world = new_world(config, chain.clone()).await?;
    Ok(Self { chain, world })
  }

  fn root(&self) -> Result<Address> {
    get_address(&self.world, "Root")
  }
}

#[test_context(ScenarioContext)]
#[tokio::test]
async fn tokens_deploy_and_transfer(ctx: &mut ScenarioContext) -> Result<()> {
  let root = ctx.root()?;
  let world = run_script(
    ctx.world.clone(),
    "
      BUM Deploy
      CHUM Deploy Root
      BUM Faucet Geoff 100e18
      CHUM Transfer Torrey 5e18
    ",
  )
  .await?;

  let bum = get_bum(world.clone(), Event::empty()).await?;
  assert_eq!(bum.address, root.create(0));
  let deployment = ctx.chain.deployment(bum.address)?.expect("BUM deployed");
  assert_eq!(deployment.artifact, "BUMScenario");
  assert_eq!(ctx.chain.sent(bum.address, "allocateTo(address,uint256)")?.len(), 1);
  assert_eq!(world.actions().len(), 4);
  assert!(world.actions()[0].log.starts_with("Deployed BUM (Scenario BUM)"));
  Ok(())
}

#[test_context(ScenarioContext)]
#[tokio::test]
async fn values_read_through_stubbed_calls(ctx: &mut ScenarioContext) -> Result<()> {
  let world = run_script(ctx.world.clone(), "BUM Deploy").await?;
  let bum = get_bum(world.clone(), Event::empty()).await?;
  ctx.chain.stub_call(
    bum.address,
    "balanceOf(address)",
    vec![DynSolValue::Uint(U256::from(100u64), 256)],
  )?;

  let world =
    run_script(world, "Assert Equal (BUM TokenBalance Geoff) (Exactly 100)").await?;

  let failed = run_script(world, "Assert Equal (BUM TokenBalance Geoff) (Exactly 7)").await;
  let error = failed.expect_err("balance mismatch");
  assert!(matches!(
    error.root_cause().downcast_ref::<ScenarioError>(),
    Some(ScenarioError::Assertion(_))
  ));
  Ok(())
}

#[test_context(ScenarioContext)]
#[tokio::test]
async fn unitroller_adopts_implementation(ctx: &mut ScenarioContext) -> Result<()> {
  let world = run_script(
    ctx.world.clone(),
    "
      BUMUnitroller Deploy
      BUMControllerImpl Deploy Scenario ScenImpl
      BUMUnitroller SetPendingImpl ScenImpl
      BUMControllerImpl ScenImpl Become
      BUMController Mint 1e18
    ",
  )
  .await?;

  let unitroller = get_bum_unitroller(world.clone(), Event::empty()).await?;
  let controller = get_bum_controller(world.clone(), Event::empty()).await?;
  assert_eq!(controller.address, unitroller.address);
  assert!(controller.abi.overloads("mintBUM").next().is_some());
  assert!(controller.abi.overloads("_setPendingImplementation").next().is_some());

  let impl_address = world
    .contracts()
    .find(|c| c.name == "ScenImpl")
    .map(|c| c.address)
    .expect("impl indexed");
  assert_eq!(ctx.chain.sent(impl_address, "_become(address)")?.len(), 1);
  assert_eq!(ctx.chain.sent(unitroller.address, "mintBUM(uint256)")?.len(), 1);
  assert!(world
    .actions()
    .iter()
    .any(|a| a.log == format!("Become {}'s BUMController Impl", unitroller.address)));
  Ok(())
}

#[test_context(ScenarioContext)]
#[tokio::test]
async fn reported_failures_need_allow_failures(ctx: &mut ScenarioContext) -> Result<()> {
  let world = run_script(ctx.world.clone(), "Comptroller Deploy").await?;
  let comptroller = get_comptroller(world.clone(), Event::empty()).await?;
  ctx.chain.stub_send(
    comptroller.address,
    "_setPendingAdmin(address)",
    SendOutcome::failure(1, 14, 0),
  )?;

  let aborted = run_script(world.clone(), "Comptroller SetPendingAdmin Geoff").await;
  let error = aborted.expect_err("failure aborts the run");
  assert!(matches!(
    error.root_cause().downcast_ref::<ScenarioError>(),
    Some(ScenarioError::InvokationFailed(message)) if message.contains("UNAUTHORIZED")
  ));

  run_script(
    world,
    "
      AllowFailures
      Comptroller SetPendingAdmin Geoff
      Assert Failure UNAUTHORIZED SET_PENDING_ADMIN_OWNER_CHECK
    ",
  )
  .await?;
  Ok(())
}

#[test_context(ScenarioContext)]
#[tokio::test]
async fn reverts_are_asserted(ctx: &mut ScenarioContext) -> Result<()> {
  let world = run_script(ctx.world.clone(), "BUMVaultProxy Deploy").await?;
  let proxy = world
    .contracts()
    .find(|c| c.name == "BUMVaultProxy")
    .map(|c| c.address)
    .expect("proxy indexed");
  ctx.chain.stub_send(
    proxy,
    "_acceptAdmin()",
    SendOutcome::revert("revert only pending admin"),
  )?;

  run_script(
    world,
    "
      AllowFailures
      From Geoff (BUMVaultProxy AcceptAdmin)
      Assert Revert \"only pending admin\"
    ",
  )
  .await?;
  let sent = ctx.chain.sent(proxy, "_acceptAdmin()")?;
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].from, get_address(&ctx.world, "Geoff")?);
  Ok(())
}

#[tokio::test]
async fn dry_runs_send_nothing() -> Result<()> {
  let config = ScenarioConfig {
    dry_run: true,
    ..ScenarioConfig::default()
  };
  let ctx = ScenarioContext::new(&config).await?;
  let world = run_script(
    ctx.world.clone(),
    "
      Comptroller Deploy
      Comptroller SetMaxAssets 20
      BUM Deploy
    ",
  )
  .await?;
  assert!(ctx.chain.transactions()?.is_empty());
  assert!(ctx.chain.deployments()?.is_empty());
  assert_eq!(world.actions().len(), 3);
  assert!(world.actions().iter().all(|a| a
    .invokation
    .as_ref()
    .is_some_and(|i| i.dry_run)));
  Ok(())
}

#[tokio::test]
async fn networks_files_survive_a_new_world() -> Result<()> {
  let dir = tempfile::tempdir()?;
  let config = ScenarioConfig {
    networks_dir: Some(dir.path().to_path_buf()),
    ..ScenarioConfig::default()
  };
  let ctx = ScenarioContext::new(&config).await?;
  let world = run_script(ctx.world.clone(), "BUM Deploy\nComptroller Deploy").await?;
  let bum = get_bum(world, Event::empty()).await?;
  assert!(dir.path().join("development.json").exists());
  assert!(dir.path().join("development-abi.json").exists());

  let reloaded = new_world(&config, ctx.chain.clone()).await?;
  let bum_again = get_bum(reloaded.clone(), Event::empty()).await?;
  assert_eq!(bum_again.address, bum.address);
  assert!(bum_again.abi.overloads("allocateTo").next().is_some());
  assert!(get_comptroller(reloaded, Event::empty()).await.is_ok());
  Ok(())
}

#[test_context(ScenarioContext)]
#[tokio::test]
async fn unknown_families_list_what_is_available(ctx: &mut ScenarioContext) {
  let error = run_script(ctx.world.clone(), "CToken Deploy")
    .await
    .expect_err("no CToken family");
  let message = format!("{error:#}");
  assert!(message.contains("BUMController"), "{message}");
  assert!(message.contains("Comptroller"), "{message}");
}

#[tokio::test]
async fn sample_scenarios_run() -> Result<()> {
  let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
  for name in ["bum.scen", "chum.scen", "bum_controller.scen", "comptroller.scen"] {
    let world = new_world(&ScenarioConfig::default(), Arc::new(MemoryChain::new())).await?;
    let world = run_file(world, &dir.join(name)).await?;
    assert!(!world.actions().is_empty(), "{name}");
  }
  Ok(())
}

#[test_context(ScenarioContext)]
#[tokio::test]
async fn full_uint256_values_compare_exactly(ctx: &mut ScenarioContext) -> Result<()> {
  let world = run_script(ctx.world.clone(), "BUM Deploy").await?;
  let bum = get_bum(world.clone(), Event::empty()).await?;
  ctx.chain.stub_call(
    bum.address,
    "allowance(address,address)",
    vec![DynSolValue::Uint(U256::MAX, 256)],
  )?;

  let script = format!(
    "
      Read (BUM Allowance Geoff Torrey)
      Assert Equal (BUM Allowance Geoff Torrey) (Exactly {})
      Assert Equal (Exactly 1e30) (Exp 1e12)
    ",
    U256::MAX
  );
  run_script(world, &script).await?;
  Ok(())
}

#[test_context(ScenarioContext)]
#[tokio::test]
async fn raw_sends_encode_the_signature(ctx: &mut ScenarioContext) -> Result<()> {
  let world = run_script(
    ctx.world.clone(),
    "
      Comptroller Deploy
      Comptroller Send \"setAdmin(address)\" (Address Geoff)
    ",
  )
  .await?;
  let comptroller = get_comptroller(world.clone(), Event::empty()).await?;
  let sent = ctx.chain.sent(comptroller.address, "setAdmin(address)")?;
  assert_eq!(sent.len(), 1);
  assert_eq!(
    sent[0].args,
    vec![DynSolValue::Address(get_address(&world, "Geoff")?)]
  );
  assert!(world.actions()[1].log.starts_with("Sent setAdmin("));
  Ok(())
}

type Submission = (String, String, String, Address);

#[derive(Default)]
struct RecordingVerifier {
  submissions: Mutex<Vec<Submission>>,
}

impl RecordingVerifier {
  fn submissions(&self) -> Result<Vec<Submission>> {
    Ok(self.submissions.lock().map_err(|_| anyhow!("poisoned"))?.clone())
  }
}

#[async_trait]
impl Verifier for RecordingVerifier {
  async fn verify(
    &self,
    _network: &str,
    api_key: &str,
    model_name: &str,
    contract_name: &str,
    address: Address,
  ) -> Result<()> {
    self.submissions.lock().map_err(|_| anyhow!("poisoned"))?.push((
      api_key.to_string(),
      model_name.to_string(),
      contract_name.to_string(),
      address,
    ));
    Ok(())
  }
}

fn mainnet() -> ScenarioConfig {
  ScenarioConfig {
    network: "mainnet".to_string(),
    ..ScenarioConfig::default()
  }
}

#[test_context(ScenarioContext)]
#[tokio::test]
async fn verify_is_declined_on_local_networks(ctx: &mut ScenarioContext) -> Result<()> {
  let verifier = Arc::new(RecordingVerifier::default());
  let world = ctx.world.clone().with_verifier(verifier.clone());
  let world = run_script(world, "CHUM Deploy Geoff\nCHUM Verify \"key\"").await?;
  assert_eq!(world.actions().len(), 1);
  assert!(verifier.submissions()?.is_empty());
  Ok(())
}

#[tokio::test]
async fn verify_submits_tokens_and_implementations() -> Result<()> {
  let ctx = ScenarioContext::new(&mainnet()).await?;
  let verifier = Arc::new(RecordingVerifier::default());
  let world = run_script(
    ctx.world.clone().with_verifier(verifier.clone()),
    "
      CHUM Deploy Geoff
      CHUM Verify \"key\"
      BUMControllerImpl Deploy Scenario ScenImpl
      BUMControllerImpl ScenImpl Verify \"key\"
    ",
  )
  .await?;

  let chum = get_chum(world.clone(), Event::empty()).await?;
  let (implementation, _, _) = get_bum_controller_impl_data(&world, "ScenImpl")?;
  assert_eq!(
    verifier.submissions()?,
    vec![
      ("key".to_string(), "CHUM".to_string(), "CHUM".to_string(), chum.address),
      (
        "key".to_string(),
        "ScenImpl".to_string(),
        "BUMControllerScenario".to_string(),
        implementation.address,
      ),
    ]
  );
  assert_eq!(world.actions().len(), 4);
  assert!(world.actions()[3].log.starts_with("Verified ScenImpl"));
  Ok(())
}

#[tokio::test]
async fn verify_needs_a_verifier_on_live_networks() -> Result<()> {
  let ctx = ScenarioContext::new(&mainnet()).await?;
  let error = run_script(ctx.world.clone(), "CHUM Deploy Geoff\nCHUM Verify \"key\"")
    .await
    .expect_err("no verifier");
  assert!(format!("{error:#}").contains("no verifier configured for mainnet"));
  Ok(())
}
