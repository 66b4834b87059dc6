//! Deploy, invoke and read through the core engine against `MemoryChain`.

use std::sync::Arc;

use anyhow::Result;
use chumhum_core::prelude::*;

const TOKEN_ABI: [&str; 3] = [
  "totalSupply() returns (uint256)",
  "approve(address,uint256) returns (bool)",
  "_setPendingAdmin(address) returns (uint256)",
];

const REPORTER: ErrorReporter = ErrorReporter {
  family: "Token",
  errors: &["NO_ERROR", "UNAUTHORIZED"],
  infos: &["SET_PENDING_ADMIN_OWNER_CHECK"],
};

fn world(chain: Arc<MemoryChain>) -> Result<World> {
  World::new(chain, Registry::default(), &ScenarioConfig::default())
}

#[tokio::test]
async fn deploy_store_and_read() -> Result<()> {
  let chain = Arc::new(MemoryChain::new());
  let world = world(chain.clone())?;
  let root = world.default_from().expect("root");

  let abi = Arc::new(Abi::parse(&TOKEN_ABI)?);
  let Deployed {
    contract,
    invokation,
  } = deploy(&world, root, "Token", vec![], abi).await?;
  invokation.ensure_success()?;
  assert_eq!(contract.address, root.create(0));

  let world = store_contract(world, contract, "Token", vec![]);
  let token = get_world_contract(&world, &[&["Contracts", "Token"]])?;
  chain.stub_call(
    token.address,
    "totalSupply()",
    vec![DynSolValue::Uint(U256::from(1_000u64), 256)],
  )?;
  let supply = read_number(&world, &token, "totalSupply", vec![]).await?;
  assert_eq!(supply, Number::from_u64(1_000));

  let value = get_core_value(world, parse_event("Equal (Exp 1) 1e18")?).await?;
  assert_eq!(value, Value::Bool(true));
  Ok(())
}

#[tokio::test]
async fn reported_failures_are_classified() -> Result<()> {
  let chain = Arc::new(MemoryChain::new());
  let world = world(chain.clone())?;
  let root = world.default_from().expect("root");
  let abi = Arc::new(Abi::parse(&TOKEN_ABI)?);
  let token = deploy(&world, root, "Token", vec![], abi).await?.contract;
  chain.stub_send(
    token.address,
    "_setPendingAdmin(address)",
    SendOutcome::failure(1, 0, 0),
  )?;

  let geoff = get_address(&world, "Geoff")?;
  let call = token.method("_setPendingAdmin", vec![DynSolValue::Address(geoff)])?;
  let invokation = invoke(&world, &token, call, root, &REPORTER).await?;
  assert!(matches!(
    invokation.error,
    Some(InvokationError::Failure { ref error, ref info, .. })
      if error == "UNAUTHORIZED" && info == "SET_PENDING_ADMIN_OWNER_CHECK"
  ));

  let approve = token.method(
    "approve",
    vec![
      DynSolValue::Address(geoff),
      DynSolValue::Uint(U256::from(5u64), 256),
    ],
  )?;
  let ok = invoke(&world, &token, approve, root, &NO_ERROR_REPORTER).await?;
  assert!(ok.succeeded());
  assert_eq!(chain.sent(token.address, "approve(address,uint256)")?.len(), 1);
  Ok(())
}

#[tokio::test]
async fn dry_run_sends_nothing() -> Result<()> {
  let chain = Arc::new(MemoryChain::new());
  let world = world(chain.clone())?.set_dry_run(true);
  let root = world.default_from().expect("root");
  let abi = Arc::new(Abi::parse(&TOKEN_ABI)?);
  let deployed = deploy(&world, root, "Token", vec![], abi).await?;
  assert!(deployed.invokation.dry_run);
  let call = deployed.contract.method("totalSupply", vec![])?;
  let invokation =
    invoke(&world, &deployed.contract, call, root, &NO_ERROR_REPORTER).await?;
  assert!(invokation.dry_run && invokation.succeeded());
  assert!(chain.transactions()?.is_empty());
  assert!(chain.deployments()?.is_empty());
  Ok(())
}
