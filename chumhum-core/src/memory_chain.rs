//! In-process chain for scenario tests
//!
//! [`MemoryChain`] does not execute bytecode. Deployments get deterministic
//! CREATE addresses, transactions are recorded, and call results or send
//! outcomes are stubbed per `(address, signature)`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::Function;
use alloy::primitives::{keccak256, Address, Bytes, Selector, B256, U256};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::chain::{Chain, LogEntry, Receipt};
use crate::contract::Call;

#[derive(Clone, Debug, PartialEq)]
pub struct Deployment {
  pub artifact: String,
  pub deployer: Address,
  pub args: Vec<DynSolValue>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
  pub from: Address,
  pub to: Address,
  pub signature: Option<String>,
  pub args: Vec<DynSolValue>,
  pub data: Bytes,
  pub block_number: u64,
}

/// Stubbed result of sending a transaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SendOutcome {
  pub returns: Vec<DynSolValue>,
  pub revert: Option<String>,
  pub logs: Vec<(String, Vec<(String, DynSolValue)>)>,
}

impl SendOutcome {
  #[must_use]
  pub fn returns(values: Vec<DynSolValue>) -> Self {
    Self {
      returns: values,
      ..Default::default()
    }
  }

  /// Returns an error code as the first output, the way Compound-style
  /// contracts report soft failures.
  #[must_use]
  pub fn error_code(code: u64) -> Self {
    Self::returns(vec![DynSolValue::Uint(U256::from(code), 256)])
  }

  #[must_use]
  pub fn revert(reason: impl Into<String>) -> Self {
    Self {
      revert: Some(reason.into()),
      ..Default::default()
    }
  }

  /// Emits `Failure(error, info, detail)` and returns the error code.
  #[must_use]
  pub fn failure(error: u64, info: u64, detail: u64) -> Self {
    Self::error_code(error).with_log(
      "Failure",
      vec![
        ("error".to_string(), DynSolValue::Uint(U256::from(error), 256)),
        ("info".to_string(), DynSolValue::Uint(U256::from(info), 256)),
        ("detail".to_string(), DynSolValue::Uint(U256::from(detail), 256)),
      ],
    )
  }

  #[must_use]
  pub fn with_log(
    mut self,
    event: &str,
    fields: Vec<(String, DynSolValue)>,
  ) -> Self {
    self.logs.push((event.to_string(), fields));
    self
  }
}

#[derive(Default)]
struct ChainState {
  block: u64,
  nonces: HashMap<Address, u64>,
  artifacts: Option<BTreeSet<String>>,
  deployed: BTreeMap<Address, Deployment>,
  calls: HashMap<(Address, Selector), Vec<DynSolValue>>,
  sends: HashMap<(Address, Selector), SendOutcome>,
  transactions: Vec<Transaction>,
  logs: Vec<LogEntry>,
}

impl ChainState {
  fn next_nonce(&mut self, from: Address) -> u64 {
    let nonce = self.nonces.entry(from).or_default();
    let current = *nonce;
    *nonce += 1;
    current
  }

  fn mine(&mut self, from: Address) -> (B256, u64) {
    let nonce = self.next_nonce(from);
    self.block += 1;
    let mut preimage = from.to_vec();
    preimage.extend_from_slice(&nonce.to_be_bytes());
    (keccak256(preimage), self.block)
  }

  fn execute(
    &mut self,
    from: Address,
    to: Address,
    selector: Option<Selector>,
    tx: Transaction,
  ) -> Receipt {
    let (tx_hash, block_number) = self.mine(from);
    let deployed = self.deployed.contains_key(&to);
    self.transactions.push(Transaction { block_number, ..tx });
    let outcome = selector
      .and_then(|s| self.sends.get(&(to, s)).cloned())
      .unwrap_or_default();
    let revert_reason = if deployed {
      outcome.revert
    } else {
      Some(format!("no contract deployed at {to}"))
    };
    let logs: Vec<LogEntry> = if revert_reason.is_some() {
      vec![]
    } else {
      outcome
        .logs
        .into_iter()
        .map(|(event, fields)| LogEntry {
          address: to,
          event,
          fields,
        })
        .collect()
    };
    self.logs.extend(logs.iter().cloned());
    Receipt {
      tx_hash,
      block_number,
      status: revert_reason.is_none(),
      contract_address: None,
      returns: outcome.returns,
      logs,
      revert_reason,
    }
  }
}

fn selector_of(signature: &str) -> Result<Selector> {
  Function::parse(signature)
    .map(|f| f.selector())
    .map_err(|e| anyhow!("invalid signature `{signature}`: {e}"))
}

#[derive(Default)]
pub struct MemoryChain {
  state: Mutex<ChainState>,
}

impl MemoryChain {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Restricts deployable artifacts, mimicking a build directory.
  ///
  /// # Errors
  /// Chain state poisoned.
  pub fn with_artifacts<I, S>(self, artifacts: I) -> Result<Self>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.state()?.artifacts = Some(artifacts.into_iter().map(Into::into).collect());
    Ok(self)
  }

  fn state(&self) -> Result<MutexGuard<'_, ChainState>> {
    self.state.lock().map_err(|_| anyhow!("chain state poisoned"))
  }

  /// Stubs the outputs of a read-only call.
  ///
  /// # Errors
  /// Invalid signature.
  pub fn stub_call(
    &self,
    address: Address,
    signature: &str,
    returns: Vec<DynSolValue>,
  ) -> Result<()> {
    let selector = selector_of(signature)?;
    self.state()?.calls.insert((address, selector), returns);
    Ok(())
  }

  /// Stubs the outcome of sending a transaction.
  ///
  /// # Errors
  /// Invalid signature.
  pub fn stub_send(
    &self,
    address: Address,
    signature: &str,
    outcome: SendOutcome,
  ) -> Result<()> {
    let selector = selector_of(signature)?;
    self.state()?.sends.insert((address, selector), outcome);
    Ok(())
  }

  /// Records an event as if `address` had emitted it.
  ///
  /// # Errors
  /// Poisoned state.
  pub fn emit(&self, log: LogEntry) -> Result<()> {
    self.state()?.logs.push(log);
    Ok(())
  }

  /// # Errors
  /// Poisoned state.
  pub fn transactions(&self) -> Result<Vec<Transaction>> {
    Ok(self.state()?.transactions.clone())
  }

  /// Transactions sent to `to` calling `signature`, e.g. `"approve(address,uint256)"`.
  ///
  /// # Errors
  /// Poisoned state.
  pub fn sent(&self, to: Address, signature: &str) -> Result<Vec<Transaction>> {
    Ok(
      self
        .transactions()?
        .into_iter()
        .filter(|tx| tx.to == to && tx.signature.as_deref() == Some(signature))
        .collect(),
    )
  }

  /// # Errors
  /// Poisoned state.
  pub fn deployment(&self, address: Address) -> Result<Option<Deployment>> {
    Ok(self.state()?.deployed.get(&address).cloned())
  }

  /// # Errors
  /// Poisoned state.
  pub fn deployments(&self) -> Result<Vec<(Address, Deployment)>> {
    Ok(
      self
        .state()?
        .deployed
        .iter()
        .map(|(address, d)| (*address, d.clone()))
        .collect(),
    )
  }

  /// # Errors
  /// Poisoned state.
  pub fn advance_blocks(&self, blocks: u64) -> Result<u64> {
    let mut state = self.state()?;
    state.block += blocks;
    Ok(state.block)
  }
}

#[async_trait]
impl Chain for MemoryChain {
  async fn deploy(
    &self,
    from: Address,
    artifact: &str,
    args: &[DynSolValue],
  ) -> Result<Receipt> {
    let mut state = self.state()?;
    if let Some(artifacts) = &state.artifacts {
      if !artifacts.contains(artifact) {
        return Err(anyhow!("cannot find contract artifact {artifact}"));
      }
    }
    let address = from.create(state.nonces.get(&from).copied().unwrap_or(0));
    let (tx_hash, block_number) = state.mine(from);
    state.deployed.insert(
      address,
      Deployment {
        artifact: artifact.to_string(),
        deployer: from,
        args: args.to_vec(),
      },
    );
    Ok(Receipt {
      tx_hash,
      block_number,
      status: true,
      contract_address: Some(address),
      returns: vec![],
      logs: vec![],
      revert_reason: None,
    })
  }

  async fn send(&self, from: Address, to: Address, call: &Call) -> Result<Receipt> {
    let tx = Transaction {
      from,
      to,
      signature: Some(call.signature()),
      args: call.args.clone(),
      data: call.calldata()?,
      block_number: 0,
    };
    Ok(self.state()?.execute(from, to, Some(call.selector()), tx))
  }

  async fn send_raw(
    &self,
    from: Address,
    to: Address,
    data: Bytes,
  ) -> Result<Receipt> {
    let selector = (data.len() >= 4).then(|| Selector::from_slice(&data[..4]));
    let tx = Transaction {
      from,
      to,
      signature: None,
      args: vec![],
      data,
      block_number: 0,
    };
    Ok(self.state()?.execute(from, to, selector, tx))
  }

  async fn call(&self, to: Address, call: &Call) -> Result<Vec<DynSolValue>> {
    self
      .state()?
      .calls
      .get(&(to, call.selector()))
      .cloned()
      .ok_or_else(|| anyhow!("no response stubbed for {} at {to}", call.signature()))
  }

  async fn past_events(
    &self,
    address: Address,
    event: &str,
  ) -> Result<Vec<LogEntry>> {
    Ok(
      self
        .state()?
        .logs
        .iter()
        .filter(|log| log.address == address && log.event == event)
        .cloned()
        .collect(),
    )
  }

  async fn block_number(&self) -> Result<u64> {
    Ok(self.state()?.block)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::contract::{Abi, Contract};

  fn root() -> Address {
    Address::with_last_byte(1)
  }

  #[test]
  fn deploy_addresses_follow_sender_nonce() -> Result<()> {
    let chain = MemoryChain::new();
    let first = tokio_test::block_on(chain.deploy(root(), "BUM", &[]))?;
    let second = tokio_test::block_on(chain.deploy(root(), "CHUM", &[]))?;
    assert_eq!(first.contract_address, Some(root().create(0)));
    assert_eq!(second.contract_address, Some(root().create(1)));
    assert_eq!(tokio_test::block_on(chain.block_number())?, 2);
    Ok(())
  }

  #[test]
  fn unknown_artifacts_are_rejected() -> Result<()> {
    let chain = MemoryChain::new().with_artifacts(["BUMScenario"])?;
    assert!(tokio_test::block_on(chain.deploy(root(), "BUM", &[])).is_err());
    assert!(tokio_test::block_on(chain.deploy(root(), "BUMScenario", &[])).is_ok());
    Ok(())
  }

  #[test]
  fn poisoned_state_is_an_error() {
    let chain = MemoryChain::new();
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
      let _guard = chain.state.lock();
      panic!("holding chain state");
    }));
    assert!(chain.stub_call(root(), "admin()", vec![]).is_err());
    assert!(chain.with_artifacts(["BUMScenario"]).is_err());
  }

  #[tokio::test]
  async fn stubbed_sends_and_calls() -> Result<()> {
    let chain = MemoryChain::new();
    let address = chain
      .deploy(root(), "Comptroller", &[])
      .await?
      .contract_address
      .expect("address");
    let abi = Abi::parse(&[
      "_setPendingAdmin(address) returns (uint256)",
      "admin() returns (address)",
    ])?;
    let comptroller = Contract::new("Comptroller", address, Arc::new(abi));
    chain.stub_send(address, "_setPendingAdmin(address)", SendOutcome::failure(1, 2, 0))?;
    chain.stub_call(address, "admin()", vec![DynSolValue::Address(root())])?;

    let call = comptroller.method("_setPendingAdmin", vec![DynSolValue::Address(root())])?;
    let receipt = chain.send(root(), address, &call).await?;
    assert!(receipt.status);
    assert_eq!(receipt.logs[0].event, "Failure");
    assert_eq!(chain.past_events(address, "Failure").await?.len(), 1);
    assert_eq!(chain.sent(address, "_setPendingAdmin(address)")?.len(), 1);

    let admin = comptroller.method("admin", vec![])?;
    assert_eq!(chain.call(address, &admin).await?, vec![DynSolValue::Address(root())]);
    Ok(())
  }

  #[tokio::test]
  async fn sends_to_empty_addresses_revert() -> Result<()> {
    let chain = MemoryChain::new();
    let receipt = chain
      .send_raw(root(), Address::with_last_byte(9), Bytes::from(vec![1, 2, 3, 4]))
      .await?;
    assert!(!receipt.status);
    assert!(receipt.revert_reason.is_some());
    Ok(())
  }
}
