//! Chain abstraction
//!
//! Everything the scenario engine needs from a network: deploy an artifact,
//! send a transaction, make a read-only call, and query past events.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, B256};
use anyhow::Result;
use async_trait::async_trait;

use crate::contract::Call;

/// Event emitted by a contract.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
  pub address: Address,
  pub event: String,
  pub fields: Vec<(String, DynSolValue)>,
}

impl LogEntry {
  #[must_use]
  pub fn field(&self, name: &str) -> Option<&DynSolValue> {
    self
      .fields
      .iter()
      .find(|(field, _)| field == name)
      .map(|(_, value)| value)
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
  pub tx_hash: B256,
  pub block_number: u64,
  pub status: bool,
  pub contract_address: Option<Address>,
  pub returns: Vec<DynSolValue>,
  pub logs: Vec<LogEntry>,
  pub revert_reason: Option<String>,
}

/// Network the scenario runs against.
#[async_trait]
pub trait Chain: Send + Sync {
  /// Deploys a compiled artifact by name.
  ///
  /// # Errors
  /// Artifact unknown or deployment rejected.
  async fn deploy(
    &self,
    from: Address,
    artifact: &str,
    args: &[DynSolValue],
  ) -> Result<Receipt>;

  /// Sends a transaction calling an ABI function.
  ///
  /// # Errors
  /// Transport failure. Reverts are reported through the receipt status.
  async fn send(&self, from: Address, to: Address, call: &Call) -> Result<Receipt>;

  /// Sends a transaction with pre-encoded calldata.
  ///
  /// # Errors
  /// Transport failure.
  async fn send_raw(
    &self,
    from: Address,
    to: Address,
    data: Bytes,
  ) -> Result<Receipt>;

  /// Read-only call.
  ///
  /// # Errors
  /// Call reverted or transport failure.
  async fn call(&self, to: Address, call: &Call) -> Result<Vec<DynSolValue>>;

  /// Events named `event` emitted by `address` so far.
  ///
  /// # Errors
  /// Transport failure.
  async fn past_events(
    &self,
    address: Address,
    event: &str,
  ) -> Result<Vec<LogEntry>>;

  /// # Errors
  /// Transport failure.
  async fn block_number(&self) -> Result<u64>;
}

#[async_trait]
impl<T: Chain + ?Sized> Chain for std::sync::Arc<T> {
  async fn deploy(
    &self,
    from: Address,
    artifact: &str,
    args: &[DynSolValue],
  ) -> Result<Receipt> {
    (**self).deploy(from, artifact, args).await
  }

  async fn send(&self, from: Address, to: Address, call: &Call) -> Result<Receipt> {
    (**self).send(from, to, call).await
  }

  async fn send_raw(
    &self,
    from: Address,
    to: Address,
    data: Bytes,
  ) -> Result<Receipt> {
    (**self).send_raw(from, to, data).await
  }

  async fn call(&self, to: Address, call: &Call) -> Result<Vec<DynSolValue>> {
    (**self).call(to, call).await
  }

  async fn past_events(
    &self,
    address: Address,
    event: &str,
  ) -> Result<Vec<LogEntry>> {
    (**self).past_events(address, event).await
  }

  async fn block_number(&self) -> Result<u64> {
    (**self).block_number().await
  }
}
