//! Sending transactions and interpreting their outcome.

use std::fmt;
use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{keccak256, Address, U256};
use anyhow::{anyhow, Result};
use itertools::Itertools;
use tracing::{debug, info};

use crate::chain::Receipt;
use crate::contract::{show_sol, Abi, Call, Contract};
use crate::value::{Number, Value};
use crate::world::World;

// ============================================================================
// ERROR REPORTER
// ============================================================================

/// Maps a contract family's numeric error and info codes to their names.
#[derive(Clone, Copy, Debug)]
pub struct ErrorReporter {
  pub family: &'static str,
  pub errors: &'static [&'static str],
  pub infos: &'static [&'static str],
}

/// Reporter for contracts that do not use error codes.
pub const NO_ERROR_REPORTER: ErrorReporter = ErrorReporter {
  family: "None",
  errors: &[],
  infos: &[],
};

impl ErrorReporter {
  #[must_use]
  pub fn has_codes(&self) -> bool {
    !self.errors.is_empty()
  }

  #[must_use]
  pub fn error(&self, code: U256) -> String {
    lookup_name(self.errors, code)
  }

  #[must_use]
  pub fn info(&self, code: U256) -> String {
    lookup_name(self.infos, code)
  }

  #[must_use]
  pub fn error_code(&self, name: &str) -> Option<usize> {
    self.errors.iter().position(|e| e.eq_ignore_ascii_case(name))
  }
}

fn lookup_name(table: &[&str], code: U256) -> String {
  table
    .iter()
    .enumerate()
    .find(|(i, _)| U256::from(*i) == code)
    .map_or_else(|| format!("UNKNOWN_{code}"), |(_, name)| (*name).to_string())
}

// ============================================================================
// INVOKATION
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvokationError {
  /// Transaction reverted.
  Revert { method: String, reason: String },
  /// Transaction succeeded but the contract reported an error code.
  Failure {
    method: String,
    error: String,
    info: String,
    detail: U256,
  },
}

impl fmt::Display for InvokationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InvokationError::Revert { method, reason } => {
        write!(f, "{method} reverted: {reason}")
      }
      InvokationError::Failure {
        method,
        error,
        info,
        detail,
      } => write!(f, "{method} failed: {error} ({info}, detail {detail})"),
    }
  }
}

/// Outcome of a single transaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Invokation {
  pub method: String,
  pub returns: Vec<DynSolValue>,
  pub receipt: Option<Receipt>,
  pub error: Option<InvokationError>,
  pub dry_run: bool,
}

impl Invokation {
  #[must_use]
  pub fn dry(method: impl Into<String>) -> Self {
    Self {
      method: method.into(),
      dry_run: true,
      ..Default::default()
    }
  }

  #[must_use]
  pub fn succeeded(&self) -> bool {
    self.error.is_none()
  }

  /// First return value of the call.
  #[must_use]
  pub fn value(&self) -> Option<&DynSolValue> {
    self.returns.first()
  }

  /// First return value as a scenario value, `Nothing` when absent.
  ///
  /// # Errors
  /// Value is out of range.
  pub fn value_v(&self) -> Result<Value> {
    self.value().map_or(Ok(Value::Nothing), Value::from_sol)
  }

  /// Fails with the invokation error, if any.
  ///
  /// # Errors
  /// The invokation failed.
  pub fn ensure_success(&self) -> Result<()> {
    match &self.error {
      Some(error) => Err(anyhow!("{error}")),
      None => Ok(()),
    }
  }
}

/// Sends `call` to `contract` and classifies the outcome through `reporter`.
///
/// # Errors
/// Transport failure. Reverts and reported failures are returned inside the
/// [`Invokation`].
pub async fn invoke(
  world: &World,
  contract: &Contract,
  call: Call,
  from: Address,
  reporter: &ErrorReporter,
) -> Result<Invokation> {
  let method = format!("{}.{call}", contract.name);
  if world.dry_run() {
    info!("Dry run: invoking {method} from {}", world.describe_user(from));
    return Ok(Invokation::dry(method));
  }
  debug!(%from, to = %contract.address, "sending {method}");
  let receipt = world.chain().send(from, contract.address, &call).await?;
  Ok(classify(method, receipt, reporter))
}

fn classify(method: String, receipt: Receipt, reporter: &ErrorReporter) -> Invokation {
  let error = if !receipt.status {
    Some(InvokationError::Revert {
      method: method.clone(),
      reason: receipt
        .revert_reason
        .clone()
        .unwrap_or_else(|| "revert".to_string()),
    })
  } else if reporter.has_codes() {
    reported_failure(&method, &receipt, reporter)
  } else {
    None
  };
  Invokation {
    method,
    returns: receipt.returns.clone(),
    receipt: Some(receipt),
    error,
    dry_run: false,
  }
}

fn reported_failure(
  method: &str,
  receipt: &Receipt,
  reporter: &ErrorReporter,
) -> Option<InvokationError> {
  let uint = |v: Option<&DynSolValue>| match v {
    Some(DynSolValue::Uint(u, _)) => *u,
    _ => U256::ZERO,
  };
  if let Some(log) = receipt.logs.iter().find(|log| log.event == "Failure") {
    return Some(InvokationError::Failure {
      method: method.to_string(),
      error: reporter.error(uint(log.field("error"))),
      info: reporter.info(uint(log.field("info"))),
      detail: uint(log.field("detail")),
    });
  }
  match receipt.returns.first() {
    Some(DynSolValue::Uint(code, _)) if !code.is_zero() => {
      Some(InvokationError::Failure {
        method: method.to_string(),
        error: reporter.error(*code),
        info: String::new(),
        detail: U256::ZERO,
      })
    }
    _ => None,
  }
}

// ============================================================================
// DEPLOY
// ============================================================================

pub struct Deployed {
  pub contract: Contract,
  pub invokation: Invokation,
}

/// Deploys `artifact`. In dry-run mode no transaction is sent and the
/// contract gets a placeholder address derived from the artifact name.
///
/// # Errors
/// Transport failure or a deploy receipt without an address.
pub async fn deploy(
  world: &World,
  from: Address,
  artifact: &str,
  args: Vec<DynSolValue>,
  abi: Arc<Abi>,
) -> Result<Deployed> {
  let method = format!("deploy {artifact}");
  if world.dry_run() {
    info!("Dry run: deploying {artifact}");
    let seed = format!("{artifact}:{}", world.actions().len());
    let address = Address::from_word(keccak256(seed.as_bytes()));
    return Ok(Deployed {
      contract: Contract::new(artifact, address, abi),
      invokation: Invokation::dry(method),
    });
  }
  debug!(%from, "deploying {artifact}({})", args.iter().map(show_sol).join(", "));
  let receipt = world.chain().deploy(from, artifact, &args).await?;
  let invokation = classify(method, receipt, &NO_ERROR_REPORTER);
  let address = match (&invokation.error, &invokation.receipt) {
    (None, Some(Receipt { contract_address: Some(address), .. })) => *address,
    (Some(_), _) => Address::ZERO,
    _ => return Err(anyhow!("deploy of {artifact} returned no address")),
  };
  Ok(Deployed {
    contract: Contract::new(artifact, address, abi),
    invokation,
  })
}

// ============================================================================
// READS
// ============================================================================

/// Read-only call returning every output.
///
/// # Errors
/// * Method not in the ABI
/// * Call reverted
pub async fn read(
  world: &World,
  contract: &Contract,
  method: &str,
  args: Vec<DynSolValue>,
) -> Result<Vec<DynSolValue>> {
  let call = contract.method(method, args)?;
  world.chain().call(contract.address, &call).await
}

/// Read-only call returning the first output as a scenario value.
///
/// # Errors
/// Same as [`read`], or the call returned nothing.
pub async fn read_value(
  world: &World,
  contract: &Contract,
  method: &str,
  args: Vec<DynSolValue>,
) -> Result<Value> {
  let outputs = read(world, contract, method, args).await?;
  let first = outputs
    .first()
    .ok_or_else(|| anyhow!("{}.{method} returned nothing", contract.name))?;
  Value::from_sol(first)
}

/// # Errors
/// Same as [`read_value`], or the output is not a number.
pub async fn read_number(
  world: &World,
  contract: &Contract,
  method: &str,
  args: Vec<DynSolValue>,
) -> Result<Number> {
  read_value(world, contract, method, args).await?.as_number()
}

/// # Errors
/// Same as [`read_value`], or the output is not an address.
pub async fn read_address(
  world: &World,
  contract: &Contract,
  method: &str,
  args: Vec<DynSolValue>,
) -> Result<Address> {
  read_value(world, contract, method, args).await?.as_address()
}

/// # Errors
/// Same as [`read_value`], or the output is not a string.
pub async fn read_string(
  world: &World,
  contract: &Contract,
  method: &str,
  args: Vec<DynSolValue>,
) -> Result<String> {
  read_value(world, contract, method, args).await?.as_string()
}

/// # Errors
/// Same as [`read_value`], or the output is not a bool.
pub async fn read_bool(
  world: &World,
  contract: &Contract,
  method: &str,
  args: Vec<DynSolValue>,
) -> Result<bool> {
  read_value(world, contract, method, args).await?.as_bool()
}

#[cfg(test)]
mod tests {
  use alloy::primitives::B256;

  use super::*;
  use crate::chain::LogEntry;

  const REPORTER: ErrorReporter = ErrorReporter {
    family: "Test",
    errors: &["NO_ERROR", "UNAUTHORIZED", "MATH_ERROR"],
    infos: &["ACCEPT_ADMIN_PENDING_ADMIN_CHECK", "SET_PENDING_ADMIN_OWNER_CHECK"],
  };

  fn receipt() -> Receipt {
    Receipt {
      tx_hash: B256::ZERO,
      block_number: 1,
      status: true,
      contract_address: None,
      returns: vec![],
      logs: vec![],
      revert_reason: None,
    }
  }

  #[test]
  fn failure_logs_are_decoded() {
    let mut r = receipt();
    r.logs.push(LogEntry {
      address: Address::ZERO,
      event: "Failure".to_string(),
      fields: vec![
        ("error".to_string(), DynSolValue::Uint(U256::from(1), 256)),
        ("info".to_string(), DynSolValue::Uint(U256::from(1), 256)),
        ("detail".to_string(), DynSolValue::Uint(U256::ZERO, 256)),
      ],
    });
    let invokation = classify("c.m()".to_string(), r, &REPORTER);
    assert_eq!(
      invokation.error,
      Some(InvokationError::Failure {
        method: "c.m()".to_string(),
        error: "UNAUTHORIZED".to_string(),
        info: "SET_PENDING_ADMIN_OWNER_CHECK".to_string(),
        detail: U256::ZERO,
      })
    );
  }

  #[test]
  fn nonzero_return_codes_fail_only_with_a_reporter() {
    let mut r = receipt();
    r.returns.push(DynSolValue::Uint(U256::from(2), 256));
    let failed = classify("c.m()".to_string(), r.clone(), &REPORTER);
    assert!(matches!(
      failed.error,
      Some(InvokationError::Failure { ref error, .. }) if error == "MATH_ERROR"
    ));
    let ok = classify("c.m()".to_string(), r, &NO_ERROR_REPORTER);
    assert!(ok.succeeded());
  }

  #[test]
  fn reverts_carry_the_reason() {
    let mut r = receipt();
    r.status = false;
    r.revert_reason = Some("only admin".to_string());
    let invokation = classify("c.m()".to_string(), r, &NO_ERROR_REPORTER);
    assert_eq!(
      invokation.error.map(|e| e.to_string()),
      Some("c.m() reverted: only admin".to_string())
    );
  }

  #[test]
  fn unknown_codes_are_named() {
    assert_eq!(REPORTER.error(U256::from(99)), "UNKNOWN_99");
    assert_eq!(REPORTER.error_code("math_error"), Some(2));
  }
}
