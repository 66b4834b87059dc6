//! Contract handles and ABI calls.

use std::fmt;
use std::sync::Arc;

use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt};
use alloy::json_abi::Function;
use alloy::primitives::{hex, Address, Bytes, Selector};
use anyhow::{anyhow, Context, Result};
use itertools::Itertools;

use crate::error::ScenarioError;
use crate::value::Value;

// ============================================================================
// ABI
// ============================================================================

/// Function table parsed from human-readable signatures such as
/// `approve(address,uint256) returns (bool)`.
#[derive(Clone, Debug, Default)]
pub struct Abi {
  signatures: Vec<String>,
  functions: Vec<Function>,
}

impl Abi {
  /// # Errors
  /// A signature does not parse.
  pub fn parse<S: AsRef<str>>(signatures: &[S]) -> Result<Self> {
    let mut abi = Abi::default();
    for signature in signatures {
      let signature = signature.as_ref().trim();
      let function = Function::parse(signature)
        .map_err(|e| anyhow!("invalid signature `{signature}`: {e}"))?;
      abi.signatures.push(signature.to_string());
      abi.functions.push(function);
    }
    Ok(abi)
  }

  /// Union of both tables, keeping the first occurrence of each selector.
  #[must_use]
  pub fn merge(&self, other: &Abi) -> Abi {
    let mut merged = self.clone();
    for (signature, function) in other.signatures.iter().zip(&other.functions) {
      if merged.by_selector(function.selector()).is_none() {
        merged.signatures.push(signature.clone());
        merged.functions.push(function.clone());
      }
    }
    merged
  }

  #[must_use]
  pub fn signatures(&self) -> &[String] {
    &self.signatures
  }

  #[must_use]
  pub fn functions(&self) -> &[Function] {
    &self.functions
  }

  pub fn overloads<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Iterator<Item = &'a Function> + 'a {
    self.functions.iter().filter(move |f| f.name == name)
  }

  #[must_use]
  pub fn by_selector(&self, selector: Selector) -> Option<&Function> {
    self.functions.iter().find(|f| f.selector() == selector)
  }
}

impl PartialEq for Abi {
  fn eq(&self, other: &Self) -> bool {
    self.signatures == other.signatures
  }
}

// ============================================================================
// CONTRACT
// ============================================================================

/// Deployed contract: a name, an address and the ABI used to talk to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Contract {
  pub name: String,
  pub address: Address,
  pub abi: Arc<Abi>,
}

impl Contract {
  #[must_use]
  pub fn new(name: impl Into<String>, address: Address, abi: Arc<Abi>) -> Self {
    Self {
      name: name.into(),
      address,
      abi,
    }
  }

  /// Builds a call to `method`, checking arity and argument types against the
  /// ABI. Overloads are disambiguated by arity, then by type.
  ///
  /// # Errors
  /// * Method not in the ABI
  /// * No overload accepts the arguments
  pub fn method(&self, method: &str, args: Vec<DynSolValue>) -> Result<Call> {
    let candidates = self.abi.overloads(method).collect_vec();
    if candidates.is_empty() {
      return Err(
        ScenarioError::UnknownMethod {
          contract: self.name.clone(),
          method: method.to_string(),
        }
        .into(),
      );
    }
    let by_arity = candidates
      .iter()
      .filter(|f| f.inputs.len() == args.len())
      .collect_vec();
    if by_arity.is_empty() {
      return Err(
        ScenarioError::Arity {
          method: format!("{}.{method}", self.name),
          expected: candidates[0].inputs.len(),
          got: args.len(),
        }
        .into(),
      );
    }
    for function in by_arity {
      if accepts(function, &args)? {
        return Ok(Call {
          function: (*function).clone(),
          args,
        });
      }
    }
    Err(anyhow!(
      "{}.{method}: arguments ({}) do not match the ABI",
      self.name,
      args.iter().map(show_sol).join(", ")
    ))
  }
}

fn accepts(function: &Function, args: &[DynSolValue]) -> Result<bool> {
  for (param, arg) in function.inputs.iter().zip(args) {
    let ty = DynSolType::parse(&param.ty)
      .with_context(|| format!("unsupported type {}", param.ty))?;
    if !ty.matches(arg) {
      return Ok(false);
    }
  }
  Ok(true)
}

/// Encoded function call.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
  pub function: Function,
  pub args: Vec<DynSolValue>,
}

impl Call {
  /// Builds a call from a raw signature, coercing scenario values to the
  /// declared parameter types. Used by `Send`.
  ///
  /// # Errors
  /// * Signature does not parse
  /// * Wrong number of values, or a value does not coerce
  pub fn from_signature(signature: &str, values: &[Value]) -> Result<Self> {
    let function = Function::parse(signature)
      .map_err(|e| anyhow!("invalid signature `{signature}`: {e}"))?;
    if function.inputs.len() != values.len() {
      return Err(
        ScenarioError::Arity {
          method: function.signature(),
          expected: function.inputs.len(),
          got: values.len(),
        }
        .into(),
      );
    }
    let args = function
      .inputs
      .iter()
      .zip(values)
      .map(|(param, value)| value.to_sol(&DynSolType::parse(&param.ty)?))
      .collect::<Result<Vec<_>>>()?;
    Ok(Self { function, args })
  }

  #[must_use]
  pub fn signature(&self) -> String {
    self.function.signature()
  }

  #[must_use]
  pub fn selector(&self) -> Selector {
    self.function.selector()
  }

  /// Selector followed by the ABI encoded arguments.
  ///
  /// # Errors
  /// Arguments do not encode.
  pub fn calldata(&self) -> Result<Bytes> {
    self
      .function
      .abi_encode_input(&self.args)
      .map(Bytes::from)
      .map_err(|e| anyhow!("failed to encode {}: {e}", self.signature()))
  }
}

impl fmt::Display for Call {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}({})",
      self.function.name,
      self.args.iter().map(show_sol).join(", ")
    )
  }
}

/// Human-readable rendering of an ABI value.
#[must_use]
pub fn show_sol(value: &DynSolValue) -> String {
  match value {
    DynSolValue::Bool(b) => b.to_string(),
    DynSolValue::Uint(u, _) => u.to_string(),
    DynSolValue::Int(i, _) => i.to_string(),
    DynSolValue::Address(a) => a.to_string(),
    DynSolValue::String(s) => format!("\"{s}\""),
    DynSolValue::Bytes(b) => hex::encode_prefixed(b),
    DynSolValue::FixedBytes(word, size) => {
      hex::encode_prefixed(&word[..*size])
    }
    DynSolValue::Array(items)
    | DynSolValue::FixedArray(items)
    | DynSolValue::Tuple(items) => {
      format!("[{}]", items.iter().map(show_sol).join(", "))
    }
    other => format!("{other:?}"),
  }
}

/// Decodes calldata against `abi` into `name(arg, ...)`.
///
/// # Errors
/// * Input shorter than a selector or not hex
/// * Selector not in the ABI
/// * Arguments fail to decode
pub fn decode_call(abi: &Abi, input: &str) -> Result<String> {
  let data = hex::decode(input.trim())
    .map_err(|e| anyhow!("invalid calldata `{input}`: {e}"))?;
  if data.len() < 4 {
    return Err(anyhow!("calldata `{input}` is shorter than a selector"));
  }
  let selector = Selector::from_slice(&data[..4]);
  let function = abi
    .by_selector(selector)
    .ok_or_else(|| anyhow!("no function with selector {selector}"))?;
  let types = function
    .inputs
    .iter()
    .map(|p| DynSolType::parse(&p.ty))
    .collect::<std::result::Result<Vec<_>, _>>()?;
  let decoded = DynSolType::Tuple(types)
    .abi_decode_sequence(&data[4..])
    .map_err(|e| anyhow!("failed to decode {}: {e}", function.signature()))?;
  let args = match decoded {
    DynSolValue::Tuple(items) => items,
    other => vec![other],
  };
  Ok(format!(
    "{}({})",
    function.name,
    args.iter().map(show_sol).join(", ")
  ))
}

#[cfg(test)]
mod tests {
  use alloy::primitives::U256;

  use super::*;
  use crate::value::Number;

  fn token() -> Result<Contract> {
    let abi = Abi::parse(&[
      "approve(address spender, uint256 amount) returns (bool)",
      "transfer(address dst, uint256 amount) returns (bool)",
      "balanceOf(address owner) view returns (uint256)",
    ])?;
    Ok(Contract::new("BUM", Address::repeat_byte(1), Arc::new(abi)))
  }

  #[test]
  fn method_checks_arity_and_types() -> Result<()> {
    let bum = token()?;
    let spender = DynSolValue::Address(Address::repeat_byte(2));
    let amount = DynSolValue::Uint(U256::from(5), 256);
    let call = bum.method("approve", vec![spender.clone(), amount.clone()])?;
    assert_eq!(call.signature(), "approve(address,uint256)");

    let err = bum.method("approve", vec![spender.clone()]).unwrap_err();
    assert!(matches!(
      err.downcast_ref::<ScenarioError>(),
      Some(ScenarioError::Arity { expected: 2, got: 1, .. })
    ));
    assert!(bum.method("approve", vec![amount.clone(), spender]).is_err());
    assert!(bum.method("mint", vec![amount]).is_err());
    Ok(())
  }

  #[test]
  fn merge_deduplicates_by_selector() -> Result<()> {
    let a = Abi::parse(&["admin() returns (address)", "_become(address)"])?;
    let b = Abi::parse(&["admin() returns (address)", "mintBUM(uint256)"])?;
    let merged = a.merge(&b);
    assert_eq!(merged.signatures().len(), 3);
    Ok(())
  }

  #[test]
  fn decode_round_trips_calldata() -> Result<()> {
    let bum = token()?;
    let call = bum.method(
      "transfer",
      vec![
        DynSolValue::Address(Address::repeat_byte(3)),
        DynSolValue::Uint(U256::from(42), 256),
      ],
    )?;
    let hex = hex::encode_prefixed(call.calldata()?);
    assert_eq!(
      decode_call(&bum.abi, &hex)?,
      format!("transfer({}, 42)", Address::repeat_byte(3))
    );
    assert!(decode_call(&bum.abi, "0x1234").is_err());
    Ok(())
  }

  #[test]
  fn raw_signature_coerces_values() -> Result<()> {
    let call = Call::from_signature(
      "setFlag(uint256,bool)",
      &[
        Value::Number(Number::from_u64(3)),
        Value::String("false".to_string()),
      ],
    )?;
    assert_eq!(call.to_string(), "setFlag(3, false)");
    assert!(Call::from_signature("setFlag(uint256)", &[]).is_err());
    Ok(())
  }
}
