//! Resolved scenario values.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{Address, Sign, I256, U256, U512};
use anyhow::{anyhow, Result};
use itertools::Itertools;

use crate::error::ScenarioError;
use crate::event::Event;

/// Number of decimals in an `Exp` mantissa.
pub const EXP_SCALE: u32 = 18;

/// Fractional digits kept by parsing, products and quotients. Digits past
/// this are truncated.
pub const MAX_SCALE: u32 = 36;

// ============================================================================
// NUMBER
// ============================================================================

fn widen(n: U256) -> U512 {
  let limbs = n.as_limbs();
  U512::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3], 0, 0, 0, 0])
}

fn narrow(n: U512) -> Option<U256> {
  let limbs = n.as_limbs();
  limbs[4..]
    .iter()
    .all(|limb| *limb == 0)
    .then(|| U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

fn ten_pow(exp: u32) -> U512 {
  U512::from(10u64).pow(U512::from(u64::from(exp)))
}

/// Scenario number: a signed decimal whose magnitude spans the full uint256
/// range with up to [`MAX_SCALE`] fractional digits.
///
/// Always normalized (no trailing fractional zeros, zero is positive), so
/// the derived equality and hash are numeric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Number {
  negative: bool,
  magnitude: U256,
  scale: u32,
}

impl Number {
  pub const ZERO: Number = Number {
    negative: false,
    magnitude: U256::ZERO,
    scale: 0,
  };

  #[must_use]
  pub fn from_u64(n: u64) -> Self {
    Self::from_u256(U256::from(n))
  }

  #[must_use]
  pub fn from_u256(value: U256) -> Self {
    Number {
      negative: false,
      magnitude: value,
      scale: 0,
    }
  }

  #[must_use]
  pub fn from_i256(value: I256) -> Self {
    let (sign, magnitude) = value.into_sign_and_abs();
    Number {
      negative: sign == Sign::Negative && !magnitude.is_zero(),
      magnitude,
      scale: 0,
    }
  }

  /// Builds a normalized number from a wide magnitude, dropping fractional
  /// digits until it fits.
  fn from_wide(negative: bool, mut magnitude: U512, mut scale: u32) -> Result<Self> {
    let ten = U512::from(10u64);
    while scale > MAX_SCALE || (scale > 0 && narrow(magnitude).is_none()) {
      magnitude /= ten;
      scale -= 1;
    }
    let Some(mut magnitude) = narrow(magnitude) else {
      return Err(anyhow!("{magnitude} exceeds the uint256 range"));
    };
    let ten = U256::from(10u64);
    while scale > 0 && (magnitude % ten).is_zero() {
      magnitude /= ten;
      scale -= 1;
    }
    if magnitude.is_zero() {
      return Ok(Self::ZERO);
    }
    Ok(Number {
      negative,
      magnitude,
      scale,
    })
  }

  /// Both magnitudes at the larger of the two scales.
  fn aligned(self, other: Self) -> (U512, U512, u32) {
    let scale = self.scale.max(other.scale);
    (
      widen(self.magnitude) * ten_pow(scale - self.scale),
      widen(other.magnitude) * ten_pow(scale - other.scale),
      scale,
    )
  }

  #[must_use]
  pub fn is_zero(&self) -> bool {
    self.magnitude.is_zero()
  }

  #[must_use]
  pub fn is_negative(&self) -> bool {
    self.negative
  }

  /// `10^exp` as a number.
  ///
  /// # Errors
  /// Exponent exceeds the uint256 range.
  pub fn pow10(exp: u32) -> Result<Self> {
    U256::from(10u64)
      .checked_pow(U256::from(exp))
      .map(Self::from_u256)
      .ok_or_else(|| anyhow!("10^{exp} exceeds the uint256 range"))
  }

  /// Scales by `10^18`, turning `1.5` into the mantissa `1.5e18`.
  ///
  /// # Errors
  /// Result exceeds the uint256 range.
  pub fn exp(self) -> Result<Self> {
    self.mul(Self::pow10(EXP_SCALE)?)
  }

  /// # Errors
  /// Overflow.
  pub fn add(self, other: Self) -> Result<Self> {
    let (a, b, scale) = self.aligned(other);
    if self.negative == other.negative {
      return Self::from_wide(self.negative, a + b, scale)
        .map_err(|e| anyhow!("overflow in {self} + {other}: {e}"));
    }
    match a.cmp(&b) {
      Ordering::Less => Self::from_wide(other.negative, b - a, scale),
      _ => Self::from_wide(self.negative, a - b, scale),
    }
  }

  /// # Errors
  /// Overflow.
  pub fn sub(self, other: Self) -> Result<Self> {
    self.add(other.neg())
  }

  #[must_use]
  fn neg(self) -> Self {
    Number {
      negative: !self.negative && !self.is_zero(),
      ..self
    }
  }

  /// # Errors
  /// Overflow.
  pub fn mul(self, other: Self) -> Result<Self> {
    Self::from_wide(
      self.negative != other.negative,
      widen(self.magnitude) * widen(other.magnitude),
      self.scale + other.scale,
    )
    .map_err(|e| anyhow!("overflow in {self} * {other}: {e}"))
  }

  /// Quotient with [`MAX_SCALE`] fractional digits, truncated.
  ///
  /// # Errors
  /// Division by zero or overflow.
  pub fn div(self, other: Self) -> Result<Self> {
    if other.is_zero() {
      return Err(anyhow!("division by zero in {self} / {other}"));
    }
    let numerator =
      widen(self.magnitude) * ten_pow(other.scale + MAX_SCALE - self.scale);
    Self::from_wide(
      self.negative != other.negative,
      numerator / widen(other.magnitude),
      MAX_SCALE,
    )
    .map_err(|e| anyhow!("overflow in {self} / {other}: {e}"))
  }

  /// Integer part, rounded toward zero.
  fn trunc(self) -> U256 {
    self.magnitude / U256::from(10u64).pow(U256::from(self.scale))
  }

  /// Encodes as a uint256, truncating any fractional part.
  ///
  /// # Errors
  /// Negative numbers cannot be encoded.
  pub fn encode(self) -> Result<U256> {
    if self.negative {
      return Err(
        ScenarioError::InvalidValue {
          expected: "non-negative number".to_string(),
          got: self.to_string(),
        }
        .into(),
      );
    }
    Ok(self.trunc())
  }

  /// Encodes as an int256, truncating any fractional part.
  ///
  /// # Errors
  /// Magnitude does not fit an int256.
  pub fn encode_signed(self) -> Result<I256> {
    let sign = if self.negative { Sign::Negative } else { Sign::Positive };
    I256::checked_from_sign_and_abs(sign, self.trunc())
      .ok_or_else(|| anyhow!("cannot encode {self} as int256"))
  }

  #[must_use]
  pub fn show(&self) -> String {
    let digits = self.magnitude.to_string();
    let scale = self.scale as usize;
    let sign = if self.negative { "-" } else { "" };
    if scale == 0 {
      return format!("{sign}{digits}");
    }
    let digits = format!("{digits:0>width$}", width = scale + 1);
    let (whole, fraction) = digits.split_at(digits.len() - scale);
    format!("{sign}{whole}.{fraction}")
  }
}

impl Ord for Number {
  fn cmp(&self, other: &Self) -> Ordering {
    match (self.negative, other.negative) {
      (false, true) => Ordering::Greater,
      (true, false) => Ordering::Less,
      (negative, _) => {
        let (a, b, _) = self.aligned(*other);
        if negative { b.cmp(&a) } else { a.cmp(&b) }
      }
    }
  }
}

impl PartialOrd for Number {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl fmt::Display for Number {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.show())
  }
}

/// Plain or scientific notation: `12`, `-0.5`, `1.5e18`, `1_000`, `5e-1`.
impl FromStr for Number {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim().replace('_', "");
    let invalid = || -> anyhow::Error {
      ScenarioError::InvalidValue {
        expected: "number".to_string(),
        got: s.clone(),
      }
      .into()
    };
    let (negative, unsigned) = match s.strip_prefix('-') {
      Some(rest) => (true, rest),
      None => (false, s.strip_prefix('+').unwrap_or(s.as_str())),
    };
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
      Some((mantissa, exponent)) => {
        (mantissa, exponent.parse::<i64>().map_err(|_| invalid())?)
      }
      None => (unsigned, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{whole}{fraction}");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
      return Err(invalid());
    }
    let magnitude = U512::from_str_radix(&digits, 10)
      .map_err(|_| anyhow!("{s} exceeds the uint256 range"))?;
    let scale = i64::try_from(fraction.len()).map_err(|_| invalid())? - exponent;
    if scale >= 0 {
      let scale = u32::try_from(scale).map_err(|_| invalid())?;
      if scale > MAX_SCALE + 154 {
        return Ok(Self::ZERO);
      }
      return Self::from_wide(negative, magnitude, scale);
    }
    let magnitude = u32::try_from(-scale)
      .ok()
      .filter(|shift| *shift <= 154)
      .and_then(|shift| magnitude.checked_mul(ten_pow(shift)))
      .ok_or_else(|| anyhow!("{s} exceeds the uint256 range"))?;
    Self::from_wide(negative, magnitude, 0)
  }
}

impl From<u64> for Number {
  fn from(n: u64) -> Self {
    Number::from_u64(n)
  }
}

impl From<U256> for Number {
  fn from(n: U256) -> Self {
    Number::from_u256(n)
  }
}

// ============================================================================
// VALUE
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
  Nothing,
  Bool(bool),
  Number(Number),
  String(String),
  Address(Address),
  Event(Event),
  List(Vec<Value>),
}

impl Value {
  #[must_use]
  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Nothing => "nothing",
      Value::Bool(_) => "bool",
      Value::Number(_) => "number",
      Value::String(_) => "string",
      Value::Address(_) => "address",
      Value::Event(_) => "event",
      Value::List(_) => "list",
    }
  }

  #[must_use]
  pub fn show(&self) -> String {
    match self {
      Value::Nothing => "Nothing".to_string(),
      Value::Bool(b) => b.to_string(),
      Value::Number(n) => n.show(),
      Value::String(s) => s.clone(),
      Value::Address(a) => a.to_string(),
      Value::Event(e) => e.to_string(),
      Value::List(items) => {
        format!("[{}]", items.iter().map(Value::show).join(", "))
      }
    }
  }

  fn mismatch(&self, expected: &str) -> anyhow::Error {
    ScenarioError::InvalidValue {
      expected: expected.to_string(),
      got: format!("{} {}", self.type_name(), self.show()),
    }
    .into()
  }

  /// # Errors
  /// Value is not a number.
  pub fn as_number(&self) -> Result<Number> {
    match self {
      Value::Number(n) => Ok(*n),
      other => Err(other.mismatch("number")),
    }
  }

  /// # Errors
  /// Value is not an address.
  pub fn as_address(&self) -> Result<Address> {
    match self {
      Value::Address(a) => Ok(*a),
      other => Err(other.mismatch("address")),
    }
  }

  /// # Errors
  /// Value is not a string.
  pub fn as_string(&self) -> Result<String> {
    match self {
      Value::String(s) => Ok(s.clone()),
      other => Err(other.mismatch("string")),
    }
  }

  /// # Errors
  /// Value is not a bool.
  pub fn as_bool(&self) -> Result<bool> {
    match self {
      Value::Bool(b) => Ok(*b),
      other => Err(other.mismatch("bool")),
    }
  }

  /// Compares values the way scenario assertions expect: numbers by
  /// magnitude, everything else structurally.
  #[must_use]
  pub fn compare(&self, other: &Value) -> bool {
    match (self, other) {
      (Value::Number(a), Value::Number(b)) => a == b,
      (Value::List(a), Value::List(b)) => {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.compare(y))
      }
      (Value::String(a), Value::Address(b))
      | (Value::Address(b), Value::String(a)) => {
        Address::from_str(a).is_ok_and(|a| a == *b)
      }
      (a, b) => a == b,
    }
  }

  /// Coerces the value to a Solidity ABI type.
  ///
  /// # Errors
  /// The value has no representation in `ty`.
  pub fn to_sol(&self, ty: &DynSolType) -> Result<DynSolValue> {
    let coerced = match (ty, self) {
      (DynSolType::Uint(size), Value::Number(n)) => {
        DynSolValue::Uint(n.encode()?, *size)
      }
      (DynSolType::Int(size), Value::Number(n)) => {
        DynSolValue::Int(n.encode_signed()?, *size)
      }
      (DynSolType::Address, Value::Address(a)) => DynSolValue::Address(*a),
      (DynSolType::Bool, Value::Bool(b)) => DynSolValue::Bool(*b),
      (DynSolType::String, Value::String(s)) => DynSolValue::String(s.clone()),
      (DynSolType::Array(inner), Value::List(items)) => DynSolValue::Array(
        items
          .iter()
          .map(|item| item.to_sol(inner))
          .collect::<Result<_>>()?,
      ),
      (ty, Value::String(s)) => ty
        .coerce_str(s)
        .map_err(|e| anyhow!("cannot coerce `{s}` to {}: {e}", ty.sol_type_name()))?,
      (ty, other) => return Err(other.mismatch(&ty.sol_type_name())),
    };
    Ok(coerced)
  }

  /// Converts a decoded ABI value into a scenario value.
  ///
  /// # Errors
  /// A nested element fails to convert.
  pub fn from_sol(value: &DynSolValue) -> Result<Value> {
    let converted = match value {
      DynSolValue::Bool(b) => Value::Bool(*b),
      DynSolValue::Uint(u, _) => Value::Number(Number::from_u256(*u)),
      DynSolValue::Int(i, _) => Value::Number(Number::from_i256(*i)),
      DynSolValue::Address(a) => Value::Address(*a),
      DynSolValue::String(s) => Value::String(s.clone()),
      DynSolValue::Array(items)
      | DynSolValue::FixedArray(items)
      | DynSolValue::Tuple(items) => {
        Value::List(items.iter().map(Value::from_sol).collect::<Result<_>>()?)
      }
      other => Value::String(format!("{other:?}")),
    };
    Ok(converted)
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.show())
  }
}

impl From<Number> for Value {
  fn from(n: Number) -> Self {
    Value::Number(n)
  }
}

impl From<Address> for Value {
  fn from(a: Address) -> Self {
    Value::Address(a)
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Value::Bool(b)
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::String(s)
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;

  #[test]
  fn parses_scientific_notation() -> Result<()> {
    assert_eq!("1.5e18".parse::<Number>()?.encode()?, U256::from(1_500_000_000_000_000_000u128));
    assert_eq!("5e-1".parse::<Number>()?.show(), "0.5");
    assert_eq!("1_000".parse::<Number>()?, Number::from_u64(1000));
    assert!("abc".parse::<Number>().is_err());
    Ok(())
  }

  #[test]
  fn encode_truncates_and_rejects_negatives() -> Result<()> {
    assert_eq!("2.9".parse::<Number>()?.encode()?, U256::from(2));
    assert!("-1".parse::<Number>()?.encode().is_err());
    Ok(())
  }

  #[test]
  fn exp_scales_by_1e18() -> Result<()> {
    let n = "0.5".parse::<Number>()?.exp()?;
    assert_eq!(n.encode()?, U256::from(500_000_000_000_000_000u128));
    Ok(())
  }

  #[test]
  fn full_uint256_range_round_trips() -> Result<()> {
    let max = Number::from_u256(U256::MAX);
    assert_eq!(max.encode()?, U256::MAX);
    assert_eq!(max.show().parse::<Number>()?, max);
    assert_eq!(Value::from_sol(&DynSolValue::Uint(U256::MAX, 256))?, Value::Number(max));
    assert!(max.add(Number::from_u64(1)).is_err());
    assert!("1e78".parse::<Number>().is_err());
    Ok(())
  }

  #[test]
  fn large_exponents_stay_exact() -> Result<()> {
    let index = "1e36".parse::<Number>()?;
    assert_eq!(index.encode()?, U256::from(10u64).pow(U256::from(36)));
    assert_eq!("1e30".parse::<Number>()?, Number::pow10(30)?);
    assert_eq!("1e12".parse::<Number>()?.exp()?, Number::pow10(30)?);
    let half = index.div(Number::from_u64(2))?;
    assert_eq!(half.encode()?, U256::from(5u64) * U256::from(10u64).pow(U256::from(35)));
    Ok(())
  }

  #[test]
  fn signed_arithmetic_and_fractions() -> Result<()> {
    let a = "-1.25".parse::<Number>()?;
    let b = "0.75".parse::<Number>()?;
    assert_eq!(a.add(b)?.show(), "-0.5");
    assert_eq!(b.sub(a)?.show(), "2");
    assert_eq!(a.mul(b)?.show(), "-0.9375");
    assert_eq!(Number::from_u64(1).div(Number::from_u64(3))?.show(), format!("0.{}", "3".repeat(36)));
    assert!(a < b);
    assert_eq!(a.encode_signed()?, I256::MINUS_ONE);
    assert_eq!(Value::from_sol(&DynSolValue::Int(I256::MINUS_ONE, 256))?, Value::Number("-1".parse()?));
    Ok(())
  }

  #[test]
  fn division_by_zero_fails() {
    assert!(Number::from_u64(1).div(Number::ZERO).is_err());
  }

  #[test]
  fn compare_numbers_by_magnitude() {
    let a = Value::Number(Number::from_str("1.0").expect("number"));
    let b = Value::Number(Number::from_u64(1));
    assert!(a.compare(&b));
    assert!(!a.compare(&Value::Bool(true)));
  }

  #[test]
  fn to_sol_coerces_strings_and_lists() -> Result<()> {
    let list = Value::List(vec![Value::Number(Number::from_u64(1))]);
    let ty = DynSolType::parse("uint256[]")?;
    assert_eq!(
      list.to_sol(&ty)?,
      DynSolValue::Array(vec![DynSolValue::Uint(U256::from(1), 256)])
    );
    let flag = Value::String("true".to_string()).to_sol(&DynSolType::Bool)?;
    assert_eq!(flag, DynSolValue::Bool(true));
    assert!(Value::Bool(true).to_sol(&DynSolType::Address).is_err());
    Ok(())
  }

  proptest! {
    #[test]
    fn u128_values_encode_exactly(n in 0u64..u64::MAX, scale in 0u32..10) {
      let number = Number::from_u64(n).mul(Number::pow10(scale).unwrap()).unwrap();
      let expected = U256::from(n) * U256::from(10u64).pow(U256::from(scale));
      prop_assert_eq!(number.encode().unwrap(), expected);
    }
  }
}
