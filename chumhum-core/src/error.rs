use thiserror::Error;

/// Failures raised by the scenario engine itself, as opposed to transport or
/// contract failures which surface through [`crate::invokation::Invokation`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScenarioError {
  #[error("parse error on line {line}: {reason}")]
  Parse { line: usize, reason: String },
  #[error("unhandled {kind} command `{event}`\n\navailable:\n{available}")]
  UnknownCommand {
    kind: String,
    event: String,
    available: String,
  },
  #[error("missing argument `{arg}` when processing {command}")]
  MissingArgument { arg: String, command: String },
  #[error("found extra args `{extra}` when processing {command}")]
  ExtraArguments { extra: String, command: String },
  #[error("argument `{arg}` is not a {expected}")]
  ArgumentType { arg: String, expected: String },
  #[error("expected {expected}, got `{got}`")]
  InvalidValue { expected: String, got: String },
  #[error("lookup failed for {path}: {reason}")]
  Lookup { path: String, reason: String },
  #[error("{method}: expected {expected} argument(s), got {got}")]
  Arity {
    method: String,
    expected: usize,
    got: usize,
  },
  #[error("{contract} has no method `{method}`")]
  UnknownMethod { contract: String, method: String },
  #[error("invokation failed: {0}")]
  InvokationFailed(String),
  #[error("assertion failed: {0}")]
  Assertion(String),
}
