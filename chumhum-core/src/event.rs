//! Scenario events
//!
//! An event is the parsed form of one scenario line: a tree of atoms and
//! parenthesized lists. `Comptroller SetCloseFactor 0.5` parses to a list of
//! three atoms; `(Exp 1.5)` nests a list.

use std::fmt;

use anyhow::Result;

use crate::error::ScenarioError;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
  Atom(String),
  List(Vec<Event>),
}

impl Event {
  #[must_use]
  pub fn atom(s: impl Into<String>) -> Self {
    Event::Atom(s.into())
  }

  #[must_use]
  pub fn empty() -> Self {
    Event::List(vec![])
  }

  /// Builds a list event from whitespace separated atoms.
  #[must_use]
  pub fn words(s: &str) -> Self {
    Event::List(s.split_whitespace().map(Event::atom).collect())
  }

  #[must_use]
  pub fn as_atom(&self) -> Option<&str> {
    match self {
      Event::Atom(s) => Some(s),
      Event::List(_) => None,
    }
  }

  /// Elements of a list event, or the atom itself as a one element slice.
  #[must_use]
  pub fn elements(&self) -> &[Event] {
    match self {
      Event::Atom(_) => std::slice::from_ref(self),
      Event::List(items) => items,
    }
  }

  #[must_use]
  pub fn into_elements(self) -> Vec<Event> {
    match self {
      Event::Atom(_) => vec![self],
      Event::List(items) => items,
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    matches!(self, Event::List(items) if items.is_empty())
  }

  /// First atom of the event, which names the verb in most positions.
  #[must_use]
  pub fn name(&self) -> Option<&str> {
    self.elements().first().and_then(Event::as_atom)
  }

  /// Unwraps single element lists, `((Exp 1))` reads as `(Exp 1)`.
  #[must_use]
  pub fn unwrap_single(self) -> Self {
    match self {
      Event::List(mut items) if items.len() == 1 => {
        items.pop().map_or(Event::empty(), Event::unwrap_single)
      }
      other => other,
    }
  }
}

impl From<&str> for Event {
  fn from(s: &str) -> Self {
    Event::atom(s)
  }
}

impl fmt::Display for Event {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Event::Atom(s) if needs_quotes(s) => {
        write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
      }
      Event::Atom(s) => f.write_str(s),
      Event::List(items) => {
        f.write_str("(")?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            f.write_str(" ")?;
          }
          write!(f, "{item}")?;
        }
        f.write_str(")")
      }
    }
  }
}

fn needs_quotes(s: &str) -> bool {
  s.is_empty()
    || s.chars().any(|c| {
      c.is_whitespace() || matches!(c, '(' | ')' | ',' | '"' | '\\')
    })
    || s.starts_with("--")
}

// ============================================================================
// PARSER
// ============================================================================

/// Parses a single scenario line into a list event.
///
/// # Errors
/// * Unbalanced parentheses
/// * Unterminated string literal
pub fn parse_event(line: &str) -> Result<Event> {
  parse_line(line, 1)
}

/// Parses a scenario script, one event per non-blank line. `--` starts a
/// comment that runs to the end of the line.
///
/// # Errors
/// Returns the first line that fails to parse.
pub fn parse_script(script: &str) -> Result<Vec<Event>> {
  script
    .lines()
    .enumerate()
    .map(|(i, line)| parse_line(line, i + 1))
    .filter(|parsed| !matches!(parsed, Ok(event) if event.is_empty()))
    .collect()
}

fn parse_line(line: &str, line_no: usize) -> Result<Event> {
  let err = |reason: &str| ScenarioError::Parse {
    line: line_no,
    reason: reason.to_string(),
  };
  let mut stack: Vec<Vec<Event>> = vec![vec![]];
  let mut chars = line.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      c if c.is_whitespace() || c == ',' => {}
      '-' if chars.peek() == Some(&'-') => break,
      '(' => stack.push(vec![]),
      ')' => {
        let list = stack.pop().ok_or_else(|| err("unexpected `)`"))?;
        stack
          .last_mut()
          .ok_or_else(|| err("unexpected `)`"))?
          .push(Event::List(list));
      }
      '"' => {
        let mut s = String::new();
        loop {
          match chars.next() {
            Some('"') => break,
            Some('\\') => {
              s.push(chars.next().ok_or_else(|| err("dangling escape"))?);
            }
            Some(c) => s.push(c),
            None => return Err(err("unterminated string").into()),
          }
        }
        push_atom(&mut stack, s);
      }
      c => {
        let mut s = String::from(c);
        while let Some(&next) = chars.peek() {
          if next.is_whitespace() || matches!(next, '(' | ')' | ',' | '"') {
            break;
          }
          s.push(next);
          chars.next();
        }
        push_atom(&mut stack, s);
      }
    }
  }
  match (stack.pop(), stack.is_empty()) {
    (Some(items), true) => Ok(Event::List(items)),
    _ => Err(err("unclosed `(`").into()),
  }
}

fn push_atom(stack: &mut [Vec<Event>], s: String) {
  if let Some(top) = stack.last_mut() {
    top.push(Event::Atom(s));
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;

  #[test]
  fn parses_nested_lists() -> Result<()> {
    let event = parse_event("Comptroller SetCloseFactor (Exp 0.5)")?;
    assert_eq!(
      event,
      Event::List(vec![
        Event::atom("Comptroller"),
        Event::atom("SetCloseFactor"),
        Event::List(vec![Event::atom("Exp"), Event::atom("0.5")]),
      ])
    );
    Ok(())
  }

  #[test]
  fn commas_separate_and_strings_group() -> Result<()> {
    let event = parse_event(r#"Print "hello, world" (1e18,2e18)"#)?;
    assert_eq!(event.elements()[1], Event::atom("hello, world"));
    assert_eq!(event.elements()[2].elements().len(), 2);
    Ok(())
  }

  #[test]
  fn comments_and_blank_lines_are_skipped() -> Result<()> {
    let events = parse_script(
      "-- deploy the token\n\nBUM Deploy -- trailing\n  \nBUM Faucet Geoff 1e18\n",
    )?;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], Event::words("BUM Deploy"));
    Ok(())
  }

  #[test]
  fn unbalanced_lines_report_line_number() {
    let err = parse_script("BUM Deploy\nRead (BUM Address").unwrap_err();
    assert_eq!(
      err.downcast_ref::<ScenarioError>(),
      Some(&ScenarioError::Parse {
        line: 2,
        reason: "unclosed `(`".to_string()
      })
    );
    assert!(parse_event("Read )").is_err());
    assert!(parse_event("Print \"open").is_err());
  }

  #[test]
  fn display_quotes_when_needed() {
    let event = Event::List(vec![
      Event::atom("Print"),
      Event::atom("two words"),
      Event::List(vec![Event::atom("Exp"), Event::atom("1")]),
    ]);
    assert_eq!(event.to_string(), r#"(Print "two words" (Exp 1))"#);
  }

  fn arb_event() -> impl Strategy<Value = Event> {
    let leaf = "[A-Za-z0-9_.%]{1,8}".prop_map(Event::Atom);
    leaf.prop_recursive(3, 24, 4, |inner| {
      prop::collection::vec(inner, 0..4).prop_map(Event::List)
    })
  }

  proptest! {
    #[test]
    fn rendered_events_parse_back(items in prop::collection::vec(arb_event(), 0..5)) {
      let event = Event::List(items);
      let rendered = event.to_string();
      let inner = &rendered[1..rendered.len() - 1];
      prop_assert_eq!(parse_event(inner).unwrap(), event);
    }

    #[test]
    fn parser_never_panics(line in ".{0,40}") {
      let _ = parse_event(&line);
    }
  }
}
