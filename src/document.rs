//! # Documents and Selectors
//!
//! A [`Document`] carries the inputs and outputs of an analysis step: positional
//! `args`, named `kwargs`, and two JSON maps of metadata (`attributes` travel with
//! the data, `statistics` describe how it was produced).
//!
//! Documents are registered containers: `map` and `scan` see the value returned
//! by [`Document::get_return`] and the result is written back into a document that
//! keeps the original attributes. Empty documents and documents with both
//! positional and named values are handed to functions whole. `merge` and
//! `combine_latest` combine documents with [`Document::merge`].
//!
//! [`Selector`]s reshape a document's fields, e.g. to feed two positional outputs
//! of one step into named inputs of the next:
//!
//! | spec    | meaning                                  |
//! |---------|------------------------------------------|
//! | `"0"`   | positional 0 to the next positional slot |
//! | `"a"`   | keyword `a` to keyword `a`               |
//! | `"a:b"` | keyword `a` to keyword `b`               |
//! | `"a:"`  | keyword `a` to the next positional slot  |
//! | `"1:a"` | positional 1 to keyword `a`              |
//!
//! Positional targets such as `"1:2"` are rejected; order the selectors instead.

use crate::dispatch::{Mergeable, Unwrap};
use crate::error::{Result, StreamError};
use crate::value::{Group, Item, downcast_ref};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Named values of a document.
pub type Kwargs = BTreeMap<String, Item>;

/// Positional and named values plus metadata.
#[derive(Clone, Default)]
pub struct Document {
  args: Vec<Item>,
  kwargs: Kwargs,
  attributes: Map<String, Value>,
  statistics: Map<String, Value>,
}

impl Document {
  /// Creates an empty document.
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a positional value.
  pub fn with_arg(mut self, value: Item) -> Self {
    self.args.push(value);
    self
  }

  /// Sets a named value.
  pub fn with_kwarg(mut self, name: &str, value: Item) -> Self {
    self.kwargs.insert(name.to_string(), value);
    self
  }

  /// Sets an attribute.
  pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
    self.attributes.insert(name.to_string(), value.into());
    self
  }

  /// Appends positional values.
  pub fn add_args<I>(&mut self, values: I) -> &mut Self
  where
    I: IntoIterator<Item = Item>,
  {
    self.args.extend(values);
    self
  }

  /// Inserts named values, replacing existing ones.
  pub fn add_kwargs<I>(&mut self, values: I) -> &mut Self
  where
    I: IntoIterator<Item = (String, Item)>,
  {
    self.kwargs.extend(values);
    self
  }

  /// Inserts attributes, replacing existing ones.
  pub fn add_attributes<I>(&mut self, values: I) -> &mut Self
  where
    I: IntoIterator<Item = (String, Value)>,
  {
    self.attributes.extend(values);
    self
  }

  /// Records a statistic about how the document was produced.
  pub fn set_statistic(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
    self.statistics.insert(name.to_string(), value.into());
    self
  }

  /// Positional values.
  pub fn args(&self) -> &[Item] {
    &self.args
  }

  /// Named values.
  pub fn kwargs(&self) -> &Kwargs {
    &self.kwargs
  }

  /// Attributes.
  pub fn attributes(&self) -> &Map<String, Value> {
    &self.attributes
  }

  /// One attribute.
  pub fn attribute(&self, name: &str) -> Option<&Value> {
    self.attributes.get(name)
  }

  /// Statistics.
  pub fn statistics(&self) -> &Map<String, Value> {
    &self.statistics
  }

  /// Looks up a positional or named value.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::MissingField`] if the document does not carry it.
  pub fn get_positional_or_named(&self, field: &Field) -> Result<Item> {
    let found = match field {
      Field::Position(index) => self.args.get(*index),
      Field::Name(name) => self.kwargs.get(name),
    };
    found.cloned().ok_or_else(|| StreamError::MissingField {
      field: field.to_string(),
    })
  }

  /// What a function producing this document would have returned.
  ///
  /// - exactly one positional value and no named ones: that value
  /// - only named values: the [`Kwargs`] map
  /// - only positional values: them as a [`Group`]
  /// - anything else: the document itself
  pub fn get_return(&self) -> Item {
    match (self.args.len(), self.kwargs.is_empty()) {
      (1, true) => Arc::clone(&self.args[0]),
      (0, false) => Arc::new(self.kwargs.clone()),
      (n, true) if n > 1 => Arc::new(self.args.clone()),
      _ => Arc::new(self.clone()),
    }
  }

  /// Combines this document with `others`, left to right.
  ///
  /// Positional values are appended; named values, attributes and statistics of
  /// later documents replace earlier ones on collision.
  pub fn merge_with(&self, others: &[&Document]) -> Document {
    let mut merged = self.clone();
    for other in others {
      merged.args.extend(other.args.iter().cloned());
      merged.kwargs.extend(other.kwargs.clone());
      merged.attributes.extend(other.attributes.clone());
      merged.statistics.extend(other.statistics.clone());
    }
    merged
  }

  /// Builds a document whose fields are picked by `selectors`, in order.
  ///
  /// Attributes and statistics are kept.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::MissingField`] if a selector names an absent field.
  pub fn select(&self, selectors: &[Selector]) -> Result<Document> {
    let mut selected = Document {
      attributes: self.attributes.clone(),
      statistics: self.statistics.clone(),
      ..Document::default()
    };
    for selector in selectors {
      let value = self.get_positional_or_named(&selector.source)?;
      match &selector.target {
        Target::Next => selected.args.push(value),
        Target::Name(name) => {
          selected.kwargs.insert(name.clone(), value);
        }
      }
    }
    Ok(selected)
  }
}

impl fmt::Debug for Document {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Document")
      .field("args", &self.args.len())
      .field("kwargs", &self.kwargs.keys().collect::<Vec<_>>())
      .field("attributes", &self.attributes)
      .field("statistics", &self.statistics)
      .finish()
  }
}

impl Unwrap for Document {
  /// Empty documents and documents carrying both positional and named values
  /// are handed to functions whole.
  fn payload(&self) -> Option<Item> {
    if self.args.is_empty() == self.kwargs.is_empty() {
      return None;
    }
    Some(self.get_return())
  }

  fn rewrap(&self, payload: Item) -> Self {
    let mut doc = Document {
      attributes: self.attributes.clone(),
      ..Document::default()
    };
    if let Some(kwargs) = payload.downcast_ref::<Kwargs>() {
      doc.kwargs = kwargs.clone();
    } else if let Some(group) = payload.downcast_ref::<Group>() {
      doc.args = group.clone();
    } else {
      doc.args.push(payload);
    }
    doc
  }
}

impl Mergeable for Document {
  fn merge(&self, others: &[Item]) -> Result<Self> {
    let others = others
      .iter()
      .map(|other| downcast_ref::<Document>(other, "merge"))
      .collect::<Result<Vec<_>>>()?;
    Ok(self.merge_with(&others))
  }
}

/// Where a selector reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
  /// A positional value, 0-based.
  Position(usize),
  /// A named value.
  Name(String),
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Field::Position(index) => write!(f, "{index}"),
      Field::Name(name) => f.write_str(name),
    }
  }
}

/// Where a selector writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
  /// The next free positional slot.
  Next,
  /// A named value.
  Name(String),
}

/// One field remapping rule of [`Document::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
  source: Field,
  target: Target,
}

impl Selector {
  /// Creates a rule moving `source` to `target`.
  pub fn new(source: Field, target: Target) -> Self {
    Self { source, target }
  }

  /// Positional `index` to the next positional slot.
  pub fn position(index: usize) -> Self {
    Self::new(Field::Position(index), Target::Next)
  }

  /// Keyword `name` to the same keyword.
  pub fn name(name: &str) -> Self {
    Self::new(Field::Name(name.to_string()), Target::Name(name.to_string()))
  }

  /// Reads from.
  pub fn source(&self) -> &Field {
    &self.source
  }

  /// Writes to.
  pub fn target(&self) -> &Target {
    &self.target
  }

  /// Parses a textual rule (see the module docs).
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::MalformedSelector`] for empty specs, empty sources,
  /// positional targets and specs with more than one `:`.
  pub fn parse(spec: &str) -> Result<Self> {
    let malformed = |reason| StreamError::MalformedSelector {
      spec: spec.to_string(),
      reason,
    };
    let trimmed = spec.trim();
    if trimmed.is_empty() {
      return Err(malformed("empty selector"));
    }

    let (left, right) = match trimmed.split_once(':') {
      Some((left, right)) => (left.trim(), Some(right.trim())),
      None => (trimmed, None),
    };
    if left.is_empty() {
      return Err(malformed("missing source field"));
    }
    let source = match left.parse::<usize>() {
      Ok(index) => Field::Position(index),
      Err(_) => Field::Name(left.to_string()),
    };

    let target = match right {
      None => match &source {
        Field::Position(_) => Target::Next,
        Field::Name(name) => Target::Name(name.clone()),
      },
      Some("") => Target::Next,
      Some(name) if name.contains(':') => return Err(malformed("too many `:` separators")),
      Some(name) if name.parse::<usize>().is_ok() => {
        return Err(malformed("positional targets are not accepted"));
      }
      Some(name) => Target::Name(name.to_string()),
    };
    Ok(Self::new(source, target))
  }
}

impl FromStr for Selector {
  type Err = StreamError;

  fn from_str(spec: &str) -> Result<Self> {
    Selector::parse(spec)
  }
}

impl fmt::Display for Selector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.target {
      Target::Next => write!(f, "{}:", self.source),
      Target::Name(name) => write!(f, "{}:{}", self.source, name),
    }
  }
}
