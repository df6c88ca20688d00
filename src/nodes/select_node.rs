//! # Select Node
//!
//! Reshapes every incoming [`Document`] with a list of [`Selector`]s. Values of
//! other types are rejected with a type mismatch.

use crate::document::{Document, Selector};
use crate::error::Result;
use crate::node::{Node, NodeId, Stream};
use crate::value::{Item, downcast_ref};
use async_trait::async_trait;
use std::sync::Arc;

/// Emits `doc.select(selectors)` for every document.
pub struct SelectNode {
  selectors: Vec<Selector>,
}

impl SelectNode {
  /// Creates a select node.
  pub fn new(selectors: Vec<Selector>) -> Self {
    Self { selectors }
  }
}

#[async_trait]
impl Node for SelectNode {
  fn kind(&self) -> &'static str {
    "select"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    let selected = downcast_ref::<Document>(&item, "select")?.select(&self.selectors)?;
    stream.emit(Arc::new(selected)).await
  }
}

impl Stream {
  /// Remaps the fields of every document.
  pub fn select<I>(&self, selectors: I) -> Stream
  where
    I: IntoIterator<Item = Selector>,
  {
    self.pipe(SelectNode::new(selectors.into_iter().collect()))
  }

  /// Parses textual selectors and remaps the fields of every document.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::MalformedSelector`](crate::StreamError::MalformedSelector)
  /// if any spec is invalid; nothing is wired in that case.
  pub fn select_specs(&self, specs: &[&str]) -> Result<Stream> {
    let selectors = specs
      .iter()
      .map(|spec| Selector::parse(spec))
      .collect::<Result<Vec<_>>>()?;
    Ok(self.select(selectors))
  }
}
