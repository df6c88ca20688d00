//! # Zip Node
//!
//! Lockstep synchronizer over several inputs.
//!
//! ## Behavior
//!
//! Each input has its own FIFO buffer. Whenever every buffer holds a value, one
//! value is taken from each, in input order, and emitted as a group. Merge
//! capabilities are not consulted; use [`Stream::merge`] to fold rounds.
//!
//! An input that runs ahead by more than `maxsize` values is suspended until the
//! next round completes.

use super::lockstep::Lockstep;
use crate::error::Result;
use crate::node::{Node, NodeId, Stream};
use crate::value::Item;
use async_trait::async_trait;
use std::sync::Arc;

/// Emits one group per round of values from all inputs.
pub struct ZipNode {
  rounds: Lockstep,
}

impl ZipNode {
  /// Creates a zip node over `inputs` edges.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`](crate::StreamError::InvalidArgument)
  /// if `maxsize` is zero.
  pub fn new(inputs: usize, maxsize: usize) -> Result<Self> {
    Ok(Self {
      rounds: Lockstep::new("zip", inputs, maxsize)?,
    })
  }

  /// Number of values buffered per input.
  pub fn depths(&self) -> Vec<usize> {
    self.rounds.depths()
  }
}

#[async_trait]
impl Node for ZipNode {
  fn kind(&self) -> &'static str {
    "zip"
  }

  async fn update(&self, stream: &Stream, item: Item, from: NodeId) -> Result<()> {
    let index = stream.input_index(from)?;
    let Some(round) = self.rounds.push(index, item).await else {
      return Ok(());
    };
    stream.emit(Arc::new(round)).await
  }
}

impl Stream {
  /// Emits `[a, b, ...]` rounds taking one value from this stream and from each of
  /// `others`.
  ///
  /// Inputs may run ahead by the context's default `maxsize` before they are
  /// suspended.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`](crate::StreamError::InvalidArgument)
  /// if the configured `maxsize` is zero.
  pub fn zip(&self, others: &[&Stream]) -> Result<Stream> {
    let maxsize = self.context().config().default_maxsize;
    self.zip_with_maxsize(others, maxsize)
  }

  /// Like [`Stream::zip`] with an explicit backpressure threshold.
  pub fn zip_with_maxsize(&self, others: &[&Stream], maxsize: usize) -> Result<Stream> {
    let node = ZipNode::new(others.len() + 1, maxsize)?;
    Ok(Stream::join(node, self, others))
  }
}
