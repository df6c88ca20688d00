//! # Merge Node
//!
//! Same lockstep rounds as [`ZipNode`](super::ZipNode), but each round is folded
//! into one value, left to right. Values with a registered merge capability merge
//! themselves; JSON objects are updated key by key with later inputs winning.
//! Anything else fails with [`StreamError::NotMergeable`](crate::StreamError::NotMergeable).

use super::lockstep::Lockstep;
use crate::error::Result;
use crate::node::{Node, NodeId, Stream};
use crate::value::Item;
use async_trait::async_trait;

/// Emits one merged value per round of values from all inputs.
pub struct MergeNode {
  rounds: Lockstep,
}

impl MergeNode {
  /// Creates a merge node over `inputs` edges. Fails if `maxsize` is zero.
  pub fn new(inputs: usize, maxsize: usize) -> Result<Self> {
    Ok(Self {
      rounds: Lockstep::new("merge", inputs, maxsize)?,
    })
  }
}

#[async_trait]
impl Node for MergeNode {
  fn kind(&self) -> &'static str {
    "merge"
  }

  async fn update(&self, stream: &Stream, item: Item, from: NodeId) -> Result<()> {
    let index = stream.input_index(from)?;
    let Some(round) = self.rounds.push(index, item).await else {
      return Ok(());
    };
    let merged = stream.context().registry().merge_all(&stream.name(), round)?;
    stream.emit(merged).await
  }
}

impl Stream {
  /// Merges lockstep rounds from this stream and `others` into single values.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`](crate::StreamError::InvalidArgument)
  /// if the configured `maxsize` is zero.
  pub fn merge(&self, others: &[&Stream]) -> Result<Stream> {
    let maxsize = self.context().config().default_maxsize;
    self.merge_with_maxsize(others, maxsize)
  }

  /// Like [`Stream::merge`] with an explicit backpressure threshold.
  pub fn merge_with_maxsize(&self, others: &[&Stream], maxsize: usize) -> Result<Stream> {
    let node = MergeNode::new(others.len() + 1, maxsize)?;
    Ok(Stream::join(node, self, others))
  }
}
