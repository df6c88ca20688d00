//! # Partition Node
//!
//! Groups consecutive values into fixed-size groups. A trailing partial group
//! stays buffered until it is completed.

use crate::error::{Result, StreamError};
use crate::lock::lock;
use crate::node::{Node, NodeId, Stream};
use crate::value::{Group, Item};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Emits a group every `n` values.
pub struct PartitionNode {
  n: usize,
  buffer: Mutex<Group>,
}

impl PartitionNode {
  /// Creates a partition node.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`] if `n` is zero.
  pub fn new(n: usize) -> Result<Self> {
    if n == 0 {
      return Err(StreamError::InvalidArgument {
        operator: "partition",
        reason: "group size must be at least 1".to_string(),
      });
    }
    Ok(Self {
      n,
      buffer: Mutex::new(Vec::with_capacity(n)),
    })
  }

  /// Number of values waiting for their group to complete.
  pub fn pending(&self) -> usize {
    lock(&self.buffer).len()
  }
}

#[async_trait]
impl Node for PartitionNode {
  fn kind(&self) -> &'static str {
    "partition"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    let full = {
      let mut buffer = lock(&self.buffer);
      buffer.push(item);
      (buffer.len() == self.n).then(|| std::mem::replace(&mut *buffer, Vec::with_capacity(self.n)))
    };
    match full {
      Some(group) => stream.emit(Arc::new(group)).await,
      None => Ok(()),
    }
  }
}

impl Stream {
  /// Emits non-overlapping groups of `n` consecutive values.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`] if `n` is zero.
  pub fn partition(&self, n: usize) -> Result<Stream> {
    Ok(self.pipe(PartitionNode::new(n)?))
  }
}
