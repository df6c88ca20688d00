//! # Union Node
//!
//! Forwards every value from any of its inputs as soon as it arrives. No ordering
//! is imposed across inputs.

use crate::error::Result;
use crate::node::{Node, NodeId, Stream};
use crate::value::Item;
use async_trait::async_trait;

/// Pass-through over several inputs.
pub struct UnionNode;

#[async_trait]
impl Node for UnionNode {
  fn kind(&self) -> &'static str {
    "union"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    stream.emit(item).await
  }
}

impl Stream {
  /// Interleaves this stream with `others` in arrival order.
  pub fn union(&self, others: &[&Stream]) -> Stream {
    Stream::join(UnionNode, self, others)
  }
}
