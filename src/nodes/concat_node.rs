//! # Concat Node
//!
//! Flattens one level: every member of an incoming [`Group`](crate::value::Group)
//! is emitted on its own, in order. An empty group emits nothing.

use crate::error::{Result, StreamError};
use crate::node::{Node, NodeId, Stream};
use crate::value::{Item, as_group};
use async_trait::async_trait;
use std::sync::Arc;

/// Emits the members of each incoming group.
pub struct ConcatNode;

#[async_trait]
impl Node for ConcatNode {
  fn kind(&self) -> &'static str {
    "concat"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    let Some(group) = as_group(&item) else {
      return Err(StreamError::NotIterable {
        node: stream.name(),
      });
    };
    for member in group {
      stream.emit(Arc::clone(member)).await?;
    }
    Ok(())
  }
}

impl Stream {
  /// Emits every member of each incoming group.
  pub fn concat(&self) -> Stream {
    self.pipe(ConcatNode)
  }

  /// Alias of [`Stream::concat`].
  pub fn flatten(&self) -> Stream {
    self.concat()
  }
}
