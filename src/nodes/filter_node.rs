//! # Filter Node
//!
//! Forwards values for which a predicate holds and drops the rest. `remove` is the
//! complement.

use crate::error::Result;
use crate::node::{Node, NodeId, Stream};
use crate::value::{Item, downcast_ref};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// Type-erased predicate.
pub type Predicate = Arc<dyn Fn(&Item) -> Result<bool> + Send + Sync>;

/// Emits `x` only when the predicate accepts it.
pub struct FilterNode {
  predicate: Predicate,
}

impl FilterNode {
  /// Creates a filter node.
  pub fn new(predicate: Predicate) -> Self {
    Self { predicate }
  }
}

#[async_trait]
impl Node for FilterNode {
  fn kind(&self) -> &'static str {
    "filter"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    if (self.predicate)(&item)? {
      stream.emit(item).await
    } else {
      Ok(())
    }
  }
}

fn typed<A, P>(operator: &'static str, keep_when: bool, predicate: P) -> Predicate
where
  A: Any + Send + Sync,
  P: Fn(&A) -> bool + Send + Sync + 'static,
{
  Arc::new(move |item: &Item| {
    let value = downcast_ref::<A>(item, operator)?;
    Ok(predicate(value) == keep_when)
  })
}

impl Stream {
  /// Keeps values for which `predicate` returns `true`.
  pub fn filter<A, P>(&self, predicate: P) -> Stream
  where
    A: Any + Send + Sync,
    P: Fn(&A) -> bool + Send + Sync + 'static,
  {
    self.pipe(FilterNode::new(typed("filter", true, predicate)))
  }

  /// Drops values for which `predicate` returns `true`.
  pub fn remove<A, P>(&self, predicate: P) -> Stream
  where
    A: Any + Send + Sync,
    P: Fn(&A) -> bool + Send + Sync + 'static,
  {
    self.pipe(FilterNode::new(typed("remove", false, predicate)))
  }
}
