//! # Sink Node
//!
//! Terminal node that hands every value to a callback and emits nothing. The
//! returned stream can still be renamed or used as the input of further nodes,
//! which will simply never receive anything.
//!
//! Asynchronous callbacks are awaited before the push completes, so a slow sink
//! applies backpressure to everything upstream of it.

use crate::error::{BoxError, Result, StreamError};
use crate::lock::lock;
use crate::node::{Node, NodeId, Stream};
use crate::value::{Item, downcast_ref, group_values};
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use std::any::Any;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Type-erased sink callback.
pub type SinkFn = Arc<dyn Fn(Item) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Calls a callback for every value.
pub struct SinkNode {
  callback: SinkFn,
}

impl SinkNode {
  /// Creates a sink node.
  pub fn new(callback: SinkFn) -> Self {
    Self { callback }
  }
}

#[async_trait]
impl Node for SinkNode {
  fn kind(&self) -> &'static str {
    "sink"
  }

  async fn update(&self, _stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    (self.callback)(item).await
  }
}

/// Shared list filled by [`Stream::sink_to_list`].
#[derive(Clone, Default)]
pub struct SinkList {
  items: Arc<Mutex<Vec<Item>>>,
}

impl SinkList {
  /// Snapshot of everything received so far.
  pub fn items(&self) -> Vec<Item> {
    lock(&self.items).clone()
  }

  /// Snapshot of every received value that is a `T`.
  pub fn values<T>(&self) -> Vec<T>
  where
    T: Any + Clone,
  {
    lock(&self.items)
      .iter()
      .filter_map(|item| item.downcast_ref::<T>().cloned())
      .collect()
  }

  /// Snapshot of every received group whose members are all `T`.
  pub fn groups<T>(&self) -> Vec<Vec<T>>
  where
    T: Any + Clone,
  {
    lock(&self.items)
      .iter()
      .filter_map(|item| group_values::<T>(item).ok())
      .collect()
  }

  /// Number of values received.
  pub fn len(&self) -> usize {
    lock(&self.items).len()
  }

  /// Returns `true` if nothing was received.
  pub fn is_empty(&self) -> bool {
    lock(&self.items).is_empty()
  }

  /// Forgets everything received so far.
  pub fn clear(&self) {
    lock(&self.items).clear();
  }

  fn push(&self, item: Item) {
    lock(&self.items).push(item);
  }
}

impl Stream {
  /// Calls `f` for every value.
  pub fn sink<A, F>(&self, f: F) -> Stream
  where
    A: Any + Send + Sync,
    F: Fn(&A) + Send + Sync + 'static,
  {
    self.try_sink(move |value: &A| {
      f(value);
      Ok::<(), StreamError>(())
    })
  }

  /// Calls a fallible `f` for every value; errors abort the push.
  pub fn try_sink<A, E, F>(&self, f: F) -> Stream
  where
    A: Any + Send + Sync,
    E: Into<BoxError>,
    F: Fn(&A) -> Result<(), E> + Send + Sync + 'static,
  {
    let callback: SinkFn = Arc::new(move |item: Item| {
      let outcome = downcast_ref::<A>(&item, "sink")
        .and_then(|value| f(value).map_err(StreamError::user));
      future::ready(outcome).boxed()
    });
    self.pipe(SinkNode::new(callback))
  }

  /// Awaits `f` for every value before the push completes.
  pub fn sink_async<F, Fut>(&self, f: F) -> Stream
  where
    F: Fn(Item) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
  {
    let callback: SinkFn = Arc::new(move |item: Item| f(item).boxed());
    self.pipe(SinkNode::new(callback))
  }

  /// Collects every value into a shared list.
  pub fn sink_to_list(&self) -> SinkList {
    let list = SinkList::default();
    let target = list.clone();
    let callback: SinkFn = Arc::new(move |item: Item| {
      target.push(item);
      future::ready(Ok(())).boxed()
    });
    self.pipe(SinkNode::new(callback));
    list
  }
}
