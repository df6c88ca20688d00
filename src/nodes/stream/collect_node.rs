//! # Collect Node
//!
//! Buffers every incoming value without emitting. [`Collector::flush`] emits the
//! whole buffer as one group and clears it. The buffer may be supplied by the
//! caller, so several parts of an application can inspect or pre-fill it.

use crate::error::Result;
use crate::lock::lock;
use crate::node::{Node, NodeId, Stream};
use crate::value::{Group, Item};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Buffer shared between a collect node and its owner.
pub type SharedCache = Arc<Mutex<Group>>;

/// Appends every value to its cache.
pub struct CollectNode {
  cache: SharedCache,
}

impl CollectNode {
  /// Creates a collect node over `cache`.
  pub fn new(cache: SharedCache) -> Self {
    Self { cache }
  }
}

#[async_trait]
impl Node for CollectNode {
  fn kind(&self) -> &'static str {
    "collect"
  }

  async fn update(&self, _stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    lock(&self.cache).push(item);
    Ok(())
  }
}

/// Handle to a collect node.
#[derive(Clone, Debug)]
pub struct Collector {
  stream: Stream,
  cache: SharedCache,
}

impl Collector {
  /// The collect stream, to attach listeners to.
  pub fn stream(&self) -> &Stream {
    &self.stream
  }

  /// Number of buffered values.
  pub fn len(&self) -> usize {
    lock(&self.cache).len()
  }

  /// Returns `true` if nothing is buffered.
  pub fn is_empty(&self) -> bool {
    lock(&self.cache).is_empty()
  }

  /// Emits the buffered values as one group and clears the buffer.
  ///
  /// The buffer is taken before emitting, so values arriving while listeners run
  /// land in the next group.
  pub async fn flush(&self) -> Result<()> {
    let group = std::mem::take(&mut *lock(&self.cache));
    debug!(node = %self.stream.name(), size = group.len(), "flush");
    self.stream.emit(Arc::new(group)).await
  }

  /// Flushes whenever `trigger` emits.
  pub fn flush_on(&self, trigger: &Stream) -> Stream {
    let collector = self.clone();
    trigger.sink_async(move |_| {
      let collector = collector.clone();
      async move { collector.flush().await }
    })
  }
}

impl Stream {
  /// Buffers values until [`Collector::flush`] is called.
  pub fn collect(&self) -> Collector {
    self.collect_into(SharedCache::default())
  }

  /// Like [`Stream::collect`], buffering into a caller-supplied cache.
  pub fn collect_into(&self, cache: SharedCache) -> Collector {
    let stream = self.pipe(CollectNode::new(Arc::clone(&cache)));
    Collector { stream, cache }
  }
}
