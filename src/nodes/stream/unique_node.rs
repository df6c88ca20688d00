//! # Unique Node
//!
//! Drops values whose key has already been seen.
//!
//! ## Behavior
//!
//! Keys are remembered in a set. With a bounded history the set also keeps an
//! eviction queue in insertion order: once more than `history` keys are held, the
//! oldest one is forgotten and a value with that key may pass again. Without a
//! bound keys are never forgotten.

use crate::error::{Result, StreamError};
use crate::lock::lock;
use crate::node::{Node, NodeId, Stream};
use crate::value::{Item, downcast_ref};
use async_trait::async_trait;
use std::any::Any;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Extracts the deduplication key of a value.
pub type KeyFn<K> = Arc<dyn Fn(&Item) -> Result<K> + Send + Sync>;

struct SeenKeys<K> {
  seen: HashSet<K>,
  eviction_queue: VecDeque<K>,
  history: Option<usize>,
}

impl<K: Hash + Eq + Clone> SeenKeys<K> {
  /// Marks `key` as seen. Returns `false` if it already was.
  fn record(&mut self, key: K) -> bool {
    if self.seen.contains(&key) {
      return false;
    }
    self.seen.insert(key.clone());
    if let Some(history) = self.history {
      self.eviction_queue.push_back(key);
      while self.eviction_queue.len() > history {
        if let Some(evicted) = self.eviction_queue.pop_front() {
          self.seen.remove(&evicted);
        }
      }
    }
    true
  }
}

/// Forwards a value only the first time its key is seen.
pub struct UniqueNode<K> {
  key: KeyFn<K>,
  state: Mutex<SeenKeys<K>>,
}

impl<K> UniqueNode<K>
where
  K: Hash + Eq + Clone + Send + 'static,
{
  /// Creates a unique node.
  ///
  /// # Arguments
  ///
  /// * `key` - Key extraction function.
  /// * `history` - Maximum number of remembered keys, or `None` for no limit.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`] for a history of zero.
  pub fn new(key: KeyFn<K>, history: Option<usize>) -> Result<Self> {
    if history == Some(0) {
      return Err(StreamError::InvalidArgument {
        operator: "unique",
        reason: "history must hold at least one key".to_string(),
      });
    }
    Ok(Self {
      key,
      state: Mutex::new(SeenKeys {
        seen: HashSet::new(),
        eviction_queue: VecDeque::new(),
        history,
      }),
    })
  }

  /// Number of keys currently remembered.
  pub fn remembered(&self) -> usize {
    lock(&self.state).seen.len()
  }
}

#[async_trait]
impl<K> Node for UniqueNode<K>
where
  K: Hash + Eq + Clone + Send + 'static,
{
  fn kind(&self) -> &'static str {
    "unique"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    let key = (self.key)(&item)?;
    let fresh = lock(&self.state).record(key);
    if fresh {
      stream.emit(item).await
    } else {
      trace!(node = %stream.name(), "dropped duplicate");
      Ok(())
    }
  }
}

impl Stream {
  /// Forwards each distinct value once.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`] for a history of zero.
  pub fn unique<A>(&self, history: Option<usize>) -> Result<Stream>
  where
    A: Hash + Eq + Clone + Any + Send + Sync,
  {
    self.unique_by(history, |value: &A| value.clone())
  }

  /// Forwards a value only if `key(value)` has not been seen within `history`.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`] for a history of zero.
  pub fn unique_by<A, K, F>(&self, history: Option<usize>, key: F) -> Result<Stream>
  where
    A: Any + Send + Sync,
    K: Hash + Eq + Clone + Send + 'static,
    F: Fn(&A) -> K + Send + Sync + 'static,
  {
    let key: KeyFn<K> = Arc::new(move |item: &Item| Ok(key(downcast_ref::<A>(item, "unique")?)));
    Ok(self.pipe(UniqueNode::new(key, history)?))
  }
}
