//! # Scan Node
//!
//! Running accumulation. The node keeps one state slot, optionally seeded.
//!
//! ## Behavior
//!
//! - While the slot is empty, the incoming value is emitted unchanged and stored.
//!   The function is not called.
//! - Afterwards every value produces `f(state, x)`, which is stored and emitted.
//!
//! Unless the node is raw, the accumulation dispatches on the type of the state,
//! so registered containers are unwrapped on both sides.
//!
//! A failing function leaves the state untouched.

use crate::dispatch::Accumulate;
use crate::error::Result;
use crate::lock::lock;
use crate::node::{Node, NodeId, Stream};
use crate::value::{Item, downcast_ref, item};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

/// Emits the running accumulation of its input.
pub struct ScanNode {
  accumulate: Accumulate,
  raw: bool,
  state: Mutex<Option<Item>>,
}

impl ScanNode {
  /// Creates an unseeded scan node.
  pub fn new(accumulate: Accumulate) -> Self {
    Self {
      accumulate,
      raw: false,
      state: Mutex::new(None),
    }
  }

  /// Seeds the state, so the first value already goes through the function.
  pub fn seeded(self, start: Item) -> Self {
    *lock(&self.state) = Some(start);
    self
  }

  /// Bypasses the dispatch registry.
  pub fn raw(mut self) -> Self {
    self.raw = true;
    self
  }

  /// Current state, if any.
  pub fn state(&self) -> Option<Item> {
    lock(&self.state).clone()
  }
}

#[async_trait]
impl Node for ScanNode {
  fn kind(&self) -> &'static str {
    "scan"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    let result = {
      let mut state = lock(&self.state);
      let result = match state.as_ref() {
        None => item,
        Some(previous) if self.raw => (self.accumulate)(Arc::clone(previous), item)?,
        Some(previous) => {
          stream
            .context()
            .registry()
            .accumulate(&self.accumulate, Arc::clone(previous), item)?
        }
      };
      *state = Some(Arc::clone(&result));
      result
    };
    stream.emit(result).await
  }
}

/// Erases `f: (&S, &A) -> S` into an [`Accumulate`].
pub fn accumulator<S, A, F>(f: F) -> Accumulate
where
  S: Any + Send + Sync,
  A: Any + Send + Sync,
  F: Fn(&S, &A) -> S + Send + Sync + 'static,
{
  Arc::new(move |state: Item, next: Item| {
    let state = downcast_ref::<S>(&state, "scan")?;
    let next = downcast_ref::<A>(&next, "scan")?;
    Ok(Arc::new(f(state, next)) as Item)
  })
}

impl Stream {
  /// Emits the running accumulation `state = f(state, x)`.
  ///
  /// The first value is passed through unchanged and becomes the state.
  ///
  /// # Example
  ///
  /// ```rust,no_run
  /// use pushweave::Stream;
  ///
  /// let source = Stream::source();
  /// let totals = source.scan(|total: &i32, x: &i32| total + x);
  /// ```
  pub fn scan<S, A, F>(&self, f: F) -> Stream
  where
    S: Any + Send + Sync,
    A: Any + Send + Sync,
    F: Fn(&S, &A) -> S + Send + Sync + 'static,
  {
    self.pipe(ScanNode::new(accumulator(f)))
  }

  /// Like [`Stream::scan`], starting from `start`.
  pub fn scan_from<S, A, F>(&self, start: S, f: F) -> Stream
  where
    S: Any + Send + Sync,
    A: Any + Send + Sync,
    F: Fn(&S, &A) -> S + Send + Sync + 'static,
  {
    self.pipe(ScanNode::new(accumulator(f)).seeded(item(start)))
  }

  /// Like [`Stream::scan`], without consulting the dispatch registry.
  pub fn scan_raw<S, A, F>(&self, f: F) -> Stream
  where
    S: Any + Send + Sync,
    A: Any + Send + Sync,
    F: Fn(&S, &A) -> S + Send + Sync + 'static,
  {
    self.pipe(ScanNode::new(accumulator(f)).raw())
  }

  /// Emits a running count of every distinct value seen so far.
  pub fn frequencies<K>(&self) -> Stream
  where
    K: Hash + Eq + Clone + Send + Sync + 'static,
  {
    let count = accumulator(|counts: &HashMap<K, usize>, value: &K| {
      let mut counts = counts.clone();
      *counts.entry(value.clone()).or_insert(0) += 1;
      counts
    });
    self.pipe(ScanNode::new(count).seeded(item(HashMap::<K, usize>::new())).raw())
  }
}
