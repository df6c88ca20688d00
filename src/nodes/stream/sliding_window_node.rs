//! # Sliding Window Node
//!
//! Keeps the last `n` values and emits them as a group on every arrival once the
//! window is full, producing overlapping windows.

use crate::error::{Result, StreamError};
use crate::lock::lock;
use crate::node::{Node, NodeId, Stream};
use crate::value::{Group, Item};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Emits the current window of the last `n` values.
pub struct SlidingWindowNode {
  n: usize,
  window: Mutex<VecDeque<Item>>,
}

impl SlidingWindowNode {
  /// Creates a sliding window node.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`] if `n` is zero.
  pub fn new(n: usize) -> Result<Self> {
    if n == 0 {
      return Err(StreamError::InvalidArgument {
        operator: "sliding_window",
        reason: "window size must be at least 1".to_string(),
      });
    }
    Ok(Self {
      n,
      window: Mutex::new(VecDeque::with_capacity(n + 1)),
    })
  }
}

#[async_trait]
impl Node for SlidingWindowNode {
  fn kind(&self) -> &'static str {
    "sliding_window"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    let snapshot = {
      let mut window = lock(&self.window);
      window.push_back(item);
      if window.len() > self.n {
        window.pop_front();
      }
      (window.len() == self.n).then(|| window.iter().cloned().collect::<Group>())
    };
    match snapshot {
      Some(group) => stream.emit(Arc::new(group)).await,
      None => Ok(()),
    }
  }
}

impl Stream {
  /// Emits the last `n` values on every arrival, starting with the `n`-th.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`] if `n` is zero.
  pub fn sliding_window(&self, n: usize) -> Result<Stream> {
    Ok(self.pipe(SlidingWindowNode::new(n)?))
  }
}
