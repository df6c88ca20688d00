//! # Rate Limit Node
//!
//! Spaces emissions at least `interval` apart without dropping anything.
//!
//! ## Behavior
//!
//! The node keeps a watermark: the earliest time the next value may leave. Each
//! `update` reserves a slot by moving the watermark to
//! `max(now, watermark) + interval`, sleeps until its own slot if that is still in
//! the future, and then emits. The caller's `emit` waits along with it.

use crate::error::Result;
use crate::lock::lock;
use crate::node::{Node, NodeId, Stream};
use crate::value::Item;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Emits every value, no faster than one per `interval`.
pub struct RateLimitNode {
  interval: Duration,
  next_allowed: Mutex<Option<Instant>>,
}

impl RateLimitNode {
  /// Creates a rate limit node.
  pub fn new(interval: Duration) -> Self {
    Self {
      interval,
      next_allowed: Mutex::new(None),
    }
  }
}

#[async_trait]
impl Node for RateLimitNode {
  fn kind(&self) -> &'static str {
    "rate_limit"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    let now = Instant::now();
    let slot = {
      let mut watermark = lock(&self.next_allowed);
      let slot = watermark.map_or(now, |at| at.max(now));
      *watermark = Some(slot + self.interval);
      slot
    };
    if slot > now {
      sleep_until(slot).await;
    }
    stream.emit(item).await
  }
}

impl Stream {
  /// Emits every value, at least `interval` after the previous one.
  pub fn rate_limit(&self, interval: Duration) -> Stream {
    self.pipe(RateLimitNode::new(interval))
  }
}
