//! # Delay Node
//!
//! Enforces a quiet period after every emission.
//!
//! ## Behavior
//!
//! `update` appends to an unbounded queue and returns at once. A background loop
//! notes the time, waits for the next queued value, emits it, and then sleeps for
//! whatever is left of `interval` since it noted the time. A value arriving after
//! a long pause is therefore emitted immediately; a burst is spaced `interval`
//! apart.

use crate::error::{Result, StreamError};
use crate::node::{Node, NodeId, Stream};
use crate::value::Item;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};

/// Queue stage emitting at most one value per `interval` of quiet time.
pub struct DelayNode {
  sender: mpsc::UnboundedSender<Item>,
}

#[async_trait]
impl Node for DelayNode {
  fn kind(&self) -> &'static str {
    "delay"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    self.sender.send(item).map_err(|_| StreamError::Closed {
      node: stream.name(),
    })
  }
}

async fn pace(
  stream: Stream,
  mut receiver: mpsc::UnboundedReceiver<Item>,
  interval: Duration,
) -> Result<()> {
  loop {
    let started = Instant::now();
    let Some(item) = receiver.recv().await else {
      return Ok(());
    };
    stream.emit(item).await?;
    if let Some(remaining) = interval.checked_sub(started.elapsed()) {
      sleep(remaining).await;
    }
  }
}

impl Stream {
  /// Emits queued values with at least `interval` between the start of one wait
  /// and the next emission.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::NoScheduler`] outside of a tokio runtime.
  pub fn delay(&self, interval: Duration) -> Result<Stream> {
    self.context().scheduler().runtime("delay")?;
    let (sender, receiver) = mpsc::unbounded_channel();
    let stream = self.pipe(DelayNode { sender });
    stream.spawn_loop(pace(stream.clone(), receiver, interval))?;
    Ok(stream)
  }
}
