//! # Buffer Node
//!
//! Decouples a producer from a slow consumer with a bounded queue.
//!
//! ## Behavior
//!
//! - `update` puts the value on a queue of capacity `n`. When the queue is full the
//!   put waits, so the producer's `emit` waits with it.
//! - A background loop takes values off the queue and emits them one at a time.
//!
//! The loop runs until the scheduler is shut down. After that, pushes fail with
//! [`StreamError::Closed`].

use crate::error::{Result, StreamError};
use crate::node::{Node, NodeId, Stream};
use crate::value::Item;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Queue stage with a background drain loop.
pub struct BufferNode {
  sender: mpsc::Sender<Item>,
}

#[async_trait]
impl Node for BufferNode {
  fn kind(&self) -> &'static str {
    "buffer"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    self
      .sender
      .send(item)
      .await
      .map_err(|_| StreamError::Closed {
        node: stream.name(),
      })
  }
}

async fn drain(stream: Stream, mut receiver: mpsc::Receiver<Item>) -> Result<()> {
  while let Some(item) = receiver.recv().await {
    stream.emit(item).await?;
  }
  Ok(())
}

impl Stream {
  /// Queues up to `n` values between this stream and its listeners.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`] if `n` is zero and
  /// [`StreamError::NoScheduler`] outside of a tokio runtime.
  pub fn buffer(&self, n: usize) -> Result<Stream> {
    if n == 0 {
      return Err(StreamError::InvalidArgument {
        operator: "buffer",
        reason: "capacity must be at least 1".to_string(),
      });
    }
    self.context().scheduler().runtime("buffer")?;
    let (sender, receiver) = mpsc::channel(n);
    let stream = self.pipe(BufferNode { sender });
    stream.spawn_loop(drain(stream.clone(), receiver))?;
    Ok(stream)
  }
}
