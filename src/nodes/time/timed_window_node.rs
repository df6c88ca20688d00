//! # Timed Window Node
//!
//! Groups values by wall-clock tick.
//!
//! ## Behavior
//!
//! - `update` appends the value to the current window. If the window of the
//!   previous tick is still being emitted, `update` waits for that emission to
//!   finish before returning.
//! - A background loop swaps the window out for an empty one, emits it as a group
//!   (also when empty) and sleeps for `interval`.

use crate::error::{Result, StreamError};
use crate::lock::lock;
use crate::node::{Node, NodeId, Stream};
use crate::value::{Group, Item};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::sleep;

#[derive(Default)]
struct Window {
  buffer: Mutex<Group>,
  emitting: AsyncMutex<()>,
}

/// Emits every value received during one `interval` as a group.
pub struct TimedWindowNode {
  window: Arc<Window>,
}

#[async_trait]
impl Node for TimedWindowNode {
  fn kind(&self) -> &'static str {
    "timed_window"
  }

  async fn update(&self, _stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    lock(&self.window.buffer).push(item);
    let _cycle = self.window.emitting.lock().await;
    Ok(())
  }
}

async fn tick(stream: Stream, window: Arc<Window>, interval: Duration) -> Result<()> {
  loop {
    {
      let _cycle = window.emitting.lock().await;
      let group = std::mem::take(&mut *lock(&window.buffer));
      stream.emit(Arc::new(group)).await?;
    }
    sleep(interval).await;
  }
}

impl Stream {
  /// Emits the values received during each `interval` as one group.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::InvalidArgument`] for a zero interval and
  /// [`StreamError::NoScheduler`] outside of a tokio runtime.
  pub fn timed_window(&self, interval: Duration) -> Result<Stream> {
    if interval.is_zero() {
      return Err(StreamError::InvalidArgument {
        operator: "timed_window",
        reason: "interval must be positive".to_string(),
      });
    }
    self.context().scheduler().runtime("timed_window")?;
    let window = Arc::new(Window::default());
    let stream = self.pipe(TimedWindowNode {
      window: Arc::clone(&window),
    });
    stream.spawn_loop(tick(stream.clone(), window, interval))?;
    Ok(stream)
  }
}
