//! Per-input FIFO buffers shared by [`ZipNode`](super::ZipNode) and
//! [`MergeNode`](super::MergeNode).
//!
//! A round completes when an arrival makes its own buffer non-empty while every
//! other buffer already holds a value. The heads of all buffers are popped
//! together, in input order. An arrival that leaves its buffer deeper than
//! `maxsize` waits until the next round completes. A `maxsize` of zero would park
//! the first arrival of every round, so it is rejected.

use crate::error::{Result, StreamError};
use crate::lock::lock;
use crate::value::{Group, Item};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

pub(crate) struct Lockstep {
  buffers: Mutex<Vec<VecDeque<Item>>>,
  round_done: Notify,
  maxsize: usize,
}

impl Lockstep {
  pub(crate) fn new(operator: &'static str, inputs: usize, maxsize: usize) -> Result<Self> {
    if maxsize == 0 {
      return Err(StreamError::InvalidArgument {
        operator,
        reason: "maxsize must be at least 1".to_string(),
      });
    }
    Ok(Self {
      buffers: Mutex::new((0..inputs).map(|_| VecDeque::new()).collect()),
      round_done: Notify::new(),
      maxsize,
    })
  }

  /// Buffers `item` on edge `index` and returns the round it completes, if any.
  pub(crate) async fn push(&self, index: usize, item: Item) -> Option<Group> {
    let (round, backlog) = {
      let mut buffers = lock(&self.buffers);
      buffers[index].push_back(item);
      if buffers[index].len() == 1 && buffers.iter().all(|buffer| !buffer.is_empty()) {
        let round = buffers
          .iter_mut()
          .filter_map(|buffer| buffer.pop_front())
          .collect::<Group>();
        (Some(round), None)
      } else if buffers[index].len() > self.maxsize {
        // Registered before the lock is released so a concurrent round cannot be missed.
        (None, Some(self.round_done.notified()))
      } else {
        (None, None)
      }
    };

    if round.is_some() {
      self.round_done.notify_waiters();
    } else if let Some(backlog) = backlog {
      backlog.await;
    }
    round
  }

  /// Depth of every input buffer.
  pub(crate) fn depths(&self) -> Vec<usize> {
    lock(&self.buffers).iter().map(VecDeque::len).collect()
  }
}
