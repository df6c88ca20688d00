//! # Combine Latest Node
//!
//! Remembers the latest value of every input. Once each input has produced at
//! least one value, every arrival on the first input emits the current latest
//! values of all inputs; arrivals on other inputs only refresh their slot.
//!
//! As with zip, a first value carrying a merge capability merges the others into
//! itself instead of producing a group.

use crate::error::Result;
use crate::lock::lock;
use crate::node::{Node, NodeId, Stream};
use crate::value::{Group, Item};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

struct Latest {
  values: Vec<Option<Item>>,
  missing: usize,
}

/// Emits the latest value of every input when the first input fires.
pub struct CombineLatestNode {
  latest: Mutex<Latest>,
}

impl CombineLatestNode {
  /// Creates a combine-latest node over `inputs` edges.
  pub fn new(inputs: usize) -> Self {
    Self {
      latest: Mutex::new(Latest {
        values: vec![None; inputs],
        missing: inputs,
      }),
    }
  }
}

#[async_trait]
impl Node for CombineLatestNode {
  fn kind(&self) -> &'static str {
    "combine_latest"
  }

  async fn update(&self, stream: &Stream, item: Item, from: NodeId) -> Result<()> {
    let index = stream.input_index(from)?;
    let snapshot = {
      let mut latest = lock(&self.latest);
      if latest.values[index].replace(item).is_none() {
        latest.missing -= 1;
      }
      (latest.missing == 0 && index == 0)
        .then(|| latest.values.iter().flatten().cloned().collect::<Group>())
    };
    let Some(values) = snapshot else {
      return Ok(());
    };
    let merged = match values.split_first() {
      Some((first, rest)) => stream.context().registry().try_merge(first, rest),
      None => None,
    };
    match merged {
      Some(value) => stream.emit(value?).await,
      None => stream.emit(Arc::new(values)).await,
    }
  }
}

impl Stream {
  /// Emits `[this, others...]` latest values whenever this stream emits, once
  /// every input has produced a value.
  pub fn combine_latest(&self, others: &[&Stream]) -> Stream {
    Stream::join(CombineLatestNode::new(others.len() + 1), self, others)
  }
}
