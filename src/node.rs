//! # Node and Propagation Protocol
//!
//! A graph is a set of [`Stream`] handles. Each one owns:
//!
//! - an ordered list of **inputs** (upstream streams, fixed at construction)
//! - an ordered list of **listeners** (downstream streams, appended whenever a new
//!   node is built on top of it)
//! - a [`Node`] implementation holding the combinator's behaviour and state
//!
//! ## Propagation
//!
//! [`Stream::emit`] hands a value to every listener, in registration order, by
//! awaiting the listener's [`Node::update`]. `update` transforms the value and
//! usually calls `emit` on its own stream, so a push walks the graph depth-first
//! until it is exhausted or parks on a queue or timer. Because every `update` is
//! awaited, a suspended node holds back the producer that pushed into it: that is
//! how backpressure travels upstream.
//!
//! An error returned by any `update` aborts the rest of the walk. Listeners that
//! were already served keep what they received.

use crate::context::Context;
use crate::error::{Result, StreamError};
use crate::lock::{read, write};
use crate::scheduler::TaskHandle;
use crate::value::Item;
use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, RwLock};
use tracing::{debug, trace};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a stream within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
  fn next() -> Self {
    NodeId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
  }

  /// Raw numeric id.
  pub fn get(self) -> u64 {
    self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Behaviour of one combinator.
///
/// Implementations receive every value pushed by one of the stream's inputs,
/// together with the id of that input, and decide what (if anything) to emit
/// through `stream`.
#[async_trait]
pub trait Node: Send + Sync {
  /// Short name of the combinator, used for default stream names and logs.
  fn kind(&self) -> &'static str;

  /// Reacts to `item` arriving from the input identified by `from`.
  ///
  /// Returning only after downstream work completes (or after the value is parked
  /// in a queue) is what lets backpressure reach the producer.
  async fn update(&self, stream: &Stream, item: Item, from: NodeId) -> Result<()>;
}

/// Entry point of a graph: forwards whatever is pushed into it.
pub struct SourceNode;

#[async_trait]
impl Node for SourceNode {
  fn kind(&self) -> &'static str {
    "source"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    stream.emit(item).await
  }
}

struct StreamInner {
  id: NodeId,
  name: RwLock<String>,
  inputs: Vec<NodeId>,
  listeners: RwLock<Vec<Stream>>,
  node: Box<dyn Node>,
  context: Context,
  task: OnceLock<TaskHandle>,
}

/// Cloneable handle to a node of the graph.
#[derive(Clone)]
pub struct Stream {
  inner: Arc<StreamInner>,
}

impl Stream {
  /// Creates a source in a fresh default context.
  pub fn source() -> Self {
    Self::source_in(Context::default(), "source")
  }

  /// Creates a named source in the given context.
  pub fn source_in(context: Context, name: &str) -> Self {
    let stream = Self::build(Box::new(SourceNode), Vec::new(), context);
    stream.set_name(name);
    stream
  }

  /// Attaches `node` as a listener of this stream.
  pub fn pipe<N>(&self, node: N) -> Stream
  where
    N: Node + 'static,
  {
    Self::join(node, self, &[])
  }

  /// Attaches `node` as a listener of `first` and then of every stream in
  /// `others`, in order. Input `0` is `first`.
  ///
  /// The node inherits the context of `first`.
  pub fn join<N>(node: N, first: &Stream, others: &[&Stream]) -> Stream
  where
    N: Node + 'static,
  {
    let inputs: Vec<&Stream> = std::iter::once(first).chain(others.iter().copied()).collect();
    let ids = inputs.iter().map(|input| input.id()).collect();
    let stream = Self::build(Box::new(node), ids, first.context().clone());
    for input in &inputs {
      write(&input.inner.listeners).push(stream.clone());
    }
    debug!(node = %stream.name(), inputs = inputs.len(), "wired node");
    stream
  }

  fn build(node: Box<dyn Node>, inputs: Vec<NodeId>, context: Context) -> Stream {
    let id = NodeId::next();
    let name = format!("{}#{}", node.kind(), id);
    Stream {
      inner: Arc::new(StreamInner {
        id,
        name: RwLock::new(name),
        inputs,
        listeners: RwLock::new(Vec::new()),
        node,
        context,
        task: OnceLock::new(),
      }),
    }
  }

  /// Pushes `item` to every listener, in registration order.
  ///
  /// Completes once every listener has accepted the value, which may involve
  /// waiting on a full queue, a rate limit or a synchronizer round further down.
  ///
  /// # Errors
  ///
  /// Returns the first error raised by a listener. Remaining listeners are skipped.
  pub async fn emit(&self, item: Item) -> Result<()> {
    let listeners = self.listeners();
    trace!(node = %self.name(), listeners = listeners.len(), "emit");
    for listener in listeners {
      listener
        .inner
        .node
        .update(&listener, Arc::clone(&item), self.id())
        .await?;
    }
    Ok(())
  }

  /// Identity of this stream.
  pub fn id(&self) -> NodeId {
    self.inner.id
  }

  /// Current name.
  pub fn name(&self) -> String {
    read(&self.inner.name).clone()
  }

  /// Renames the stream.
  pub fn set_name(&self, name: &str) {
    *write(&self.inner.name) = name.to_string();
  }

  /// Combinator kind of this stream.
  pub fn kind(&self) -> &'static str {
    self.inner.node.kind()
  }

  /// Ids of the upstream streams, in wiring order.
  pub fn inputs(&self) -> &[NodeId] {
    &self.inner.inputs
  }

  /// Snapshot of the downstream streams, in registration order.
  pub fn listeners(&self) -> Vec<Stream> {
    read(&self.inner.listeners).clone()
  }

  /// Position of `from` among this stream's inputs.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::UnknownInput`] if `from` is not wired to this stream.
  pub fn input_index(&self, from: NodeId) -> Result<usize> {
    self
      .inner
      .inputs
      .iter()
      .position(|id| *id == from)
      .ok_or_else(|| StreamError::UnknownInput { node: self.name() })
  }

  /// Shared graph context.
  pub fn context(&self) -> &Context {
    &self.inner.context
  }

  /// Background loop owned by this stream, if it has one.
  pub fn task(&self) -> Option<&TaskHandle> {
    self.inner.task.get()
  }

  /// Spawns the background loop of this stream on the context's scheduler.
  ///
  /// A stream owns at most one loop. A second loop is cancelled right away and
  /// reported as [`StreamError::InvalidArgument`].
  pub(crate) fn spawn_loop<F>(&self, task: F) -> Result<()>
  where
    F: std::future::Future<Output = Result<()>> + Send + 'static,
  {
    let handle = self.context().scheduler().spawn(&self.name(), task)?;
    self.inner.task.set(handle).map_err(|duplicate| {
      duplicate.cancel();
      StreamError::InvalidArgument {
        operator: self.kind(),
        reason: format!("`{}` already owns a background loop", self.name()),
      }
    })
  }
}

impl PartialEq for Stream {
  fn eq(&self, other: &Self) -> bool {
    self.id() == other.id()
  }
}

impl Eq for Stream {}

impl fmt::Debug for Stream {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Stream")
      .field("id", &self.id())
      .field("name", &self.name())
      .field("inputs", &self.inner.inputs)
      .field("listeners", &read(&self.inner.listeners).len())
      .finish()
  }
}
