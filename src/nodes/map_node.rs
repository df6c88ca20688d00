//! # Map Node
//!
//! Applies a function to every value and emits the result.
//!
//! ## Behavior
//!
//! By default the function goes through the context's dispatch registry: a value
//! whose type has a transform handler (such as [`Document`](crate::document::Document))
//! is unwrapped, the function sees the carried payload, and the result is rewrapped.
//! A raw map skips dispatch and hands the function the value as-is.
//!
//! Errors returned by the function abort the current push.

use crate::dispatch::Transform;
use crate::error::{BoxError, Result, StreamError};
use crate::node::{Node, NodeId, Stream};
use crate::value::{Item, downcast_ref};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// Emits `f(x)` for every `x`.
pub struct MapNode {
  transform: Transform,
  raw: bool,
}

impl MapNode {
  /// Creates a map node that dispatches through the registry.
  ///
  /// # Arguments
  ///
  /// * `transform` - Type-erased function to apply.
  pub fn new(transform: Transform) -> Self {
    Self {
      transform,
      raw: false,
    }
  }

  /// Bypasses the dispatch registry.
  pub fn raw(mut self) -> Self {
    self.raw = true;
    self
  }
}

#[async_trait]
impl Node for MapNode {
  fn kind(&self) -> &'static str {
    "map"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    let result = if self.raw {
      (self.transform)(item)?
    } else {
      stream.context().registry().transform(&self.transform, item)?
    };
    stream.emit(result).await
  }
}

/// Erases `f: &A -> B` into a [`Transform`].
pub(crate) fn typed<A, B, F>(operator: &'static str, f: F) -> Transform
where
  A: Any + Send + Sync,
  B: Any + Send + Sync,
  F: Fn(&A) -> B + Send + Sync + 'static,
{
  Arc::new(move |item: Item| {
    let value = downcast_ref::<A>(&item, operator)?;
    Ok(Arc::new(f(value)) as Item)
  })
}

/// Erases a fallible `f: &A -> Result<B, E>` into a [`Transform`].
pub(crate) fn try_typed<A, B, E, F>(operator: &'static str, f: F) -> Transform
where
  A: Any + Send + Sync,
  B: Any + Send + Sync,
  E: Into<BoxError>,
  F: Fn(&A) -> Result<B, E> + Send + Sync + 'static,
{
  Arc::new(move |item: Item| {
    let value = downcast_ref::<A>(&item, operator)?;
    let result = f(value).map_err(StreamError::user)?;
    Ok(Arc::new(result) as Item)
  })
}

impl Stream {
  /// Applies `f` to every value.
  ///
  /// Registered containers are unwrapped first, so `f` sees their payload.
  ///
  /// # Example
  ///
  /// ```rust,no_run
  /// use pushweave::Stream;
  ///
  /// let source = Stream::source();
  /// let doubled = source.map(|x: &i32| x * 2);
  /// ```
  pub fn map<A, B, F>(&self, f: F) -> Stream
  where
    A: Any + Send + Sync,
    B: Any + Send + Sync,
    F: Fn(&A) -> B + Send + Sync + 'static,
  {
    self.pipe(MapNode::new(typed("map", f)))
  }

  /// Like [`Stream::map`], but `f` may fail. Failures surface as
  /// [`StreamError::User`] from the pushing `emit`.
  pub fn try_map<A, B, E, F>(&self, f: F) -> Stream
  where
    A: Any + Send + Sync,
    B: Any + Send + Sync,
    E: Into<BoxError>,
    F: Fn(&A) -> Result<B, E> + Send + Sync + 'static,
  {
    self.pipe(MapNode::new(try_typed("map", f)))
  }

  /// Applies `f` to every value without consulting the dispatch registry.
  pub fn map_raw<A, B, F>(&self, f: F) -> Stream
  where
    A: Any + Send + Sync,
    B: Any + Send + Sync,
    F: Fn(&A) -> B + Send + Sync + 'static,
  {
    self.pipe(MapNode::new(typed("map", f)).raw())
  }

  /// Applies an untyped function to every value, dispatching through the registry.
  pub fn map_item<F>(&self, f: F) -> Stream
  where
    F: Fn(Item) -> Result<Item> + Send + Sync + 'static,
  {
    self.pipe(MapNode::new(Arc::new(f)))
  }
}
