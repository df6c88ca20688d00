//! # Pushweave
//!
//! Push-based reactive dataflow graphs on tokio.
//!
//! A graph is built from [`Stream`] handles. Values are pushed into a source with
//! [`Stream::emit`] and travel depth-first through every listener. Combinators
//! cover element-wise transforms, running state, windowing by count and by time,
//! bounded queues, rate limiting, and multi-input synchronization.
//!
//! ## Key Features
//!
//! - **Backpressure by awaiting**: `emit` completes only once every listener took
//!   the value, so a full queue or a pending synchronizer round holds the producer
//! - **Type-erased payloads**: values are `Arc<dyn Any + Send + Sync>` and fan out
//!   without copying; typed closures downcast at the edge
//! - **Container dispatch**: registered payload types such as [`Document`] are
//!   unwrapped for `map` and `scan` and merged by `merge` and `combine_latest`
//! - **Explicit lifetimes**: background loops run until their [`Scheduler`] is
//!   shut down, and a failed loop stays observable through its [`TaskHandle`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pushweave::{Stream, item};
//!
//! # async fn run() -> pushweave::Result<()> {
//! let source = Stream::source();
//! let totals = source.map(|x: &i32| x + 1).scan(|total: &i32, x: &i32| total + x);
//! let out = totals.sink_to_list();
//!
//! for x in [3, 4] {
//!   source.emit(item(x)).await?;
//! }
//! assert_eq!(out.values::<i32>(), vec![4, 9]);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

/// Engine settings and declarative pipelines.
pub mod config;
/// Shared state of one graph.
pub mod context;
/// Type-keyed transform, accumulate and merge handlers.
pub mod dispatch;
/// Attributed document payload and field selectors.
pub mod document;
/// Error types.
pub mod error;
mod lock;
/// Node trait, stream handles and the propagation protocol.
pub mod node;
/// Built-in combinators.
pub mod nodes;
/// Background loop management.
pub mod scheduler;
/// `tracing` subscriber setup.
pub mod telemetry;
/// Type-erased payload values.
pub mod value;

#[cfg(test)]
mod node_test;

pub use config::{EngineConfig, PipelineConfig, StageConfig};
pub use context::Context;
pub use dispatch::{Mergeable, Registry, Unwrap};
pub use document::{Document, Field, Kwargs, Selector, Target};
pub use error::{BoxError, Result, StreamError};
pub use node::{Node, NodeId, Stream};
pub use nodes::sink_node::SinkList;
pub use nodes::stream::Collector;
pub use scheduler::{Scheduler, TaskHandle, TaskState};
pub use telemetry::init_tracing;
pub use value::{Group, Item, as_group, downcast_ref, group_values, item};
