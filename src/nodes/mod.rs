//! # Built-in Combinators
//!
//! Every combinator is a [`Node`](crate::node::Node) plus a constructor method on
//! [`Stream`](crate::node::Stream).
//!
//! ## Available Nodes
//!
//! ### Stateless
//! - **MapNode**: `map`, `try_map`, `map_raw`, `map_item`
//! - **FilterNode**: `filter`, `remove`
//! - **ConcatNode**: `concat`, `flatten`
//! - **UnionNode**: `union`
//! - **SelectNode**: `select`, `select_specs`
//! - **SinkNode**: `sink`, `try_sink`, `sink_async`, `sink_to_list`
//!
//! ### Stateful and multi-input ([`stream`])
//! - `scan`, `frequencies`, `partition`, `sliding_window`, `unique`, `collect`,
//!   `buffer`, `zip`, `merge`, `combine_latest`
//!
//! ### Time-driven ([`time`])
//! - `delay`, `rate_limit`, `timed_window`

pub mod concat_node;
#[cfg(test)]
mod concat_node_test;
pub mod filter_node;
#[cfg(test)]
mod filter_node_test;
pub mod map_node;
pub mod select_node;
#[cfg(test)]
mod select_node_test;
pub mod sink_node;
pub mod stream;
pub mod time;
pub mod union_node;

pub use concat_node::ConcatNode;
pub use filter_node::{FilterNode, Predicate};
pub use map_node::MapNode;
pub use select_node::SelectNode;
pub use sink_node::{SinkFn, SinkList, SinkNode};
pub use union_node::UnionNode;
