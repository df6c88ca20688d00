//! # Stateful and Multi-Input Nodes
//!
//! Nodes that keep state between values (accumulators, windows, dedupe, caches),
//! the bounded queue stage, and the synchronizers that combine several inputs.
//!
//! ## Available Nodes
//!
//! ### Per-value state
//! - **ScanNode**: running accumulation (`scan`, `scan_from`, `scan_raw`, `frequencies`)
//! - **PartitionNode**: fixed-size groups (`partition`)
//! - **SlidingWindowNode**: overlapping windows (`sliding_window`)
//! - **UniqueNode**: drops seen keys (`unique`, `unique_by`)
//! - **CollectNode**: caches until flushed (`collect`, `collect_into`)
//!
//! ### Queueing
//! - **BufferNode**: bounded queue with a drain loop (`buffer`)
//!
//! ### Stream Combination
//! - **ZipNode**: lockstep rounds as groups (`zip`)
//! - **MergeNode**: lockstep rounds folded into one value (`merge`)
//! - **CombineLatestNode**: latest value of every input (`combine_latest`)

pub mod buffer_node;
pub mod collect_node;
#[cfg(test)]
mod collect_node_test;
pub mod combine_latest_node;
mod lockstep;
pub mod merge_node;
#[cfg(test)]
mod merge_node_test;
pub mod partition_node;
pub mod scan_node;
#[cfg(test)]
mod scan_node_test;
pub mod sliding_window_node;
pub mod unique_node;
pub mod zip_node;
#[cfg(test)]
mod zip_node_test;

pub use buffer_node::BufferNode;
pub use collect_node::{CollectNode, Collector, SharedCache};
pub use combine_latest_node::CombineLatestNode;
pub use merge_node::MergeNode;
pub use partition_node::PartitionNode;
pub use scan_node::{ScanNode, accumulator};
pub use sliding_window_node::SlidingWindowNode;
pub use unique_node::{KeyFn, UniqueNode};
pub use zip_node::ZipNode;
