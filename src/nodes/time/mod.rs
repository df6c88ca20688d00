//! # Time-Driven Nodes
//!
//! Nodes whose output is paced by the clock. `delay` and `timed_window` own a
//! background loop on the graph's scheduler; `rate_limit` suspends the caller.
//!
//! - **DelayNode**: quiet period after each emission (`delay`)
//! - **RateLimitNode**: minimum spacing between emissions (`rate_limit`)
//! - **TimedWindowNode**: one group per tick (`timed_window`)

pub mod delay_node;
pub mod rate_limit_node;
pub mod timed_window_node;

pub use delay_node::DelayNode;
pub use rate_limit_node::RateLimitNode;
pub use timed_window_node::TimedWindowNode;
