//! # Error Handling
//!
//! Errors raised while wiring or driving a dataflow graph.
//!
//! ## Taxonomy
//!
//! - **Wiring errors**: malformed selectors, invalid combinator arguments, missing
//!   document fields and unknown input edges. They fail the construction call or the
//!   first `emit` that reaches the offending node.
//! - **User-function errors**: anything returned by a fallible transform, predicate
//!   or sink. These are carried in [`StreamError::User`] unchanged and abort the
//!   current `emit` chain. Listeners that already received the value keep it.
//! - **Backpressure** is never an error. A full queue suspends the caller.
//!
//! A background loop (buffer, delay, timed window) that hits an error stops for
//! good; its [`TaskState`](crate::scheduler::TaskState) turns into `Failed`.

use thiserror::Error;

/// Boxed error produced by user-supplied functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type used throughout the crate.
pub type Result<T, E = StreamError> = std::result::Result<T, E>;

/// Errors produced while building or driving a stream graph.
#[derive(Error, Debug)]
pub enum StreamError {
  /// A value reached a function that expected a different payload type.
  #[error("`{operator}` expected a value of type `{expected}`")]
  TypeMismatch {
    /// Combinator that performed the downcast.
    operator: &'static str,
    /// Name of the expected Rust type.
    expected: &'static str,
  },

  /// A selector referenced a field the document does not carry.
  #[error("field `{field}` is not present in the document")]
  MissingField {
    /// Positional index or keyword that was requested.
    field: String,
  },

  /// A selector specification could not be parsed.
  #[error("malformed selector `{spec}`: {reason}")]
  MalformedSelector {
    /// The offending specification.
    spec: String,
    /// Why it was rejected.
    reason: &'static str,
  },

  /// A node received a push from a stream it is not wired to.
  #[error("node `{node}` received a value from an unregistered input")]
  UnknownInput {
    /// Receiving node.
    node: String,
  },

  /// `concat` received something that is not a group.
  #[error("node `{node}` expected a group of values to flatten")]
  NotIterable {
    /// Receiving node.
    node: String,
  },

  /// Two values had to be merged but neither exposes a merge capability.
  #[error("node `{node}` cannot merge values without a merge capability")]
  NotMergeable {
    /// Merging node.
    node: String,
  },

  /// A combinator was configured with an unusable argument.
  #[error("invalid argument for `{operator}`: {reason}")]
  InvalidArgument {
    /// Combinator being constructed.
    operator: &'static str,
    /// What was wrong.
    reason: String,
  },

  /// A background loop was requested outside of any runtime.
  #[error("no scheduler is available to run `{task}`")]
  NoScheduler {
    /// Task that could not be spawned.
    task: String,
  },

  /// The queue owned by a node has been closed.
  #[error("queue of node `{node}` is closed")]
  Closed {
    /// Owning node.
    node: String,
  },

  /// Pipeline configuration could not be parsed or applied.
  #[error("invalid configuration: {0}")]
  Config(String),

  /// I/O failure while reading configuration.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// Error returned by a user-supplied function.
  #[error(transparent)]
  User(BoxError),
}

impl StreamError {
  /// Wraps an error returned by a user function.
  pub fn user<E>(error: E) -> Self
  where
    E: Into<BoxError>,
  {
    StreamError::User(error.into())
  }

  /// Returns `true` for errors raised while wiring the graph rather than by user code.
  pub fn is_wiring(&self) -> bool {
    matches!(
      self,
      StreamError::MissingField { .. }
        | StreamError::MalformedSelector { .. }
        | StreamError::UnknownInput { .. }
        | StreamError::InvalidArgument { .. }
    )
  }
}

impl From<serde_json::Error> for StreamError {
  fn from(error: serde_json::Error) -> Self {
    StreamError::Config(error.to_string())
  }
}
