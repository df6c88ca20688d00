//! # Configuration
//!
//! Engine settings and declarative pipelines, loaded from JSON with `serde`.
//!
//! ```json
//! {
//!   "engine": { "default_maxsize": 4 },
//!   "stages": [
//!     { "op": "rate_limit", "interval": 0.5 },
//!     { "op": "partition", "n": 3 },
//!     { "op": "concat" }
//!   ]
//! }
//! ```
//!
//! Intervals are seconds. A pipeline only covers single-input combinators whose
//! behaviour is fully described by their settings; stages that need user code
//! (map, filter, scan) are wired in Rust.

use crate::context::Context;
use crate::error::{Result, StreamError};
use crate::node::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Settings shared by every node of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Per-input backlog after which `zip` and `merge` suspend the producer.
  /// Must be at least 1.
  pub default_maxsize: usize,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self { default_maxsize: 10 }
  }
}

/// One stage of a [`PipelineConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StageConfig {
  /// [`Stream::partition`].
  Partition {
    /// Group size.
    n: usize,
  },
  /// [`Stream::sliding_window`].
  SlidingWindow {
    /// Window size.
    n: usize,
  },
  /// [`Stream::timed_window`].
  TimedWindow {
    /// Tick length in seconds.
    interval: f64,
  },
  /// [`Stream::delay`].
  Delay {
    /// Quiet period in seconds.
    interval: f64,
  },
  /// [`Stream::rate_limit`].
  RateLimit {
    /// Minimum spacing in seconds.
    interval: f64,
  },
  /// [`Stream::buffer`].
  Buffer {
    /// Queue capacity.
    n: usize,
  },
  /// [`Stream::unique`] over JSON values, keyed by their serialized form.
  Unique {
    /// Number of remembered keys; unbounded when absent.
    #[serde(default)]
    history: Option<usize>,
  },
  /// [`Stream::concat`].
  Concat,
}

impl StageConfig {
  /// Wires this stage on top of `input`.
  ///
  /// # Errors
  ///
  /// Propagates the construction errors of the stage's combinator and rejects
  /// negative or non-finite intervals.
  pub fn apply(&self, input: &Stream) -> Result<Stream> {
    match self {
      StageConfig::Partition { n } => input.partition(*n),
      StageConfig::SlidingWindow { n } => input.sliding_window(*n),
      StageConfig::TimedWindow { interval } => {
        input.timed_window(seconds("timed_window", *interval)?)
      }
      StageConfig::Delay { interval } => input.delay(seconds("delay", *interval)?),
      StageConfig::RateLimit { interval } => {
        Ok(input.rate_limit(seconds("rate_limit", *interval)?))
      }
      StageConfig::Buffer { n } => input.buffer(*n),
      StageConfig::Unique { history } => {
        input.unique_by(*history, |value: &Value| value.to_string())
      }
      StageConfig::Concat => Ok(input.concat()),
    }
  }
}

fn seconds(operator: &'static str, interval: f64) -> Result<Duration> {
  Duration::try_from_secs_f64(interval).map_err(|err| StreamError::InvalidArgument {
    operator,
    reason: format!("interval of {interval}s: {err}"),
  })
}

/// A linear chain of stages plus engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
  /// Engine settings for the graph.
  #[serde(default)]
  pub engine: EngineConfig,
  /// Stages, applied in order.
  #[serde(default)]
  pub stages: Vec<StageConfig>,
}

impl PipelineConfig {
  /// Parses a pipeline from JSON.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::Config`] for malformed JSON or unknown stages.
  pub fn from_json_str(json: &str) -> Result<Self> {
    Ok(serde_json::from_str(json)?)
  }

  /// Reads and parses a pipeline file.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::Io`] if the file cannot be read and
  /// [`StreamError::Config`] if it cannot be parsed.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), "loaded pipeline configuration");
    Self::from_json_str(&json)
  }

  /// A fresh context carrying this pipeline's engine settings.
  pub fn context(&self) -> Context {
    Context::new().config_from(self.engine.clone())
  }

  /// Wires every stage on top of `input` and returns the last one.
  ///
  /// # Errors
  ///
  /// Fails on the first stage that cannot be built. Stages wired before it stay
  /// attached to the graph.
  pub fn build(&self, input: &Stream) -> Result<Stream> {
    let mut current = input.clone();
    for stage in &self.stages {
      current = stage.apply(&current)?;
    }
    debug!(stages = self.stages.len(), "built pipeline");
    Ok(current)
  }
}
