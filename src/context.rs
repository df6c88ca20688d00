//! Shared state of one graph: dispatch registry, scheduler and engine settings.

use crate::config::EngineConfig;
use crate::dispatch::Registry;
use crate::node::Stream;
use crate::scheduler::Scheduler;
use std::sync::Arc;

/// Everything nodes of one graph share.
///
/// Nodes inherit the context of their first input, so building a graph from
/// sources created by the same context keeps its background loops under one
/// [`Scheduler`].
#[derive(Clone)]
pub struct Context {
  registry: Arc<Registry>,
  scheduler: Scheduler,
  config: Arc<EngineConfig>,
}

impl Default for Context {
  fn default() -> Self {
    Self {
      registry: Registry::global(),
      scheduler: Scheduler::new(),
      config: Arc::new(EngineConfig::default()),
    }
  }
}

impl Context {
  /// Creates a context using the process-wide registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a context with a private registry.
  pub fn with_registry(registry: Arc<Registry>) -> Self {
    Self {
      registry,
      ..Self::default()
    }
  }

  /// Replaces the scheduler.
  pub fn scheduler_from(mut self, scheduler: Scheduler) -> Self {
    self.scheduler = scheduler;
    self
  }

  /// Replaces the engine settings.
  pub fn config_from(mut self, config: EngineConfig) -> Self {
    self.config = Arc::new(config);
    self
  }

  /// Creates a named source stream in this context.
  pub fn source(&self, name: &str) -> Stream {
    Stream::source_in(self.clone(), name)
  }

  /// The dispatch registry.
  pub fn registry(&self) -> &Arc<Registry> {
    &self.registry
  }

  /// The scheduler running background loops.
  pub fn scheduler(&self) -> &Scheduler {
    &self.scheduler
  }

  /// Engine settings.
  pub fn config(&self) -> &EngineConfig {
    &self.config
  }
}
