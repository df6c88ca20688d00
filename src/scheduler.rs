//! # Scheduler
//!
//! Runs the background loops owned by time- and queue-driven nodes (buffer, delay,
//! timed window) on the tokio runtime.
//!
//! Loops never stop on their own. The only way to end them is an explicit
//! [`Scheduler::shutdown`]. A loop that returns an error is logged and left in the
//! [`TaskState::Failed`] state; it is not restarted.

use crate::error::{Result, StreamError};
use crate::lock::lock;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, error};

/// Lifecycle of a background loop.
#[derive(Debug, Clone)]
pub enum TaskState {
  /// The loop is alive (possibly suspended on a queue or timer).
  Running,
  /// The loop returned without error.
  Finished,
  /// The loop stopped because its body returned an error.
  Failed(Arc<StreamError>),
  /// The loop was aborted by [`Scheduler::shutdown`].
  Cancelled,
}

/// Handle to one background loop.
#[derive(Clone)]
pub struct TaskHandle {
  name: Arc<str>,
  state: Arc<Mutex<TaskState>>,
  abort: AbortHandle,
}

impl TaskHandle {
  /// Name of the task (the owning node's name).
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Current state of the task.
  pub fn state(&self) -> TaskState {
    lock(&self.state).clone()
  }

  /// Returns `true` while the loop is alive.
  pub fn is_running(&self) -> bool {
    matches!(self.state(), TaskState::Running)
  }

  pub(crate) fn cancel(&self) {
    let mut state = lock(&self.state);
    if matches!(*state, TaskState::Running) {
      self.abort.abort();
      *state = TaskState::Cancelled;
    }
  }
}

impl std::fmt::Debug for TaskHandle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TaskHandle")
      .field("name", &self.name)
      .field("state", &self.state())
      .finish()
  }
}

#[derive(Default)]
struct SchedulerInner {
  handle: Option<Handle>,
  tasks: Mutex<Vec<TaskHandle>>,
}

/// Spawns and tracks the background loops of one graph.
#[derive(Clone, Default)]
pub struct Scheduler {
  inner: Arc<SchedulerInner>,
}

impl Scheduler {
  /// Creates a scheduler that spawns onto the runtime current at spawn time.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a scheduler bound to an explicit runtime.
  pub fn with_handle(handle: Handle) -> Self {
    Self {
      inner: Arc::new(SchedulerInner {
        handle: Some(handle),
        tasks: Mutex::new(Vec::new()),
      }),
    }
  }

  /// The runtime loops will be spawned onto.
  ///
  /// Nodes owning a loop check this before wiring themselves.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::NoScheduler`] when no runtime is reachable.
  pub fn runtime(&self, task: &str) -> Result<Handle> {
    match &self.inner.handle {
      Some(handle) => Ok(handle.clone()),
      None => Handle::try_current().map_err(|_| StreamError::NoScheduler {
        task: task.to_string(),
      }),
    }
  }

  /// Spawns a background loop.
  ///
  /// # Errors
  ///
  /// Returns [`StreamError::NoScheduler`] when no runtime handle is configured and
  /// the caller is not inside a tokio runtime.
  pub fn spawn<F>(&self, name: &str, task: F) -> Result<TaskHandle>
  where
    F: Future<Output = Result<()>> + Send + 'static,
  {
    let runtime = self.runtime(name)?;
    let name: Arc<str> = Arc::from(name);
    let state = Arc::new(Mutex::new(TaskState::Running));
    let task_name = Arc::clone(&name);
    let task_state = Arc::clone(&state);

    let join = runtime.spawn(async move {
      let outcome = task.await;
      let mut state = lock(&task_state);
      *state = match outcome {
        Ok(()) => TaskState::Finished,
        Err(err) => {
          error!(task = %task_name, error = %err, "background loop stopped");
          TaskState::Failed(Arc::new(err))
        }
      };
    });
    debug!(task = %name, "spawned background loop");

    let handle = TaskHandle {
      name,
      state,
      abort: join.abort_handle(),
    };
    lock(&self.inner.tasks).push(handle.clone());
    Ok(handle)
  }

  /// Handles of every loop spawned so far.
  pub fn tasks(&self) -> Vec<TaskHandle> {
    lock(&self.inner.tasks).clone()
  }

  /// Handles of loops that stopped because of an error.
  pub fn failed(&self) -> Vec<TaskHandle> {
    self
      .tasks()
      .into_iter()
      .filter(|task| matches!(task.state(), TaskState::Failed(_)))
      .collect()
  }

  /// Aborts every running loop.
  pub fn shutdown(&self) {
    let tasks = self.tasks();
    debug!(count = tasks.len(), "shutting down scheduler");
    for task in tasks {
      task.cancel();
    }
  }
}
