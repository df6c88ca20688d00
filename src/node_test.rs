use crate::error::{Result, StreamError};
use crate::node::{Node, NodeId, Stream};
use crate::scheduler::TaskState;
use crate::value::{Item, item};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Counting {
  seen: Arc<AtomicUsize>,
}

#[async_trait]
impl Node for Counting {
  fn kind(&self) -> &'static str {
    "counting"
  }

  async fn update(&self, stream: &Stream, item: Item, _from: NodeId) -> Result<()> {
    self.seen.fetch_add(1, Ordering::SeqCst);
    stream.emit(item).await
  }
}

#[tokio::test]
async fn test_custom_nodes_plug_in_with_pipe() {
  let seen = Arc::new(AtomicUsize::new(0));
  let source = Stream::source();
  let counted = source.pipe(Counting {
    seen: Arc::clone(&seen),
  });
  let out = counted.sink_to_list();

  source.emit(item(1)).await.unwrap();
  source.emit(item(2)).await.unwrap();

  assert_eq!(seen.load(Ordering::SeqCst), 2);
  assert_eq!(out.values::<i32>(), vec![1, 2]);
  assert_eq!(counted.kind(), "counting");
}

#[test]
fn test_default_names_and_renaming() {
  let source = Stream::source();
  assert_eq!(source.name(), "source");

  let mapped = source.map(|x: &i32| *x);
  assert_eq!(mapped.name(), format!("map#{}", mapped.id()));

  mapped.set_name("increment");
  assert_eq!(mapped.name(), "increment");
}

#[test]
fn test_ids_are_unique() {
  let a = Stream::source();
  let b = Stream::source();
  assert_ne!(a.id(), b.id());
  assert_ne!(a, b);
  assert_eq!(a, a.clone());
}

#[test]
fn test_listeners_keep_registration_order() {
  let source = Stream::source();
  let first = source.map(|x: &i32| *x);
  let second = source.filter(|_: &i32| true);

  assert_eq!(source.listeners(), vec![first.clone(), second]);
  assert_eq!(first.inputs(), &[source.id()]);
}

#[test]
fn test_input_index_resolves_edges() {
  let a = Stream::source();
  let b = Stream::source();
  let stranger = Stream::source();
  let zipped = a.zip(&[&b]).unwrap();

  assert_eq!(zipped.input_index(a.id()).unwrap(), 0);
  assert_eq!(zipped.input_index(b.id()).unwrap(), 1);
  let err = zipped.input_index(stranger.id()).unwrap_err();
  assert!(matches!(err, StreamError::UnknownInput { .. }));
  assert!(err.is_wiring());
}

#[tokio::test]
async fn test_emit_without_listeners_is_a_no_op() {
  Stream::source().emit(item(1)).await.unwrap();
}

#[tokio::test]
async fn test_fan_out_reaches_listeners_in_order() {
  let source = Stream::source();
  let order = Arc::new(std::sync::Mutex::new(Vec::new()));
  for tag in ["a", "b", "c"] {
    let order = Arc::clone(&order);
    source.sink(move |_: &i32| order.lock().unwrap().push(tag));
  }

  source.emit(item(1)).await.unwrap();

  assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_nodes_inherit_first_input_context() {
  let context = crate::Context::new();
  let a = context.source("a");
  let b = Stream::source();
  let joined = a.union(&[&b]);

  let _ = joined.buffer(1).unwrap();
  assert_eq!(context.scheduler().tasks().len(), 1);
  assert!(b.context().scheduler().tasks().is_empty());
}

#[tokio::test]
async fn test_second_loop_is_refused() {
  let source = Stream::source();
  source.spawn_loop(std::future::pending()).unwrap();

  let err = source.spawn_loop(std::future::pending()).unwrap_err();

  assert!(matches!(err, StreamError::InvalidArgument { operator: "source", .. }));
  assert!(source.task().unwrap().is_running());
  let tasks = source.context().scheduler().tasks();
  assert_eq!(tasks.len(), 2);
  assert!(matches!(tasks[1].state(), TaskState::Cancelled));
  source.context().scheduler().shutdown();
}
