use super::ZipNode;
use crate::document::Document;
use crate::error::StreamError;
use crate::node::{Node, Stream};
use crate::value::item;
use tokio_test::{assert_pending, assert_ready_ok, task};

#[tokio::test]
async fn test_zip_pairs_in_arrival_order() {
  let a = Stream::source();
  let b = Stream::source();
  let out = a.zip(&[&b]).unwrap().sink_to_list();

  a.emit(item(1)).await.unwrap();
  a.emit(item(2)).await.unwrap();
  assert!(out.is_empty());
  b.emit(item(10)).await.unwrap();
  b.emit(item(20)).await.unwrap();
  b.emit(item(30)).await.unwrap();
  a.emit(item(3)).await.unwrap();

  assert_eq!(
    out.groups::<i32>(),
    vec![vec![1, 10], vec![2, 20], vec![3, 30]]
  );
}

#[tokio::test]
async fn test_zip_three_inputs() {
  let a = Stream::source();
  let b = Stream::source();
  let c = Stream::source();
  let out = a.zip(&[&b, &c]).unwrap().sink_to_list();

  c.emit(item(3)).await.unwrap();
  a.emit(item(1)).await.unwrap();
  b.emit(item(2)).await.unwrap();

  assert_eq!(out.groups::<i32>(), vec![vec![1, 2, 3]]);
}

#[tokio::test]
async fn test_zip_suspends_input_running_ahead() {
  let a = Stream::source();
  let b = Stream::source();
  let out = a.zip_with_maxsize(&[&b], 2).unwrap().sink_to_list();

  a.emit(item(1)).await.unwrap();
  a.emit(item(2)).await.unwrap();

  let mut third = task::spawn(a.emit(item(3)));
  assert_pending!(third.poll());

  b.emit(item(10)).await.unwrap();
  assert!(third.is_woken());
  assert_ready_ok!(third.poll());

  b.emit(item(20)).await.unwrap();
  b.emit(item(30)).await.unwrap();
  assert_eq!(
    out.groups::<i32>(),
    vec![vec![1, 10], vec![2, 20], vec![3, 30]]
  );
}

#[tokio::test]
async fn test_zip_keeps_documents_apart() {
  let a = Stream::source();
  let b = Stream::source();
  let out = a.zip(&[&b]).unwrap().sink_to_list();

  a.emit(item(Document::new().with_arg(item(1)))).await.unwrap();
  b.emit(item(Document::new().with_arg(item(2)))).await.unwrap();

  let rounds = out.groups::<Document>();
  assert_eq!(rounds.len(), 1);
  assert_eq!(rounds[0].len(), 2);
  assert_eq!(rounds[0][0].args()[0].downcast_ref::<i32>(), Some(&1));
  assert_eq!(rounds[0][1].args()[0].downcast_ref::<i32>(), Some(&2));
}

#[tokio::test]
async fn test_zip_node_reports_depths() {
  let node = ZipNode::new(2, 10).unwrap();
  assert_eq!(node.kind(), "zip");
  assert_eq!(node.depths(), vec![0, 0]);
}

#[tokio::test]
async fn test_zip_uses_configured_default_maxsize() {
  use crate::config::EngineConfig;
  use crate::context::Context;

  let context = Context::new().config_from(EngineConfig { default_maxsize: 1 });
  let a = context.source("a");
  let b = context.source("b");
  let _out = a.zip(&[&b]).unwrap().sink_to_list();

  a.emit(item(1)).await.unwrap();
  let mut second = task::spawn(a.emit(item(2)));
  assert_pending!(second.poll());
  b.emit(item(1)).await.unwrap();
  assert_ready_ok!(second.poll());
}

#[test]
fn test_zip_rejects_zero_maxsize() {
  let a = Stream::source();
  let b = Stream::source();

  let err = a.zip_with_maxsize(&[&b], 0).unwrap_err();

  assert!(matches!(err, StreamError::InvalidArgument { operator: "zip", .. }));
  assert!(a.listeners().is_empty());
}

#[test]
fn test_zip_rejects_zero_default_maxsize() {
  use crate::config::EngineConfig;
  use crate::context::Context;

  let context = Context::new().config_from(EngineConfig { default_maxsize: 0 });
  let a = context.source("a");
  let b = context.source("b");

  assert!(a.zip(&[&b]).is_err());
}
