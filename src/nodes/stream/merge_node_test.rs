use crate::document::Document;
use crate::error::StreamError;
use crate::node::Stream;
use crate::value::item;
use serde_json::{Value, json};

#[tokio::test]
async fn test_merge_updates_json_objects() {
  let a = Stream::source();
  let b = Stream::source();
  let out = a.merge(&[&b]).unwrap().sink_to_list();

  a.emit(item(json!({"x": 1, "y": 1}))).await.unwrap();
  b.emit(item(json!({"y": 2, "z": 3}))).await.unwrap();

  assert_eq!(out.values::<Value>(), vec![json!({"x": 1, "y": 2, "z": 3})]);
}

#[tokio::test]
async fn test_merge_uses_document_capability() {
  let a = Stream::source();
  let b = Stream::source();
  let out = a.merge(&[&b]).unwrap().sink_to_list();

  a.emit(item(Document::new().with_attribute("stage", "a"))).await.unwrap();
  b.emit(item(Document::new().with_attribute("stage", "b").with_arg(item(1))))
    .await
    .unwrap();

  let docs = out.values::<Document>();
  assert_eq!(docs[0].attribute("stage"), Some(&json!("b")));
  assert_eq!(docs[0].args().len(), 1);
}

#[tokio::test]
async fn test_merge_rejects_plain_values() {
  let a = Stream::source();
  let b = Stream::source();
  let merged = a.merge(&[&b]).unwrap();
  merged.set_name("merger");
  let _out = merged.sink_to_list();

  a.emit(item(1)).await.unwrap();
  let err = b.emit(item(2)).await.unwrap_err();

  assert!(matches!(err, StreamError::NotMergeable { ref node } if node == "merger"));
}

#[tokio::test]
async fn test_merge_rounds_are_lockstep() {
  let a = Stream::source();
  let b = Stream::source();
  let out = a.merge(&[&b]).unwrap().sink_to_list();

  a.emit(item(json!({"round": 1}))).await.unwrap();
  a.emit(item(json!({"round": 2}))).await.unwrap();
  b.emit(item(json!({"b": 1}))).await.unwrap();

  assert_eq!(out.values::<Value>(), vec![json!({"round": 1, "b": 1})]);
}

#[test]
fn test_merge_rejects_zero_maxsize() {
  let a = Stream::source();
  let b = Stream::source();

  let err = a.merge_with_maxsize(&[&b], 0).unwrap_err();

  assert!(matches!(err, StreamError::InvalidArgument { operator: "merge", .. }));
  assert!(b.listeners().is_empty());
}
