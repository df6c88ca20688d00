use crate::document::{Document, Selector};
use crate::error::StreamError;
use crate::node::Stream;
use crate::value::item;

#[tokio::test]
async fn test_select_remaps_documents() {
  let source = Stream::source();
  let out = source.select_specs(&["b:", "0:first"]).unwrap().sink_to_list();

  let doc = Document::new().with_arg(item(10)).with_kwarg("b", item(20));
  source.emit(item(doc)).await.unwrap();

  let docs = out.values::<Document>();
  assert_eq!(docs[0].args()[0].downcast_ref::<i32>(), Some(&20));
  assert_eq!(docs[0].kwargs()["first"].downcast_ref::<i32>(), Some(&10));
}

#[tokio::test]
async fn test_select_specs_fail_at_construction() {
  let source = Stream::source();
  let err = source.select_specs(&["0", "1:2"]).unwrap_err();

  assert!(matches!(err, StreamError::MalformedSelector { .. }));
  assert!(source.listeners().is_empty());
}

#[tokio::test]
async fn test_select_missing_field_fails_the_push() {
  let source = Stream::source();
  let _out = source.select([Selector::name("absent")]).sink_to_list();

  let err = source.emit(item(Document::new())).await.unwrap_err();
  assert!(matches!(err, StreamError::MissingField { .. }));
}

#[tokio::test]
async fn test_select_rejects_non_documents() {
  let source = Stream::source();
  let _out = source.select([Selector::position(0)]).sink_to_list();

  let err = source.emit(item(1)).await.unwrap_err();
  assert!(matches!(err, StreamError::TypeMismatch { operator: "select", .. }));
}
