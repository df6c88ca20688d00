use crate::error::StreamError;
use crate::node::Stream;
use crate::value::item;

#[tokio::test]
async fn test_filter_keeps_matching_values() {
  let source = Stream::source();
  let out = source.filter(|x: &i32| x % 2 == 0).sink_to_list();

  for x in 0..6 {
    source.emit(item(x)).await.unwrap();
  }

  assert_eq!(out.values::<i32>(), vec![0, 2, 4]);
}

#[tokio::test]
async fn test_remove_drops_matching_values() {
  let source = Stream::source();
  let out = source.remove(|x: &i32| x % 2 == 0).sink_to_list();

  for x in 0..6 {
    source.emit(item(x)).await.unwrap();
  }

  assert_eq!(out.values::<i32>(), vec![1, 3, 5]);
}

#[tokio::test]
async fn test_filter_type_mismatch() {
  let source = Stream::source();
  let _out = source.filter(|x: &i32| *x > 0).sink_to_list();

  let err = source.emit(item(1.5f64)).await.unwrap_err();
  assert!(matches!(err, StreamError::TypeMismatch { operator: "filter", .. }));
}
