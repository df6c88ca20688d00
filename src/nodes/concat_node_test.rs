use crate::error::StreamError;
use crate::node::Stream;
use crate::value::{Group, item};

#[tokio::test]
async fn test_concat_emits_members_in_order() {
  let source = Stream::source();
  let out = source.concat().sink_to_list();

  source.emit(item(vec![item(1), item(2)])).await.unwrap();
  source.emit(item(Group::new())).await.unwrap();
  source.emit(item(vec![item(3)])).await.unwrap();

  assert_eq!(out.values::<i32>(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_concat_rejects_scalars() {
  let source = Stream::source();
  let flat = source.flatten();
  flat.set_name("flat");
  let _out = flat.sink_to_list();

  let err = source.emit(item(1)).await.unwrap_err();
  assert!(matches!(err, StreamError::NotIterable { ref node } if node == "flat"));
}

#[tokio::test]
async fn test_partition_then_concat_restores_sequence() {
  let source = Stream::source();
  let out = source.partition(2).unwrap().concat().sink_to_list();

  for x in 1..=6 {
    source.emit(item(x)).await.unwrap();
  }

  assert_eq!(out.values::<i32>(), vec![1, 2, 3, 4, 5, 6]);
}
