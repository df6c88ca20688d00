use crate::node::Stream;
use crate::value::{Group, item};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_collect_holds_until_flush() {
  let source = Stream::source();
  let collector = source.collect();
  let out = collector.stream().sink_to_list();

  for x in [1, 2, 3] {
    source.emit(item(x)).await.unwrap();
  }
  assert!(out.is_empty());
  assert_eq!(collector.len(), 3);

  collector.flush().await.unwrap();

  assert_eq!(out.groups::<i32>(), vec![vec![1, 2, 3]]);
  assert!(collector.is_empty());
}

#[tokio::test]
async fn test_flush_of_empty_cache_emits_empty_group() {
  let source = Stream::source();
  let collector = source.collect();
  let out = collector.stream().sink_to_list();

  collector.flush().await.unwrap();

  assert_eq!(out.groups::<i32>(), vec![Vec::<i32>::new()]);
}

#[tokio::test]
async fn test_collect_into_external_cache() {
  let cache = Arc::new(Mutex::new(vec![item(0)]));
  let source = Stream::source();
  let collector = source.collect_into(Arc::clone(&cache));
  let out = collector.stream().sink_to_list();

  source.emit(item(1)).await.unwrap();
  assert_eq!(cache.lock().unwrap().len(), 2);

  collector.flush().await.unwrap();

  assert_eq!(out.groups::<i32>(), vec![vec![0, 1]]);
  assert!(cache.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_flush_on_trigger_stream() {
  let source = Stream::source();
  let trigger = Stream::source();
  let collector = source.collect();
  collector.flush_on(&trigger);
  let out = collector.stream().sink_to_list();

  source.emit(item(1)).await.unwrap();
  source.emit(item(2)).await.unwrap();
  trigger.emit(item(())).await.unwrap();
  source.emit(item(3)).await.unwrap();
  trigger.emit(item(())).await.unwrap();

  assert_eq!(out.groups::<i32>(), vec![vec![1, 2], vec![3]]);
  assert_eq!(out.values::<Group>().len(), 2);
}
