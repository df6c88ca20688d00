use crate::document::Document;
use crate::error::StreamError;
use crate::node::Stream;
use crate::value::item;
use std::collections::HashMap;

#[tokio::test]
async fn test_scan_passes_first_value_through() {
  let source = Stream::source();
  let out = source.scan(|total: &i32, x: &i32| total + x).sink_to_list();

  for x in [1, 1, 4] {
    source.emit(item(x)).await.unwrap();
  }

  assert_eq!(out.values::<i32>(), vec![1, 2, 6]);
}

#[tokio::test]
async fn test_scan_from_seed_calls_function_first() {
  let source = Stream::source();
  let out = source
    .scan_from(10, |total: &i32, x: &i32| total + x)
    .sink_to_list();

  for x in [1, 2] {
    source.emit(item(x)).await.unwrap();
  }

  assert_eq!(out.values::<i32>(), vec![11, 13]);
}

#[tokio::test]
async fn test_scan_with_different_state_type() {
  let source = Stream::source();
  let out = source
    .scan_from(Vec::<i32>::new(), |seen: &Vec<i32>, x: &i32| {
      let mut seen = seen.clone();
      seen.push(*x);
      seen
    })
    .sink_to_list();

  source.emit(item(3)).await.unwrap();
  source.emit(item(4)).await.unwrap();

  assert_eq!(out.values::<Vec<i32>>(), vec![vec![3], vec![3, 4]]);
}

#[tokio::test]
async fn test_scan_error_keeps_state() {
  let source = Stream::source();
  let out = source.scan(|total: &i32, x: &i32| total + x).sink_to_list();

  source.emit(item(1)).await.unwrap();
  let err = source.emit(item("two")).await.unwrap_err();
  source.emit(item(2)).await.unwrap();

  assert!(matches!(err, StreamError::TypeMismatch { operator: "scan", .. }));
  assert_eq!(out.values::<i32>(), vec![1, 3]);
}

#[tokio::test]
async fn test_scan_unwraps_documents() {
  let source = Stream::source();
  let out = source.scan(|total: &i32, x: &i32| total + x).sink_to_list();

  for x in [1, 2, 3] {
    let doc = Document::new().with_arg(item(x)).with_attribute("run", x);
    source.emit(item(doc)).await.unwrap();
  }

  let totals: Vec<i32> = out
    .values::<Document>()
    .iter()
    .map(|doc| *doc.get_return().downcast_ref::<i32>().unwrap())
    .collect();
  assert_eq!(totals, vec![1, 3, 6]);
}

#[tokio::test]
async fn test_scan_raw_sees_containers() {
  let source = Stream::source();
  let out = source
    .scan_raw(|total: &Document, next: &Document| total.merge_with(&[next]))
    .sink_to_list();

  source.emit(item(Document::new().with_arg(item(1)))).await.unwrap();
  source.emit(item(Document::new().with_arg(item(2)))).await.unwrap();

  let docs = out.values::<Document>();
  assert_eq!(docs[1].args().len(), 2);
}

#[tokio::test]
async fn test_scan_folds_whole_documents() {
  let source = Stream::source();
  let out = source
    .scan(|total: &Document, next: &Document| total.merge_with(&[next]))
    .sink_to_list();

  let first = Document::new().with_arg(item(1)).with_kwarg("k", item(1));
  let second = Document::new().with_arg(item(2)).with_kwarg("j", item(2));
  source.emit(item(first)).await.unwrap();
  source.emit(item(second)).await.unwrap();
  source.emit(item(Document::new())).await.unwrap();

  let docs = out.values::<Document>();
  assert_eq!(docs.len(), 3);
  assert_eq!(docs[1].args().len(), 2);
  assert!(docs[1].kwargs().contains_key("k"));
  assert!(docs[1].kwargs().contains_key("j"));
  assert_eq!(docs[2].args().len(), 2);
}

#[tokio::test]
async fn test_scan_from_empty_document() {
  let source = Stream::source();
  let out = source
    .scan_from(Document::new(), |total: &Document, x: &i32| {
      total.clone().with_arg(item(*x))
    })
    .sink_to_list();

  source.emit(item(5)).await.unwrap();

  let docs = out.values::<Document>();
  assert_eq!(docs.len(), 1);
  assert_eq!(docs[0].args()[0].downcast_ref::<i32>(), Some(&5));
}

#[tokio::test]
async fn test_frequencies_counts_values() {
  let source = Stream::source();
  let out = source.frequencies::<&str>().sink_to_list();

  for word in ["a", "b", "a"] {
    source.emit(item(word)).await.unwrap();
  }

  let counts = out.values::<HashMap<&str, usize>>();
  assert_eq!(counts.len(), 3);
  assert_eq!(counts[2]["a"], 2);
  assert_eq!(counts[2]["b"], 1);
}
