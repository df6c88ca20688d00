//! End-to-end graphs built only through the public API.

use pushweave::{
  Context, Document, EngineConfig, PipelineConfig, Scheduler, Selector, Stream, TaskState,
  init_tracing, item,
};
use tokio::sync::mpsc;

#[tokio::test]
async fn test_document_pipeline() {
  init_tracing();
  let context = Context::new().config_from(EngineConfig { default_maxsize: 4 });
  let images = context.source("images");
  let calibration = context.source("calibration");

  let reduced = images
    .combine_latest(&[&calibration])
    .select_specs(&["0:", "scale:"])
    .unwrap()
    .map(|pair: &pushweave::Group| {
      let image = *pair[0].downcast_ref::<f64>().unwrap();
      let scale = *pair[1].downcast_ref::<f64>().unwrap();
      image * scale
    });
  let totals = reduced.scan(|total: &f64, x: &f64| total + x).sink_to_list();

  calibration
    .emit(item(Document::new().with_kwarg("scale", item(2.0f64))))
    .await
    .unwrap();
  for value in [1.0f64, 2.0, 3.0] {
    let doc = Document::new()
      .with_arg(item(value))
      .with_attribute("detector", "saxs");
    images.emit(item(doc)).await.unwrap();
  }

  let totals: Vec<f64> = totals
    .values::<Document>()
    .iter()
    .map(|doc| *doc.get_return().downcast_ref::<f64>().unwrap())
    .collect();
  assert_eq!(totals, vec![2.0, 6.0, 12.0]);
}

#[tokio::test]
async fn test_selectors_parse_through_public_api() {
  let selector: Selector = "1:energy".parse().unwrap();
  assert_eq!(selector.to_string(), "1:energy");
}

#[tokio::test(start_paused = true)]
async fn test_configured_pipeline_with_background_loops() {
  let config = PipelineConfig::from_json_str(
    r#"{
      "engine": { "default_maxsize": 2 },
      "stages": [
        { "op": "buffer", "n": 4 },
        { "op": "delay", "interval": 0.5 },
        { "op": "partition", "n": 2 }
      ]
    }"#,
  )
  .unwrap();
  let scheduler = Scheduler::new();
  let context = config.context().scheduler_from(scheduler.clone());
  let source = context.source("in");

  let (tx, mut rx) = mpsc::unbounded_channel();
  config.build(&source).unwrap().sink_async(move |group| {
    let tx = tx.clone();
    async move {
      let _ = tx.send(pushweave::group_values::<i32>(&group)?);
      Ok::<(), pushweave::StreamError>(())
    }
  });

  for x in 0..4 {
    source.emit(item(x)).await.unwrap();
  }
  assert_eq!(rx.recv().await, Some(vec![0, 1]));
  assert_eq!(rx.recv().await, Some(vec![2, 3]));

  assert_eq!(scheduler.tasks().len(), 2);
  scheduler.shutdown();
  assert!(
    scheduler
      .tasks()
      .iter()
      .all(|task| matches!(task.state(), TaskState::Cancelled))
  );
}

#[tokio::test]
async fn test_merge_and_union_fan_in() {
  let a = Stream::source();
  let b = Stream::source();
  let everything = a.union(&[&b]).sink_to_list();
  let merged = a.merge(&[&b]).unwrap().sink_to_list();

  a.emit(item(serde_json::json!({"a": 1}))).await.unwrap();
  b.emit(item(serde_json::json!({"b": 2}))).await.unwrap();

  assert_eq!(everything.len(), 2);
  assert_eq!(
    merged.values::<serde_json::Value>(),
    vec![serde_json::json!({"a": 1, "b": 2})]
  );
}
