//! # Dispatch Registry
//!
//! Lets container payloads take part in `map`, `scan` and the merging nodes without
//! the combinators knowing their shape.
//!
//! Two tables are consulted by the runtime type of a value:
//!
//! - **transform**: how to apply a function to a value of type `T`
//! - **accumulate**: how to fold the next value into a previous state of type `T`
//!
//! A handler unwraps the container, calls the continuation it is given (which
//! re-enters dispatch, so nested containers compose), and rewraps the result.
//! Unregistered types fall back to calling the function on the raw value. A
//! handler that hands the continuation the very value it was dispatched on
//! reaches the function directly, so dispatch always terminates.
//!
//! A third table records merge capabilities used by `merge` and
//! `combine_latest`.
//!
//! Types opt in by implementing [`Unwrap`] or [`Mergeable`] and calling
//! [`Registry::register`] / [`Registry::register_merge`]. Registration may happen at
//! any time, also while values are flowing; the last registration for a type wins.

use crate::document::Document;
use crate::error::{Result, StreamError};
use crate::lock::{read, write};
use crate::value::{Group, Item, downcast_ref};
use serde_json::Value;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};
use tracing::debug;

/// Type-erased element-wise function, as applied by `map`.
pub type Transform = Arc<dyn Fn(Item) -> Result<Item> + Send + Sync>;

/// Type-erased pairwise function `(state, next) -> state`, as applied by `scan`.
pub type Accumulate = Arc<dyn Fn(Item, Item) -> Result<Item> + Send + Sync>;

/// Continuation handed to transform handlers.
pub type TransformCont<'a> = &'a dyn Fn(Item) -> Result<Item>;

/// Continuation handed to accumulate handlers.
pub type AccumulateCont<'a> = &'a dyn Fn(Item, Item) -> Result<Item>;

type TransformHandler =
  Arc<dyn for<'a> Fn(Item, TransformCont<'a>) -> Result<Item> + Send + Sync>;
type AccumulateHandler =
  Arc<dyn for<'a> Fn(Item, Item, AccumulateCont<'a>) -> Result<Item> + Send + Sync>;
type MergeHandler = Arc<dyn Fn(&Item, &[Item]) -> Result<Item> + Send + Sync>;

/// Container payloads whose inner value should be transformed instead of the
/// container itself.
pub trait Unwrap: Any + Send + Sync + Sized {
  /// The carried value functions should see.
  ///
  /// `None` means the container has no single payload: functions then receive
  /// the container itself and their result is not rewrapped.
  fn payload(&self) -> Option<Item>;

  /// Builds a container of the same kind around a new payload.
  fn rewrap(&self, payload: Item) -> Self;
}

/// Payloads that know how to combine themselves with other values.
pub trait Mergeable: Any + Send + Sync + Sized {
  /// Merges `others` into a copy of `self`, left to right.
  fn merge(&self, others: &[Item]) -> Result<Self>;
}

static GLOBAL: LazyLock<Arc<Registry>> = LazyLock::new(|| {
  let registry = Registry::new();
  registry.register::<Document>();
  registry.register_merge::<Document>();
  Arc::new(registry)
});

/// Type-keyed handler tables.
#[derive(Default)]
pub struct Registry {
  transforms: RwLock<HashMap<TypeId, TransformHandler>>,
  accumulators: RwLock<HashMap<TypeId, AccumulateHandler>>,
  mergers: RwLock<HashMap<TypeId, MergeHandler>>,
}

impl Registry {
  /// Creates an empty registry; every type takes the default path.
  pub fn new() -> Self {
    Self::default()
  }

  /// The process-wide registry, with [`Document`] pre-registered.
  pub fn global() -> Arc<Registry> {
    Arc::clone(&GLOBAL)
  }

  /// Registers transform and accumulate handlers for `T` through its [`Unwrap`] impl.
  pub fn register<T: Unwrap>(&self) {
    let transform = transform_handler(|value, cont| {
      let container = downcast_ref::<T>(&value, "dispatch")?;
      match container.payload() {
        Some(payload) => Ok(Arc::new(container.rewrap(cont(payload)?)) as Item),
        None => cont(Arc::clone(&value)),
      }
    });
    let accumulate = accumulate_handler(|state, next, cont| {
      let container = downcast_ref::<T>(&state, "dispatch")?;
      let next = match next.downcast_ref::<T>().and_then(T::payload) {
        Some(payload) => payload,
        None => next,
      };
      match container.payload() {
        Some(payload) => Ok(Arc::new(container.rewrap(cont(payload, next)?)) as Item),
        None => cont(Arc::clone(&state), next),
      }
    });
    debug!(payload = type_name::<T>(), "registered unwrap handlers");
    write(&self.transforms).insert(TypeId::of::<T>(), transform);
    write(&self.accumulators).insert(TypeId::of::<T>(), accumulate);
  }

  /// Registers a free-form transform handler for values of type `T`.
  pub fn register_transform<T, H>(&self, handler: H)
  where
    T: Any + Send + Sync,
    H: Fn(&T, TransformCont<'_>) -> Result<Item> + Send + Sync + 'static,
  {
    let handler = transform_handler(move |value, cont| {
      let container = downcast_ref::<T>(&value, "dispatch")?;
      handler(container, cont)
    });
    debug!(payload = type_name::<T>(), "registered transform handler");
    write(&self.transforms).insert(TypeId::of::<T>(), handler);
  }

  /// Registers a free-form accumulate handler for states of type `T`.
  pub fn register_accumulate<T, H>(&self, handler: H)
  where
    T: Any + Send + Sync,
    H: Fn(&T, Item, AccumulateCont<'_>) -> Result<Item> + Send + Sync + 'static,
  {
    let handler = accumulate_handler(move |state, next, cont| {
      let container = downcast_ref::<T>(&state, "dispatch")?;
      handler(container, next, cont)
    });
    debug!(payload = type_name::<T>(), "registered accumulate handler");
    write(&self.accumulators).insert(TypeId::of::<T>(), handler);
  }

  /// Registers the merge capability of `T`.
  pub fn register_merge<T: Mergeable>(&self) {
    let handler: MergeHandler = Arc::new(|first: &Item, rest: &[Item]| {
      let value = downcast_ref::<T>(first, "merge")?;
      Ok(Arc::new(value.merge(rest)?) as Item)
    });
    debug!(payload = type_name::<T>(), "registered merge handler");
    write(&self.mergers).insert(TypeId::of::<T>(), handler);
  }

  /// Returns `true` if `T` has a transform handler.
  pub fn handles<T: Any>(&self) -> bool {
    read(&self.transforms).contains_key(&TypeId::of::<T>())
  }

  /// Applies `f` to `value`, unwrapping registered containers on the way.
  pub fn transform(&self, f: &Transform, value: Item) -> Result<Item> {
    let handler = read(&self.transforms).get(&(*value).type_id()).cloned();
    match handler {
      Some(handler) => handler(Arc::clone(&value), &|inner| {
        if Arc::ptr_eq(&inner, &value) {
          f(inner)
        } else {
          self.transform(f, inner)
        }
      }),
      None => f(value),
    }
  }

  /// Folds `next` into `state` with `f`, dispatching on the type of `state`.
  pub fn accumulate(&self, f: &Accumulate, state: Item, next: Item) -> Result<Item> {
    let handler = read(&self.accumulators).get(&(*state).type_id()).cloned();
    match handler {
      Some(handler) => handler(Arc::clone(&state), next, &|inner, next| {
        if Arc::ptr_eq(&inner, &state) {
          f(inner, next)
        } else {
          self.accumulate(f, inner, next)
        }
      }),
      None => f(state, next),
    }
  }

  /// Merges `rest` into `first` if `first` has a registered merge capability.
  pub fn try_merge(&self, first: &Item, rest: &[Item]) -> Option<Result<Item>> {
    let handler = read(&self.mergers).get(&(**first).type_id()).cloned();
    handler.map(|handler| handler(first, rest))
  }

  /// Folds values left to right, preferring merge capabilities and falling back to
  /// a key-by-key update of JSON objects.
  pub fn merge_all(&self, node: &str, values: Group) -> Result<Item> {
    let mut values = values.into_iter();
    let Some(mut merged) = values.next() else {
      return Ok(Arc::new(Group::new()));
    };
    for next in values {
      merged = match self.try_merge(&merged, std::slice::from_ref(&next)) {
        Some(result) => result?,
        None => update_fields(node, &merged, &next)?,
      };
    }
    Ok(merged)
  }
}

fn transform_handler<F>(f: F) -> TransformHandler
where
  F: for<'a> Fn(Item, TransformCont<'a>) -> Result<Item> + Send + Sync + 'static,
{
  Arc::new(f)
}

fn accumulate_handler<F>(f: F) -> AccumulateHandler
where
  F: for<'a> Fn(Item, Item, AccumulateCont<'a>) -> Result<Item> + Send + Sync + 'static,
{
  Arc::new(f)
}

fn update_fields(node: &str, base: &Item, next: &Item) -> Result<Item> {
  let not_mergeable = || StreamError::NotMergeable {
    node: node.to_string(),
  };
  let (Some(Value::Object(base)), Some(Value::Object(next))) =
    (base.downcast_ref::<Value>(), next.downcast_ref::<Value>())
  else {
    return Err(not_mergeable());
  };
  let mut merged = base.clone();
  for (key, value) in next {
    merged.insert(key.clone(), value.clone());
  }
  Ok(Arc::new(Value::Object(merged)))
}
