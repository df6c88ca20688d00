//! # Payload Values
//!
//! Values flowing through a graph are type-erased and shared: every push hands out
//! an `Arc` clone, so fan-out never copies the payload.
//!
//! Combinators that produce ordered groups (partition, windows, zip, collect)
//! emit a [`Group`], which is itself carried as an [`Item`].

use crate::error::{Result, StreamError};
use std::any::{Any, type_name};
use std::sync::Arc;

/// A value travelling through the graph.
pub type Item = Arc<dyn Any + Send + Sync>;

/// An ordered group of values, emitted by windowing and synchronizing nodes.
pub type Group = Vec<Item>;

/// Wraps a value as an [`Item`].
pub fn item<T>(value: T) -> Item
where
  T: Any + Send + Sync,
{
  Arc::new(value)
}

/// Borrows the payload of an item as `T`.
///
/// # Errors
///
/// Returns [`StreamError::TypeMismatch`] when the item holds another type.
pub fn downcast_ref<'a, T>(item: &'a Item, operator: &'static str) -> Result<&'a T>
where
  T: Any,
{
  item
    .downcast_ref::<T>()
    .ok_or(StreamError::TypeMismatch {
      operator,
      expected: type_name::<T>(),
    })
}

/// Returns `true` if the item holds a `T`.
pub fn is<T: Any>(item: &Item) -> bool {
  item.is::<T>()
}

/// Borrows an item as a [`Group`].
pub fn as_group(item: &Item) -> Option<&Group> {
  item.downcast_ref::<Group>()
}

/// Clones every member of a group as `T`.
///
/// # Errors
///
/// Fails if the item is not a group or if any member holds another type.
pub fn group_values<T>(item: &Item) -> Result<Vec<T>>
where
  T: Any + Clone,
{
  let group = downcast_ref::<Group>(item, "group_values")?;
  group
    .iter()
    .map(|member| downcast_ref::<T>(member, "group_values").cloned())
    .collect()
}
