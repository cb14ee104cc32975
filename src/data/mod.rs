//! Data abstraction layer for ggroup
//!
//! Grouping operates on row indices, never on row objects, so that it stays
//! generic over how the data is stored. The [`Table`] trait is the only thing
//! the transforms need from the data: a length, and a way to resolve an
//! [`Accessor`] into one [`Value`] per row.
//!
//! # Implementations
//!
//! - Polars `DataFrame`: columns are fields, a row's datum is an object keyed by column name
//! - `[Value]`: each value is its own datum
//! - `[serde_json::Value]`: JSON rows, typically objects or arrays

mod accessor;
mod frame;
mod value;

pub use accessor::{Accessor, KeyFn};
pub use value::Value;

use crate::Result;

/// Row-indexed data that key accessors can be resolved against
pub trait Table {
    /// Number of rows
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The row at `index`, as a value.
    fn datum(&self, index: usize) -> Result<Value>;

    /// Values of a named field, aligned with the rows.
    ///
    /// Rows without the field yield `Value::Null`.
    fn field(&self, name: &str) -> Result<Vec<Value>> {
        (0..self.len())
            .map(|i| {
                self.datum(i)
                    .map(|d| d.get(name).cloned().unwrap_or_default())
            })
            .collect()
    }

    /// The element at `position` of the row at `index`, for tuple-shaped rows.
    fn element(&self, index: usize, position: usize) -> Result<Value> {
        self.datum(index)
            .map(|d| d.element(position).cloned().unwrap_or_default())
    }
}

impl Table for [Value] {
    fn len(&self) -> usize {
        <[Value]>::len(self)
    }

    fn datum(&self, index: usize) -> Result<Value> {
        Ok(self[index].clone())
    }

    fn field(&self, name: &str) -> Result<Vec<Value>> {
        Ok(self
            .iter()
            .map(|d| d.get(name).cloned().unwrap_or_default())
            .collect())
    }

    fn element(&self, index: usize, position: usize) -> Result<Value> {
        Ok(self[index].element(position).cloned().unwrap_or_default())
    }
}

impl Table for [serde_json::Value] {
    fn len(&self) -> usize {
        <[serde_json::Value]>::len(self)
    }

    fn datum(&self, index: usize) -> Result<Value> {
        Ok(Value::from(&self[index]))
    }

    fn field(&self, name: &str) -> Result<Vec<Value>> {
        Ok(self
            .iter()
            .map(|row| row.get(name).map(Value::from).unwrap_or_default())
            .collect())
    }

    fn element(&self, index: usize, position: usize) -> Result<Value> {
        Ok(self[index]
            .as_array()
            .and_then(|items| items.get(position))
            .map(Value::from)
            .unwrap_or_default())
    }
}

impl<T> Table for Vec<T>
where
    [T]: Table,
{
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn datum(&self, index: usize) -> Result<Value> {
        self.as_slice().datum(index)
    }

    fn field(&self, name: &str) -> Result<Vec<Value>> {
        self.as_slice().field(name)
    }

    fn element(&self, index: usize, position: usize) -> Result<Value> {
        self.as_slice().element(index, position)
    }
}
