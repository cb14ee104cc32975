//! Polars DataFrame as a grouping table

use polars::prelude::{AnyValue, Column, DataFrame};
use std::collections::BTreeMap;

use super::{Table, Value};
use crate::{GgroupError, Result};

/// Convert a single cell of a Polars column to a key value
fn column_value(column: &Column, idx: usize) -> Result<Value> {
    let any_value = column.get(idx).map_err(|e| {
        GgroupError::DataError(format!(
            "Failed to read row {} of column '{}': {}",
            idx,
            column.name(),
            e
        ))
    })?;

    Ok(match any_value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Boolean(b),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => Value::Number(v as f64),
        AnyValue::Float64(v) => Value::Number(v),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        other => {
            tracing::debug!("Converting unsupported Polars type to string: {:?}", other);
            Value::String(format!("{}", other))
        }
    })
}

impl Table for DataFrame {
    fn len(&self) -> usize {
        self.height()
    }

    fn datum(&self, index: usize) -> Result<Value> {
        let mut fields = BTreeMap::new();
        for column in self.get_columns() {
            fields.insert(column.name().to_string(), column_value(column, index)?);
        }
        Ok(Value::Object(fields))
    }

    fn field(&self, name: &str) -> Result<Vec<Value>> {
        let column = self.column(name).map_err(|e| {
            GgroupError::DataError(format!("Column '{}' not found: {}", name, e))
        })?;
        (0..self.height())
            .map(|i| column_value(column, i))
            .collect()
    }

    fn element(&self, index: usize, position: usize) -> Result<Value> {
        match self.get_columns().get(position) {
            Some(column) => column_value(column, index),
            None => Ok(Value::Null),
        }
    }
}
