//! Key accessors
//!
//! An accessor describes how to obtain one key value per row. It is resolved
//! against a [`Table`] into a vector aligned with the table's rows.

use serde::Deserialize;
use std::sync::Arc;

use super::{Table, Value};
use crate::Result;

/// A user-supplied key function, called with each row's datum and index
#[derive(Clone)]
pub struct KeyFn {
    f: Arc<dyn Fn(&Value, usize) -> Value + Send + Sync>,
    label: Option<String>,
}

impl KeyFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, usize) -> Value + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(f),
            label: None,
        }
    }

    /// Attach a display label, used as the default label of the key channel
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn call(&self, datum: &Value, index: usize) -> Value {
        (self.f)(datum, index)
    }
}

impl std::fmt::Debug for KeyFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFn").field("label", &self.label).finish()
    }
}

/// How to read a key from each row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "AccessorSpec")]
pub enum Accessor {
    /// The row itself
    #[default]
    Identity,
    /// A named field of the row
    Field(String),
    /// A positional element of a tuple-shaped row
    Element(usize),
    /// A computed key
    Function(KeyFn),
    /// The same value for every row
    Constant(Value),
}

impl Accessor {
    pub fn field(name: impl Into<String>) -> Self {
        Accessor::Field(name.into())
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Value, usize) -> Value + Send + Sync + 'static,
    {
        Accessor::Function(KeyFn::new(f))
    }

    /// The first element of a pair, the default x key of a two-key grouping
    pub fn first() -> Self {
        Accessor::Element(0)
    }

    /// The second element of a pair, the default y key of a two-key grouping
    pub fn second() -> Self {
        Accessor::Element(1)
    }

    /// Implicit label of the values this accessor produces.
    ///
    /// Field accessors are labelled by their field name, key functions by
    /// their attached label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Accessor::Field(name) => Some(name),
            Accessor::Function(f) => f.label(),
            _ => None,
        }
    }

    /// Resolve this accessor into one value per row of `table`
    pub fn resolve<T: Table + ?Sized>(&self, table: &T) -> Result<Vec<Value>> {
        let n = table.len();
        match self {
            Accessor::Identity => (0..n).map(|i| table.datum(i)).collect(),
            Accessor::Field(name) => table.field(name),
            Accessor::Element(position) => (0..n).map(|i| table.element(i, *position)).collect(),
            Accessor::Function(f) => (0..n)
                .map(|i| table.datum(i).map(|datum| f.call(&datum, i)))
                .collect(),
            Accessor::Constant(value) => Ok(vec![value.clone(); n]),
        }
    }
}

/// Serialized form of an accessor: a bare string names a field.
#[derive(Deserialize)]
#[serde(untagged)]
enum AccessorSpec {
    Tagged(TaggedAccessor),
    Name(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum TaggedAccessor {
    Identity,
    Field(String),
    Element(usize),
    Constant(Value),
}

impl From<AccessorSpec> for Accessor {
    fn from(spec: AccessorSpec) -> Self {
        match spec {
            AccessorSpec::Name(name) => Accessor::Field(name),
            AccessorSpec::Tagged(TaggedAccessor::Identity) => Accessor::Identity,
            AccessorSpec::Tagged(TaggedAccessor::Field(name)) => Accessor::Field(name),
            AccessorSpec::Tagged(TaggedAccessor::Element(position)) => Accessor::Element(position),
            AccessorSpec::Tagged(TaggedAccessor::Constant(value)) => Accessor::Constant(value),
        }
    }
}
