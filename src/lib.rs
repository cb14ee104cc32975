/*!
# ggroup - grouping transforms for declarative plotting

ggroup partitions the rows of a table into groups sharing equal categorical
keys, subdivides those groups per facet, and derives the channels a renderer
needs to draw them: the group key(s) and a frequency (or normalized
proportion) per group.

## Example

```rust,ignore
use ggroup::{group_x, Accessor, GroupOptions, NormalizeSpec, Value};

let data = vec![
    Value::from("a"),
    Value::from("b"),
    Value::from("a"),
];
let mark = group_x(GroupOptions {
    normalize: Some(NormalizeSpec::Percent),
    ..Default::default()
});
let grouped = mark.transform.apply(data.as_slice(), None)?;
let y = &mark.channels["y"];
for group in &grouped.data {
    println!("{} -> {}", group.keys[0], y.evaluate(group)?);
}
```

## Core Components

- [`data`] - `Value`, the `Table` trait and key `Accessor`s
- [`transform`] - partitioning, facet regrouping and the frequency channel
- [`mark`] - `group_x`, `group_y` and `group`, which assemble a transform with its channels
*/

pub mod data;
pub mod mark;
pub mod transform;

pub use data::{Accessor, KeyFn, Table, Value};
pub use mark::{group, group_x, group_y, Channel, ChannelValue, GroupOptions, GroupedMark};
pub use mark::{NormalizeSpec, ParameterValue};
pub use transform::{Frequency, Group, GroupIndex, GroupTransform, Regrouped};

// Re-export polars types for users
pub use polars::prelude::DataFrame;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum GgroupError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Normalization error: {0}")]
    NormalizeError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, GgroupError>;
