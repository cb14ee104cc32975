//! Channel definitions derived from groups
//!
//! A channel maps each group to the value a renderer draws: one of the
//! group's keys, its size, or its normalized size. Each channel carries an
//! optional display label.

use super::options::NormalizeSpec;
use crate::transform::{Frequency, Group, FREQUENCY_LABEL};
use crate::{Accessor, GgroupError, Result, Table, Value};

/// What a channel reads from a group
#[derive(Debug, Clone)]
pub enum ChannelValue {
    /// The key at this position of the group tuple
    Key(usize),
    /// Number of rows in the group
    Length,
    /// Share of the table's rows in the group, scaled
    Proportion(Frequency),
}

#[derive(Debug, Clone)]
pub struct Channel {
    pub value: ChannelValue,
    pub label: Option<String>,
}

impl Channel {
    /// Key channel, labelled like the accessor that produced the key
    pub fn key(position: usize, accessor: &Accessor) -> Self {
        Self {
            value: ChannelValue::Key(position),
            label: accessor.label().map(str::to_string),
        }
    }

    pub fn length() -> Self {
        Self {
            value: ChannelValue::Length,
            label: Some(FREQUENCY_LABEL.to_string()),
        }
    }

    pub fn proportion(frequency: Frequency) -> Self {
        let label = frequency.label().to_string();
        Self {
            value: ChannelValue::Proportion(frequency),
            label: Some(label),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The normalization handle, for channels that need one
    pub fn normalizer(&self) -> Option<&Frequency> {
        match &self.value {
            ChannelValue::Proportion(frequency) => Some(frequency),
            _ => None,
        }
    }

    /// Set the normalization denominator from the full table.
    ///
    /// A no-op for channels that don't normalize.
    pub fn normalize<T: Table + ?Sized>(&self, data: &T) -> Result<()> {
        match self.normalizer() {
            Some(frequency) => frequency.set_total(data.len()),
            None => Ok(()),
        }
    }

    pub fn evaluate(&self, group: &Group) -> Result<Value> {
        match &self.value {
            ChannelValue::Key(position) => group.key(*position).cloned().ok_or_else(|| {
                GgroupError::InternalError(format!(
                    "Group has {} key(s), channel reads key {}",
                    group.keys.len(),
                    position
                ))
            }),
            ChannelValue::Length => Ok(Value::Number(group.len() as f64)),
            ChannelValue::Proportion(frequency) => frequency.evaluate(group).map(Value::Number),
        }
    }
}

/// Size channel of a single-key grouping, normalized as `spec` requests
pub fn group_length(spec: &NormalizeSpec) -> Channel {
    match spec.multiplier() {
        None => Channel::length(),
        Some(k) => Channel::proportion(Frequency::new(k)),
    }
}
