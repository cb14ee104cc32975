//! Options accepted by the grouping marks
//!
//! Grouping-relevant options are named fields; everything else is collected
//! into `extra` and forwarded untouched to the consumer of the mark.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::str::FromStr;

use crate::{Accessor, Value};

/// Value of a forwarded option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Null,
}

/// How a frequency channel is normalized
///
/// `Percent` is `normalize: true` and scales by 100. `Scale(k)` divides by the
/// table length and multiplies by `k`; a zero or NaN multiplier disables
/// normalization. `Text` holds a multiplier that still needs numeric coercion:
/// a non-numeric string yields NaN frequencies rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "NormalizeInput")]
pub enum NormalizeSpec {
    #[default]
    Off,
    Percent,
    Scale(f64),
    Text(String),
}

impl NormalizeSpec {
    /// The multiplier to normalize with, or `None` for raw counts
    pub fn multiplier(&self) -> Option<f64> {
        match self {
            NormalizeSpec::Off => None,
            NormalizeSpec::Percent => Some(100.0),
            NormalizeSpec::Scale(k) if *k == 0.0 || k.is_nan() => None,
            NormalizeSpec::Scale(k) => Some(*k),
            NormalizeSpec::Text(s) if s.is_empty() => None,
            NormalizeSpec::Text(s) => Some(coerce_number(s)),
        }
    }

    pub fn is_off(&self) -> bool {
        self.multiplier().is_none()
    }

    pub fn to_parameter(&self) -> ParameterValue {
        match self {
            NormalizeSpec::Off => ParameterValue::Boolean(false),
            NormalizeSpec::Percent => ParameterValue::Boolean(true),
            NormalizeSpec::Scale(k) => ParameterValue::Number(*k),
            NormalizeSpec::Text(s) => ParameterValue::String(s.clone()),
        }
    }
}

/// Numeric coercion of a string: blank is zero, anything unparseable is NaN
fn coerce_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        0.0
    } else {
        s.parse().unwrap_or(f64::NAN)
    }
}

impl FromStr for NormalizeSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Anything but a flag is a string multiplier, as in a JSON config
        Ok(match s.trim() {
            "true" => NormalizeSpec::Percent,
            "false" => NormalizeSpec::Off,
            _ => NormalizeSpec::Text(s.to_string()),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NormalizeInput {
    Flag(bool),
    Number(f64),
    Text(String),
    Null,
}

impl From<NormalizeInput> for NormalizeSpec {
    fn from(input: NormalizeInput) -> Self {
        match input {
            NormalizeInput::Flag(true) => NormalizeSpec::Percent,
            NormalizeInput::Flag(false) | NormalizeInput::Null => NormalizeSpec::Off,
            NormalizeInput::Number(k) => NormalizeSpec::Scale(k),
            NormalizeInput::Text(s) => NormalizeSpec::Text(s),
        }
    }
}

/// Options for `group_x`, `group_y` and `group`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupOptions {
    /// Key accessor for the x dimension
    pub x: Option<Accessor>,
    /// Key accessor for the y dimension
    pub y: Option<Accessor>,
    /// Channel that receives the group size, for two-key grouping
    pub out: Option<String>,
    /// Unset unless given; `group` forwards any given value
    pub normalize: Option<NormalizeSpec>,
    /// Options forwarded unchanged
    #[serde(flatten)]
    pub extra: HashMap<String, ParameterValue>,
}
