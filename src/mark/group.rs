//! Grouping marks
//!
//! `group_x` and `group_y` count rows per key along one axis, putting the
//! frequency on the other axis. `group` groups by two keys and can route the
//! group size to a named channel.

use std::collections::HashMap;

use super::channel::{group_length, Channel};
use super::options::{GroupOptions, ParameterValue};
use crate::transform::{Group, GroupTransform, Regrouped};
use crate::{Accessor, Result, Table, Value};

/// A grouping transform together with the channels it feeds
#[derive(Debug, Clone)]
pub struct GroupedMark {
    pub transform: GroupTransform,
    pub channels: HashMap<String, Channel>,
    /// Caller options, forwarded unchanged
    pub options: HashMap<String, ParameterValue>,
}

impl GroupedMark {
    /// Run the transform; normalized channels are ready to evaluate afterwards.
    ///
    /// Normalized channels divide by the length of the table most recently
    /// passed to `apply`, and clones of a mark share that total. Evaluate a
    /// result's groups before applying the mark to another table.
    pub fn apply<T: Table + ?Sized>(
        &self,
        data: &T,
        facets: Option<&[Vec<usize>]>,
    ) -> Result<Regrouped> {
        self.transform.apply(data, facets)
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    /// Evaluate every channel for one group
    pub fn evaluate(&self, group: &Group) -> Result<HashMap<String, Value>> {
        self.channels
            .iter()
            .map(|(name, channel)| Ok((name.clone(), channel.evaluate(group)?)))
            .collect()
    }

    /// Labels of the channels that have one
    pub fn labels(&self) -> HashMap<String, String> {
        self.channels
            .iter()
            .filter_map(|(name, channel)| Some((name.clone(), channel.label()?.to_string())))
            .collect()
    }
}

/// Group by the x key; y is the frequency of each group
pub fn group_x(options: GroupOptions) -> GroupedMark {
    group_one_axis(options, "x", "y")
}

/// Group by the y key; x is the frequency of each group
pub fn group_y(options: GroupOptions) -> GroupedMark {
    group_one_axis(options, "y", "x")
}

fn group_one_axis(options: GroupOptions, key_axis: &str, value_axis: &str) -> GroupedMark {
    let GroupOptions {
        x,
        y,
        out,
        normalize,
        mut extra,
    } = options;
    let (key, ignored) = if key_axis == "x" { (x, y) } else { (y, x) };
    if ignored.is_some() {
        tracing::warn!(
            "The '{}' option is replaced by the frequency channel when grouping on {}",
            value_axis,
            key_axis
        );
    }
    if let Some(out) = out {
        extra.insert("out".to_string(), ParameterValue::String(out));
    }

    let key = key.unwrap_or_default();
    let length = group_length(&normalize.unwrap_or_default());
    let mut transform = GroupTransform::one(key.clone());
    if let Some(frequency) = length.normalizer() {
        transform = transform.with_normalize(frequency.clone());
    }

    let mut channels = HashMap::new();
    channels.insert(key_axis.to_string(), Channel::key(0, &key));
    channels.insert(value_axis.to_string(), length);

    GroupedMark {
        transform,
        options: pass_through(extra, &channels),
        channels,
    }
}

/// Group by x, then by y; `out`, if given, receives the group size.
///
/// Two-key grouping does not normalize: a `normalize` option is forwarded
/// with the other options.
pub fn group(options: GroupOptions) -> GroupedMark {
    let GroupOptions {
        x,
        y,
        out,
        normalize,
        mut extra,
    } = options;
    if let Some(normalize) = normalize {
        tracing::debug!("Forwarding 'normalize' option; two-key grouping reports raw counts");
        extra.insert("normalize".to_string(), normalize.to_parameter());
    }

    let x = x.unwrap_or_else(Accessor::first);
    let y = y.unwrap_or_else(Accessor::second);

    let mut channels = HashMap::new();
    channels.insert("x".to_string(), Channel::key(0, &x));
    channels.insert("y".to_string(), Channel::key(1, &y));
    match out {
        Some(out) => {
            channels.insert(out, Channel::length());
        }
        None => tracing::debug!("No 'out' channel given; group sizes are not emitted"),
    }

    GroupedMark {
        transform: GroupTransform::two(x, y),
        options: pass_through(extra, &channels),
        channels,
    }
}

/// Caller options, minus the names this mark defines itself
fn pass_through(
    mut extra: HashMap<String, ParameterValue>,
    channels: &HashMap<String, Channel>,
) -> HashMap<String, ParameterValue> {
    extra.remove("transform");
    extra.retain(|name, _| !channels.contains_key(name));
    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::{ChannelValue, NormalizeSpec};
    use crate::transform::GroupIndex;
    use crate::GgroupError;
    use serde_json::json;

    fn penguins() -> Vec<serde_json::Value> {
        vec![
            json!({"species": "Adelie", "island": "Torgersen"}),
            json!({"species": "Gentoo", "island": "Biscoe"}),
            json!({"species": "Adelie", "island": "Biscoe"}),
            json!({"species": null, "island": "Dream"}),
            json!({"species": "Adelie", "island": "Dream"}),
        ]
    }

    #[test]
    fn test_group_x_counts() {
        let mark = group_x(GroupOptions {
            x: Some(Accessor::field("species")),
            ..Default::default()
        });
        let result = mark.apply(&penguins(), None).unwrap();
        assert_eq!(result.index, GroupIndex::Flat(vec![0, 1]));

        let x = mark.channel("x").unwrap();
        let y = mark.channel("y").unwrap();
        assert_eq!(x.label(), Some("species"));
        assert_eq!(y.label(), Some("Frequency"));
        assert_eq!(x.evaluate(&result.data[0]).unwrap(), Value::from("Adelie"));
        assert_eq!(y.evaluate(&result.data[0]).unwrap(), Value::Number(3.0));
        assert_eq!(y.evaluate(&result.data[1]).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_group_x_percent_uses_whole_table() {
        let mark = group_x(GroupOptions {
            x: Some(Accessor::field("species")),
            normalize: Some(NormalizeSpec::Percent),
            ..Default::default()
        });
        assert!(mark.transform.normalizes());
        let y = mark.channel("y").unwrap();
        assert_eq!(y.label(), Some("Frequency (%)"));

        // The missing species row still counts towards the total
        let result = mark.apply(&penguins(), None).unwrap();
        assert_eq!(y.evaluate(&result.data[0]).unwrap(), Value::Number(60.0));
        assert_eq!(y.evaluate(&result.data[1]).unwrap(), Value::Number(20.0));
    }

    #[test]
    fn test_group_x_normalized_before_apply_errors() {
        let mark = group_x(GroupOptions {
            normalize: Some(NormalizeSpec::Scale(1.0)),
            ..Default::default()
        });
        let group = Group::new(vec![Value::from("a")], vec![0]);
        assert!(matches!(
            mark.channel("y").unwrap().evaluate(&group),
            Err(GgroupError::NormalizeError(_))
        ));
    }

    #[test]
    fn test_group_x_defaults_to_identity() {
        let mark = group_x(GroupOptions::default());
        let data = vec![Value::from("a"), Value::from("b"), Value::from("a")];
        let result = mark.apply(&data, None).unwrap();
        assert_eq!(result.data.len(), 2);
        assert_eq!(mark.channel("x").unwrap().label(), None);
        assert!(!mark.transform.normalizes());
    }

    #[test]
    fn test_group_y_mirrors_group_x() {
        let mark = group_y(GroupOptions {
            y: Some(Accessor::field("island")),
            normalize: Some(NormalizeSpec::Scale(1.0)),
            ..Default::default()
        });
        let x = mark.channel("x").unwrap();
        let y = mark.channel("y").unwrap();
        assert_eq!(y.label(), Some("island"));
        assert!(matches!(y.value, ChannelValue::Key(0)));
        assert!(matches!(x.value, ChannelValue::Proportion(_)));

        let result = mark.apply(&penguins(), None).unwrap();
        let islands: Vec<Value> = result
            .data
            .iter()
            .map(|g| y.evaluate(g).unwrap())
            .collect();
        assert_eq!(
            islands,
            vec![
                Value::from("Torgersen"),
                Value::from("Biscoe"),
                Value::from("Dream")
            ]
        );
        assert_eq!(x.evaluate(&result.data[1]).unwrap(), Value::Number(0.4));
    }

    #[test]
    fn test_group_x_ignores_y_option() {
        let mark = group_x(GroupOptions {
            y: Some(Accessor::field("island")),
            ..Default::default()
        });
        assert!(matches!(
            mark.channel("y").unwrap().value,
            ChannelValue::Length
        ));
    }

    #[test]
    fn test_group_two_keys_with_out() {
        let rows = vec![
            json!({"a": "x", "b": 1}),
            json!({"a": "x", "b": 2}),
            json!({"a": "y", "b": 1}),
        ];
        let mark = group(GroupOptions {
            x: Some(Accessor::field("a")),
            y: Some(Accessor::field("b")),
            out: Some("r".to_string()),
            ..Default::default()
        });
        let result = mark.apply(&rows, None).unwrap();
        assert_eq!(result.data.len(), 3);

        let evaluated = mark.evaluate(&result.data[1]).unwrap();
        assert_eq!(evaluated["x"], Value::from("x"));
        assert_eq!(evaluated["y"], Value::Number(2.0));
        assert_eq!(evaluated["r"], Value::Number(1.0));

        let labels = mark.labels();
        assert_eq!(labels["x"], "a");
        assert_eq!(labels["y"], "b");
        assert_eq!(labels["r"], "Frequency");
    }

    #[test]
    fn test_group_defaults_to_pairs() {
        let rows = vec![
            Value::from(vec!["p", "u"]),
            Value::from(vec!["p", "u"]),
            Value::from(vec!["q", "v"]),
        ];
        let mark = group(GroupOptions::default());
        assert_eq!(mark.channels.len(), 2);
        let result = mark.apply(&rows, None).unwrap();
        assert_eq!(result.data[0].keys, vec![Value::from("p"), Value::from("u")]);
        assert_eq!(result.data[0].index, vec![0, 1]);
    }

    #[test]
    fn test_group_has_no_normalize_option() {
        let mark = group(GroupOptions {
            out: Some("fill".to_string()),
            normalize: Some(NormalizeSpec::Percent),
            ..Default::default()
        });
        assert!(!mark.transform.normalizes());
        assert!(mark.channels.values().all(|c| c.normalizer().is_none()));
        assert_eq!(mark.channel("fill").unwrap().label(), Some("Frequency"));
        // Forwarded like any other option
        assert_eq!(
            mark.options.get("normalize"),
            Some(&ParameterValue::Boolean(true))
        );
    }

    #[test]
    fn test_group_forwards_explicit_false_normalize() {
        let mark = group(GroupOptions {
            normalize: Some(NormalizeSpec::Off),
            ..Default::default()
        });
        assert_eq!(
            mark.options.get("normalize"),
            Some(&ParameterValue::Boolean(false))
        );

        let mark = group(GroupOptions::default());
        assert!(!mark.options.contains_key("normalize"));
    }

    #[test]
    fn test_group_out_overrides_key_channel() {
        let mark = group(GroupOptions {
            out: Some("y".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            mark.channel("y").unwrap().value,
            ChannelValue::Length
        ));
    }

    #[test]
    fn test_options_pass_through() {
        let mut extra = HashMap::new();
        extra.insert("fill".to_string(), ParameterValue::String("red".to_string()));
        extra.insert("transform".to_string(), ParameterValue::Null);
        extra.insert("y".to_string(), ParameterValue::Number(3.0));
        let mark = group_x(GroupOptions {
            out: Some("r".to_string()),
            extra,
            ..Default::default()
        });
        assert_eq!(
            mark.options.get("fill"),
            Some(&ParameterValue::String("red".to_string()))
        );
        assert_eq!(
            mark.options.get("out"),
            Some(&ParameterValue::String("r".to_string()))
        );
        assert!(!mark.options.contains_key("transform"));
        assert!(!mark.options.contains_key("y"));
    }

    #[test]
    fn test_normalized_total_follows_latest_apply() {
        let mark = group_x(GroupOptions {
            normalize: Some(NormalizeSpec::Scale(1.0)),
            ..Default::default()
        });
        let clone = mark.clone();
        let group = Group::new(vec![Value::from("a")], vec![0]);

        mark.apply(&vec![Value::from("a"); 2], None).unwrap();
        clone.apply(&vec![Value::from("a"); 4], None).unwrap();
        assert_eq!(
            mark.channel("y").unwrap().evaluate(&group).unwrap(),
            Value::Number(0.25)
        );

        mark.apply(&vec![Value::from("a"); 2], None).unwrap();
        assert_eq!(
            clone.channel("y").unwrap().evaluate(&group).unwrap(),
            Value::Number(0.5)
        );
    }

    #[test]
    fn test_fresh_marks_do_not_share_state() {
        let options = GroupOptions {
            normalize: Some(NormalizeSpec::Scale(1.0)),
            ..Default::default()
        };
        let first = group_x(options.clone());
        let second = group_x(options);
        first.apply(&vec![Value::from("a"); 2], None).unwrap();

        let group = Group::new(vec![Value::from("a")], vec![0]);
        assert_eq!(
            first.channel("y").unwrap().evaluate(&group).unwrap(),
            Value::Number(0.5)
        );
        assert!(second.channel("y").unwrap().evaluate(&group).is_err());
    }
}
