//! Core types for grouping transforms
//!
//! These types are produced by the groupers and consumed by channels and the
//! downstream renderer.

use serde::Serialize;

use crate::Value;

/// A set of rows sharing the same key(s)
///
/// Single-key groupings carry one key, two-key groupings carry `[x, y]`.
/// The subgroup is stored as row indices into the grouped table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub keys: Vec<Value>,
    pub index: Vec<usize>,
}

impl Group {
    pub fn new(keys: Vec<Value>, index: Vec<usize>) -> Self {
        Self { keys, index }
    }

    /// Key at `position` of the group tuple
    pub fn key(&self, position: usize) -> Option<&Value> {
        self.keys.get(position)
    }

    /// Number of rows in the subgroup
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Positions into the flattened group list, per facet when faceting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GroupIndex {
    /// No faceting: `0..n`
    Flat(Vec<usize>),
    /// One non-overlapping range per facet, in facet order
    Faceted(Vec<Vec<usize>>),
}

impl GroupIndex {
    pub fn is_faceted(&self) -> bool {
        matches!(self, GroupIndex::Faceted(_))
    }

    /// Index ranges per facet; an unfaceted index is a single facet.
    pub fn facets(&self) -> Vec<&[usize]> {
        match self {
            GroupIndex::Flat(index) => vec![index.as_slice()],
            GroupIndex::Faceted(facets) => facets.iter().map(|f| f.as_slice()).collect(),
        }
    }
}

/// Output of a grouping transform: the flattened groups and their index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Regrouped {
    pub index: GroupIndex,
    pub data: Vec<Group>,
}

impl Regrouped {
    /// Groups belonging to each facet, in facet order
    pub fn facet_groups(&self) -> Vec<Vec<&Group>> {
        self.index
            .facets()
            .into_iter()
            .map(|range| range.iter().map(|&i| &self.data[i]).collect())
            .collect()
    }
}

/// `[0, n)`
pub fn range(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// `[k, k + n)`
pub fn offset_range(n: usize, k: usize) -> Vec<usize> {
    (k..k + n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert_eq!(range(3), vec![0, 1, 2]);
        assert!(range(0).is_empty());
        assert_eq!(offset_range(2, 3), vec![3, 4]);
        assert!(offset_range(0, 7).is_empty());
    }

    #[test]
    fn test_facet_groups() {
        let regrouped = Regrouped {
            index: GroupIndex::Faceted(vec![vec![0], vec![1, 2]]),
            data: vec![
                Group::new(vec![Value::from("a")], vec![0]),
                Group::new(vec![Value::from("a")], vec![1]),
                Group::new(vec![Value::from("b")], vec![2]),
            ],
        };
        let facets = regrouped.facet_groups();
        assert_eq!(facets.len(), 2);
        assert_eq!(facets[0].len(), 1);
        assert_eq!(facets[1][1].keys, vec![Value::from("b")]);
        assert!(regrouped.index.is_faceted());
    }

    #[test]
    fn test_serialize_index() {
        let flat = serde_json::to_string(&GroupIndex::Flat(vec![0, 1])).unwrap();
        assert_eq!(flat, "[0,1]");
        let faceted = serde_json::to_string(&GroupIndex::Faceted(vec![vec![0], vec![]])).unwrap();
        assert_eq!(faceted, "[[0],[]]");
    }
}
