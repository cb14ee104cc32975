//! Facet regrouping
//!
//! When faceting, every group is subdivided according to the facet row
//! subsets. The subdivided groups of all facets are flattened into a single
//! list, and each facet receives the contiguous range of positions its groups
//! occupy in that list.

use std::collections::HashSet;

use super::types::{offset_range, range, Group, GroupIndex, Regrouped};

/// Subdivide `groups` by `facets`, or pass them through when not faceting
pub fn regroup(groups: Vec<Group>, facets: Option<&[Vec<usize>]>) -> Regrouped {
    let Some(facets) = facets else {
        return Regrouped {
            index: GroupIndex::Flat(range(groups.len())),
            data: groups,
        };
    };

    let mut index = Vec::with_capacity(facets.len());
    let mut data = Vec::new();
    let mut k = 0;
    for facet in facets {
        let members: HashSet<usize> = facet.iter().copied().collect();
        let subset: Vec<Group> = groups
            .iter()
            .map(|group| {
                Group::new(
                    group.keys.clone(),
                    group
                        .index
                        .iter()
                        .copied()
                        .filter(|i| members.contains(i))
                        .collect(),
                )
            })
            // A facet may hold no rows of a group
            .filter(|group| !group.is_empty())
            .collect();
        index.push(offset_range(subset.len(), k));
        k += subset.len();
        data.extend(subset);
    }

    Regrouped {
        index: GroupIndex::Faceted(index),
        data,
    }
}
