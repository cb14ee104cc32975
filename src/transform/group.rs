//! Single- and two-key groupers
//!
//! Keys are resolved over the whole table, before faceting, so that group
//! order is the first-occurrence order of keys across all rows regardless of
//! how the rows are later split into facets.

use super::frequency::Frequency;
use super::partition::{groups, groups2};
use super::regroup::regroup;
use super::types::{range, Group, Regrouped};
use crate::{Accessor, Result, Table};

/// Group rows by one key
pub fn group1<T: Table + ?Sized>(
    data: &T,
    x: &Accessor,
    facets: Option<&[Vec<usize>]>,
) -> Result<Regrouped> {
    let values = x.resolve(data)?;
    let g: Vec<Group> = groups(range(data.len()), |&i| values[i].clone())
        .into_iter()
        .filter(|(key, _)| key.is_defined())
        .map(|(key, index)| Group::new(vec![key], index))
        .collect();
    tracing::debug!("Grouped {} rows into {} groups", data.len(), g.len());
    Ok(regroup(g, facets))
}

/// Group rows by `x`, then by `y` within each x group
pub fn group2<T: Table + ?Sized>(
    data: &T,
    x: &Accessor,
    y: &Accessor,
    facets: Option<&[Vec<usize>]>,
) -> Result<Regrouped> {
    let values_x = x.resolve(data)?;
    let values_y = y.resolve(data)?;
    let g: Vec<Group> = groups2(
        range(data.len()),
        |&i| values_x[i].clone(),
        |&i| values_y[i].clone(),
    )
    .into_iter()
    .filter(|(kx, _)| kx.is_defined())
    .flat_map(|(kx, xgroup)| {
        xgroup
            .into_iter()
            .filter(|(ky, _)| ky.is_defined())
            .map(move |(ky, index)| Group::new(vec![kx.clone(), ky], index))
    })
    .collect();
    tracing::debug!("Grouped {} rows into {} x/y groups", data.len(), g.len());
    Ok(regroup(g, facets))
}

/// Which keys a transform groups by
#[derive(Debug, Clone)]
pub enum Grouping {
    One(Accessor),
    Two(Accessor, Accessor),
}

/// A grouping transform, ready to run on a table
///
/// When the transform feeds a normalized frequency channel it holds the same
/// [`Frequency`] handle, and sets the table total before grouping.
#[derive(Debug, Clone)]
pub struct GroupTransform {
    grouping: Grouping,
    normalize: Option<Frequency>,
}

impl GroupTransform {
    pub fn one(x: Accessor) -> Self {
        Self {
            grouping: Grouping::One(x),
            normalize: None,
        }
    }

    pub fn two(x: Accessor, y: Accessor) -> Self {
        Self {
            grouping: Grouping::Two(x, y),
            normalize: None,
        }
    }

    /// Normalize `frequency` against the table before grouping
    pub fn with_normalize(mut self, frequency: Frequency) -> Self {
        self.normalize = Some(frequency);
        self
    }

    pub fn grouping(&self) -> &Grouping {
        &self.grouping
    }

    pub fn normalizes(&self) -> bool {
        self.normalize.is_some()
    }

    /// Run the transform over `data`, optionally subdivided by `facets`
    pub fn apply<T: Table + ?Sized>(
        &self,
        data: &T,
        facets: Option<&[Vec<usize>]>,
    ) -> Result<Regrouped> {
        if let Some(frequency) = &self.normalize {
            frequency.set_total(data.len())?;
        }
        match &self.grouping {
            Grouping::One(x) => group1(data, x, facets),
            Grouping::Two(x, y) => group2(data, x, y, facets),
        }
    }
}
