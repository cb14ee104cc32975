//! Grouping transforms
//!
//! # Architecture
//!
//! - `partition` - stable first-occurrence partitioning by one or two keys
//! - `group` - single- and two-key groupers, and the `GroupTransform` that runs them
//! - `regroup` - subdivision of groups per facet
//! - `frequency` - the normalization denominator shared by a transform and its channel
//! - `types` - `Group`, `GroupIndex` and `Regrouped`
//!
//! Data flows as: accessor resolution, partition, definedness filter, facet
//! regroup. Every invariant of the output holds for each invocation:
//! no group is empty, every key is defined, and facet ranges tile the
//! flattened group list.

mod frequency;
mod group;
pub mod partition;
mod regroup;
mod types;

pub use frequency::{Frequency, NormalizeState, FREQUENCY_LABEL, PERCENT_LABEL};
pub use group::{group1, group2, GroupTransform, Grouping};
pub use regroup::regroup;
pub use types::{offset_range, range, Group, GroupIndex, Regrouped};
