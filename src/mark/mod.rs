//! Grouping marks for ggroup
//!
//! This module assembles grouping transforms with the channels they feed.
//!
//! # Architecture
//!
//! - `group` - `group_x`, `group_y`, `group` and the `GroupedMark` they return
//! - `channel` - `Channel` definitions and the frequency channel builder
//! - `options` - `GroupOptions`, `NormalizeSpec` and forwarded `ParameterValue`s
//!
//! # Example
//!
//! ```rust,ignore
//! use ggroup::mark::{group, GroupOptions};
//! use ggroup::Accessor;
//!
//! let mark = group(GroupOptions {
//!     x: Some(Accessor::field("island")),
//!     y: Some(Accessor::field("species")),
//!     out: Some("r".to_string()),
//!     ..Default::default()
//! });
//! let grouped = mark.apply(&rows, Some(&facets))?;
//! ```

mod channel;
mod group;
mod options;

pub use channel::{group_length, Channel, ChannelValue};
pub use group::{group, group_x, group_y, GroupedMark};
pub use options::{GroupOptions, NormalizeSpec, ParameterValue};
