//! Normalized frequency
//!
//! A normalized frequency is a group's share of the whole table, scaled by a
//! multiplier. The table length is unknown when the channel is built; it is
//! supplied by the transform right before grouping. `Frequency` makes that
//! two-phase contract explicit: it starts `Uninitialized`, `set_total` moves it
//! to `Ready`, and evaluating before that is an error.

use std::sync::{Arc, RwLock};

use super::types::Group;
use crate::{GgroupError, Result};

pub const FREQUENCY_LABEL: &str = "Frequency";
pub const PERCENT_LABEL: &str = "Frequency (%)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeState {
    Uninitialized,
    Ready { total: usize },
}

/// Shared handle to a normalization denominator
///
/// Clones share the same state: the transform sets the total and the channel
/// reads it.
#[derive(Debug, Clone)]
pub struct Frequency {
    multiplier: f64,
    state: Arc<RwLock<NormalizeState>>,
}

impl Frequency {
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            state: Arc::new(RwLock::new(NormalizeState::Uninitialized)),
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn label(&self) -> &'static str {
        if self.multiplier == 100.0 {
            PERCENT_LABEL
        } else {
            FREQUENCY_LABEL
        }
    }

    /// Record the length of the table being grouped.
    ///
    /// Called once per transform invocation, before any group is evaluated.
    pub fn set_total(&self, total: usize) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| GgroupError::InternalError("Frequency state lock poisoned".to_string()))?;
        *state = NormalizeState::Ready { total };
        Ok(())
    }

    pub fn state(&self) -> Result<NormalizeState> {
        self.state
            .read()
            .map(|state| *state)
            .map_err(|_| GgroupError::InternalError("Frequency state lock poisoned".to_string()))
    }

    /// `group.len() * multiplier / total`
    pub fn evaluate(&self, group: &Group) -> Result<f64> {
        match self.state()? {
            NormalizeState::Ready { total } => {
                Ok(group.len() as f64 * self.multiplier / total as f64)
            }
            NormalizeState::Uninitialized => Err(GgroupError::NormalizeError(
                "Frequency evaluated before the table total was set".to_string(),
            )),
        }
    }
}
