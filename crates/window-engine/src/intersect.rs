//! Common window computation.
//!
//! The window opens once every constraint has opened (latest start) and closes
//! as soon as any constraint closes (earliest end). An empty or inverted result
//! means there is no common window.

use crate::error::{EngineError, Result};
use crate::store::ConstraintStore;
use chrono::{DateTime, Utc};
use std::fmt;

/// Fewest constraints the intersection is computed for.
pub const MIN_CONSTRAINTS: usize = 2;

/// The interval contained in every constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whole minutes between `start` and `end`.
    pub duration_minutes: i64,
}

impl CommonWindow {
    pub fn hours(&self) -> i64 {
        self.duration_minutes / 60
    }

    pub fn minutes(&self) -> i64 {
        self.duration_minutes % 60
    }
}

impl fmt::Display for CommonWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "from {} to {} ({} hours and {} minutes)",
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.hours(),
            self.minutes()
        )
    }
}

/// Fail with `InsufficientConstraints` unless `found` reaches [`MIN_CONSTRAINTS`].
pub fn require_constraints(found: usize) -> Result<()> {
    if found < MIN_CONSTRAINTS {
        return Err(EngineError::InsufficientConstraints {
            required: MIN_CONSTRAINTS,
            found,
        });
    }
    Ok(())
}

/// Compute the common window across every constraint in `store`.
///
/// Returns `Ok(None)` when the latest start is not before the earliest end.
///
/// # Errors
/// Returns `EngineError::InsufficientConstraints` for fewer than two constraints.
pub fn common_window(store: &ConstraintStore) -> Result<Option<CommonWindow>> {
    require_constraints(store.len())?;

    let (Some(&start), Some(&end)) = (store.starts().iter().max(), store.ends().iter().min())
    else {
        return Ok(None);
    };

    if start >= end {
        return Ok(None);
    }

    Ok(Some(CommonWindow {
        start,
        end,
        duration_minutes: (end - start).num_minutes(),
    }))
}
