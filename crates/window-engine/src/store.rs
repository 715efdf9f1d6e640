//! Index-aligned constraint storage.
//!
//! Constraints are kept as parallel sequences (locations, UTC starts, UTC
//! ends). Index `i` in every sequence describes the same constraint and the
//! sequences only ever grow together or are emptied together, so their shared
//! length is the constraint count.

use crate::convert::TimeConverter;
use crate::error::{EngineError, Result};
use crate::hhmm::{local_window, parse_hhmm};
use chrono::{DateTime, NaiveDate, Utc};

/// A constraint normalized to a UTC interval. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Append-only constraint store. The only removal is [`ConstraintStore::clear`].
#[derive(Debug, Clone, Default)]
pub struct ConstraintStore {
    locations: Vec<String>,
    starts: Vec<DateTime<Utc>>,
    ends: Vec<DateTime<Utc>>,
}

impl ConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse, roll over and convert a `(location, HHMM, HHMM)` triple, then
    /// append it.
    ///
    /// Both endpoints are converted before anything is stored: if either
    /// conversion fails the store is left untouched.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidTime` for malformed `HHMM` input, whatever
    /// the converter reports for a failed conversion, and
    /// `EngineError::EmptyInterval` if the converted end is not after the start.
    pub fn add<C: TimeConverter + ?Sized>(
        &mut self,
        converter: &C,
        date: NaiveDate,
        location: &str,
        start: &str,
        end: &str,
    ) -> Result<Constraint> {
        let start = parse_hhmm(start)?;
        let end = parse_hhmm(end)?;
        let (local_start, local_end) = local_window(date, start, end);

        let constraint = Constraint {
            start: converter.to_utc(location, local_start)?,
            end: converter.to_utc(location, local_end)?,
        };
        self.push(location, constraint)?;
        Ok(constraint)
    }

    /// Append an already-normalized constraint.
    pub fn push(&mut self, location: &str, constraint: Constraint) -> Result<()> {
        if constraint.end <= constraint.start {
            return Err(EngineError::EmptyInterval {
                location: location.to_string(),
                start: constraint.start,
                end: constraint.end,
            });
        }
        self.locations.push(location.to_string());
        self.starts.push(constraint.start);
        self.ends.push(constraint.end);
        Ok(())
    }

    /// Drop every constraint. Calling it on an empty store is a no-op.
    pub fn clear(&mut self) {
        self.locations.clear();
        self.starts.clear();
        self.ends.clear();
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn starts(&self) -> &[DateTime<Utc>] {
        &self.starts
    }

    pub fn ends(&self) -> &[DateTime<Utc>] {
        &self.ends
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Constraints in insertion order, paired with their location.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Constraint)> + '_ {
        self.locations
            .iter()
            .zip(self.starts.iter().zip(&self.ends))
            .map(|(location, (&start, &end))| (location.as_str(), Constraint { start, end }))
    }
}
