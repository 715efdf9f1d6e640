//! The state owned by one interactive run.
//!
//! A [`Session`] bundles the constraint store with the converter that feeds it
//! and the reference date every `HHMM` is pinned to. The command loop owns it
//! and passes it nothing else, so each run (and each test) is isolated.

use crate::convert::TimeConverter;
use crate::error::Result;
use crate::intersect::{self, CommonWindow};
use crate::store::{Constraint, ConstraintStore};
use crate::visualize;
use chrono::NaiveDate;

pub struct Session<C> {
    converter: C,
    reference_date: NaiveDate,
    store: ConstraintStore,
}

impl<C: TimeConverter> Session<C> {
    pub fn new(converter: C, reference_date: NaiveDate) -> Self {
        Self {
            converter,
            reference_date,
            store: ConstraintStore::new(),
        }
    }

    /// Add a constraint given as a location plus local `HHMM` start and end.
    pub fn add(&mut self, location: &str, start: &str, end: &str) -> Result<Constraint> {
        self.store
            .add(&self.converter, self.reference_date, location, start, end)
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn constraint_count(&self) -> usize {
        self.store.len()
    }

    /// Compute the common window. Needs at least two constraints.
    pub fn run(&self) -> Result<Option<CommonWindow>> {
        intersect::common_window(&self.store)
    }

    /// Render one timeline per constraint. Needs at least two constraints.
    pub fn visualize(&self) -> Result<Vec<String>> {
        intersect::require_constraints(self.store.len())?;
        Ok(visualize::render_all(
            &self.store,
            visualize::day_start(self.reference_date),
        ))
    }

    pub fn store(&self) -> &ConstraintStore {
        &self.store
    }
}
