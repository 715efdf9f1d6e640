//! # window-engine
//!
//! Finds a common meeting window across time-of-day availability constraints
//! that are each anchored to a different location.
//!
//! Every constraint is a local `HHMM`–`HHMM` range. Both endpoints are pinned
//! to a reference date, rolled over to the next day when the end is not after
//! the start, and converted to UTC through a [`TimeConverter`]. The common
//! window is then the latest start against the earliest end.
//!
//! ## Modules
//!
//! - [`hhmm`] — `HHMM` validation and rollover-aware local window composition
//! - [`convert`] — the [`TimeConverter`] seam and the offline IANA converter
//! - [`dst`] — DST gap/overlap policies for the offline converter
//! - [`store`] — index-aligned constraint storage
//! - [`intersect`] — common window computation
//! - [`visualize`] — fixed-width ASCII timelines
//! - [`session`] — the state one interactive run owns
//! - [`error`] — Error types

pub mod convert;
pub mod dst;
pub mod error;
pub mod hhmm;
pub mod intersect;
pub mod session;
pub mod store;
pub mod visualize;

pub use convert::{TimeConverter, TzDatabaseConverter};
pub use error::EngineError;
pub use hhmm::{local_window, parse_hhmm};
pub use intersect::{common_window, CommonWindow};
pub use session::Session;
pub use store::{Constraint, ConstraintStore};
