//! ASCII timelines for eyeballing constraints.
//!
//! Each constraint becomes a bar of [`SLOT_COUNT`] half-hour slots starting at
//! midnight (UTC) of the reference day. Slot `i` stands for the instant
//! `day_start + 30·i` minutes and is active when that instant lies inside the
//! constraint. Bars are independent of each other and of the intersection.

use crate::store::{Constraint, ConstraintStore};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

pub const SLOT_COUNT: usize = 49;
pub const SLOT_MINUTES: i64 = 30;
pub const ACTIVE: char = '#';
pub const FILLER: char = '|';

/// Midnight UTC of `date`, the left edge of every bar.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Render one constraint as a [`SLOT_COUNT`]-character bar.
pub fn render_bar(constraint: &Constraint, day_start: DateTime<Utc>) -> String {
    (0..SLOT_COUNT)
        .map(|slot| {
            let at = day_start + Duration::minutes(SLOT_MINUTES * slot as i64);
            if constraint.start <= at && at < constraint.end {
                ACTIVE
            } else {
                FILLER
            }
        })
        .collect()
}

/// One bar per stored constraint, in insertion order.
pub fn render_all(store: &ConstraintStore, day_start: DateTime<Utc>) -> Vec<String> {
    store
        .iter()
        .map(|(_, constraint)| render_bar(&constraint, day_start))
        .collect()
}

/// Hour ruler aligned with the bars: `+` every six hours, `.` on the other
/// whole hours, blank on half hours.
pub fn ruler() -> String {
    (0..SLOT_COUNT)
        .map(|slot| match slot {
            s if s % 12 == 0 => '+',
            s if s % 2 == 0 => '.',
            _ => ' ',
        })
        .collect()
}
