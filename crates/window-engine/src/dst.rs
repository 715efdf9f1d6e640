//! DST transition policies for resolving local wall-clock times.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Policy for local times that do not exist because of a DST transition.
///
/// Ambiguous times (the repeated hour when clocks fall back) always resolve to
/// the earlier instant; only the spring-forward gap is policy-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// Refuse times that fall in the DST gap (e.g., 2:30 AM during spring forward).
    Skip,
    /// Read the time with the offset in force before the gap, which lands the
    /// same distance past the transition (2:30 AM becomes 3:30 AM).
    ///
    /// A range that starts inside the gap and ends at or shortly after the
    /// transition can therefore come out inverted (2:30 to 3:00 AM resolves to
    /// 3:30 to 3:00 AM); the constraint store rejects it as an empty interval.
    #[default]
    ShiftForward,
}

/// Resolve a local wall-clock time in `tz` to a UTC instant.
///
/// Returns `None` only when the time falls in a DST gap and the policy is
/// [`DstPolicy::Skip`].
pub fn resolve_local(tz: &Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => {
                // A day earlier is safely before the transition.
                let before = local - Duration::days(1);
                let offset = tz.offset_from_utc_datetime(&before).fix();
                let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
                Some(utc.and_utc())
            }
        },
    }
}
