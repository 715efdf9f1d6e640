//! `HHMM` parsing and local window composition.
//!
//! A constraint's endpoints arrive as four-digit strings ("0900", "2230").
//! They carry no date, so both are pinned to the session's reference date. An
//! end that is not strictly after its start is taken to fall on the next day,
//! which is what makes overnight ranges like 2200–0200 expressible.

use crate::error::{EngineError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a four-digit `HHMM` string into a time of day.
///
/// Surrounding whitespace is ignored. Rejects anything that is not exactly four
/// ASCII digits, hours above 23 and minutes above 59.
pub fn parse_hhmm(input: &str) -> Result<NaiveTime> {
    let digits = input.trim();
    let invalid = || EngineError::InvalidTime(input.to_string());

    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hour: u32 = digits[..2].parse().map_err(|_| invalid())?;
    let minute: u32 = digits[2..].parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Returns `true` when `input` would be accepted by [`parse_hhmm`].
pub fn is_valid_hhmm(input: &str) -> bool {
    parse_hhmm(input).is_ok()
}

/// Pin a start/end time of day to `date`, rolling the end over to the next
/// day when it is not after the start.
///
/// Equal endpoints therefore describe a full 24-hour window.
pub fn local_window(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> (NaiveDateTime, NaiveDateTime) {
    let local_start = date.and_time(start);
    let mut local_end = date.and_time(end);

    if local_end <= local_start {
        local_end += Duration::days(1);
    }

    (local_start, local_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace_before_validating() {
        assert_eq!(
            parse_hhmm(" 0930\n").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
    }

    #[test]
    fn error_keeps_raw_input() {
        let err = parse_hhmm("2460").unwrap_err();
        assert_eq!(err, EngineError::InvalidTime("2460".to_string()));
    }
}
