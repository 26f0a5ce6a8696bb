//! Day-offset arithmetic for projecting times onto a calendar.

use chrono::{NaiveDate, TimeDelta};

use crate::error::{Error, Result};

/// The date `days` after `start`, rounding fractional days up.
///
/// # Returns
/// * `Err(Error::DateOutOfRange)` if the offset is not finite or the
///   resulting date falls outside chrono's representable range
pub fn offset_date(start: NaiveDate, days: f64) -> Result<NaiveDate> {
    let whole = days.ceil();
    if !whole.is_finite() || whole.abs() >= i64::MAX as f64 {
        return Err(Error::DateOutOfRange { days });
    }
    TimeDelta::try_days(whole as i64)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or(Error::DateOutOfRange { days })
}
