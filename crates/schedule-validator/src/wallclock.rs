//! Combine a picked calendar date and an hour-of-day selection into a local
//! wall-clock timestamp.
//!
//! The result carries no zone yet; [`crate::normalize`] attaches one. Minutes
//! and seconds are always zero since the form only offers whole hours.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::MalformedInput;
use crate::model::Field;

/// Parse an hour label (`"0"`..`"23"` or zero-padded `"00"`..`"23"`,
/// surrounding whitespace ignored). Signs are not accepted.
///
/// # Errors
///
/// Returns [`MalformedInput::InvalidHour`] for anything that is not an
/// integer in `[0, 23]`.
pub fn parse_hour(field: Field, label: &str) -> Result<u32, MalformedInput> {
    let digits = label.trim();
    Some(digits)
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|d| d.parse::<u32>().ok())
        .filter(|hour| *hour <= 23)
        .ok_or_else(|| MalformedInput::InvalidHour {
            field,
            value: label.to_string(),
        })
}

/// Merge `date` and `hour` into `date hour:00:00`.
///
/// `hour_field` / `date_field` name the form inputs so the error points at
/// the right control.
///
/// # Errors
///
/// Returns [`MalformedInput::Unselected`] when the date is absent and
/// [`MalformedInput::InvalidHour`] when `hour > 23`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use schedule_validator::model::Field;
/// use schedule_validator::wallclock::combine;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 16);
/// let local = combine(date, 14, Field::StartDate, Field::StartHour).unwrap();
/// assert_eq!(local.to_string(), "2026-03-16 14:00:00");
/// ```
pub fn combine(
    date: Option<NaiveDate>,
    hour: u32,
    date_field: Field,
    hour_field: Field,
) -> Result<NaiveDateTime, MalformedInput> {
    let date = date.ok_or(MalformedInput::Unselected(date_field))?;
    let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(|| MalformedInput::InvalidHour {
        field: hour_field,
        value: hour.to_string(),
    })?;
    Ok(date.and_time(time))
}
