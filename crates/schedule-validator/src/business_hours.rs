//! The allowed appointment window, evaluated on the reference zone's clock.
//!
//! A start must satisfy `open <= t < close`; an end `open <= t <= close`. An
//! appointment may therefore run right up to closing time but may not begin
//! at it.

use std::fmt;

use chrono::{DateTime, NaiveTime};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::ScheduleError;
use crate::validation::Violation;

/// Opening and closing time on the reference-zone clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusinessHours {
    open: NaiveTime,
    close: NaiveTime,
}

impl Default for BusinessHours {
    /// 8 a.m. to 10 p.m.
    fn default() -> Self {
        Self {
            open: NaiveTime::MIN + chrono::Duration::hours(8),
            close: NaiveTime::MIN + chrono::Duration::hours(22),
        }
    }
}

impl BusinessHours {
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidPolicy`] unless `open < close <= 23`.
    pub fn from_hours(open: u32, close: u32) -> Result<Self, ScheduleError> {
        if open >= close || close > 23 {
            return Err(ScheduleError::InvalidPolicy(format!(
                "business hours must satisfy open < close <= 23, got {open}..{close}"
            )));
        }
        let at = |hour: u32| {
            NaiveTime::from_hms_opt(hour, 0, 0)
                .ok_or_else(|| ScheduleError::InvalidPolicy(format!("hour {hour} out of range")))
        };
        Ok(Self {
            open: at(open)?,
            close: at(close)?,
        })
    }

    pub fn open(&self) -> NaiveTime {
        self.open
    }

    pub fn close(&self) -> NaiveTime {
        self.close
    }

    pub fn admits_start(&self, t: NaiveTime) -> bool {
        self.open <= t && t < self.close
    }

    pub fn admits_end(&self, t: NaiveTime) -> bool {
        self.open <= t && t <= self.close
    }
}

impl fmt::Display for BusinessHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.open.format("%-I:%M %p"),
            self.close.format("%-I:%M %p")
        )
    }
}

/// Check a proposed start, given on the reference zone's clock.
pub fn check_start(hours: &BusinessHours, start: &DateTime<Tz>) -> Option<Violation> {
    let at = start.time();
    (!hours.admits_start(at)).then(|| Violation::StartOutsideBusinessHours {
        at,
        zone: start.timezone(),
        hours: *hours,
    })
}

/// Check a proposed end, given on the reference zone's clock.
pub fn check_end(hours: &BusinessHours, end: &DateTime<Tz>) -> Option<Violation> {
    let at = end.time();
    (!hours.admits_end(at)).then(|| Violation::EndOutsideBusinessHours {
        at,
        zone: end.timezone(),
        hours: *hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::REFERENCE_ZONE;
    use chrono::TimeZone;

    fn eastern(h: u32, m: u32) -> DateTime<Tz> {
        REFERENCE_ZONE
            .with_ymd_and_hms(2026, 3, 16, h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_start_boundaries() {
        let hours = BusinessHours::default();
        assert!(check_start(&hours, &eastern(8, 0)).is_none());
        assert!(check_start(&hours, &eastern(7, 59)).is_some());
        assert!(check_start(&hours, &eastern(21, 0)).is_none());
        assert!(check_start(&hours, &eastern(22, 0)).is_some());
    }

    #[test]
    fn test_end_boundaries() {
        let hours = BusinessHours::default();
        assert!(check_end(&hours, &eastern(22, 0)).is_none());
        assert!(check_end(&hours, &eastern(22, 1)).is_some());
        assert!(check_end(&hours, &eastern(8, 0)).is_none());
        assert!(check_end(&hours, &eastern(7, 0)).is_some());
    }

    #[test]
    fn test_midnight_end_rejected() {
        let hours = BusinessHours::default();
        assert!(check_end(&hours, &eastern(0, 0)).is_some());
    }

    #[test]
    fn test_violation_message_names_window() {
        let v = check_start(&BusinessHours::default(), &eastern(6, 0)).unwrap();
        let msg = v.to_string();
        assert!(msg.contains("8:00 AM to 10:00 PM"), "got: {msg}");
        assert!(msg.contains("America/New_York"), "got: {msg}");
    }

    #[test]
    fn test_custom_hours() {
        let hours = BusinessHours::from_hours(9, 17).unwrap();
        assert!(hours.admits_start(NaiveTime::from_hms_opt(16, 0, 0).unwrap()));
        assert!(!hours.admits_start(NaiveTime::from_hms_opt(17, 0, 0).unwrap()));
        assert!(hours.admits_end(NaiveTime::from_hms_opt(17, 0, 0).unwrap()));
    }

    #[test]
    fn test_invalid_hours() {
        assert!(BusinessHours::from_hours(22, 8).is_err());
        assert!(BusinessHours::from_hours(8, 8).is_err());
        assert!(BusinessHours::from_hours(8, 24).is_err());
    }
}
