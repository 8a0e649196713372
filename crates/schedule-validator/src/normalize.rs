//! Attach the operator's zone to a wall-clock value and derive the views the
//! rest of the pipeline needs.
//!
//! All conversions go through the IANA database shipped with `chrono-tz`, so
//! DST transitions are honoured on both the operator's side and the reference
//! side. Nothing in here reads the system clock or the process default zone:
//! the local zone is injected by the caller (see
//! [`SessionContext`](crate::model::SessionContext)).
//!
//! # DST edge cases
//!
//! - Ambiguous wall times (the repeated hour when clocks fall back) resolve to
//!   the **earlier** instant.
//! - Nonexistent wall times (the skipped hour when clocks spring forward) are
//!   shifted **later** by the length of the gap, using the offset in force
//!   before the transition. `02:30` on a spring-forward night becomes `03:30`.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::ScheduleError;

/// The zone business hours are defined in.
pub const REFERENCE_ZONE: Tz = chrono_tz::America::New_York;

/// A proposed endpoint after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedInstant {
    /// The instant, for storage and overlap checks.
    pub utc: DateTime<Utc>,
    /// The same instant on the reference zone's wall clock.
    pub reference_local: DateTime<Tz>,
}

impl NormalizedInstant {
    /// Reference-zone UTC offset at this instant (e.g., "-04:00").
    pub fn utc_offset(&self) -> String {
        format_utc_offset(&self.reference_local)
    }

    /// Whether the reference zone is observing DST at this instant.
    pub fn dst_active(&self) -> bool {
        is_dst_active(&self.reference_local)
    }
}

/// Converts wall-clock values in the operator's zone to UTC and to the
/// reference zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeZoneNormalizer {
    local: Tz,
    reference: Tz,
}

impl TimeZoneNormalizer {
    pub fn new(local: Tz, reference: Tz) -> Self {
        Self { local, reference }
    }

    pub fn local_zone(&self) -> Tz {
        self.local
    }

    pub fn reference_zone(&self) -> Tz {
        self.reference
    }

    /// Interpret `wall` on the operator's clock.
    pub fn attach(&self, wall: NaiveDateTime) -> DateTime<Tz> {
        match self.local.from_local_datetime(&wall) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => {
                let before = self
                    .local
                    .offset_from_utc_datetime(&(wall - Duration::days(1)))
                    .fix();
                let utc = wall - Duration::seconds(i64::from(before.local_minus_utc()));
                Utc.from_utc_datetime(&utc).with_timezone(&self.local)
            }
        }
    }

    /// Produce the UTC and reference-zone views of a local wall-clock value.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use schedule_validator::normalize::{TimeZoneNormalizer, REFERENCE_ZONE};
    ///
    /// let normalizer = TimeZoneNormalizer::new(chrono_tz::America::Los_Angeles, REFERENCE_ZONE);
    /// let wall = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// let normalized = normalizer.normalize(wall);
    /// // 09:00 PDT is 16:00 UTC and 12:00 EDT
    /// assert_eq!(normalized.utc.to_rfc3339(), "2026-03-16T16:00:00+00:00");
    /// assert_eq!(normalized.reference_local.format("%H:%M").to_string(), "12:00");
    /// ```
    pub fn normalize(&self, wall: NaiveDateTime) -> NormalizedInstant {
        let utc = self.attach(wall).with_timezone(&Utc);
        NormalizedInstant {
            utc,
            reference_local: utc.with_timezone(&self.reference),
        }
    }

    /// Show a stored instant on the operator's clock.
    pub fn to_local(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        utc.with_timezone(&self.local).naive_local()
    }
}

/// Parse an IANA timezone string into `Tz`.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidTimezone`] for unknown names.
pub fn parse_timezone(s: &str) -> Result<Tz, ScheduleError> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(format!("'{}'", s)))
}

/// DST is active when the current offset differs from the year's standard
/// (smaller) offset, sampled in January and July so both hemispheres work.
fn is_dst_active<T: TimeZone>(dt: &DateTime<T>) -> bool {
    let utc = dt.with_timezone(&Utc);
    let year = utc.year();
    let tz = dt.timezone();

    let offset_at = |month: u32| {
        Utc.with_ymd_and_hms(year, month, 1, 12, 0, 0)
            .single()
            .map(|probe| probe.with_timezone(&tz).offset().fix().local_minus_utc())
    };

    let current = dt.offset().fix().local_minus_utc();
    match (offset_at(1), offset_at(7)) {
        (Some(jan), Some(jul)) => current != jan.min(jul),
        _ => false,
    }
}

/// Format the UTC offset as a string (e.g., "-05:00", "+09:00").
fn format_utc_offset<T: TimeZone>(dt: &DateTime<T>) -> String {
    let offset_secs = dt.offset().fix().local_minus_utc();
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    format!("{sign}{hours:02}:{minutes:02}")
}

// ── Tests ───────────────────────────────────────────────────────────────────
