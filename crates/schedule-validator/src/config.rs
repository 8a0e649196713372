//! Scheduling policy: reference zone, business window and reminder window.
//!
//! The operator's own zone is deliberately absent; it belongs to the
//! [`SessionContext`](crate::model::SessionContext).

use chrono::Duration;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::business_hours::BusinessHours;
use crate::error::{Result, ScheduleError};
use crate::normalize::{parse_timezone, REFERENCE_ZONE};

/// Default lead time for the login-time upcoming-appointment check.
pub const DEFAULT_UPCOMING_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingPolicy {
    pub reference_zone: Tz,
    pub business_hours: BusinessHours,
    pub upcoming_window: Duration,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            reference_zone: REFERENCE_ZONE,
            business_hours: BusinessHours::default(),
            upcoming_window: Duration::minutes(DEFAULT_UPCOMING_MINUTES),
        }
    }
}

/// On-disk form of [`SchedulingPolicy`]. Every field is optional.
///
/// ```json
/// { "reference_zone": "America/New_York", "open_hour": 8, "close_hour": 22,
///   "upcoming_window_minutes": 15 }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub reference_zone: Option<String>,
    pub open_hour: Option<u32>,
    pub close_hour: Option<u32>,
    pub upcoming_window_minutes: Option<i64>,
}

impl SchedulingPolicy {
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTimezone`] for an unknown zone and
    /// [`ScheduleError::InvalidPolicy`] for an empty business window or a
    /// non-positive reminder window.
    pub fn from_config(config: &PolicyConfig) -> Result<Self> {
        let defaults = Self::default();

        let reference_zone = match config.reference_zone.as_deref() {
            Some(name) => parse_timezone(name)?,
            None => defaults.reference_zone,
        };

        let business_hours = match (config.open_hour, config.close_hour) {
            (None, None) => defaults.business_hours,
            (open, close) => BusinessHours::from_hours(open.unwrap_or(8), close.unwrap_or(22))?,
        };

        let upcoming_window = match config.upcoming_window_minutes {
            Some(minutes) if minutes <= 0 => {
                return Err(ScheduleError::InvalidPolicy(format!(
                    "upcoming_window_minutes must be positive, got {minutes}"
                )))
            }
            Some(minutes) => Duration::try_minutes(minutes).ok_or_else(|| {
                ScheduleError::InvalidPolicy(format!(
                    "upcoming_window_minutes out of range, got {minutes}"
                ))
            })?,
            None => defaults.upcoming_window,
        };

        Ok(Self {
            reference_zone,
            business_hours,
            upcoming_window,
        })
    }

    /// Parse a JSON policy document.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidPolicy`] when the JSON does not match
    /// [`PolicyConfig`], plus anything [`from_config`](Self::from_config) rejects.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: PolicyConfig =
            serde_json::from_str(s).map_err(|e| ScheduleError::InvalidPolicy(e.to_string()))?;
        Self::from_config(&config)
    }
}
