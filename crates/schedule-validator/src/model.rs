//! Domain types shared by the validator, the store and the booking service.
//!
//! Every instant that crosses a module boundary is a `DateTime<Utc>`; local
//! wall-clock values only exist as `NaiveDate`/`NaiveDateTime` inside the
//! draft and the combiner, never unlabeled beyond them.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

// ── Identifiers ─────────────────────────────────────────────────────────────

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Primary key of a stored appointment.
    AppointmentId
);
id_type!(CustomerId);
id_type!(ContactId);
id_type!(UserId);

// ── Fields ──────────────────────────────────────────────────────────────────

/// A user-facing input of the appointment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Description,
    Location,
    Type,
    StartHour,
    EndHour,
    StartDate,
    EndDate,
    Customer,
    Contact,
    User,
}

impl Field {
    /// Stable machine key, used as the subject of a malformed-input violation.
    pub fn key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Location => "location",
            Field::Type => "type",
            Field::StartHour => "start_hour",
            Field::EndHour => "end_hour",
            Field::StartDate => "start_date",
            Field::EndDate => "end_date",
            Field::Customer => "customer_id",
            Field::Contact => "contact_id",
            Field::User => "user_id",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Title => "Title field",
            Field::Description => "Description field",
            Field::Location => "Location field",
            Field::Type => "Type field",
            Field::StartHour => "Start time",
            Field::EndHour => "End time",
            Field::StartDate => "Start date",
            Field::EndDate => "End date",
            Field::Customer => "Customer ID",
            Field::Contact => "Contact ID",
            Field::User => "User ID",
        };
        f.write_str(label)
    }
}

// ── TimeInterval ────────────────────────────────────────────────────────────

/// A half-open UTC interval `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = ScheduleError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Build an interval, rejecting empty and inverted ones.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidInterval`] when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ScheduleError> {
        if start >= end {
            return Err(ScheduleError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// One already-booked appointment of a customer, as read from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingAppointment {
    pub id: AppointmentId,
    #[serde(flatten)]
    pub interval: TimeInterval,
}

// ── Draft ───────────────────────────────────────────────────────────────────

/// Raw form input for a proposed appointment.
///
/// Everything the UI may leave empty is optional here; hours are the labels
/// the operator picked (`"0"`..`"23"`), parsed during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentDraft {
    /// Set when editing an existing appointment.
    pub appointment_id: Option<AppointmentId>,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: Option<NaiveDate>,
    pub start_hour: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub end_hour: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub contact_id: Option<ContactId>,
    pub user_id: Option<UserId>,
}

// ── Persisted entity ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFields {
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub last_updated_by: String,
    pub last_updated_at: DateTime<Utc>,
}

/// A stored appointment. Times are always UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub interval: TimeInterval,
    pub customer_id: CustomerId,
    pub contact_id: ContactId,
    pub user_id: UserId,
    pub audit: AuditFields,
}

impl Appointment {
    pub fn as_existing(&self) -> ExistingAppointment {
        ExistingAppointment {
            id: self.id,
            interval: self.interval,
        }
    }
}

/// Who is operating the client and in which zone their wall clock runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_name: String,
    pub local_zone: Tz,
}

impl SessionContext {
    pub fn new(user_name: impl Into<String>, local_zone: Tz) -> Self {
        Self {
            user_name: user_name.into(),
            local_zone,
        }
    }
}
