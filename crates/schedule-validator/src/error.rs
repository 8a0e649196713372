//! Error types for schedule-validator operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{AppointmentId, Field};
use crate::validation::ValidationResult;

/// A structural problem with the draft that makes rule evaluation meaningless.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    #[error("{0} must be completed.")]
    Missing(Field),

    #[error("{0} must be selected.")]
    Unselected(Field),

    #[error("{field} must be an hour between 0 and 23, got '{value}'.")]
    InvalidHour { field: Field, value: String },
}

impl MalformedInput {
    pub fn field(&self) -> Field {
        match self {
            MalformedInput::Missing(field) | MalformedInput::Unselected(field) => *field,
            MalformedInput::InvalidHour { field, .. } => *field,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Malformed input: {0}")]
    Malformed(#[from] MalformedInput),
}

/// Failures raised by an [`AppointmentStore`](crate::store::AppointmentStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Appointment {0} not found")]
    NotFound(AppointmentId),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Why a booking request did not persist anything.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Appointment rejected: {}", summarize(.0))]
    Rejected(ValidationResult),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn summarize(result: &ValidationResult) -> String {
    result
        .violations()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
