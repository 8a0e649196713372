//! # schedule-validator
//!
//! Deterministic validation of appointment drafts for a scheduling client.
//!
//! A draft arrives as raw form input (text fields, a picked date and an hour
//! label for each endpoint, selected ids). The pipeline checks it is
//! well-formed, combines each date and hour into a wall-clock value, attaches
//! the operator's zone, and then checks the result against business hours in
//! the reference zone and against the customer's existing bookings. Every
//! rule violation is reported at once.
//!
//! ## Modules
//!
//! - [`wallclock`] — date + hour selection → local wall-clock timestamp
//! - [`normalize`] — local wall clock → UTC instant and reference-zone view
//! - [`business_hours`] — the allowed window on the reference-zone clock
//! - [`overlap`] — per-customer conflict detection
//! - [`validation`] — the pipeline, violations and results
//! - [`config`] — scheduling policy
//! - [`store`] — persistence interface and an in-memory store
//! - [`booking`] — snapshot → validate → persist service
//! - [`upcoming`] — appointments starting soon
//! - [`model`] — identifiers, intervals, drafts and stored appointments
//! - [`error`] — Error types

pub mod booking;
pub mod business_hours;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod overlap;
pub mod store;
pub mod upcoming;
pub mod validation;
pub mod wallclock;

pub use booking::Scheduler;
pub use business_hours::BusinessHours;
pub use config::{PolicyConfig, SchedulingPolicy};
pub use error::{BookingError, MalformedInput, ScheduleError, StoreError};
pub use model::{
    Appointment, AppointmentDraft, AppointmentId, AuditFields, ContactId, CustomerId,
    ExistingAppointment, Field, SessionContext, TimeInterval, UserId,
};
pub use normalize::{parse_timezone, NormalizedInstant, TimeZoneNormalizer, REFERENCE_ZONE};
pub use overlap::find_conflicts;
pub use store::{AppointmentStore, AuditStamp, InMemoryStore, PendingAppointment};
pub use upcoming::upcoming_within;
pub use validation::{ValidatedDraft, ValidationPipeline, ValidationResult, Violation};
