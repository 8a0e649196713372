//! One booking request end to end: snapshot, validate, stamp, persist.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::SchedulingPolicy;
use crate::error::BookingError;
use crate::model::{Appointment, AppointmentDraft, AppointmentId, SessionContext};
use crate::store::{AppointmentStore, AuditStamp, PendingAppointment};
use crate::validation::{ValidationPipeline, ValidationResult};

/// Validates drafts against a store's current bookings and writes the
/// accepted ones.
///
/// # Concurrency
///
/// The customer snapshot is read once, before validation, and the write
/// happens afterwards with no guard in between. Two sessions booking the same
/// customer at the same time can both pass validation and both persist,
/// leaving an overlap in storage. That is acceptable for a single operator.
/// A multi-user deployment needs either a re-check inside the store's write
/// transaction or a per-customer lock around [`Scheduler::save`].
#[derive(Debug)]
pub struct Scheduler<S> {
    store: S,
    policy: SchedulingPolicy,
}

impl<S: AppointmentStore> Scheduler<S> {
    pub fn new(store: S, policy: SchedulingPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn policy(&self) -> &SchedulingPolicy {
        &self.policy
    }

    /// Validate `draft` without persisting it.
    ///
    /// # Errors
    ///
    /// Only store failures; rule violations come back inside the result.
    pub fn check(
        &self,
        draft: &AppointmentDraft,
        session: &SessionContext,
    ) -> Result<ValidationResult, BookingError> {
        let snapshot = match draft.customer_id {
            Some(customer) => self.store.fetch_by_customer(customer)?,
            None => Vec::new(),
        };
        Ok(ValidationPipeline::new(session.local_zone, &self.policy).validate(draft, &snapshot))
    }

    /// Insert (no `appointment_id`) or update (with one) the draft.
    ///
    /// `now` becomes the audit timestamp; it is never consulted by the rules.
    ///
    /// # Errors
    ///
    /// [`BookingError::Rejected`] with every violation found, or
    /// [`BookingError::Store`] if the store fails.
    pub fn save(
        &mut self,
        draft: &AppointmentDraft,
        session: &SessionContext,
        now: DateTime<Utc>,
    ) -> Result<Appointment, BookingError> {
        let snapshot = match draft.customer_id {
            Some(customer) => self.store.fetch_by_customer(customer)?,
            None => Vec::new(),
        };

        let pipeline = ValidationPipeline::new(session.local_zone, &self.policy);
        let validated = pipeline.accept(draft, &snapshot).map_err(|result| {
            warn!(
                user = %session.user_name,
                violations = result.violations().len(),
                "appointment rejected"
            );
            BookingError::Rejected(result)
        })?;

        let pending = PendingAppointment {
            stamp: AuditStamp::new(session, now),
            draft: validated,
        };
        let saved = match pending.draft.appointment_id {
            Some(id) => self.store.update(id, pending)?,
            None => self.store.insert(pending)?,
        };
        info!(
            id = %saved.id,
            user = %session.user_name,
            start = %saved.interval.start(),
            "appointment saved"
        );
        Ok(saved)
    }

    /// # Errors
    ///
    /// [`BookingError::Store`] if the appointment does not exist.
    pub fn cancel(&mut self, id: AppointmentId) -> Result<Appointment, BookingError> {
        let removed = self.store.delete(id)?;
        info!(%id, "appointment cancelled");
        Ok(removed)
    }
}
