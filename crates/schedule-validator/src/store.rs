//! Persistence boundary.
//!
//! The validator never talks to storage itself: the booking service reads a
//! snapshot through [`AppointmentStore::fetch_by_customer`] and hands back a
//! validated, UTC-normalized [`PendingAppointment`]. Implementations own all
//! I/O and report failures as [`StoreError`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::StoreError;
use crate::model::{
    Appointment, AppointmentId, AuditFields, CustomerId, ExistingAppointment, SessionContext,
    UserId,
};
use crate::validation::ValidatedDraft;

/// Who changed a row and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    pub by: String,
    pub at: DateTime<Utc>,
}

impl AuditStamp {
    pub fn new(session: &SessionContext, at: DateTime<Utc>) -> Self {
        Self {
            by: session.user_name.clone(),
            at,
        }
    }
}

/// A validated draft ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAppointment {
    pub draft: ValidatedDraft,
    pub stamp: AuditStamp,
}

pub trait AppointmentStore {
    /// The customer's bookings, ordered by start.
    fn fetch_by_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<ExistingAppointment>, StoreError>;

    /// Full rows for a user, ordered by start.
    fn fetch_by_user(&self, user: UserId) -> Result<Vec<Appointment>, StoreError>;

    /// Persist a new appointment; the store assigns the id and sets all
    /// audit fields from the stamp.
    fn insert(&mut self, pending: PendingAppointment) -> Result<Appointment, StoreError>;

    /// Replace appointment `id`, keeping its creation audit fields.
    fn update(
        &mut self,
        id: AppointmentId,
        pending: PendingAppointment,
    ) -> Result<Appointment, StoreError>;

    fn delete(&mut self, id: AppointmentId) -> Result<Appointment, StoreError>;
}

/// In-process store keyed by appointment id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    rows: BTreeMap<AppointmentId, Appointment>,
    next_id: u32,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with already-stored rows; new ids continue after the largest.
    pub fn with_appointments(appointments: impl IntoIterator<Item = Appointment>) -> Self {
        let rows: BTreeMap<_, _> = appointments.into_iter().map(|a| (a.id, a)).collect();
        let next_id = rows.keys().next_back().map_or(0, |id| id.0);
        Self { rows, next_id }
    }

    pub fn get(&self, id: AppointmentId) -> Option<&Appointment> {
        self.rows.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn sorted_by_start<'a>(rows: impl Iterator<Item = &'a Appointment>) -> Vec<&'a Appointment> {
        let mut rows: Vec<_> = rows.collect();
        rows.sort_by_key(|a| (a.interval.start(), a.id));
        rows
    }
}

fn build(id: AppointmentId, draft: ValidatedDraft, audit: AuditFields) -> Appointment {
    Appointment {
        id,
        title: draft.title,
        description: draft.description,
        location: draft.location,
        kind: draft.kind,
        interval: draft.interval,
        customer_id: draft.customer_id,
        contact_id: draft.contact_id,
        user_id: draft.user_id,
        audit,
    }
}

impl AppointmentStore for InMemoryStore {
    fn fetch_by_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<ExistingAppointment>, StoreError> {
        let rows = self.rows.values().filter(|a| a.customer_id == customer);
        Ok(Self::sorted_by_start(rows)
            .into_iter()
            .map(Appointment::as_existing)
            .collect())
    }

    fn fetch_by_user(&self, user: UserId) -> Result<Vec<Appointment>, StoreError> {
        let rows = self.rows.values().filter(|a| a.user_id == user);
        Ok(Self::sorted_by_start(rows).into_iter().cloned().collect())
    }

    fn insert(&mut self, pending: PendingAppointment) -> Result<Appointment, StoreError> {
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend("appointment id space exhausted".to_string()))?;
        let id = AppointmentId(self.next_id);
        let stamp = pending.stamp;
        let audit = AuditFields {
            created_by: stamp.by.clone(),
            created_at: stamp.at,
            last_updated_by: stamp.by,
            last_updated_at: stamp.at,
        };
        let appointment = build(id, pending.draft, audit);
        self.rows.insert(id, appointment.clone());
        info!(%id, customer = %appointment.customer_id, "appointment inserted");
        Ok(appointment)
    }

    fn update(
        &mut self,
        id: AppointmentId,
        pending: PendingAppointment,
    ) -> Result<Appointment, StoreError> {
        let row = self.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let audit = AuditFields {
            created_by: row.audit.created_by.clone(),
            created_at: row.audit.created_at,
            last_updated_by: pending.stamp.by,
            last_updated_at: pending.stamp.at,
        };
        *row = build(id, pending.draft, audit);
        info!(%id, "appointment updated");
        Ok(row.clone())
    }

    fn delete(&mut self, id: AppointmentId) -> Result<Appointment, StoreError> {
        let removed = self.rows.remove(&id).ok_or(StoreError::NotFound(id))?;
        info!(%id, "appointment deleted");
        Ok(removed)
    }
}
