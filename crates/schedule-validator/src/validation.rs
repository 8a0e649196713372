//! The validation pipeline: structural checks, then time rules.
//!
//! Each rule is a pure function returning zero or one [`Violation`]; the
//! pipeline only concatenates their outputs. No stage reads the clock, so
//! the same draft and snapshot always give the same [`ValidationResult`].
//!
//! Stage order:
//!
//! 1. Required fields and hour labels. Any failure here returns immediately
//!    with malformed-input violations only.
//! 2. Combine and normalize start/end.
//! 3. `StartNotBeforeEnd`.
//! 4. Business hours for start and end (both may fire).
//! 5. Overlap against the customer snapshot, skipped if stage 3 failed.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

use crate::business_hours::{self, BusinessHours};
use crate::config::SchedulingPolicy;
use crate::error::MalformedInput;
use crate::model::{
    AppointmentDraft, AppointmentId, ContactId, CustomerId, ExistingAppointment, Field,
    TimeInterval, UserId,
};
use crate::normalize::{NormalizedInstant, TimeZoneNormalizer};
use crate::overlap;
use crate::wallclock;

// ── Violations ──────────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("{0}")]
    MalformedInput(MalformedInput),

    #[error("Start time must be before end time.")]
    StartNotBeforeEnd,

    #[error("Start time {} must be within business hours ({hours} {zone}).", .at.format("%H:%M"))]
    StartOutsideBusinessHours {
        at: NaiveTime,
        zone: Tz,
        hours: BusinessHours,
    },

    #[error("End time {} must be within business hours ({hours} {zone}).", .at.format("%H:%M"))]
    EndOutsideBusinessHours {
        at: NaiveTime,
        zone: Tz,
        hours: BusinessHours,
    },

    #[error("An appointment already exists at this time for this customer (conflicts with {}).", join_ids(.conflicts))]
    OverlappingAppointment { conflicts: Vec<AppointmentId> },
}

fn join_ids(ids: &[AppointmentId]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Violation {
    /// The field (for malformed input) or rule name this violation is about.
    pub fn subject(&self) -> &'static str {
        match self {
            Violation::MalformedInput(m) => m.field().key(),
            Violation::StartNotBeforeEnd => "start_not_before_end",
            Violation::StartOutsideBusinessHours { .. } => "start_outside_business_hours",
            Violation::EndOutsideBusinessHours { .. } => "end_outside_business_hours",
            Violation::OverlappingAppointment { .. } => "overlapping_appointment",
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, Violation::MalformedInput(_))
    }
}

impl From<MalformedInput> for Violation {
    fn from(m: MalformedInput) -> Self {
        Violation::MalformedInput(m)
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Violation", 3)?;
        s.serialize_field("subject", self.subject())?;
        s.serialize_field("structural", &self.is_structural())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

// ── ValidationResult ────────────────────────────────────────────────────────

/// Outcome of one pipeline run. `ok()` is true exactly when there are no
/// violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    ok: bool,
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            ok: violations.is_empty(),
            violations,
        }
    }

    pub fn valid() -> Self {
        Self::from_violations(Vec::new())
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ok {
            return f.write_str("ok");
        }
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", v.subject(), v)?;
        }
        Ok(())
    }
}

// ── Validated draft ─────────────────────────────────────────────────────────

/// A draft that passed every rule, with its UTC interval computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub appointment_id: Option<AppointmentId>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub kind: String,
    pub interval: TimeInterval,
    pub customer_id: CustomerId,
    pub contact_id: ContactId,
    pub user_id: UserId,
}

/// Draft fields after the structural stage.
struct Structured {
    start: NaiveDateTime,
    end: NaiveDateTime,
    customer_id: CustomerId,
    contact_id: ContactId,
    user_id: UserId,
}

// ── Pipeline ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct ValidationPipeline {
    normalizer: TimeZoneNormalizer,
    hours: BusinessHours,
}

impl ValidationPipeline {
    /// `local_zone` is the operator's zone; the policy supplies the reference
    /// zone and the business window.
    pub fn new(local_zone: Tz, policy: &SchedulingPolicy) -> Self {
        Self {
            normalizer: TimeZoneNormalizer::new(local_zone, policy.reference_zone),
            hours: policy.business_hours,
        }
    }

    pub fn normalizer(&self) -> &TimeZoneNormalizer {
        &self.normalizer
    }

    /// Run every applicable check and report all violations found.
    pub fn validate(
        &self,
        draft: &AppointmentDraft,
        existing: &[ExistingAppointment],
    ) -> ValidationResult {
        match self.accept(draft, existing) {
            Ok(_) => ValidationResult::valid(),
            Err(result) => result,
        }
    }

    /// Like [`validate`](Self::validate) but hands back the typed, UTC-normalized
    /// draft on success.
    ///
    /// # Errors
    ///
    /// Returns the full [`ValidationResult`] when any check fails.
    pub fn accept(
        &self,
        draft: &AppointmentDraft,
        existing: &[ExistingAppointment],
    ) -> Result<ValidatedDraft, ValidationResult> {
        let structured = check_structure(draft).map_err(|malformed| {
            debug!(count = malformed.len(), "draft rejected as malformed");
            ValidationResult::from_violations(malformed.into_iter().map(Violation::from).collect())
        })?;

        let start = self.normalizer.normalize(structured.start);
        let end = self.normalizer.normalize(structured.end);
        debug!(start = %start.utc, end = %end.utc, "normalized draft endpoints");

        let (interval, mut violations) = check_times(&self.hours, &start, &end);
        if let Some(interval) = interval {
            violations.extend(overlap::check_overlap(
                &interval,
                existing,
                draft.appointment_id,
            ));
        }

        match interval {
            Some(interval) if violations.is_empty() => Ok(ValidatedDraft {
                appointment_id: draft.appointment_id,
                title: draft.title.trim().to_string(),
                description: draft.description.trim().to_string(),
                location: draft.location.trim().to_string(),
                kind: draft.kind.trim().to_string(),
                interval,
                customer_id: structured.customer_id,
                contact_id: structured.contact_id,
                user_id: structured.user_id,
            }),
            _ => {
                debug!(count = violations.len(), "draft violates scheduling rules");
                Err(ValidationResult::from_violations(violations))
            }
        }
    }
}

/// Start-before-end and business hours. Returns the interval only when the
/// endpoints are correctly ordered.
fn check_times(
    hours: &BusinessHours,
    start: &NormalizedInstant,
    end: &NormalizedInstant,
) -> (Option<TimeInterval>, Vec<Violation>) {
    let interval = TimeInterval::new(start.utc, end.utc).ok();
    let violations = [
        interval.is_none().then_some(Violation::StartNotBeforeEnd),
        business_hours::check_start(hours, &start.reference_local),
        business_hours::check_end(hours, &end.reference_local),
    ]
    .into_iter()
    .flatten()
    .collect();
    (interval, violations)
}

fn require_text(field: Field, value: &str) -> Option<MalformedInput> {
    value
        .trim()
        .is_empty()
        .then_some(MalformedInput::Missing(field))
}

fn require<T: Copy>(field: Field, value: Option<T>) -> Result<T, MalformedInput> {
    value.ok_or(MalformedInput::Unselected(field))
}

fn require_hour(field: Field, label: Option<&str>) -> Result<u32, MalformedInput> {
    match label {
        Some(label) if !label.trim().is_empty() => wallclock::parse_hour(field, label),
        _ => Err(MalformedInput::Unselected(field)),
    }
}

/// Every required field, in form order. Collects all problems before
/// giving up.
fn check_structure(draft: &AppointmentDraft) -> Result<Structured, Vec<MalformedInput>> {
    let mut malformed: Vec<MalformedInput> = [
        require_text(Field::Title, &draft.title),
        require_text(Field::Description, &draft.description),
        require_text(Field::Location, &draft.location),
        require_text(Field::Type, &draft.kind),
    ]
    .into_iter()
    .flatten()
    .collect();

    let start_hour = require_hour(Field::StartHour, draft.start_hour.as_deref());
    let end_hour = require_hour(Field::EndHour, draft.end_hour.as_deref());
    let start_date = require(Field::StartDate, draft.start_date);
    let end_date = require(Field::EndDate, draft.end_date);
    let customer = require(Field::Customer, draft.customer_id);
    let contact = require(Field::Contact, draft.contact_id);
    let user = require(Field::User, draft.user_id);

    match (start_hour, end_hour, start_date, end_date, customer, contact, user) {
        (Ok(sh), Ok(eh), Ok(sd), Ok(ed), Ok(customer_id), Ok(contact_id), Ok(user_id))
            if malformed.is_empty() =>
        {
            let start = wallclock::combine(Some(sd), sh, Field::StartDate, Field::StartHour)
                .map_err(|e| vec![e])?;
            let end = wallclock::combine(Some(ed), eh, Field::EndDate, Field::EndHour)
                .map_err(|e| vec![e])?;
            Ok(Structured {
                start,
                end,
                customer_id,
                contact_id,
                user_id,
            })
        }
        (sh, eh, sd, ed, customer, contact, user) => {
            malformed.extend(
                [
                    sh.err(),
                    eh.err(),
                    sd.err(),
                    ed.err(),
                    customer.err(),
                    contact.err(),
                    user.err(),
                ]
                .into_iter()
                .flatten(),
            );
            Err(malformed)
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
