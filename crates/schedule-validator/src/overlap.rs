//! Detect conflicts between a proposed interval and a customer's bookings.
//!
//! The conflict rule is deliberately narrower than textbook interval overlap
//! (`s < e_i && s_i < e`). A proposal `[s, e)` conflicts with `[s_i, e_i)`
//! only when
//!
//! - `s` lies strictly inside `(s_i, e_i)`, or
//! - `e` lies strictly inside `(s_i, e_i)`, or
//! - the two intervals are identical.
//!
//! Back-to-back bookings are allowed. A proposal that strictly contains an
//! existing booking (`s < s_i && e_i < e`) or shares exactly one endpoint
//! with it while covering it is **not** reported either. Whether that was the
//! intended business rule is unknown, so it is kept as-is.

use chrono::{DateTime, Utc};

use crate::model::{AppointmentId, ExistingAppointment, TimeInterval};
use crate::validation::Violation;

/// Whether `proposed` conflicts with `existing` under the booking policy.
pub fn conflicts(proposed: &TimeInterval, existing: &TimeInterval) -> bool {
    let inside = |t: DateTime<Utc>| existing.start() < t && t < existing.end();
    inside(proposed.start()) || inside(proposed.end()) || proposed == existing
}

/// Collect the ids of every booking `proposed` conflicts with, in snapshot
/// order. `editing` is skipped so an appointment never conflicts with its own
/// stored version.
pub fn find_conflicts(
    proposed: &TimeInterval,
    existing: &[ExistingAppointment],
    editing: Option<AppointmentId>,
) -> Vec<AppointmentId> {
    existing
        .iter()
        .filter(|appt| Some(appt.id) != editing)
        .filter(|appt| conflicts(proposed, &appt.interval))
        .map(|appt| appt.id)
        .collect()
}

/// Zero or one `OverlappingAppointment` violation carrying all conflicts.
pub fn check_overlap(
    proposed: &TimeInterval,
    existing: &[ExistingAppointment],
    editing: Option<AppointmentId>,
) -> Option<Violation> {
    let conflicts = find_conflicts(proposed, existing, editing);
    (!conflicts.is_empty()).then_some(Violation::OverlappingAppointment { conflicts })
}
