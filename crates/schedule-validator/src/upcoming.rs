//! Login-time reminder: which appointments start soon.
//!
//! Reads the same UTC convention the validator writes; `now` always comes
//! from the caller.

use chrono::{DateTime, Duration, Utc};

use crate::model::Appointment;

/// Appointments starting strictly after `now` and strictly before
/// `now + window`, ordered by start. A horizon past the representable
/// range is unbounded.
pub fn upcoming_within<'a>(
    appointments: &'a [Appointment],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<&'a Appointment> {
    let horizon = now.checked_add_signed(window);
    let mut due: Vec<_> = appointments
        .iter()
        .filter(|a| now < a.interval.start() && horizon.map_or(true, |h| a.interval.start() < h))
        .collect();
    due.sort_by_key(|a| (a.interval.start(), a.id));
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppointmentId, AuditFields, ContactId, CustomerId, TimeInterval, UserId};
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
    }

    fn appt(id: u32, h: u32, m: u32) -> Appointment {
        let start = at(h, m);
        Appointment {
            id: AppointmentId(id),
            title: "Sync".to_string(),
            description: "Weekly sync".to_string(),
            location: "Online".to_string(),
            kind: "Sync".to_string(),
            interval: TimeInterval::new(start, start + Duration::minutes(30)).unwrap(),
            customer_id: CustomerId(1),
            contact_id: ContactId(1),
            user_id: UserId(1),
            audit: AuditFields {
                created_by: "seed".to_string(),
                created_at: at(0, 0),
                last_updated_by: "seed".to_string(),
                last_updated_at: at(0, 0),
            },
        }
    }

    #[test]
    fn test_within_window() {
        let appts = vec![appt(1, 10, 10), appt(2, 11, 0)];
        let due = upcoming_within(&appts, at(10, 0), Duration::minutes(15));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, AppointmentId(1));
    }

    #[test]
    fn test_window_is_open_at_both_ends() {
        let appts = vec![appt(1, 10, 0), appt(2, 10, 15)];
        assert!(upcoming_within(&appts, at(10, 0), Duration::minutes(15)).is_empty());
    }

    #[test]
    fn test_ordered_by_start() {
        let appts = vec![appt(1, 10, 12), appt(2, 10, 5)];
        let due = upcoming_within(&appts, at(10, 0), Duration::minutes(15));
        let ids: Vec<_> = due.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![AppointmentId(2), AppointmentId(1)]);
    }

    #[test]
    fn test_overflowing_window_is_unbounded() {
        let appts = vec![appt(1, 9, 0), appt(2, 23, 0)];
        let window = Duration::try_minutes(200_000_000_000).unwrap();
        let due = upcoming_within(&appts, at(10, 0), window);
        let ids: Vec<_> = due.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![AppointmentId(2)]);
    }

    #[test]
    fn test_past_appointments_ignored() {
        let appts = vec![appt(1, 9, 55)];
        assert!(upcoming_within(&appts, at(10, 0), Duration::minutes(15)).is_empty());
    }
}
