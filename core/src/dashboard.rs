//! "My dashboard" view model: the events a user signed up for, with their
//! schedules.
//!
//! Backend records arrive with their foreign keys populated (`userID`,
//! `eventID` are nested objects with an `_id`). Records whose keys are
//! missing or not populated never match.

use serde::Serialize;

use crate::types::{record_id, Record};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrollment {
    pub registration: Record,
    pub schedules: Vec<Record>,
}

/// Registrations of `user`, each paired with the schedules of its event.
///
/// Keeps the order of `registrations` and `schedules`.
pub fn my_dashboard(
    user: &Record,
    registrations: &[Record],
    schedules: &[Record],
) -> Vec<Enrollment> {
    let Some(user_id) = record_id(user) else {
        return Vec::new();
    };

    registrations
        .iter()
        .filter(|registration| nested_id(registration, "userID") == Some(user_id))
        .map(|registration| {
            let event_id = nested_id(registration, "eventID");
            let schedules = schedules
                .iter()
                .filter(|schedule| event_id.is_some() && nested_id(schedule, "eventID") == event_id)
                .cloned()
                .collect();
            Enrollment {
                registration: registration.clone(),
                schedules,
            }
        })
        .collect()
}

fn nested_id<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record.get(key).and_then(record_id)
}
