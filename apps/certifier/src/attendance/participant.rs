//! Participant self-service: sign in by CPF, see own registrations, sign up
//! for or cancel events, edit profile.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{find_attendee_by_cpf, find_event};
use crate::errors::AppError;
use crate::identity::{clean_cpf, format_phone};
use crate::models::{Attendee, BackendSnapshot, Event, Registration};

/// One of the attendee's registrations joined with its event.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantRegistration<'a> {
    pub registration_id: Uuid,
    pub checked_in: bool,
    pub certificate_code: Option<&'a str>,
    pub event: &'a Event,
}

/// Finds the attendee whose CPF has the same digits as `cpf`.
///
/// The CPF is only cleaned, not checksum-validated: whatever is stored can
/// sign in.
pub fn participant_login<'a>(
    snapshot: &'a BackendSnapshot,
    cpf: &str,
) -> Result<&'a Attendee, AppError> {
    let digits = clean_cpf(cpf);
    if digits.is_empty() {
        return Err(AppError::Validation("CPF is required".to_string()));
    }
    find_attendee_by_cpf(snapshot, &digits)
        .ok_or_else(|| AppError::NotFound("no attendee with this CPF".to_string()))
}

/// The attendee's registrations in stored order. Registrations whose event no
/// longer exists are left out.
pub fn participant_registrations(
    snapshot: &BackendSnapshot,
    attendee_id: Uuid,
) -> Vec<ParticipantRegistration<'_>> {
    snapshot
        .registrations
        .iter()
        .filter(|r| r.attendee_id == attendee_id)
        .filter_map(|r| {
            let event = snapshot.events.iter().find(|e| e.id == r.event_id)?;
            Some(ParticipantRegistration {
                registration_id: r.id,
                checked_in: r.checked_in,
                certificate_code: r.certificate_code.as_deref(),
                event,
            })
        })
        .collect()
}

/// Open events the attendee has not signed up for, earliest first.
pub fn available_events(snapshot: &BackendSnapshot, attendee_id: Uuid) -> Vec<&Event> {
    let mut events: Vec<&Event> = snapshot
        .events
        .iter()
        .filter(|e| e.is_open)
        .filter(|e| {
            !snapshot
                .registrations
                .iter()
                .any(|r| r.attendee_id == attendee_id && r.event_id == e.id)
        })
        .collect();
    events.sort_by_key(|e| e.date);
    events
}

/// Signs the attendee up for one more open event.
pub fn subscribe(
    snapshot: &mut BackendSnapshot,
    attendee_id: Uuid,
    event_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Registration, AppError> {
    ensure_attendee(snapshot, attendee_id)?;
    let event = find_event(snapshot, event_id)?;
    if !event.is_open {
        return Err(AppError::Validation(format!(
            "registrations for '{}' are closed",
            event.title
        )));
    }
    if snapshot
        .registrations
        .iter()
        .any(|r| r.attendee_id == attendee_id && r.event_id == event_id)
    {
        return Err(AppError::Validation(
            "already registered for this event".to_string(),
        ));
    }

    let registration = Registration::new(attendee_id, event_id, now);
    snapshot.registrations.push(registration.clone());
    info!(attendee_id = %attendee_id, event_id = %event_id, "Participant subscribed");
    Ok(registration)
}

/// Cancels one of the attendee's own registrations.
pub fn unsubscribe(
    snapshot: &mut BackendSnapshot,
    attendee_id: Uuid,
    registration_id: Uuid,
) -> Result<(), AppError> {
    let position = snapshot
        .registrations
        .iter()
        .position(|r| r.id == registration_id && r.attendee_id == attendee_id)
        .ok_or_else(|| AppError::NotFound(format!("registration {registration_id}")))?;
    snapshot.registrations.remove(position);
    info!(attendee_id = %attendee_id, registration_id = %registration_id, "Participant unsubscribed");
    Ok(())
}

/// Updates name and phone. The CPF cannot be changed here.
pub fn update_profile(
    snapshot: &mut BackendSnapshot,
    attendee_id: Uuid,
    full_name: &str,
    phone: &str,
) -> Result<(), AppError> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::Validation("full name is required".to_string()));
    }
    let attendee = snapshot
        .attendees
        .iter_mut()
        .find(|a| a.id == attendee_id)
        .ok_or_else(|| AppError::NotFound(format!("attendee {attendee_id}")))?;
    attendee.full_name = full_name.to_string();
    attendee.phone = format_phone(phone);
    info!(attendee_id = %attendee_id, "Participant profile updated");
    Ok(())
}

fn ensure_attendee(snapshot: &BackendSnapshot, attendee_id: Uuid) -> Result<(), AppError> {
    if snapshot.attendees.iter().any(|a| a.id == attendee_id) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("attendee {attendee_id}")))
    }
}
