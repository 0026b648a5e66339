//! Public registration form and kiosk walk-in registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{find_attendee_by_cpf, find_event};
use crate::errors::AppError;
use crate::identity::{format_phone, Cpf};
use crate::models::{Attendee, BackendSnapshot, Event, Registration};

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub full_name: String,
    pub cpf: String,
    pub phone: String,
    pub event_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    pub attendee_id: Uuid,
    /// False when the CPF already belonged to an attendee.
    pub attendee_created: bool,
    /// Events a registration was created for in this call.
    pub registered_event_ids: Vec<Uuid>,
    /// Requested events the attendee was already registered for.
    pub skipped_event_ids: Vec<Uuid>,
}

/// Events accepting registrations, earliest first.
pub fn open_events(snapshot: &BackendSnapshot) -> Vec<&Event> {
    let mut events: Vec<&Event> = snapshot.events.iter().filter(|e| e.is_open).collect();
    events.sort_by_key(|e| e.date);
    events
}

/// Registers an attendee for one or more open events.
///
/// An attendee already known by CPF keeps their stored name; only the phone is
/// updated. Events the attendee is already registered for are skipped. Nothing
/// is written unless every requested event exists and is open.
pub fn register(
    snapshot: &mut BackendSnapshot,
    request: &RegistrationRequest,
    now: DateTime<Utc>,
) -> Result<RegistrationReceipt, AppError> {
    let cpf = Cpf::parse(&request.cpf)?;
    let full_name = request.full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::Validation("full name is required".to_string()));
    }
    if request.event_ids.is_empty() {
        return Err(AppError::Validation("select at least one event".to_string()));
    }
    for &event_id in &request.event_ids {
        let event = find_event(snapshot, event_id)?;
        if !event.is_open {
            return Err(AppError::Validation(format!(
                "registrations for '{}' are closed",
                event.title
            )));
        }
    }

    let phone = format_phone(&request.phone);
    let existing_id = find_attendee_by_cpf(snapshot, cpf.digits()).map(|a| a.id);
    let (attendee_id, attendee_created) = match existing_id {
        Some(id) => {
            if let Some(existing) = snapshot.attendees.iter_mut().find(|a| a.id == id) {
                existing.phone = phone;
            }
            (id, false)
        }
        None => (push_attendee(snapshot, full_name, &cpf, phone, now), true),
    };

    let mut registered_event_ids = Vec::new();
    let mut skipped_event_ids = Vec::new();
    for &event_id in &request.event_ids {
        let already = snapshot
            .registrations
            .iter()
            .any(|r| r.attendee_id == attendee_id && r.event_id == event_id);
        if already || registered_event_ids.contains(&event_id) {
            skipped_event_ids.push(event_id);
            continue;
        }
        snapshot
            .registrations
            .push(Registration::new(attendee_id, event_id, now));
        registered_event_ids.push(event_id);
    }

    info!(
        attendee_id = %attendee_id,
        attendee_created,
        registered = registered_event_ids.len(),
        skipped = skipped_event_ids.len(),
        "Registration processed"
    );

    Ok(RegistrationReceipt {
        attendee_id,
        attendee_created,
        registered_event_ids,
        skipped_event_ids,
    })
}

/// Kiosk walk-in: creates the attendee and a registration that is already
/// checked in.
pub fn kiosk_register(
    snapshot: &mut BackendSnapshot,
    event_id: Uuid,
    full_name: &str,
    cpf: &str,
    phone: &str,
    now: DateTime<Utc>,
) -> Result<Registration, AppError> {
    let cpf = Cpf::parse(cpf)?;
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::Validation("full name is required".to_string()));
    }
    find_event(snapshot, event_id)?;
    if find_attendee_by_cpf(snapshot, cpf.digits()).is_some() {
        return Err(AppError::Validation(format!(
            "CPF {cpf} is already registered"
        )));
    }

    let attendee_id = push_attendee(snapshot, full_name, &cpf, format_phone(phone), now);
    let mut registration = Registration::new(attendee_id, event_id, now);
    registration.check_in(now);
    snapshot.registrations.push(registration.clone());

    info!(event_id = %event_id, attendee_id = %attendee_id, "Kiosk registration");
    Ok(registration)
}

fn push_attendee(
    snapshot: &mut BackendSnapshot,
    full_name: &str,
    cpf: &Cpf,
    phone: String,
    now: DateTime<Utc>,
) -> Uuid {
    let attendee = Attendee {
        id: Uuid::new_v4(),
        created_at: now,
        full_name: full_name.to_string(),
        cpf: cpf.digits().to_string(),
        phone,
    };
    let id = attendee.id;
    snapshot.attendees.push(attendee);
    id
}
