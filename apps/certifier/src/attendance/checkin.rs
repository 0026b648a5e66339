//! Check-in flows.
//!
//! - `toggle_check_in`: organiser flips presence from the roster.
//! - `scan_check_in`: QR/barcode reader at the door, matched on CPF digits.
//! - `kiosk_check_in`: self-service kiosk where attendees type their CPF.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::{find_attendee_by_cpf, find_event};
use crate::errors::AppError;
use crate::identity::{clean_cpf, Cpf};
use crate::models::{BackendSnapshot, Registration};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    CheckedIn { name: String },
    AlreadyCheckedIn { name: String },
    NotRegistered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KioskOutcome {
    /// No attendee with this CPF; the kiosk should offer registration.
    UnknownAttendee,
    /// Known attendee without a registration for the event, now registered present.
    RegisteredAndCheckedIn { name: String },
    AlreadyCheckedIn { name: String },
    Welcome { name: String },
}

/// Flips presence of one registration. Returns the new `checked_in` value.
pub fn toggle_check_in(
    snapshot: &mut BackendSnapshot,
    registration_id: Uuid,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    let registration = snapshot
        .registrations
        .iter_mut()
        .find(|r| r.id == registration_id)
        .ok_or_else(|| AppError::NotFound(format!("registration {registration_id}")))?;

    if registration.checked_in {
        registration.undo_check_in();
    } else {
        registration.check_in(now);
    }
    debug!(registration_id = %registration_id, checked_in = registration.checked_in, "Toggled check-in");
    Ok(registration.checked_in)
}

/// Checks in the registrant whose CPF digits match the scanned text.
pub fn scan_check_in(
    snapshot: &mut BackendSnapshot,
    event_id: Uuid,
    scanned: &str,
    now: DateTime<Utc>,
) -> Result<ScanOutcome, AppError> {
    find_event(snapshot, event_id)?;
    let digits = clean_cpf(scanned);
    if digits.is_empty() {
        return Ok(ScanOutcome::NotRegistered);
    }

    let matched = snapshot
        .registrations
        .iter()
        .filter(|r| r.event_id == event_id)
        .find_map(|r| {
            snapshot
                .attendees
                .iter()
                .find(|a| a.id == r.attendee_id && clean_cpf(&a.cpf) == digits)
                .map(|a| (r.id, a.full_name.clone()))
        });

    let Some((registration_id, name)) = matched else {
        debug!(event_id = %event_id, "Scanned CPF has no registration");
        return Ok(ScanOutcome::NotRegistered);
    };

    let Some(registration) = snapshot
        .registrations
        .iter_mut()
        .find(|r| r.id == registration_id)
    else {
        return Ok(ScanOutcome::NotRegistered);
    };
    if registration.checked_in {
        return Ok(ScanOutcome::AlreadyCheckedIn { name });
    }
    registration.check_in(now);
    info!(event_id = %event_id, registration_id = %registration_id, "Scan check-in");
    Ok(ScanOutcome::CheckedIn { name })
}

/// Self-service check-in by CPF.
pub fn kiosk_check_in(
    snapshot: &mut BackendSnapshot,
    event_id: Uuid,
    cpf: &str,
    now: DateTime<Utc>,
) -> Result<KioskOutcome, AppError> {
    let cpf = Cpf::parse(cpf)?;
    find_event(snapshot, event_id)?;

    let Some(attendee) = find_attendee_by_cpf(snapshot, cpf.digits()) else {
        return Ok(KioskOutcome::UnknownAttendee);
    };
    let (attendee_id, name) = (attendee.id, attendee.full_name.clone());

    match snapshot
        .registrations
        .iter_mut()
        .find(|r| r.event_id == event_id && r.attendee_id == attendee_id)
    {
        None => {
            let mut registration = Registration::new(attendee_id, event_id, now);
            registration.check_in(now);
            snapshot.registrations.push(registration);
            info!(event_id = %event_id, attendee_id = %attendee_id, "Kiosk registered walk-in attendee");
            Ok(KioskOutcome::RegisteredAndCheckedIn { name })
        }
        Some(registration) if registration.checked_in => Ok(KioskOutcome::AlreadyCheckedIn { name }),
        Some(registration) => {
            registration.check_in(now);
            info!(event_id = %event_id, attendee_id = %attendee_id, "Kiosk check-in");
            Ok(KioskOutcome::Welcome { name })
        }
    }
}
