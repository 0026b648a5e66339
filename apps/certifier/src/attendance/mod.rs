// Event attendance: event administration, registration, participant self-service,
// check-in at the door or kiosk, roster views and public certificate verification.
// Every operation works on a BackendSnapshot.

pub mod checkin;
pub mod events;
pub mod participant;
pub mod registration;
pub mod roster;

pub use checkin::{kiosk_check_in, scan_check_in, toggle_check_in, KioskOutcome, ScanOutcome};
pub use events::{
    create_event, delete_event, toggle_certificates_released, toggle_event_open, update_event,
    EventDraft,
};
pub use participant::{
    available_events, participant_login, participant_registrations, subscribe, unsubscribe,
    update_profile, ParticipantRegistration,
};
pub use registration::{kiosk_register, open_events, register, RegistrationReceipt, RegistrationRequest};
pub use roster::{
    attendance_stats, filter_roster, verify_certificate, AttendanceFilter, AttendanceStats,
    CertificateVerification, RosterEntry,
};

use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::clean_cpf;
use crate::models::{Attendee, BackendSnapshot, Event};

fn find_event(snapshot: &BackendSnapshot, event_id: Uuid) -> Result<&Event, AppError> {
    snapshot
        .events
        .iter()
        .find(|e| e.id == event_id)
        .ok_or_else(|| AppError::NotFound(format!("event {event_id}")))
}

/// Attendee whose stored CPF has the same digits as `digits`.
fn find_attendee_by_cpf<'a>(snapshot: &'a BackendSnapshot, digits: &str) -> Option<&'a Attendee> {
    snapshot
        .attendees
        .iter()
        .find(|a| clean_cpf(&a.cpf) == digits)
}
