//! Event administration: create, edit, delete and the two status switches.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{BackendSnapshot, Event};

/// Editable fields of an event, as filled in on the admin form.
#[derive(Debug, Clone, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub location: Option<String>,
    #[serde(default)]
    pub workload: u32,
    #[serde(default)]
    pub certificate_template_url: Option<String>,
}

impl EventDraft {
    fn validated_title(&self) -> Result<String, AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("event title is required".to_string()));
        }
        Ok(title.to_string())
    }
}

/// Creates an event. New events accept registrations and have certificates locked.
pub fn create_event(
    snapshot: &mut BackendSnapshot,
    draft: &EventDraft,
    now: DateTime<Utc>,
) -> Result<Uuid, AppError> {
    let event = Event {
        id: Uuid::new_v4(),
        created_at: now,
        title: draft.validated_title()?,
        description: non_blank(&draft.description),
        date: draft.date,
        location: non_blank(&draft.location),
        is_open: true,
        workload: draft.workload,
        certificates_released: false,
        certificate_template_url: non_blank(&draft.certificate_template_url),
    };
    let id = event.id;
    info!(event_id = %id, title = %event.title, "Event created");
    snapshot.events.push(event);
    Ok(id)
}

/// Replaces the editable fields. Status flags are left as they are.
pub fn update_event(
    snapshot: &mut BackendSnapshot,
    event_id: Uuid,
    draft: &EventDraft,
) -> Result<(), AppError> {
    let title = draft.validated_title()?;
    let event = find_event_mut(snapshot, event_id)?;
    event.title = title;
    event.description = non_blank(&draft.description);
    event.date = draft.date;
    event.location = non_blank(&draft.location);
    event.workload = draft.workload;
    event.certificate_template_url = non_blank(&draft.certificate_template_url);
    info!(event_id = %event_id, "Event updated");
    Ok(())
}

/// Deletes an event and every registration for it. Returns how many
/// registrations went with it.
pub fn delete_event(snapshot: &mut BackendSnapshot, event_id: Uuid) -> Result<usize, AppError> {
    let before = snapshot.events.len();
    snapshot.events.retain(|e| e.id != event_id);
    if snapshot.events.len() == before {
        return Err(AppError::NotFound(format!("event {event_id}")));
    }

    let registrations_before = snapshot.registrations.len();
    snapshot.registrations.retain(|r| r.event_id != event_id);
    let removed = registrations_before - snapshot.registrations.len();
    info!(event_id = %event_id, removed_registrations = removed, "Event deleted");
    Ok(removed)
}

/// Opens or closes registrations. Returns the new `is_open`.
pub fn toggle_event_open(snapshot: &mut BackendSnapshot, event_id: Uuid) -> Result<bool, AppError> {
    let event = find_event_mut(snapshot, event_id)?;
    event.is_open = !event.is_open;
    info!(event_id = %event_id, is_open = event.is_open, "Registrations toggled");
    Ok(event.is_open)
}

/// Releases or locks participant certificates. Returns the new flag.
pub fn toggle_certificates_released(
    snapshot: &mut BackendSnapshot,
    event_id: Uuid,
) -> Result<bool, AppError> {
    let event = find_event_mut(snapshot, event_id)?;
    event.certificates_released = !event.certificates_released;
    info!(
        event_id = %event_id,
        certificates_released = event.certificates_released,
        "Certificate release toggled"
    );
    Ok(event.certificates_released)
}

fn find_event_mut(snapshot: &mut BackendSnapshot, event_id: Uuid) -> Result<&mut Event, AppError> {
    snapshot
        .events
        .iter_mut()
        .find(|e| e.id == event_id)
        .ok_or_else(|| AppError::NotFound(format!("event {event_id}")))
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
