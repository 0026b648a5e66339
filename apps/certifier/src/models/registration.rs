use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Links an attendee to an event and tracks presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub attendee_id: Uuid,
    pub event_id: Uuid,
    #[serde(default)]
    pub checked_in: bool,
    pub checkin_time: Option<DateTime<Utc>>,
    /// Public code printed on the certificate, assigned on first issue.
    #[serde(default)]
    pub certificate_code: Option<String>,
}

impl Registration {
    pub fn new(attendee_id: Uuid, event_id: Uuid, now: DateTime<Utc>) -> Self {
        Registration {
            id: Uuid::new_v4(),
            created_at: now,
            attendee_id,
            event_id,
            checked_in: false,
            checkin_time: None,
            certificate_code: None,
        }
    }

    /// Marks the attendee present at `now`.
    pub fn check_in(&mut self, now: DateTime<Utc>) {
        self.checked_in = true;
        self.checkin_time = Some(now);
    }

    pub fn undo_check_in(&mut self) {
        self.checked_in = false;
        self.checkin_time = None;
    }
}
