pub mod attendee;
pub mod event;
pub mod registration;

use serde::{Deserialize, Serialize};

pub use attendee::Attendee;
pub use event::Event;
pub use registration::Registration;

/// In-memory copy of the three backend tables.
///
/// The hosted backend owns the data; the application works on a snapshot and
/// writes changes back through `store`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendSnapshot {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub registrations: Vec<Registration>,
}
