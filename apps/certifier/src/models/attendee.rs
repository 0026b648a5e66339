use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub full_name: String,
    /// Digits only. Legacy rows may still carry a mask, so compare via `clean_cpf`.
    pub cpf: String,
    pub phone: String,
}
