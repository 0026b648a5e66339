use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    /// Calendar day the event takes place. Written back as `YYYY-MM-DD`.
    #[serde(deserialize_with = "deserialize_event_date")]
    pub date: NaiveDate,
    pub location: Option<String>,
    #[serde(default = "default_true")]
    pub is_open: bool,
    /// Workload in hours printed on the certificate.
    #[serde(default)]
    pub workload: u32,
    /// Participants may download their own certificates once set.
    #[serde(default)]
    pub certificates_released: bool,
    /// Background artwork for the certificate page.
    #[serde(default)]
    pub certificate_template_url: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Accepts `YYYY-MM-DD` or a full timestamp, as the backend stores the column.
///
/// For an RFC 3339 timestamp the calendar day is the one in the timestamp's
/// own offset (`2026-02-02T03:00:00.000Z` is 2 February). A timestamp without
/// offset keeps its written day.
fn deserialize_event_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid event date '{raw}'"))
    })
}

pub(crate) fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|stamp| stamp.date())
}
