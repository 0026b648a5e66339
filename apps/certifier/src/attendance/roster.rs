//! Organiser roster views and public certificate lookup.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::{clean_cpf, format_cpf};
use crate::models::{Attendee, BackendSnapshot, Registration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceFilter {
    #[default]
    All,
    Present,
    Absent,
}

impl AttendanceFilter {
    fn accepts(self, registration: &Registration) -> bool {
        match self {
            AttendanceFilter::All => true,
            AttendanceFilter::Present => registration.checked_in,
            AttendanceFilter::Absent => !registration.checked_in,
        }
    }
}

/// A registration joined with its attendee.
#[derive(Debug, Clone, Copy)]
pub struct RosterEntry<'a> {
    pub registration: &'a Registration,
    pub attendee: &'a Attendee,
}

/// What the public validation page shows for a certificate code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateVerification {
    pub code: String,
    pub full_name: String,
    /// Masked, `ddd.ddd.ddd-dd`.
    pub cpf: String,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub workload: u32,
    pub checkin_time: Option<DateTime<Utc>>,
}

pub fn attendance_stats(snapshot: &BackendSnapshot, event_id: Uuid) -> AttendanceStats {
    let (total, present) = snapshot
        .registrations
        .iter()
        .filter(|r| r.event_id == event_id)
        .fold((0, 0), |(total, present), r| {
            (total + 1, present + usize::from(r.checked_in))
        });
    AttendanceStats {
        total,
        present,
        absent: total - present,
    }
}

/// Registrations of `event_id` matching `search` and `filter`, in stored order.
///
/// `search` matches a case-insensitive name substring or a CPF substring. A
/// query made only of digits and CPF punctuation is also compared on digits,
/// so `529.982` finds `52998224725`. A blank search matches everyone.
pub fn filter_roster<'a>(
    snapshot: &'a BackendSnapshot,
    event_id: Uuid,
    search: &str,
    filter: AttendanceFilter,
) -> Vec<RosterEntry<'a>> {
    let needle = search.trim().to_lowercase();
    let needle_digits = if is_cpf_fragment(&needle) {
        clean_cpf(&needle)
    } else {
        String::new()
    };

    snapshot
        .registrations
        .iter()
        .filter(|r| r.event_id == event_id && filter.accepts(r))
        .filter_map(|registration| {
            let attendee = snapshot
                .attendees
                .iter()
                .find(|a| a.id == registration.attendee_id)?;
            Some(RosterEntry {
                registration,
                attendee,
            })
        })
        .filter(|entry| {
            needle.is_empty()
                || entry.attendee.full_name.to_lowercase().contains(&needle)
                || entry.attendee.cpf.contains(&needle)
                || (!needle_digits.is_empty()
                    && clean_cpf(&entry.attendee.cpf).contains(&needle_digits))
        })
        .collect()
}

fn is_cpf_fragment(query: &str) -> bool {
    query
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c.is_whitespace())
}

/// Looks up a certificate by its public code.
pub fn verify_certificate(snapshot: &BackendSnapshot, code: &str) -> Option<CertificateVerification> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    let registration = snapshot
        .registrations
        .iter()
        .find(|r| r.certificate_code.as_deref() == Some(code))?;
    let attendee = snapshot
        .attendees
        .iter()
        .find(|a| a.id == registration.attendee_id)?;
    let event = snapshot
        .events
        .iter()
        .find(|e| e.id == registration.event_id)?;

    Some(CertificateVerification {
        code: code.to_string(),
        full_name: attendee.full_name.clone(),
        cpf: format_cpf(&attendee.cpf),
        event_title: event.title.clone(),
        event_date: event.date,
        workload: event.workload,
        checkin_time: registration.checkin_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use chrono::Utc;

    fn make_snapshot() -> (BackendSnapshot, Uuid) {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            created_at: now,
            title: "Seminário de Matemática".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2026, 5, 12).unwrap(),
            location: None,
            is_open: true,
            workload: 6,
            certificates_released: true,
            certificate_template_url: None,
        };
        let people = [
            ("Ana Souza", "52998224725"),
            ("Bruno Lima", "11144477735"),
            ("Mariana Andrade", "12345678909"),
        ];
        let attendees: Vec<Attendee> = people
            .iter()
            .map(|(name, cpf)| Attendee {
                id: Uuid::new_v4(),
                created_at: now,
                full_name: name.to_string(),
                cpf: cpf.to_string(),
                phone: String::new(),
            })
            .collect();
        let mut registrations: Vec<Registration> = attendees
            .iter()
            .map(|a| Registration::new(a.id, event.id, now))
            .collect();
        registrations[0].check_in(now);
        registrations[0].certificate_code = Some("482913/2026".to_string());
        registrations[2].check_in(now);
        // Registration for another event must never show up.
        registrations.push(Registration::new(attendees[1].id, Uuid::new_v4(), now));

        let event_id = event.id;
        (
            BackendSnapshot {
                events: vec![event],
                attendees,
                registrations,
            },
            event_id,
        )
    }

    fn names(entries: &[RosterEntry<'_>]) -> Vec<String> {
        entries.iter().map(|e| e.attendee.full_name.clone()).collect()
    }

    #[test]
    fn test_attendance_stats() {
        let (snapshot, event_id) = make_snapshot();
        assert_eq!(
            attendance_stats(&snapshot, event_id),
            AttendanceStats {
                total: 3,
                present: 2,
                absent: 1
            }
        );
        assert_eq!(attendance_stats(&snapshot, Uuid::new_v4()).total, 0);
    }

    #[test]
    fn test_filter_by_presence() {
        let (snapshot, event_id) = make_snapshot();
        let present = filter_roster(&snapshot, event_id, "", AttendanceFilter::Present);
        assert_eq!(names(&present), vec!["Ana Souza", "Mariana Andrade"]);
        let absent = filter_roster(&snapshot, event_id, "", AttendanceFilter::Absent);
        assert_eq!(names(&absent), vec!["Bruno Lima"]);
        assert_eq!(filter_roster(&snapshot, event_id, "  ", AttendanceFilter::All).len(), 3);
    }

    #[test]
    fn test_filter_by_name_is_case_insensitive() {
        let (snapshot, event_id) = make_snapshot();
        let found = filter_roster(&snapshot, event_id, "ANA", AttendanceFilter::All);
        assert_eq!(names(&found), vec!["Ana Souza", "Mariana Andrade"]);
        let found = filter_roster(&snapshot, event_id, "ana", AttendanceFilter::Absent);
        assert!(found.is_empty());
    }

    #[test]
    fn test_filter_by_cpf_fragment() {
        let (snapshot, event_id) = make_snapshot();
        let found = filter_roster(&snapshot, event_id, "444.777", AttendanceFilter::All);
        assert_eq!(names(&found), vec!["Bruno Lima"]);
        let found = filter_roster(&snapshot, event_id, "5299", AttendanceFilter::All);
        assert_eq!(names(&found), vec!["Ana Souza"]);
    }

    #[test]
    fn test_name_query_with_digit_does_not_match_cpfs() {
        let (snapshot, event_id) = make_snapshot();
        // Every CPF in the roster contains a 4; only names are compared here.
        let found = filter_roster(&snapshot, event_id, "turma 4", AttendanceFilter::All);
        assert!(found.is_empty(), "got {:?}", names(&found));
        let found = filter_roster(&snapshot, event_id, "souza 4", AttendanceFilter::All);
        assert!(found.is_empty());
    }

    #[test]
    fn test_verify_certificate() {
        let (snapshot, _) = make_snapshot();
        let verification = verify_certificate(&snapshot, " 482913/2026 ").unwrap();
        assert_eq!(verification.full_name, "Ana Souza");
        assert_eq!(verification.cpf, "529.982.247-25");
        assert_eq!(verification.event_title, "Seminário de Matemática");
        assert_eq!(verification.workload, 6);
        assert_eq!(
            verification.checkin_time, snapshot.registrations[0].checkin_time,
            "check-in time shown on the validation page"
        );
        assert!(verification.checkin_time.is_some());

        assert!(verify_certificate(&snapshot, "000000/2026").is_none());
        assert!(verify_certificate(&snapshot, "").is_none());
    }
}
