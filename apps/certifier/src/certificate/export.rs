//! Certificate export: batch rendering for an event and single participant issue.
//!
//! # spawn_blocking pattern
//! Page rendering is CPU-bound (measurement and layout for every attendee).
//! `export_event_certificates` resolves attendees and codes on the async side,
//! then moves owned page jobs into `tokio::task::spawn_blocking` so the
//! scheduler stays free while a large batch renders.
//!
//! Codes assigned here are NOT persisted: they come back as `CodeAssignment`s
//! and the caller writes them to the backend with `apply_code_assignments`.

use std::collections::HashSet;

use anyhow::anyhow;
use chrono::Datelike;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::certificate::code::assign_unique_code;
use crate::certificate::page::render_certificate_page;
use crate::errors::AppError;
use crate::layout::{CanvasError, CertificateGeometry, RenderedPage};
use crate::models::{Attendee, BackendSnapshot, Event};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// A certificate code generated during export that the backend must store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAssignment {
    pub registration_id: Uuid,
    pub code: String,
}

/// All certificate pages of one event, in registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateExport {
    pub event_id: Uuid,
    pub file_stem: String,
    pub pages: Vec<RenderedPage>,
    pub assigned_codes: Vec<CodeAssignment>,
}

/// A participant's own certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedCertificate {
    pub registration_id: Uuid,
    pub code: String,
    pub file_stem: String,
    pub page: RenderedPage,
    /// Set when the registration had no code before this call.
    pub assigned_code: Option<CodeAssignment>,
}

struct PageJob {
    attendee: Attendee,
    code: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Batch export
// ────────────────────────────────────────────────────────────────────────────

/// Renders one certificate page per checked-in registration of `event_id`.
///
/// Registrations whose attendee is missing from the snapshot are skipped with a
/// warning. Registrations without a code get a fresh one, unique across the
/// whole snapshot.
pub async fn export_event_certificates<R: Rng>(
    snapshot: &BackendSnapshot,
    event_id: Uuid,
    geometry: &CertificateGeometry,
    base_url: &str,
    rng: &mut R,
) -> Result<CertificateExport, AppError> {
    let event = find_event(snapshot, event_id)?.clone();
    let mut taken = taken_codes(snapshot);
    let mut jobs = Vec::new();
    let mut assigned_codes = Vec::new();

    for registration in snapshot
        .registrations
        .iter()
        .filter(|r| r.event_id == event_id && r.checked_in)
    {
        let Some(attendee) = find_attendee(snapshot, registration.attendee_id) else {
            warn!(
                registration_id = %registration.id,
                attendee_id = %registration.attendee_id,
                "Skipping certificate: attendee not found"
            );
            continue;
        };

        let code = match &registration.certificate_code {
            Some(code) => code.clone(),
            None => {
                let code = assign_unique_code(event.date.year(), &taken, rng)?;
                taken.insert(code.clone());
                assigned_codes.push(CodeAssignment {
                    registration_id: registration.id,
                    code: code.clone(),
                });
                code
            }
        };

        jobs.push(PageJob {
            attendee: attendee.clone(),
            code,
        });
    }

    info!(
        event_id = %event_id,
        pages = jobs.len(),
        new_codes = assigned_codes.len(),
        "Rendering event certificates"
    );

    // CPU-bound pass, off the async executor.
    let cfg = geometry.clone();
    let base = base_url.to_string();
    let event_for_render = event.clone();
    let pages =
        tokio::task::spawn_blocking(move || render_pages(&event_for_render, &jobs, &cfg, &base))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow!("spawn_blocking failed in certificate export: {e}"))
            })??;

    Ok(CertificateExport {
        event_id,
        file_stem: document_file_stem(&event.title),
        pages,
        assigned_codes,
    })
}

fn render_pages(
    event: &Event,
    jobs: &[PageJob],
    geometry: &CertificateGeometry,
    base_url: &str,
) -> Result<Vec<RenderedPage>, CanvasError> {
    jobs.iter()
        .map(|job| {
            debug!(attendee_id = %job.attendee.id, code = %job.code, "Rendering certificate page");
            render_certificate_page(&job.attendee, event, &job.code, geometry, base_url)
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Participant issue
// ────────────────────────────────────────────────────────────────────────────

/// Issues the certificate of a single registration.
///
/// The attendee must have been checked in and the event must have released
/// its certificates.
pub fn issue_participant_certificate<R: Rng>(
    snapshot: &BackendSnapshot,
    registration_id: Uuid,
    geometry: &CertificateGeometry,
    base_url: &str,
    rng: &mut R,
) -> Result<IssuedCertificate, AppError> {
    let registration = snapshot
        .registrations
        .iter()
        .find(|r| r.id == registration_id)
        .ok_or_else(|| AppError::NotFound(format!("registration {registration_id}")))?;
    let event = find_event(snapshot, registration.event_id)?;
    let attendee = find_attendee(snapshot, registration.attendee_id)
        .ok_or_else(|| AppError::NotFound(format!("attendee {}", registration.attendee_id)))?;

    if !registration.checked_in {
        return Err(AppError::Validation(
            "certificate requires a confirmed check-in".to_string(),
        ));
    }
    if !event.certificates_released {
        return Err(AppError::Validation(format!(
            "certificates for '{}' have not been released",
            event.title
        )));
    }

    let (code, assigned_code) = match &registration.certificate_code {
        Some(code) => (code.clone(), None),
        None => {
            let code = assign_unique_code(event.date.year(), &taken_codes(snapshot), rng)?;
            let assignment = CodeAssignment {
                registration_id,
                code: code.clone(),
            };
            (code, Some(assignment))
        }
    };

    let page = render_certificate_page(attendee, event, &code, geometry, base_url)?;
    info!(registration_id = %registration_id, code = %code, "Issued participant certificate");

    Ok(IssuedCertificate {
        registration_id,
        code,
        file_stem: participant_file_stem(&event.title),
        page,
        assigned_code,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Stores generated codes on their registrations. Returns how many were applied.
pub fn apply_code_assignments(
    snapshot: &mut BackendSnapshot,
    assignments: &[CodeAssignment],
) -> usize {
    let mut applied = 0;
    for assignment in assignments {
        if let Some(registration) = snapshot
            .registrations
            .iter_mut()
            .find(|r| r.id == assignment.registration_id)
        {
            registration.certificate_code = Some(assignment.code.clone());
            applied += 1;
        }
    }
    applied
}

/// `"Semana  de Educação"` → `certificados_semana_de_educação`.
pub fn document_file_stem(title: &str) -> String {
    format!("certificados_{}", title_slug(title))
}

pub fn participant_file_stem(title: &str) -> String {
    format!("certificado_{}", title_slug(title))
}

fn title_slug(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

fn taken_codes(snapshot: &BackendSnapshot) -> HashSet<String> {
    snapshot
        .registrations
        .iter()
        .filter_map(|r| r.certificate_code.clone())
        .collect()
}

fn find_event(snapshot: &BackendSnapshot, event_id: Uuid) -> Result<&Event, AppError> {
    snapshot
        .events
        .iter()
        .find(|e| e.id == event_id)
        .ok_or_else(|| AppError::NotFound(format!("event {event_id}")))
}

fn find_attendee(snapshot: &BackendSnapshot, attendee_id: Uuid) -> Option<&Attendee> {
    snapshot.attendees.iter().find(|a| a.id == attendee_id)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{default_certificate_geometry, DrawCommand};
    use crate::models::Registration;
    use chrono::{NaiveDate, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BASE_URL: &str = "https://eventos.example.org";

    fn make_event(released: bool) -> Event {
        Event {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: "Semana  de Educação".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            location: None,
            is_open: true,
            workload: 8,
            certificates_released: released,
            certificate_template_url: None,
        }
    }

    fn make_attendee(name: &str, cpf: &str) -> Attendee {
        Attendee {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            full_name: name.to_string(),
            cpf: cpf.to_string(),
            phone: String::new(),
        }
    }

    /// Event with three registrations: Ana (present, coded), Bruno (present,
    /// no code), Carla (absent).
    fn make_snapshot(released: bool) -> BackendSnapshot {
        let event = make_event(released);
        let ana = make_attendee("Ana Souza", "52998224725");
        let bruno = make_attendee("Bruno Lima", "11144477735");
        let carla = make_attendee("Carla Dias", "12345678909");
        let now = Utc::now();

        let mut r_ana = Registration::new(ana.id, event.id, now);
        r_ana.check_in(now);
        r_ana.certificate_code = Some("111111/2026".to_string());
        let mut r_bruno = Registration::new(bruno.id, event.id, now);
        r_bruno.check_in(now);
        let r_carla = Registration::new(carla.id, event.id, now);

        BackendSnapshot {
            events: vec![event],
            attendees: vec![ana, bruno, carla],
            registrations: vec![r_ana, r_bruno, r_carla],
        }
    }

    fn first_word(page: &RenderedPage, needle: &str) -> bool {
        page.commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == needle))
    }

    // ── export_event_certificates ───────────────────────────────────────────

    #[tokio::test]
    async fn test_export_renders_only_checked_in() {
        let snapshot = make_snapshot(false);
        let event_id = snapshot.events[0].id;
        let mut rng = StdRng::seed_from_u64(3);

        let export = export_event_certificates(
            &snapshot,
            event_id,
            &default_certificate_geometry(),
            BASE_URL,
            &mut rng,
        )
        .await
        .unwrap();

        assert_eq!(export.pages.len(), 2, "absent attendee gets no certificate");
        assert!(first_word(&export.pages[0], "Ana"));
        assert!(first_word(&export.pages[1], "Bruno"));
        assert_eq!(export.file_stem, "certificados_semana_de_educação");
    }

    #[tokio::test]
    async fn test_export_assigns_codes_only_where_missing() {
        let snapshot = make_snapshot(false);
        let event_id = snapshot.events[0].id;
        let bruno_registration = snapshot.registrations[1].id;
        let mut rng = StdRng::seed_from_u64(3);

        let export = export_event_certificates(
            &snapshot,
            event_id,
            &default_certificate_geometry(),
            BASE_URL,
            &mut rng,
        )
        .await
        .unwrap();

        assert_eq!(export.assigned_codes.len(), 1);
        assert_eq!(export.assigned_codes[0].registration_id, bruno_registration);
        assert!(export.assigned_codes[0].code.ends_with("/2026"));
        assert!(first_word(&export.pages[0], "Cód: 111111/2026"));
        let bruno_caption = format!("Cód: {}", export.assigned_codes[0].code);
        assert!(first_word(&export.pages[1], &bruno_caption));
    }

    #[tokio::test]
    async fn test_export_skips_missing_attendee() {
        let mut snapshot = make_snapshot(false);
        snapshot.attendees.remove(0);
        let event_id = snapshot.events[0].id;

        let export = export_event_certificates(
            &snapshot,
            event_id,
            &default_certificate_geometry(),
            BASE_URL,
            &mut StdRng::seed_from_u64(1),
        )
        .await
        .unwrap();
        assert_eq!(export.pages.len(), 1);
    }

    #[tokio::test]
    async fn test_export_unknown_event_is_not_found() {
        let snapshot = make_snapshot(false);
        let err = export_event_certificates(
            &snapshot,
            Uuid::new_v4(),
            &default_certificate_geometry(),
            BASE_URL,
            &mut StdRng::seed_from_u64(1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    // ── issue_participant_certificate ───────────────────────────────────────

    #[test]
    fn test_issue_requires_release() {
        let snapshot = make_snapshot(false);
        let err = issue_participant_certificate(
            &snapshot,
            snapshot.registrations[0].id,
            &default_certificate_geometry(),
            BASE_URL,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_issue_requires_check_in() {
        let snapshot = make_snapshot(true);
        let err = issue_participant_certificate(
            &snapshot,
            snapshot.registrations[2].id,
            &default_certificate_geometry(),
            BASE_URL,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_issue_reuses_existing_code() {
        let snapshot = make_snapshot(true);
        let issued = issue_participant_certificate(
            &snapshot,
            snapshot.registrations[0].id,
            &default_certificate_geometry(),
            BASE_URL,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(issued.code, "111111/2026");
        assert!(issued.assigned_code.is_none());
        assert_eq!(issued.file_stem, "certificado_semana_de_educação");
    }

    #[test]
    fn test_issue_assigns_and_applies_new_code() {
        let mut snapshot = make_snapshot(true);
        let registration_id = snapshot.registrations[1].id;
        let issued = issue_participant_certificate(
            &snapshot,
            registration_id,
            &default_certificate_geometry(),
            BASE_URL,
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();
        let assignment = issued.assigned_code.clone().unwrap();
        assert_eq!(assignment.code, issued.code);

        let applied = apply_code_assignments(&mut snapshot, &[assignment]);
        assert_eq!(applied, 1);
        assert_eq!(
            snapshot.registrations[1].certificate_code.as_deref(),
            Some(issued.code.as_str())
        );
    }

    #[test]
    fn test_file_stems_collapse_whitespace() {
        assert_eq!(document_file_stem("Feira  de Ciências"), "certificados_feira_de_ciências");
        assert_eq!(participant_file_stem("Oficina"), "certificado_oficina");
    }
}
