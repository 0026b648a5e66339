// Certificate issuance: sentence wording, public codes, page drawing, batch export.

pub mod code;
pub mod export;
pub mod page;
pub mod wording;

pub use code::{assign_unique_code, generate_certificate_code, validation_url};
pub use export::{
    apply_code_assignments, export_event_certificates, issue_participant_certificate,
    CertificateExport, CodeAssignment, IssuedCertificate,
};
pub use page::render_certificate_page;
