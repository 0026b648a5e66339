//! Event check-in and certificate issuance.
//!
//! - `identity`: CPF checksum validation and input masks.
//! - `layout`: font metrics, justified rich-text paragraphs, a recording page canvas.
//! - `certificate`: certificate wording, public codes, page drawing and export.
//! - `attendance`: event admin, registration, participant self-service, check-in,
//!   roster views, certificate lookup.
//! - `store`: JSON snapshot persistence of the backend tables.

pub mod attendance;
pub mod certificate;
pub mod config;
pub mod errors;
pub mod identity;
pub mod layout;
pub mod models;
pub mod store;
