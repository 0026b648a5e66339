use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::certificate::CertificateExport;
use crate::errors::AppError;
use crate::models::BackendSnapshot;

/// Reads the backend snapshot JSON at `path`.
pub async fn load_snapshot(path: &Path) -> Result<BackendSnapshot, AppError> {
    let raw = tokio::fs::read(path).await?;
    let snapshot: BackendSnapshot = serde_json::from_slice(&raw)?;
    info!(
        path = %path.display(),
        events = snapshot.events.len(),
        attendees = snapshot.attendees.len(),
        registrations = snapshot.registrations.len(),
        "Snapshot loaded"
    );
    Ok(snapshot)
}

/// Writes the snapshot back, pretty-printed.
pub async fn save_snapshot(path: &Path, snapshot: &BackendSnapshot) -> Result<(), AppError> {
    let body = serde_json::to_vec_pretty(snapshot)?;
    tokio::fs::write(path, body).await?;
    debug!(path = %path.display(), "Snapshot saved");
    Ok(())
}

/// Writes `<dir>/<file_stem>.json` with every rendered page and returns its path.
pub async fn write_export(dir: &Path, export: &CertificateExport) -> Result<PathBuf, AppError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}.json", export.file_stem));
    let body = serde_json::to_vec_pretty(export)?;
    tokio::fs::write(&path, body).await?;
    info!(path = %path.display(), pages = export.pages.len(), "Certificate export written");
    Ok(path)
}
