use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use certifier::certificate::{apply_code_assignments, export_event_certificates};
use certifier::config::Config;
use certifier::layout::default_certificate_geometry;
use certifier::store;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting certifier v{}", env!("CARGO_PKG_VERSION"));

    let mut snapshot = store::load_snapshot(&config.snapshot_path).await?;
    let geometry = default_certificate_geometry();

    let export = {
        let mut rng = rand::thread_rng();
        export_event_certificates(
            &snapshot,
            config.event_id,
            &geometry,
            &config.validation_base_url,
            &mut rng,
        )
        .await
    };
    let export = match export {
        Ok(export) => export,
        Err(e) => {
            error!(code = e.code(), error = %e, "Certificate export failed");
            return Err(e.into());
        }
    };

    // New codes must be stored before the pages carrying them are handed out.
    if !export.assigned_codes.is_empty() {
        let applied = apply_code_assignments(&mut snapshot, &export.assigned_codes);
        store::save_snapshot(&config.snapshot_path, &snapshot).await?;
        info!(applied, "Certificate codes saved");
    }

    let path = store::write_export(&config.output_dir, &export).await?;
    info!(
        event_id = %config.event_id,
        pages = export.pages.len(),
        path = %path.display(),
        "Done"
    );

    Ok(())
}
