use std::path::PathBuf;

use anyhow::{Context, Result};
use uuid::Uuid;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public origin used to build certificate validation links, e.g. `https://eventos.example.org`.
    pub validation_base_url: String,
    /// JSON snapshot of the backend tables (events, attendees, registrations).
    pub snapshot_path: PathBuf,
    /// Event whose certificates are exported.
    pub event_id: Uuid,
    pub output_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            validation_base_url: require_env("VALIDATION_BASE_URL")?,
            snapshot_path: PathBuf::from(require_env("SNAPSHOT_PATH")?),
            event_id: require_env("EVENT_ID")?
                .parse::<Uuid>()
                .context("EVENT_ID must be a valid UUID")?,
            output_dir: PathBuf::from(
                std::env::var("OUTPUT_DIR").unwrap_or_else(|_| ".".to_string()),
            ),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_env_reports_missing_key() {
        let err = require_env("CERTIFIER_TEST_SURELY_UNSET_VARIABLE").unwrap_err();
        assert!(
            err.to_string()
                .contains("CERTIFIER_TEST_SURELY_UNSET_VARIABLE"),
            "error should name the missing variable"
        );
    }
}
