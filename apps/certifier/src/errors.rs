use thiserror::Error;

use crate::layout::canvas::CanvasError;

/// Application-level error type.
/// Every fallible operation outside `main` returns `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid CPF: {0}")]
    InvalidCpf(String),

    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable code, used as a structured logging field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidCpf(_) => "INVALID_CPF",
            AppError::Canvas(_) => "CANVAS_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::NotFound("x".into()).code(), "NOT_FOUND");
        assert_eq!(AppError::Validation("x".into()).code(), "VALIDATION_ERROR");
        assert_eq!(AppError::InvalidCpf("x".into()).code(), "INVALID_CPF");
    }

    #[test]
    fn test_canvas_error_converts_via_from() {
        let err: AppError = CanvasError::NonFiniteCoordinate {
            x: f32::NAN,
            y: 0.0,
        }
        .into();
        assert_eq!(err.code(), "CANVAS_ERROR");
        assert!(err.to_string().starts_with("Canvas error:"));
    }
}
