use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

pub const GENERIC_FAILURE_MESSAGE: &str =
    "Ocorreu um erro ao processar o diagnóstico. Por favor, tente novamente.";

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Missing or unreadable input; the user can correct and resubmit.
    Validation(String),
    /// Resource not found error.
    NotFound(String),
    /// Database read/write failure.
    Persistence {
        /// Message shown to the caller.
        context: String,
        /// The underlying database error, logged but never returned.
        source: sqlx::Error,
    },
    /// Anything else.
    Internal(String),
}

impl AppError {
    pub fn persistence(context: impl Into<String>, source: sqlx::Error) -> Self {
        AppError::Persistence {
            context: context.into(),
            source,
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Persistence { context, source } => {
                write!(f, "Persistence error: {}: {}", context, source)
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Persistence { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Every variant becomes a `{"error": "..."}` body. Server-side failures
    /// are logged here with their full cause.
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Persistence { context, source } => {
                tracing::error!("{} -> {:?}", context, source);
                (StatusCode::INTERNAL_SERVER_ERROR, context)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_FAILURE_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    /// A body that is not valid JSON for the endpoint is a validation failure.
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!(
            "Requisição inválida: {}",
            rejection.body_text()
        ))
    }
}

/// Extension trait attaching a caller-facing message to database errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Wrap a database error into [`AppError::Persistence`] with `context`.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::persistence(context, e))
    }
}
