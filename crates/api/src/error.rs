use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carlog_core::error::CoreError;
use carlog_core::vin::VinError;
use serde_json::json;
use sqlx::error::ErrorKind;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{"error": "<Code>", "message": "<text>"}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `carlog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<VinError> for AppError {
    fn from(err: VinError) -> Self {
        AppError::Core(CoreError::InvalidVin(err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        AppError::Core(CoreError::NotFound {
            entity,
            key: key.into(),
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::InvalidVin(err) => {
                    (StatusCode::BAD_REQUEST, err.code(), err.to_string())
                }
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NotFoundError",
                    format!("{entity} {key} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "ValidationError", msg.clone())
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BadRequest", msg.clone()),
        };

        let body = json!({
            "error": code,
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "InternalError",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// Repositories return `Option` for missing rows, so absence never arrives
/// here as an error.
///
/// - Unique violations map to 409, CHECK violations to 400.
/// - A closed or exhausted pool maps to 503.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            tracing::warn!(error = %err, "Vehicle store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "StoreUnavailable",
                "The vehicle store is unavailable".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => match db_err.kind() {
            ErrorKind::UniqueViolation => (
                StatusCode::CONFLICT,
                "ConflictError",
                "Duplicate value violates a unique constraint".to_string(),
            ),
            ErrorKind::CheckViolation => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                "Value violates a store constraint".to_string(),
            ),
            _ => {
                tracing::error!(error = %db_err, "Database error");
                internal()
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
