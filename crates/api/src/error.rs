use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use stockroom_core::error::CoreError;
use stockroom_core::types::DbId;
use stockroom_core::validation::{ENTITY_GOODS, ENTITY_PROJECT};

/// Numeric code carried by every not-found body.
const NOT_FOUND_CODE: i64 = 3;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `stockroom_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::Core(CoreError::NotFound { entity, id })
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => not_found_body(entity, &core.to_string(), *id),
                CoreError::Validation(msg) => message(StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Conflict(msg) => message(StatusCode::CONFLICT, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    message(StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => message(StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                message(StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn message(status: StatusCode, message: String) -> (StatusCode, serde_json::Value) {
    (status, json!({ "message": message }))
}

fn not_found_body(entity: &str, detail: &str, id: DbId) -> (StatusCode, serde_json::Value) {
    let key = match entity {
        ENTITY_GOODS => "errors.good.NotFound".to_string(),
        ENTITY_PROJECT => "errors.project.NotFound".to_string(),
        other => format!("errors.{}.NotFound", other.to_ascii_lowercase()),
    };
    tracing::debug!(entity, id, "Resource not found");
    (
        StatusCode::NOT_FOUND,
        json!({
            "code": NOT_FOUND_CODE,
            "message": key,
            "status": StatusCode::NOT_FOUND.as_u16(),
            "detail": detail,
        }),
    )
}

/// Classify a sqlx error into an HTTP status and body.
///
/// - Unique (23505) and foreign-key (23503) violations map to 409.
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 carrying the error text.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, serde_json::Value) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            json!({
                "code": NOT_FOUND_CODE,
                "message": "errors.record.NotFound",
                "status": StatusCode::NOT_FOUND.as_u16(),
                "detail": "record not found",
            }),
        ),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") | Some("23503") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                tracing::warn!(error = %db_err, constraint, "Constraint violation");
                message(
                    StatusCode::CONFLICT,
                    format!("Constraint violation: {constraint}"),
                )
            }
            _ => {
                tracing::error!(error = %db_err, "Database error");
                message(StatusCode::INTERNAL_SERVER_ERROR, db_err.to_string())
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            message(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}
