//! Typed errors and HTTP mapping.

use crate::config::ErrorDetail;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Message returned for every rejected write when detail is `generic`.
pub const GENERIC_WRITE_ERROR: &str = "validation errors";
pub const NOT_FOUND_MESSAGE: &str = "Plant not found";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("cannot locate executable directory: {0}")]
    ExeDir(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Plant not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("{field} must be {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// Classify a failure raised while writing. Reads keep the plain `Db` mapping.
    pub fn from_write(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => match db.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => AppError::Constraint(db.message().to_string()),
                _ if is_sqlite_constraint(db.code().as_deref()) => AppError::Constraint(db.message().to_string()),
                _ => AppError::StorageUnavailable(db.message().to_string()),
            },
            sqlx::Error::ColumnDecode { index, source } => {
                AppError::Validation(format!("column {} could not be decoded: {}", index, source))
            }
            other => AppError::StorageUnavailable(other.to_string()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::Validation(_) => "validation",
            AppError::TypeMismatch { .. } => "type_mismatch",
            AppError::Constraint(_) => "constraint",
            AppError::StorageUnavailable(_) => "storage_unavailable",
            AppError::Db(_) => "database",
        }
    }

    /// Pair the error with the configured level of detail.
    pub fn with_detail(self, detail: ErrorDetail) -> ErrorResponse {
        ErrorResponse { error: self, detail }
    }
}

/// SQLITE_CONSTRAINT (19) in the low byte covers every extended constraint code, trigger aborts included.
fn is_sqlite_constraint(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .map(|c| c & 0xff == 19)
        .unwrap_or(false)
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize)]
pub struct ErrorsBody {
    pub errors: Vec<String>,
}

/// An [`AppError`] ready to be rendered at a given level of detail.
#[derive(Debug)]
pub struct ErrorResponse {
    pub error: AppError,
    pub detail: ErrorDetail,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let ErrorResponse { error, detail } = self;
        match &error {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: NOT_FOUND_MESSAGE.to_string(),
                }),
            )
                .into_response(),
            AppError::Db(e) => {
                tracing::error!(error = %e, "unhandled database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
            _ => {
                tracing::warn!(kind = error.kind(), error = %error, "write rejected");
                let (status, message) = match detail {
                    ErrorDetail::Generic => (StatusCode::BAD_REQUEST, GENERIC_WRITE_ERROR.to_string()),
                    ErrorDetail::Detailed => {
                        let status = if let AppError::StorageUnavailable(_) = error {
                            StatusCode::SERVICE_UNAVAILABLE
                        } else {
                            StatusCode::BAD_REQUEST
                        };
                        (status, error.to_string())
                    }
                };
                (status, Json(ErrorsBody { errors: vec![message] })).into_response()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.with_detail(ErrorDetail::Generic).into_response()
    }
}
