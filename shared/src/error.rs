use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("authentication is required")]
    UnauthenticatedError,
    #[error("this operation requires the admin role")]
    ForbiddenOperation,
    #[error("{0}")]
    CapacityExceeded(String),
    #[error("{0}")]
    DuplicateRegistration(String),
    #[error("failed to start or commit a transaction")]
    TransactionError(#[source] sqlx::Error),
    #[error("failed to execute a database operation")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("{0}")]
    NoRowsAffectedError(String),
    #[error("failed to access the key-value store")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("failed to convert a stored record: {0}")]
    ConversionEntityError(String),
}

impl AppError {
    /// Machine-distinguishable kind carried in every error response body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "validation",
            Self::EntityNotFound(_) => "not_found",
            Self::UnauthenticatedError => "unauthorized",
            Self::ForbiddenOperation => "forbidden",
            Self::CapacityExceeded(_) => "capacity_exceeded",
            Self::DuplicateRegistration(_) => "duplicate_registration",
            Self::TransactionError(_)
            | Self::SpecificOperationError(_)
            | Self::NoRowsAffectedError(_)
            | Self::KeyValueStoreError(_)
            | Self::ConversionEntityError(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::EntityNotFound(_) => StatusCode::NOT_FOUND,
            Self::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            Self::ForbiddenOperation => StatusCode::FORBIDDEN,
            Self::CapacityExceeded(_) | Self::DuplicateRegistration(_) => StatusCode::CONFLICT,
            Self::TransactionError(_)
            | Self::SpecificOperationError(_)
            | Self::NoRowsAffectedError(_)
            | Self::KeyValueStoreError(_)
            | Self::ConversionEntityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            Self::ValidationError(report) => {
                report.iter().next().map(|(path, _)| path.to_string())
            }
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "unexpected error happened"
            );
        }
        let body = ErrorBody {
            code: self.kind(),
            message: self.to_string(),
            field: self.field(),
        };
        (status_code, Json(body)).into_response()
    }
}
