//! Application error taxonomy and HTTP mapping.
//!
//! Every failure of the shortening core is one of the [`AppError`] kinds.
//! Only the kind and a fixed message reach HTTP clients; backend detail
//! carried by [`AppError::Sequence`] and [`AppError::System`] is logged.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::infrastructure::cache::CacheError;
use crate::utils::url_normalizer::UrlNormalizationError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Client-visible error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input URL or a target on an internal network.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// Request body failed field validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Code or alias already taken at insert time.
    #[error("short code already exists")]
    Conflict,

    #[error("link expired")]
    Expired,

    /// Unknown or disabled code.
    #[error("link not found")]
    NotFound,

    #[error("sequence allocation failed: {0}")]
    Sequence(String),

    /// Cache or store fault that is not a miss.
    #[error("backend failure: {0}")]
    System(String),
}

impl AppError {
    pub fn system(reason: impl Into<String>) -> Self {
        Self::System(reason.into())
    }

    /// Stable machine-readable identifier of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidUrl(_) => "invalid_url",
            AppError::UnsupportedScheme(_) => "unsupported_scheme",
            AppError::Validation(_) => "validation_error",
            AppError::Conflict => "conflict",
            AppError::Expired => "expired",
            AppError::NotFound => "not_found",
            AppError::Sequence(_) => "sequence_error",
            AppError::System(_) => "system_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_) | AppError::UnsupportedScheme(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Expired | AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Sequence(_) | AppError::System(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts to the payload sent to clients.
    ///
    /// Input errors echo their reason; backend errors never do. An expired
    /// link is indistinguishable from a missing one.
    pub fn to_error_info(&self) -> ErrorInfo {
        let message = match self {
            AppError::InvalidUrl(_) | AppError::UnsupportedScheme(_) | AppError::Validation(_) => {
                self.to_string()
            }
            AppError::Conflict => "Short code already exists".to_string(),
            AppError::Expired | AppError::NotFound => "Short link not found".to_string(),
            AppError::Sequence(_) | AppError::System(_) => "Internal server error".to_string(),
        };

        let code = match self {
            AppError::Expired => AppError::NotFound.kind(),
            other => other.kind(),
        };

        ErrorInfo { code, message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            tracing::debug!(constraint = ?db.constraint(), "Unique constraint violation");
            return AppError::Conflict;
        }

        AppError::System(format!("database error: {}", e))
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::System(e.to_string())
    }
}

impl From<UrlNormalizationError> for AppError {
    fn from(e: UrlNormalizationError) -> Self {
        match e {
            UrlNormalizationError::UnsupportedScheme(scheme) => {
                AppError::UnsupportedScheme(scheme)
            }
            other => AppError::InvalidUrl(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}
