//! Error handling for the Vertical Farm Platform
//!
//! Every failure surfaces to the caller as a distinct, recoverable condition
//! rendered as a JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::DomainError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Farm errors
    #[error("Unsupported crop type: {0}")]
    UnsupportedCrop(String),

    #[error("Crop specification not found: {0}")]
    CropSpecNotFound(String),

    #[error("Ownership share exceeds 100%: requested {requested}, available {available}")]
    ShareExceeded {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Persistence errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } | AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UnsupportedCrop(_) => "UNSUPPORTED_CROP",
            AppError::CropSpecNotFound(_) => "CROP_SPEC_NOT_FOUND",
            AppError::ShareExceeded { .. } => "SHARE_EXCEEDED",
            AppError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Persistence(_) => "PERSISTENCE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::CropSpecNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnsupportedCrop(_)
            | AppError::ShareExceeded { .. }
            | AppError::InvalidStateTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Configuration(_)
            | AppError::DatabaseError(_)
            | AppError::Persistence(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> ErrorDetail {
        let (message, field) = match self {
            AppError::Validation { field, message } => (message.clone(), Some(field.clone())),
            AppError::Conflict { resource, message } => (message.clone(), Some(resource.clone())),
            AppError::NotFound(resource) => (format!("{} not found", resource), None),
            // Storage details stay in the logs
            AppError::DatabaseError(_) | AppError::Persistence(_) => {
                ("A storage error occurred".to_string(), None)
            }
            AppError::Internal(_) => ("An internal server error occurred".to_string(), None),
            other => (other.to_string(), None),
        };
        ErrorDetail {
            code: self.code().to_string(),
            message,
            field,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let field = match &err {
            DomainError::InvalidDimensions { .. } => "dimensions",
            DomainError::InvalidShareSize { .. } => "share_size",
            DomainError::InvalidOwnerAddress(_) => "address",
            DomainError::InvalidReading(_) => "reading",
            DomainError::ShareExceeded {
                requested,
                available,
            } => {
                return AppError::ShareExceeded {
                    requested: *requested,
                    available: *available,
                }
            }
            DomainError::InvalidCropSpecification { .. } => {
                return AppError::Configuration(err.to_string())
            }
            DomainError::InvalidStateTransition { .. } | DomainError::FarmNotActive(_) => {
                return AppError::InvalidStateTransition(err.to_string())
            }
        };
        AppError::Validation {
            field: field.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_detail = self.detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::FarmStatus;

    #[test]
    fn test_domain_errors_map_to_taxonomy() {
        let err: AppError = DomainError::InvalidDimensions {
            width: 0.0,
            height: 1.0,
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "dimensions"));

        let err: AppError = DomainError::ShareExceeded {
            requested: Decimal::from(40),
            available: Decimal::from(30),
        }
        .into();
        assert_eq!(err.code(), "SHARE_EXCEEDED");

        let err: AppError = DomainError::FarmNotActive(FarmStatus::Harvested).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_storage_details_are_not_leaked() {
        let detail = AppError::Persistence("connection reset by 10.0.0.4".to_string()).detail();
        assert_eq!(detail.code, "PERSISTENCE_ERROR");
        assert!(!detail.message.contains("10.0.0.4"));
    }

    #[test]
    fn test_not_found_message() {
        let detail = AppError::NotFound("Farm".to_string()).detail();
        assert_eq!(detail.message, "Farm not found");
        assert_eq!(detail.field, None);
    }
}
