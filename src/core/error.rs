//! Typed error handling for invoice verification
//!
//! Every failure a guard or a store can produce is a [`VerifyError`]. The
//! route layer never builds status codes by hand: it returns the error and
//! the [`IntoResponse`] impl maps it to a JSON body.
//!
//! # Error Categories
//!
//! - Request guard: [`VerifyError::MissingParameter`], [`VerifyError::InvalidFormat`],
//!   [`VerifyError::Validation`], [`VerifyError::InvalidBody`], [`VerifyError::AccessDenied`]
//! - Record store: [`VerifyError::ConstraintViolation`], [`VerifyError::NotFound`],
//!   [`VerifyError::StorageUnavailable`]
//! - Startup: [`VerifyError::Config`]

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

use crate::config::ConfigError;

/// Message sent to clients for storage failures. The real cause is logged.
const STORAGE_UNAVAILABLE_MESSAGE: &str = "The service is temporarily unavailable";

/// The main error type of the crate
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// A required request parameter was not supplied
    #[error("Missing required parameter: {parameter}")]
    MissingParameter { parameter: String },

    /// A value does not have the expected shape
    #[error("Invalid format for '{field}'")]
    InvalidFormat { field: String },

    /// One or more body fields failed validation
    #[error("{}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// The request body could not be decoded
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Admin key absent or wrong
    #[error("Access denied")]
    AccessDenied,

    /// Uniqueness violated at the storage layer
    #[error("Invoice number '{invoice_number}' already exists")]
    ConstraintViolation { invoice_number: String },

    /// A referenced record does not exist
    #[error("{resource} '{identifier}' not found")]
    NotFound { resource: String, identifier: String },

    /// Connection, pool or query failure in the backing store
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// Invalid or missing configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error code attached to a single field failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    /// Field absent, not a string, or blank after trimming
    Required,
    /// Field present but outside the allowed character set or length
    InvalidFormat,
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub code: FieldErrorCode,
}

impl FieldError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            code: FieldErrorCode::Required,
        }
    }

    pub fn invalid_format(field: &'static str) -> Self {
        Self {
            field,
            code: FieldErrorCode::InvalidFormat,
        }
    }

    /// Human-readable message for display
    pub fn message(&self) -> String {
        let label = field_label(self.field);
        match self.code {
            FieldErrorCode::Required => format!("{} is required", label),
            FieldErrorCode::InvalidFormat => format!("{} has an invalid format", label),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

fn field_label(field: &str) -> &str {
    match field {
        "invoice_number" => "Invoice number",
        "bank_name" => "Bank name",
        "bank_account_number" => "Bank account number",
        "beneficiary_name" => "Beneficiary name",
        other => other,
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::message)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl VerifyError {
    /// Shorthand for an invoice looked up by number or id
    pub fn invoice_not_found(identifier: impl ToString) -> Self {
        VerifyError::NotFound {
            resource: "Invoice".to_string(),
            identifier: identifier.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            VerifyError::MissingParameter { .. } => StatusCode::BAD_REQUEST,
            VerifyError::InvalidFormat { .. } => StatusCode::BAD_REQUEST,
            VerifyError::Validation(_) => StatusCode::BAD_REQUEST,
            VerifyError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            VerifyError::AccessDenied => StatusCode::FORBIDDEN,
            VerifyError::NotFound { .. } => StatusCode::NOT_FOUND,
            VerifyError::ConstraintViolation { .. } => StatusCode::CONFLICT,
            VerifyError::StorageUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            VerifyError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VerifyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            VerifyError::MissingParameter { .. } => "MISSING_PARAMETER",
            VerifyError::InvalidFormat { .. } => "INVALID_FORMAT",
            VerifyError::Validation(_) => "VALIDATION_ERROR",
            VerifyError::InvalidBody { .. } => "INVALID_BODY",
            VerifyError::AccessDenied => "ACCESS_DENIED",
            VerifyError::NotFound { .. } => "NOT_FOUND",
            VerifyError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            VerifyError::StorageUnavailable { .. } => "STORAGE_UNAVAILABLE",
            VerifyError::Config(_) => "CONFIG_ERROR",
            VerifyError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Server-side failures get a generic message so that connection strings
    /// and query text never reach the caller.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            VerifyError::StorageUnavailable { .. } => STORAGE_UNAVAILABLE_MESSAGE.to_string(),
            VerifyError::Config(_) | VerifyError::Internal(_) => {
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            VerifyError::Validation(errors) => Some(serde_json::json!({ "fields": errors })),
            VerifyError::MissingParameter { parameter } => {
                Some(serde_json::json!({ "parameter": parameter }))
            }
            VerifyError::ConstraintViolation { invoice_number } => {
                Some(serde_json::json!({ "invoice_number": invoice_number }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

/// A specialized Result type for verification operations
pub type VerifyResult<T> = Result<T, VerifyError>;
