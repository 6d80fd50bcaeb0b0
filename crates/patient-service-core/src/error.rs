//! Service error taxonomy and its presentation as structured responses.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Field name → human-readable message.
pub type FieldErrors = BTreeMap<String, String>;

/// Status for every business-rule failure.
pub const STATUS_BAD_REQUEST: u16 = 400;
/// Status when the store cannot be reached.
pub const STATUS_SERVICE_UNAVAILABLE: u16 = 503;

/// Errors raised by the patient service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("validation failed: {}", format_field_errors(.0))]
    ValidationFailed(FieldErrors),

    #[error("Email already exists: {email}")]
    EmailAlreadyExists { email: String },

    #[error("Patient not found with id: {id}")]
    PatientNotFound { id: String },

    #[error("invalid date for {field}: {value:?}")]
    InvalidDateFormat { field: String, value: String },

    #[error("patient store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{}: {}", field, msg))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail(email) => ServiceError::EmailAlreadyExists { email },
            other => ServiceError::StoreUnavailable(other.to_string()),
        }
    }
}

impl ServiceError {
    /// Whether this is a business-rule failure rather than an infrastructure fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServiceError::StoreUnavailable(_))
    }
}

/// Structured error body handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: u16,
    #[serde(flatten)]
    pub body: BTreeMap<String, String>,
}

impl ErrorResponse {
    fn message(status: u16, message: impl Into<String>) -> Self {
        let mut body = BTreeMap::new();
        body.insert("message".to_string(), message.into());
        Self { status, body }
    }

    /// Render the body as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::ValidationFailed(fields) => Self {
                status: STATUS_BAD_REQUEST,
                body: fields.clone(),
            },
            ServiceError::EmailAlreadyExists { .. } | ServiceError::PatientNotFound { .. } => {
                Self::message(STATUS_BAD_REQUEST, err.to_string())
            }
            ServiceError::InvalidDateFormat { field, .. } => {
                let mut body = BTreeMap::new();
                body.insert(
                    field.clone(),
                    "must be a valid ISO date (YYYY-MM-DD)".to_string(),
                );
                Self {
                    status: STATUS_BAD_REQUEST,
                    body,
                }
            }
            // Store details stay in the logs
            ServiceError::StoreUnavailable(_) => {
                Self::message(STATUS_SERVICE_UNAVAILABLE, "patient store unavailable")
            }
        }
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        ErrorResponse::from(&err)
    }
}
