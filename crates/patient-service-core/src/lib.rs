//! Patient Service Core Library
//!
//! Patient record management with field validation and email uniqueness.
//!
//! # Architecture
//!
//! ```text
//! Transport (FFI / HTTP host)
//!          │  PatientRequest
//!          ▼
//!   ┌──────────────────┐     field → message
//!   │  PatientService  │──▶  validation ──────────▶ ValidationFailed
//!   └────────┬─────────┘
//!            │ exists_by_email / find_by_id
//!            ▼
//!   ┌──────────────────┐     unique index on email
//!   │   PatientStore   │◀──  (SQLite Database)
//!   └────────┬─────────┘
//!            │ Patient
//!            ▼
//!         mapper ──▶ PatientView        ServiceError ──▶ ErrorResponse
//! ```
//!
//! # Core Principle
//!
//! **Preconditions run before writes.** Validation, uniqueness and existence
//! checks all complete before the store is touched, and the store's unique
//! index backs the uniqueness check under concurrent writers.
//!
//! # Modules
//!
//! - [`db`]: SQLite implementation of the patient store
//! - [`store`]: Store contract used by the service
//! - [`models`]: Domain types (Patient, PatientRequest, PatientView)
//! - [`mapper`]: Request/record/view translation
//! - [`validation`]: Field validation
//! - [`service`]: Patient service
//! - [`error`]: Error taxonomy and response rendering
//! - [`config`]: Startup configuration
//! - [`telemetry`]: Tracing setup

pub mod config;
pub mod db;
pub mod error;
pub mod mapper;
pub mod models;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, DatabaseLocation, ServiceConfig};
pub use db::{Database, DbError};
pub use error::{ErrorResponse, FieldErrors, ServiceError, ServiceResult};
pub use models::{Patient, PatientCreateRequest, PatientRequest, PatientUpdateRequest, PatientView};
pub use service::PatientService;
pub use store::{PatientStore, StoreError, StoreResult};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::Mutex;

// =========================================================================
// FFI Error Type
// =========================================================================

/// FFI error. Each service failure carries the rendered [`ErrorResponse`]:
/// the transport status and the structured body.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PatientServiceError {
    #[error("validation failed (status {status})")]
    ValidationFailed {
        status: u16,
        body: HashMap<String, String>,
    },

    #[error("email already exists (status {status})")]
    EmailAlreadyExists {
        status: u16,
        body: HashMap<String, String>,
    },

    #[error("patient not found (status {status})")]
    PatientNotFound {
        status: u16,
        body: HashMap<String, String>,
    },

    #[error("invalid date format (status {status})")]
    InvalidDateFormat {
        status: u16,
        body: HashMap<String, String>,
    },

    #[error("store unavailable (status {status})")]
    StoreUnavailable {
        status: u16,
        body: HashMap<String, String>,
    },

    #[error("configuration error: {reason}")]
    Configuration { reason: String },
}

impl From<ServiceError> for PatientServiceError {
    fn from(e: ServiceError) -> Self {
        let ErrorResponse { status, body } = ErrorResponse::from(&e);
        let body: HashMap<String, String> = body.into_iter().collect();
        match e {
            ServiceError::ValidationFailed(_) => {
                PatientServiceError::ValidationFailed { status, body }
            }
            ServiceError::EmailAlreadyExists { .. } => {
                PatientServiceError::EmailAlreadyExists { status, body }
            }
            ServiceError::PatientNotFound { .. } => {
                PatientServiceError::PatientNotFound { status, body }
            }
            ServiceError::InvalidDateFormat { .. } => {
                PatientServiceError::InvalidDateFormat { status, body }
            }
            ServiceError::StoreUnavailable(_) => {
                PatientServiceError::StoreUnavailable { status, body }
            }
        }
    }
}

impl From<DbError> for PatientServiceError {
    fn from(e: DbError) -> Self {
        ServiceError::from(StoreError::from(e)).into()
    }
}

impl From<ConfigError> for PatientServiceError {
    fn from(e: ConfigError) -> Self {
        PatientServiceError::Configuration {
            reason: e.to_string(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for PatientServiceError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ServiceError::StoreUnavailable(format!("Lock poisoned: {}", e)).into()
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a patient database at the given path.
#[uniffi::export]
pub fn open_service(path: String) -> Result<std::sync::Arc<PatientServiceCore>, PatientServiceError> {
    let db = Database::open(&path)?;
    Ok(PatientServiceCore::wrap(db))
}

/// Create an in-memory patient database (for testing).
#[uniffi::export]
pub fn open_service_in_memory() -> Result<std::sync::Arc<PatientServiceCore>, PatientServiceError> {
    let db = Database::open_in_memory()?;
    Ok(PatientServiceCore::wrap(db))
}

/// Open the store described by explicit configuration values and install tracing.
///
/// A missing database path selects an in-memory store; a missing filter uses
/// the default.
#[uniffi::export]
pub fn open_service_from_config(
    db_path: Option<String>,
    log_filter: Option<String>,
) -> Result<std::sync::Arc<PatientServiceCore>, PatientServiceError> {
    let cfg = ServiceConfig::from_values(db_path, log_filter)?;
    PatientServiceCore::from_config(&cfg)
}

/// Resolve configuration from the environment, install tracing, and open the store.
#[uniffi::export]
pub fn open_service_from_env() -> Result<std::sync::Arc<PatientServiceCore>, PatientServiceError> {
    let cfg = ServiceConfig::from_env()?;
    PatientServiceCore::from_config(&cfg)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe service wrapper for FFI.
#[derive(uniffi::Object)]
pub struct PatientServiceCore {
    service: Mutex<PatientService<Database>>,
}

impl PatientServiceCore {
    fn from_config(cfg: &ServiceConfig) -> Result<std::sync::Arc<Self>, PatientServiceError> {
        telemetry::init_tracing(cfg.log_filter())?;

        let db = match cfg.database() {
            DatabaseLocation::File(path) => Database::open(path)?,
            DatabaseLocation::InMemory => Database::open_in_memory()?,
        };
        tracing::info!(database = ?cfg.database(), "patient service ready");
        Ok(Self::wrap(db))
    }

    fn wrap(db: Database) -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            service: Mutex::new(PatientService::new(db)),
        })
    }
}

#[uniffi::export]
impl PatientServiceCore {
    /// List all patients.
    pub fn list_patients(&self) -> Result<Vec<FfiPatientView>, PatientServiceError> {
        let service = self.service.lock()?;
        let views = service.list()?;
        Ok(views.into_iter().map(|v| v.into()).collect())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: String) -> Result<FfiPatientView, PatientServiceError> {
        let service = self.service.lock()?;
        Ok(service.get(&id)?.into())
    }

    /// Register a new patient.
    pub fn create_patient(
        &self,
        request: FfiPatientRequest,
    ) -> Result<FfiPatientView, PatientServiceError> {
        let service = self.service.lock()?;
        let view = service.create(&request.into())?;
        Ok(view.into())
    }

    /// Replace an existing patient's details.
    pub fn update_patient(
        &self,
        id: String,
        request: FfiPatientRequest,
    ) -> Result<FfiPatientView, PatientServiceError> {
        let service = self.service.lock()?;
        let view = service.update(&id, &request.into())?;
        Ok(view.into())
    }

    /// Delete a patient.
    pub fn delete_patient(&self, id: String) -> Result<(), PatientServiceError> {
        let service = self.service.lock()?;
        service.delete(&id)?;
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: String,
    pub registered_date: String,
}

impl From<FfiPatientRequest> for PatientRequest {
    fn from(req: FfiPatientRequest) -> Self {
        PatientRequest {
            name: req.name,
            email: req.email,
            address: req.address,
            date_of_birth: req.date_of_birth,
            registered_date: req.registered_date,
        }
    }
}

/// FFI-safe patient view. The date of birth is an ISO `YYYY-MM-DD` string.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: String,
}

impl From<PatientView> for FfiPatientView {
    fn from(view: PatientView) -> Self {
        Self {
            id: view.id,
            name: view.name,
            email: view.email,
            date_of_birth: view.date_of_birth.format("%Y-%m-%d").to_string(),
        }
    }
}
