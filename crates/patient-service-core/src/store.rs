//! Patient store contract.
//!
//! The service talks to persistence only through this trait. Implementations
//! own durability and identifier generation, and must enforce email
//! uniqueness themselves: the service-level `exists_by_email` check is not
//! atomic with `save`, so a concurrent writer can slip between the two. A
//! violation detected by the store must be reported as
//! [`StoreError::DuplicateEmail`].

use thiserror::Error;

use crate::models::Patient;

/// Errors a patient store may report.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-indexed persistence for patients.
pub trait PatientStore {
    /// All patients, in the store's natural order.
    fn find_all(&self) -> StoreResult<Vec<Patient>>;

    /// Look up a patient by id.
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Patient>>;

    /// Whether any patient currently holds this email.
    fn exists_by_email(&self, email: &str) -> StoreResult<bool>;

    /// Persist a patient.
    ///
    /// Assigns a fresh identifier when `patient.id` is `None`, otherwise
    /// overwrites the stored record with the same id.
    fn save(&self, patient: Patient) -> StoreResult<Patient>;

    /// Remove a patient.
    fn delete(&self, patient: &Patient) -> StoreResult<()>;
}
