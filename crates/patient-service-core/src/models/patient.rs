//! Patient models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A persisted patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    /// UUID assigned by the store on first save
    pub id: Option<String>,
    /// Full name (at most 100 characters)
    pub name: String,
    /// Email address, unique across all patients
    pub email: String,
    /// Postal address
    pub address: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Date the patient was registered with the practice
    pub registered_date: NaiveDate,
}

impl Patient {
    /// Check if this patient has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Incoming request to create or replace a patient.
///
/// Dates arrive as strings and are parsed by the mapper, so that a malformed
/// date is reported separately from a blank one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: String,
    pub registered_date: String,
}

/// Request body for creating a patient.
pub type PatientCreateRequest = PatientRequest;

/// Request body for updating a patient. Every field replaces the stored value.
pub type PatientUpdateRequest = PatientRequest;

/// Externally visible projection of a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatientView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}
