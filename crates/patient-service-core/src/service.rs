//! Patient service: validation, uniqueness and existence checks around the store.
//!
//! Every precondition runs before the store is written to, so a rejected
//! create or update leaves no partial record behind.

use crate::error::{ServiceError, ServiceResult};
use crate::mapper;
use crate::models::{Patient, PatientCreateRequest, PatientUpdateRequest, PatientView};
use crate::store::{PatientStore, StoreError};
use crate::validation::validate_request;

/// Patient CRUD over a [`PatientStore`].
pub struct PatientService<S> {
    store: S,
}

impl<S: PatientStore> PatientService<S> {
    /// Create a service that owns `store` for its lifetime.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// List every patient in store order.
    pub fn list(&self) -> ServiceResult<Vec<PatientView>> {
        let patients = self.store.find_all().map_err(store_fault)?;
        Ok(patients.iter().map(mapper::to_view).collect())
    }

    /// Fetch a single patient.
    pub fn get(&self, id: &str) -> ServiceResult<PatientView> {
        let patient = self.find_existing(id)?;
        Ok(mapper::to_view(&patient))
    }

    /// Register a new patient.
    pub fn create(&self, req: &PatientCreateRequest) -> ServiceResult<PatientView> {
        validate(req)?;

        if self.store.exists_by_email(&req.email).map_err(store_fault)? {
            tracing::warn!("rejected create: email already registered");
            return Err(ServiceError::EmailAlreadyExists {
                email: req.email.clone(),
            });
        }

        let record = mapper::to_record(req)?;
        let saved = self.store.save(record).map_err(store_fault)?;

        tracing::info!(patient_id = saved.id.as_deref().unwrap_or_default(), "created patient");
        Ok(mapper::to_view(&saved))
    }

    /// Replace every mutable field of an existing patient.
    ///
    /// An unknown id is reported before the request body is looked at.
    /// Keeping the patient's current email is not a conflict; moving to an
    /// email held by another patient is.
    pub fn update(&self, id: &str, req: &PatientUpdateRequest) -> ServiceResult<PatientView> {
        let mut patient = self.find_existing(id)?;
        validate(req)?;

        if patient.email != req.email
            && self.store.exists_by_email(&req.email).map_err(store_fault)?
        {
            tracing::warn!(patient_id = id, "rejected update: email already registered");
            return Err(ServiceError::EmailAlreadyExists {
                email: req.email.clone(),
            });
        }

        mapper::apply_update(&mut patient, req)?;
        let saved = self.store.save(patient).map_err(store_fault)?;

        tracing::info!(patient_id = id, "updated patient");
        Ok(mapper::to_view(&saved))
    }

    /// Remove an existing patient.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let patient = self.find_existing(id)?;
        self.store.delete(&patient).map_err(store_fault)?;

        tracing::info!(patient_id = id, "deleted patient");
        Ok(())
    }

    fn find_existing(&self, id: &str) -> ServiceResult<Patient> {
        self.store
            .find_by_id(id)
            .map_err(store_fault)?
            .ok_or_else(|| {
                tracing::warn!(patient_id = id, "patient not found");
                ServiceError::PatientNotFound { id: id.to_string() }
            })
    }
}

fn validate(req: &PatientCreateRequest) -> ServiceResult<()> {
    let errors = validate_request(req);
    if errors.is_empty() {
        return Ok(());
    }

    let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
    tracing::debug!(?fields, "request failed validation");
    Err(ServiceError::ValidationFailed(errors))
}

/// Convert a store error, logging infrastructure faults.
fn store_fault(e: StoreError) -> ServiceError {
    let err = ServiceError::from(e);
    if let ServiceError::StoreUnavailable(cause) = &err {
        tracing::error!(%cause, "patient store failure");
    }
    err
}
