//! Field validation for patient requests.
//!
//! Every failing field gets exactly one entry in the returned map, keyed by its
//! wire name. Checks never stop at the first failure.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FieldErrors;
use crate::models::PatientRequest;

/// Maximum length of a patient name, in characters.
pub const MAX_NAME_LEN: usize = 100;

pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_DATE_OF_BIRTH: &str = "dateOfBirth";
pub const FIELD_REGISTERED_DATE: &str = "registeredDate";

const MSG_BLANK: &str = "must not be blank";

/// Validate a create/update request.
///
/// Returns an empty map when the request is acceptable.
pub fn validate_request(req: &PatientRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if is_blank(&req.name) {
        errors.insert(FIELD_NAME.into(), MSG_BLANK.into());
    } else if req.name.chars().count() > MAX_NAME_LEN {
        errors.insert(
            FIELD_NAME.into(),
            format!("Name cannot exceed {} characters", MAX_NAME_LEN),
        );
    }

    if is_blank(&req.email) {
        errors.insert(FIELD_EMAIL.into(), MSG_BLANK.into());
    } else if !is_valid_email(&req.email) {
        errors.insert(FIELD_EMAIL.into(), "Email should be valid".into());
    }

    if is_blank(&req.address) {
        errors.insert(FIELD_ADDRESS.into(), "Address cannot be blank".into());
    }

    if is_blank(&req.date_of_birth) {
        errors.insert(
            FIELD_DATE_OF_BIRTH.into(),
            "Date of Birth cannot be blank".into(),
        );
    }

    if is_blank(&req.registered_date) {
        errors.insert(
            FIELD_REGISTERED_DATE.into(),
            "Registered Date cannot be blank".into(),
        );
    }

    errors
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Dot-atom local part, `@`, then dot-separated labels of letters, digits
/// and inner hyphens.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Syntactic email check.
pub fn is_valid_email(email: &str) -> bool {
    const MAX_LOCAL_LEN: usize = 64;
    const MAX_DOMAIN_LEN: usize = 255;

    if !EMAIL_RE.is_match(email) {
        return false;
    }

    match email.split_once('@') {
        Some((local, domain)) => local.len() <= MAX_LOCAL_LEN && domain.len() <= MAX_DOMAIN_LEN,
        None => false,
    }
}
