//! Translation between request/view shapes and patient records.
//!
//! Pure functions only: no store access and no business-rule checks.

use chrono::NaiveDate;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Patient, PatientRequest, PatientView};
use crate::validation::{FIELD_DATE_OF_BIRTH, FIELD_REGISTERED_DATE};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Project a patient onto its public view.
///
/// An unsaved patient maps to an empty id.
pub fn to_view(patient: &Patient) -> PatientView {
    PatientView {
        id: patient.id.clone().unwrap_or_default(),
        name: patient.name.clone(),
        email: patient.email.clone(),
        date_of_birth: patient.date_of_birth,
    }
}

/// Build a new, unsaved patient from a request.
pub fn to_record(req: &PatientRequest) -> ServiceResult<Patient> {
    Ok(Patient {
        id: None,
        name: req.name.clone(),
        email: req.email.clone(),
        address: req.address.clone(),
        date_of_birth: parse_date(FIELD_DATE_OF_BIRTH, &req.date_of_birth)?,
        registered_date: parse_date(FIELD_REGISTERED_DATE, &req.registered_date)?,
    })
}

/// Replace every mutable field of `patient` with the request's values.
///
/// Both dates are parsed before anything is written, so on error the patient
/// is left as it was.
pub fn apply_update(patient: &mut Patient, req: &PatientRequest) -> ServiceResult<()> {
    let date_of_birth = parse_date(FIELD_DATE_OF_BIRTH, &req.date_of_birth)?;
    let registered_date = parse_date(FIELD_REGISTERED_DATE, &req.registered_date)?;

    patient.name = req.name.clone();
    patient.email = req.email.clone();
    patient.address = req.address.clone();
    patient.date_of_birth = date_of_birth;
    patient.registered_date = registered_date;
    Ok(())
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
///
/// chrono accepts unpadded fields, signs and short years under `%Y-%m-%d`,
/// so the parsed date must format back to exactly the input.
pub fn parse_date(field: &str, value: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
        .ok()
        .filter(|date| date.format(ISO_DATE_FORMAT).to_string() == value)
        .ok_or_else(|| ServiceError::InvalidDateFormat {
            field: field.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PatientRequest {
        PatientRequest {
            name: "Jane Doe".into(),
            email: "jane@x.com".into(),
            address: "1 Main St".into(),
            date_of_birth: "1990-01-01".into(),
            registered_date: "2024-01-01".into(),
        }
    }

    #[test]
    fn test_to_record() {
        let patient = to_record(&request()).unwrap();

        assert!(patient.id.is_none());
        assert_eq!(patient.name, "Jane Doe");
        assert_eq!(patient.address, "1 Main St");
        assert_eq!(patient.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        assert_eq!(patient.registered_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_to_record_bad_date_names_field() {
        let mut req = request();
        req.registered_date = "2024-02-30".into();

        match to_record(&req) {
            Err(ServiceError::InvalidDateFormat { field, value }) => {
                assert_eq!(field, "registeredDate");
                assert_eq!(value, "2024-02-30");
            }
            other => panic!("expected InvalidDateFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_date_rejects_non_iso() {
        assert!(parse_date("dateOfBirth", "01/01/1990").is_err());
        assert!(parse_date("dateOfBirth", "1990-13-01").is_err());
        assert!(parse_date("dateOfBirth", "yesterday").is_err());
        assert!(parse_date("dateOfBirth", "1990-01-01").is_ok());
    }

    #[test]
    fn test_parse_date_rejects_loose_forms() {
        for input in [
            "1990-1-1",
            "1990-01-1",
            "1990-1-01",
            "+1990-01-01",
            "90-01-01",
            " 1990-01-01",
            "1990-01-01 ",
            "1990-01-01T00:00:00",
        ] {
            assert!(
                matches!(parse_date("dateOfBirth", input), Err(ServiceError::InvalidDateFormat { .. })),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_date_accepts_padded_early_years() {
        assert_eq!(
            parse_date("dateOfBirth", "0090-01-01").unwrap(),
            NaiveDate::from_ymd_opt(90, 1, 1).unwrap()
        );
        assert_eq!(
            parse_date("registeredDate", "2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_to_view_drops_private_fields() {
        let mut patient = to_record(&request()).unwrap();
        patient.id = Some("abc".into());

        let view = to_view(&patient);
        assert_eq!(view.id, "abc");
        assert_eq!(view.name, "Jane Doe");
        assert_eq!(view.email, "jane@x.com");
        assert_eq!(view.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
    }

    #[test]
    fn test_apply_update_is_all_or_nothing() {
        let mut patient = to_record(&request()).unwrap();
        let before = patient.clone();

        let mut req = request();
        req.name = "Someone Else".into();
        req.date_of_birth = "not a date".into();

        assert!(apply_update(&mut patient, &req).is_err());
        assert_eq!(patient, before);
    }

    #[test]
    fn test_apply_update_replaces_all_fields() {
        let mut patient = to_record(&request()).unwrap();
        let req = PatientRequest {
            name: "Jane D.".into(),
            email: "jd@x.com".into(),
            address: "2 High St".into(),
            date_of_birth: "1991-05-06".into(),
            registered_date: "2025-03-04".into(),
        };

        apply_update(&mut patient, &req).unwrap();
        assert_eq!(patient.name, "Jane D.");
        assert_eq!(patient.email, "jd@x.com");
        assert_eq!(patient.address, "2 High St");
        assert_eq!(patient.date_of_birth, NaiveDate::from_ymd_opt(1991, 5, 6).unwrap());
        assert_eq!(patient.registered_date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
    }
}
