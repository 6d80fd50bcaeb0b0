//! Patient database operations.

use rusqlite::{params, ErrorCode, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::Patient;
use crate::store::{PatientStore, StoreResult};

const PATIENT_COLUMNS: &str = "id, name, email, address, date_of_birth, registered_date";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        address: row.get(3)?,
        date_of_birth: row.get(4)?,
        registered_date: row.get(5)?,
    })
}

/// Translate constraint failures on write into store-level errors.
fn write_error(err: rusqlite::Error, email: &str) -> DbError {
    if let rusqlite::Error::SqliteFailure(e, msg) = &err {
        if e.code == ErrorCode::ConstraintViolation {
            return if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
                DbError::DuplicateEmail(email.to_string())
            } else {
                DbError::Constraint(msg.clone().unwrap_or_else(|| e.to_string()))
            };
        }
    }
    err.into()
}

impl Database {
    /// Insert a new patient. The patient must already carry an id.
    fn insert_patient(&self, patient: &Patient, id: &str) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO patients (
                    id, name, email, address, date_of_birth, registered_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    id,
                    patient.name,
                    patient.email,
                    patient.address,
                    patient.date_of_birth,
                    patient.registered_date,
                ],
            )
            .map_err(|e| write_error(e, &patient.email))?;
        Ok(())
    }

    /// Overwrite an existing patient, inserting it if the id is unknown.
    fn upsert_patient(&self, patient: &Patient, id: &str) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO patients (
                    id, name, email, address, date_of_birth, registered_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    email = excluded.email,
                    address = excluded.address,
                    date_of_birth = excluded.date_of_birth,
                    registered_date = excluded.registered_date,
                    updated_at = datetime('now')
                "#,
                params![
                    id,
                    patient.name,
                    patient.email,
                    patient.address,
                    patient.date_of_birth,
                    patient.registered_date,
                ],
            )
            .map_err(|e| write_error(e, &patient.email))?;
        Ok(())
    }

    /// Count stored patients.
    pub fn count_patients(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// List all patients in insertion order.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY rowid"
        ))?;

        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Check whether an email is already registered.
    pub fn email_exists(&self, email: &str) -> DbResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE email = ?)",
            [email],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Insert or overwrite a patient, assigning a UUID when it has none.
    pub fn save_patient(&self, mut patient: Patient) -> DbResult<Patient> {
        match patient.id.clone() {
            Some(id) => self.upsert_patient(&patient, &id)?,
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                self.insert_patient(&patient, &id)?;
                patient.id = Some(id);
            }
        }
        Ok(patient)
    }

    /// Delete a patient.
    pub fn delete_patient(&self, patient: &Patient) -> DbResult<()> {
        let id = patient
            .id
            .as_deref()
            .ok_or_else(|| DbError::NotFound("patient has no id".into()))?;

        let rows_affected = self.conn.execute("DELETE FROM patients WHERE id = ?", [id])?;
        if rows_affected == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl PatientStore for Database {
    fn find_all(&self) -> StoreResult<Vec<Patient>> {
        Ok(self.list_patients()?)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Patient>> {
        Ok(self.get_patient(id)?)
    }

    fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        Ok(self.email_exists(email)?)
    }

    fn save(&self, patient: Patient) -> StoreResult<Patient> {
        Ok(self.save_patient(patient)?)
    }

    fn delete(&self, patient: &Patient) -> StoreResult<()> {
        Ok(self.delete_patient(patient)?)
    }
}
