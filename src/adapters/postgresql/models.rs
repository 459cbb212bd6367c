//! Row mapping for the PostgreSQL record store
//!
//! Surrogate `id` columns stay in the database; only the entity keys and
//! fields are mapped back into domain types.

use crate::domain::{
    Gender, HeartAttackTest, MedicalRecord, Patient, PatientId, RecordId, Result, StoreError,
    TestId, TestResult,
};
use tokio_postgres::Row;

pub const PATIENT_COLUMNS: &str = "patient_id, age, gender, created_at";

pub const RECORD_COLUMNS: &str = "record_id, patient_id, heart_rate, systolic_blood_pressure, \
     diastolic_blood_pressure, blood_sugar, recorded_at";

pub const TEST_COLUMNS: &str = "test_id, record_id, ck_mb, troponin, result, test_date";

fn column<'a, T: tokio_postgres::types::FromSql<'a>>(row: &'a Row, name: &str) -> Result<T> {
    row.try_get(name).map_err(|e| {
        StoreError::DeserializationFailed(format!("Failed to read column {name}: {e}")).into()
    })
}

fn invalid(message: String) -> crate::domain::HeartwatchError {
    StoreError::DeserializationFailed(message).into()
}

pub fn patient_from_row(row: &Row) -> Result<Patient> {
    let gender: i16 = column(row, "gender")?;
    Ok(Patient {
        patient_id: PatientId::new(column::<String>(row, "patient_id")?).map_err(invalid)?,
        age: column(row, "age")?,
        gender: Gender::from_code(i64::from(gender)).map_err(invalid)?,
        created_at: column(row, "created_at")?,
    })
}

pub fn record_from_row(row: &Row) -> Result<MedicalRecord> {
    Ok(MedicalRecord {
        record_id: RecordId::new(column::<String>(row, "record_id")?).map_err(invalid)?,
        patient_id: PatientId::new(column::<String>(row, "patient_id")?).map_err(invalid)?,
        heart_rate: column(row, "heart_rate")?,
        systolic_blood_pressure: column(row, "systolic_blood_pressure")?,
        diastolic_blood_pressure: column(row, "diastolic_blood_pressure")?,
        blood_sugar: column(row, "blood_sugar")?,
        recorded_at: column(row, "recorded_at")?,
    })
}

pub fn test_from_row(row: &Row) -> Result<HeartAttackTest> {
    let result: String = column(row, "result")?;
    Ok(HeartAttackTest {
        test_id: TestId::new(column::<String>(row, "test_id")?).map_err(invalid)?,
        record_id: RecordId::new(column::<String>(row, "record_id")?).map_err(invalid)?,
        ck_mb: column(row, "ck_mb")?,
        troponin: column(row, "troponin")?,
        result: result.parse::<TestResult>().map_err(invalid)?,
        test_date: column(row, "test_date")?,
    })
}

/// Maps every row, stopping at the first one that does not fit
pub fn map_rows<T>(rows: &[Row], f: fn(&Row) -> Result<T>) -> Result<Vec<T>> {
    rows.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_lists_do_not_expose_surrogate_ids() {
        for columns in [PATIENT_COLUMNS, RECORD_COLUMNS, TEST_COLUMNS] {
            assert!(!columns.split(", ").any(|c| c.trim() == "id"));
        }
    }

    #[test]
    fn test_column_lists_match_schema() {
        let schema = include_str!("../../../migrations/001_initial_schema.sql");
        for columns in [PATIENT_COLUMNS, RECORD_COLUMNS, TEST_COLUMNS] {
            for column in columns.split(',') {
                assert!(schema.contains(column.trim()), "missing column {column}");
            }
        }
    }
}
