//! Bulk loader for the heart-attack CSV dataset
//!
//! Each CSV row becomes one patient, one medical record and one heart-attack
//! test linked by sequential ids (`P0001`, `R0001`, `T0001`, ...).

use crate::adapters::store::{RecordStore, StoreCounts};
use crate::domain::{
    Gender, HeartwatchError, NewHeartAttackTest, NewMedicalRecord, NewPatient, PatientId,
    RecordId, Result, StoreError, TestId, TestResult,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::path::Path;

/// One row of the dataset, columns named as in the published CSV
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRow {
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Gender")]
    pub gender: f64,
    #[serde(rename = "Heart rate")]
    pub heart_rate: f64,
    #[serde(rename = "Systolic blood pressure")]
    pub systolic_blood_pressure: f64,
    #[serde(rename = "Diastolic blood pressure")]
    pub diastolic_blood_pressure: f64,
    #[serde(rename = "Blood sugar")]
    pub blood_sugar: f64,
    #[serde(rename = "CK-MB")]
    pub ck_mb: f64,
    #[serde(rename = "Troponin")]
    pub troponin: f64,
    #[serde(rename = "Result")]
    pub result: String,
}

/// A row that was not loaded
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line in the CSV file, header included
    pub line: u64,
    pub reason: String,
}

/// Outcome of a dataset load
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub loaded: usize,
    pub skipped: Vec<SkippedRow>,
    pub cleared: bool,
    /// Store contents after the load
    pub counts: StoreCounts,
}

fn whole(field: &str, value: f64) -> std::result::Result<i32, String> {
    if !value.is_finite() {
        return Err(format!("{field} is not a number"));
    }
    Ok(value.trunc() as i32)
}

/// Builds the three linked request types for row number `n`
fn entities(
    row: DatasetRow,
    n: usize,
) -> std::result::Result<(NewPatient, NewMedicalRecord, NewHeartAttackTest), String> {
    let gender = Gender::from_code(whole("Gender", row.gender)? as i64)?;
    let result: TestResult = row.result.parse()?;

    let patient_id = PatientId::sequence(n);
    let record_id = RecordId::sequence(n);
    // Rows loaded later count as more recent
    let timestamp = Utc::now() + Duration::milliseconds(n as i64);

    let patient = NewPatient {
        patient_id: Some(patient_id.clone()),
        age: whole("Age", row.age)?,
        gender,
        created_at: Some(timestamp),
    };
    let record = NewMedicalRecord {
        record_id: Some(record_id.clone()),
        patient_id,
        heart_rate: whole("Heart rate", row.heart_rate)?,
        systolic_blood_pressure: whole("Systolic blood pressure", row.systolic_blood_pressure)?,
        diastolic_blood_pressure: whole("Diastolic blood pressure", row.diastolic_blood_pressure)?,
        blood_sugar: row.blood_sugar,
        recorded_at: Some(timestamp),
    };
    let test = NewHeartAttackTest {
        test_id: Some(TestId::sequence(n)),
        record_id,
        ck_mb: row.ck_mb,
        troponin: row.troponin,
        result,
        test_date: Some(timestamp),
    };
    Ok((patient, record, test))
}

/// Whether an insert failure should skip the row rather than end the load
fn row_level(err: &HeartwatchError) -> bool {
    matches!(
        err,
        HeartwatchError::Validation(_) | HeartwatchError::Store(StoreError::Conflict(_))
    )
}

async fn insert_row(
    store: &dyn RecordStore,
    patient: NewPatient,
    record: NewMedicalRecord,
    test: NewHeartAttackTest,
) -> Result<()> {
    let patient = patient.into_patient()?;
    let record = record.into_record()?;
    let test = test.into_test()?;
    store.insert_patient(&patient).await?;
    store.insert_record(&record).await?;
    store.insert_test(&test).await?;
    Ok(())
}

/// Loads a CSV dataset into the store
///
/// Unless `keep_existing` is set, all three collections are cleared first.
/// When kept, numbering continues after the existing patient count.
///
/// # Errors
///
/// Returns an error if the file can't be opened or its header is unreadable,
/// or if the store fails for a reason other than a bad row.
pub async fn load_dataset(
    store: &dyn RecordStore,
    path: impl AsRef<Path>,
    keep_existing: bool,
) -> Result<LoadSummary> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| HeartwatchError::Io(format!("Failed to open {}: {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| HeartwatchError::Validation(format!("Unreadable CSV header: {e}")))?
        .clone();
    tracing::info!(path = %path.display(), columns = headers.len(), "Reading dataset");

    let mut summary = LoadSummary::default();

    let offset = if keep_existing {
        store.counts().await?.patients
    } else {
        store.clear_all().await?;
        summary.cleared = true;
        0
    };

    for record in reader.records() {
        summary.rows_read += 1;
        let n = offset + summary.rows_read;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                summary.skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let parsed = record
            .deserialize::<DatasetRow>(Some(&headers))
            .map_err(|e| e.to_string())
            .and_then(|row| entities(row, n));
        let (patient, medical_record, test) = match parsed {
            Ok(parts) => parts,
            Err(reason) => {
                tracing::warn!(line, %reason, "Skipping dataset row");
                summary.skipped.push(SkippedRow { line, reason });
                continue;
            }
        };

        match insert_row(store, patient, medical_record, test).await {
            Ok(()) => summary.loaded += 1,
            Err(e) if row_level(&e) => {
                tracing::warn!(line, error = %e, "Skipping dataset row");
                summary.skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    summary.counts = store.counts().await?;
    tracing::info!(
        loaded = summary.loaded,
        skipped = summary.skipped.len(),
        "Dataset load complete"
    );
    Ok(summary)
}
