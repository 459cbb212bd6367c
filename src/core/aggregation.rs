//! Latest-entry aggregation
//!
//! Joins the most recent heart-attack test with its medical record and that
//! record's patient. Broken links are tolerated and come back as `None`.

use crate::adapters::store::RecordStore;
use crate::domain::{HeartwatchError, LatestEntry, Result};

/// Message returned when there is nothing to aggregate
pub const NO_TESTS_MESSAGE: &str = "No heart attack tests found";

/// Builds the latest entry from the store
///
/// # Errors
///
/// Returns `HeartwatchError::NotFound` when the store holds no tests, and
/// propagates store failures unchanged.
pub async fn latest_entry(store: &dyn RecordStore) -> Result<LatestEntry> {
    let test = store
        .latest_test()
        .await?
        .ok_or_else(|| HeartwatchError::NotFound(NO_TESTS_MESSAGE.to_string()))?;

    let medical_record = store.get_record(&test.record_id).await?;
    if medical_record.is_none() {
        tracing::warn!(
            test_id = %test.test_id,
            record_id = %test.record_id,
            "Latest test references a missing medical record"
        );
    }

    let patient = match &medical_record {
        Some(record) => {
            let patient = store.get_patient(&record.patient_id).await?;
            if patient.is_none() {
                tracing::warn!(
                    record_id = %record.record_id,
                    patient_id = %record.patient_id,
                    "Medical record references a missing patient"
                );
            }
            patient
        }
        None => None,
    };

    Ok(LatestEntry {
        patient,
        medical_record,
        heart_attack_test: test,
    })
}
