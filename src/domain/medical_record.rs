//! Medical record domain model
//!
//! One set of vitals taken for a patient. `patient_id` is a plain reference:
//! the store does not enforce it.

use super::ids::{PatientId, RecordId};
use super::validation::check_non_negative;
use crate::domain::{HeartwatchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored medical record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub record_id: RecordId,
    pub patient_id: PatientId,
    pub heart_rate: i32,
    pub systolic_blood_pressure: i32,
    pub diastolic_blood_pressure: i32,
    pub blood_sugar: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Body of `POST /api/medical-records`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMedicalRecord {
    #[serde(default)]
    pub record_id: Option<RecordId>,
    pub patient_id: PatientId,
    pub heart_rate: i32,
    pub systolic_blood_pressure: i32,
    pub diastolic_blood_pressure: i32,
    pub blood_sugar: f64,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl NewMedicalRecord {
    /// Validates the request and builds the record to store
    pub fn into_record(self) -> Result<MedicalRecord> {
        let record = MedicalRecord {
            record_id: self.record_id.unwrap_or_else(RecordId::generate),
            patient_id: self.patient_id,
            heart_rate: self.heart_rate,
            systolic_blood_pressure: self.systolic_blood_pressure,
            diastolic_blood_pressure: self.diastolic_blood_pressure,
            blood_sugar: self.blood_sugar,
            recorded_at: self.recorded_at.unwrap_or_else(Utc::now),
        };
        record.validate()?;
        Ok(record)
    }
}

/// Body of `PUT /api/medical-records/{record_id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MedicalRecordUpdate {
    #[serde(default)]
    pub patient_id: Option<PatientId>,
    #[serde(default)]
    pub heart_rate: Option<i32>,
    #[serde(default)]
    pub systolic_blood_pressure: Option<i32>,
    #[serde(default)]
    pub diastolic_blood_pressure: Option<i32>,
    #[serde(default)]
    pub blood_sugar: Option<f64>,
}

impl MedicalRecordUpdate {
    /// Returns the record with this update applied
    pub fn apply(&self, record: &MedicalRecord) -> Result<MedicalRecord> {
        let mut updated = record.clone();
        if let Some(patient_id) = &self.patient_id {
            updated.patient_id = patient_id.clone();
        }
        if let Some(v) = self.heart_rate {
            updated.heart_rate = v;
        }
        if let Some(v) = self.systolic_blood_pressure {
            updated.systolic_blood_pressure = v;
        }
        if let Some(v) = self.diastolic_blood_pressure {
            updated.diastolic_blood_pressure = v;
        }
        if let Some(v) = self.blood_sugar {
            updated.blood_sugar = v;
        }
        updated.validate()?;
        Ok(updated)
    }
}

impl MedicalRecord {
    fn validate(&self) -> Result<()> {
        check_non_negative("heart_rate", f64::from(self.heart_rate))
            .and_then(|_| {
                check_non_negative(
                    "systolic_blood_pressure",
                    f64::from(self.systolic_blood_pressure),
                )
            })
            .and_then(|_| {
                check_non_negative(
                    "diastolic_blood_pressure",
                    f64::from(self.diastolic_blood_pressure),
                )
            })
            .and_then(|_| check_non_negative("blood_sugar", self.blood_sugar))
            .map_err(HeartwatchError::Validation)
    }
}
