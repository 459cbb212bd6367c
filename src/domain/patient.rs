//! Patient domain model and request types
//!
//! A patient carries the demographics the classifier needs (age and
//! gender). Medical records reference patients through `patient_id`.

use super::ids::PatientId;
use super::validation::check_range;
use crate::domain::{HeartwatchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Patient gender, stored and serialized as `0` (female) or `1` (male)
///
/// Input accepts the integer codes or the strings `m`/`male`/`1` and
/// `f`/`female`/`0` in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Numeric code used by storage and by the classifier
    pub fn code(self) -> i16 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }

    /// Builds a gender from its numeric code
    pub fn from_code(code: i64) -> std::result::Result<Self, String> {
        match code {
            0 => Ok(Gender::Female),
            1 => Ok(Gender::Male),
            other => Err(format!("Invalid gender code {other}, expected 0 or 1")),
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "1" => Ok(Gender::Male),
            "f" | "female" | "0" => Ok(Gender::Female),
            other => Err(format!(
                "Invalid gender '{other}', expected male/female or 1/0"
            )),
        }
    }
}

impl Serialize for Gender {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i16(self.code())
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(i64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Gender::from_code(code).map_err(serde::de::Error::custom),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Stored patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: PatientId,
    pub age: i32,
    pub gender: Gender,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/patients`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPatient {
    /// Generated when absent
    #[serde(default)]
    pub patient_id: Option<PatientId>,
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewPatient {
    /// Validates the request and builds the patient to store
    pub fn into_patient(self) -> Result<Patient> {
        validate_age(self.age)?;
        Ok(Patient {
            patient_id: self.patient_id.unwrap_or_else(PatientId::generate),
            age: self.age,
            gender: self.gender,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Body of `PUT /api/patients/{patient_id}`; absent fields are left as-is
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientUpdate {
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl PatientUpdate {
    /// Returns the patient with this update applied
    pub fn apply(&self, patient: &Patient) -> Result<Patient> {
        let mut updated = patient.clone();
        if let Some(age) = self.age {
            validate_age(age)?;
            updated.age = age;
        }
        if let Some(gender) = self.gender {
            updated.gender = gender;
        }
        Ok(updated)
    }
}

fn validate_age(age: i32) -> Result<()> {
    check_range("age", f64::from(age), 0.0, Some(130.0))
        .map_err(HeartwatchError::Validation)
}
