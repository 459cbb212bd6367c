//! Feature extraction from the latest-entry payload
//!
//! Turns the aggregated JSON into the eight named inputs of the heart-attack
//! classifier. The payload is read as raw JSON so that missing or mistyped
//! fields are reported by path instead of as a generic decode failure.

use crate::domain::{HeartwatchError, PredictionError, Result, TestResult};
use serde_json::Value;
use std::collections::BTreeMap;

pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const HEART_RATE: &str = "Heart rate";
pub const SYSTOLIC_BLOOD_PRESSURE: &str = "Systolic blood pressure";
pub const DIASTOLIC_BLOOD_PRESSURE: &str = "Diastolic blood pressure";
pub const BLOOD_SUGAR: &str = "Blood sugar";
pub const CK_MB: &str = "CK-MB";
pub const TROPONIN: &str = "Troponin";

/// Feature names paired with the payload path they are read from
pub const FEATURE_SOURCES: [(&str, &str, &str); 8] = [
    (AGE, "patient", "age"),
    (GENDER, "patient", "gender"),
    (HEART_RATE, "medical_record", "heart_rate"),
    (SYSTOLIC_BLOOD_PRESSURE, "medical_record", "systolic_blood_pressure"),
    (DIASTOLIC_BLOOD_PRESSURE, "medical_record", "diastolic_blood_pressure"),
    (BLOOD_SUGAR, "medical_record", "blood_sugar"),
    (CK_MB, "heart_attack_test", "ck_mb"),
    (TROPONIN, "heart_attack_test", "troponin"),
];

/// Heart rates above this are treated as sensor errors
pub const MAX_PLAUSIBLE_HEART_RATE: f64 = 200.0;

/// Replacement value for implausible heart rates
pub const DEFAULT_HEART_RATE: f64 = 80.0;

/// Named feature values, looked up by name
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    values: BTreeMap<String, f64>,
}

impl FeatureSet {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Values arranged in the given order
    ///
    /// # Errors
    ///
    /// `UnknownFeature` for a name this set does not contain.
    pub fn ordered(&self, order: &[String]) -> Result<Vec<f64>> {
        order
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| HeartwatchError::from(PredictionError::UnknownFeature(name.clone())))
            })
            .collect()
    }
}

impl FromIterator<(String, f64)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Everything the prediction run needs from one payload
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEntry {
    pub patient_id: String,
    pub features: FeatureSet,
    /// Recorded outcome of the test, when present and recognizable
    pub actual: Option<TestResult>,
}

fn malformed(path: String, problem: &str) -> HeartwatchError {
    PredictionError::MalformedPayload(format!("{path} {problem}")).into()
}

fn section<'a>(payload: &'a Value, name: &str) -> Result<&'a serde_json::Map<String, Value>> {
    match payload.get(name) {
        None => Err(malformed(name.to_string(), "is missing")),
        Some(Value::Null) => Err(malformed(name.to_string(), "is null")),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(malformed(name.to_string(), "is not an object")),
    }
}

fn number(payload: &Value, section_name: &str, field: &str) -> Result<f64> {
    let path = format!("{section_name}.{field}");
    match section(payload, section_name)?.get(field) {
        None => Err(malformed(path, "is missing")),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| malformed(path, "is not a number")),
    }
}

/// Applies the single range rule: heart rate above 200 becomes 80
pub fn clamp_heart_rate(value: f64) -> f64 {
    if value > MAX_PLAUSIBLE_HEART_RATE {
        DEFAULT_HEART_RATE
    } else {
        value
    }
}

/// Extracts the eight classifier features
///
/// # Errors
///
/// `MalformedPayload` naming the first offending path.
pub fn extract_features(payload: &Value) -> Result<FeatureSet> {
    FEATURE_SOURCES
        .iter()
        .map(|(name, section_name, field)| -> Result<(String, f64)> {
            let mut value = number(payload, section_name, field)?;
            if *name == HEART_RATE {
                let clamped = clamp_heart_rate(value);
                if clamped != value {
                    tracing::warn!(
                        heart_rate = value,
                        replacement = clamped,
                        "Implausible heart rate replaced"
                    );
                }
                value = clamped;
            }
            Ok((name.to_string(), value))
        })
        .collect()
}

/// Extracts features plus the patient id and recorded outcome
///
/// # Errors
///
/// `MalformedPayload` when a feature or `patient.patient_id` is missing.
pub fn extract_entry(payload: &Value) -> Result<ExtractedEntry> {
    let features = extract_features(payload)?;

    let patient_id = match section(payload, "patient")?.get("patient_id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => return Err(malformed("patient.patient_id".to_string(), "is not a string")),
        None => return Err(malformed("patient.patient_id".to_string(), "is missing")),
    };

    let actual = section(payload, "heart_attack_test")?
        .get("result")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<TestResult>().ok());

    Ok(ExtractedEntry {
        patient_id,
        features,
        actual,
    })
}
