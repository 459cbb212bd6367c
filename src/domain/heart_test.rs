//! Heart-attack lab test domain model
//!
//! A test holds the two cardiac biomarkers (CK-MB and troponin) and the
//! clinical outcome. Tests reference a medical record through `record_id`.

use super::ids::{RecordId, TestId};
use super::validation::check_non_negative;
use crate::domain::{HeartwatchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Outcome of a heart-attack test, serialized lowercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestResult {
    Negative,
    Positive,
}

impl TestResult {
    /// Class label used by the classifier (0 = negative, 1 = positive)
    pub fn label(self) -> u8 {
        match self {
            TestResult::Negative => 0,
            TestResult::Positive => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TestResult::Negative => "negative",
            TestResult::Positive => "positive",
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestResult {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(TestResult::Positive),
            "negative" => Ok(TestResult::Negative),
            other => Err(format!(
                "Invalid result '{other}', expected positive or negative"
            )),
        }
    }
}

impl Serialize for TestResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TestResult {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Stored heart-attack test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartAttackTest {
    pub test_id: TestId,
    pub record_id: RecordId,
    pub ck_mb: f64,
    pub troponin: f64,
    pub result: TestResult,
    pub test_date: DateTime<Utc>,
}

/// Body of `POST /api/heart-attack-tests`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewHeartAttackTest {
    #[serde(default)]
    pub test_id: Option<TestId>,
    pub record_id: RecordId,
    pub ck_mb: f64,
    pub troponin: f64,
    pub result: TestResult,
    #[serde(default)]
    pub test_date: Option<DateTime<Utc>>,
}

impl NewHeartAttackTest {
    /// Validates the request and builds the test to store
    pub fn into_test(self) -> Result<HeartAttackTest> {
        let test = HeartAttackTest {
            test_id: self.test_id.unwrap_or_else(TestId::generate),
            record_id: self.record_id,
            ck_mb: self.ck_mb,
            troponin: self.troponin,
            result: self.result,
            test_date: self.test_date.unwrap_or_else(Utc::now),
        };
        test.validate()?;
        Ok(test)
    }
}

/// Body of `PUT /api/heart-attack-tests/{test_id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeartAttackTestUpdate {
    #[serde(default)]
    pub record_id: Option<RecordId>,
    #[serde(default)]
    pub ck_mb: Option<f64>,
    #[serde(default)]
    pub troponin: Option<f64>,
    #[serde(default)]
    pub result: Option<TestResult>,
    #[serde(default)]
    pub test_date: Option<DateTime<Utc>>,
}

impl HeartAttackTestUpdate {
    /// Returns the test with this update applied
    pub fn apply(&self, test: &HeartAttackTest) -> Result<HeartAttackTest> {
        let mut updated = test.clone();
        if let Some(record_id) = &self.record_id {
            updated.record_id = record_id.clone();
        }
        if let Some(v) = self.ck_mb {
            updated.ck_mb = v;
        }
        if let Some(v) = self.troponin {
            updated.troponin = v;
        }
        if let Some(v) = self.result {
            updated.result = v;
        }
        if let Some(v) = self.test_date {
            updated.test_date = v;
        }
        updated.validate()?;
        Ok(updated)
    }
}

impl HeartAttackTest {
    fn validate(&self) -> Result<()> {
        check_non_negative("ck_mb", self.ck_mb)
            .and_then(|_| check_non_negative("troponin", self.troponin))
            .map_err(HeartwatchError::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("positive", TestResult::Positive)]
    #[test_case(" Positive ", TestResult::Positive)]
    #[test_case("NEGATIVE", TestResult::Negative)]
    fn test_result_parsing_is_lenient(input: &str, expected: TestResult) {
        assert_eq!(input.parse::<TestResult>().unwrap(), expected);
    }

    #[test]
    fn test_result_serializes_lowercase() {
        let json = serde_json::to_string(&TestResult::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
        let back: TestResult = serde_json::from_str("\"Negative\"").unwrap();
        assert_eq!(back, TestResult::Negative);
        assert!(serde_json::from_str::<TestResult>("\"maybe\"").is_err());
    }

    #[test]
    fn test_result_labels() {
        assert_eq!(TestResult::Negative.label(), 0);
        assert_eq!(TestResult::Positive.label(), 1);
    }

    #[test]
    fn test_new_test_rejects_negative_biomarker() {
        let req: NewHeartAttackTest = serde_json::from_value(serde_json::json!({
            "record_id": "R0001",
            "ck_mb": 5.2,
            "troponin": -0.03,
            "result": "negative"
        }))
        .unwrap();
        let err = req.into_test().unwrap_err();
        assert!(err.to_string().contains("troponin"));
    }

    #[test]
    fn test_update_changes_result() {
        let test = NewHeartAttackTest {
            test_id: Some(TestId::new("T0001").unwrap()),
            record_id: RecordId::new("R0001").unwrap(),
            ck_mb: 5.2,
            troponin: 0.03,
            result: TestResult::Negative,
            test_date: None,
        }
        .into_test()
        .unwrap();

        let update = HeartAttackTestUpdate {
            result: Some(TestResult::Positive),
            ..Default::default()
        };
        let updated = update.apply(&test).unwrap();
        assert_eq!(updated.result, TestResult::Positive);
        assert_eq!(updated.test_id, test.test_id);
    }
}
