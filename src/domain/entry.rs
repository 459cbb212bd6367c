//! Combined view returned by the latest-entry read

use super::{HeartAttackTest, MedicalRecord, Patient};
use serde::{Deserialize, Serialize};

/// Most recent heart-attack test joined with its record and patient
///
/// Links that don't resolve are `None` and serialize as `null`. The JSON
/// form always has exactly the three keys below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestEntry {
    pub patient: Option<Patient>,
    pub medical_record: Option<MedicalRecord>,
    pub heart_attack_test: HeartAttackTest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordId, TestId, TestResult};
    use chrono::Utc;

    #[test]
    fn test_missing_links_serialize_as_null() {
        let entry = LatestEntry {
            patient: None,
            medical_record: None,
            heart_attack_test: HeartAttackTest {
                test_id: TestId::new("T0001").unwrap(),
                record_id: RecordId::new("R9999").unwrap(),
                ck_mb: 1.0,
                troponin: 0.01,
                result: TestResult::Negative,
                test_date: Utc::now(),
            },
        };

        let value = serde_json::to_value(&entry).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert!(object["patient"].is_null());
        assert!(object["medical_record"].is_null());
        assert_eq!(object["heart_attack_test"]["test_id"], "T0001");
    }
}
