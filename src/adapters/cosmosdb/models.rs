//! Cosmos DB document models
//!
//! Each entity is stored as a document whose `id` is the entity key. All
//! documents of a container share one partition value (the collection name),
//! so every query is a single-partition query.

use crate::domain::{HeartAttackTest, MedicalRecord, Patient};
use serde::{Deserialize, Serialize};

/// Partition key path used by every Heartwatch container
pub const PARTITION_KEY_PATH: &str = "/collection";

/// Entity types that can be stored as Cosmos documents
pub trait CosmosEntity: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync {
    /// Collection name, also used as the partition value and container suffix
    const COLLECTION: &'static str;

    /// Document id
    fn document_id(&self) -> &str;

    /// Value stored in `sort_key`, used for ORDER BY
    fn sort_key(&self) -> Option<String> {
        None
    }
}

impl CosmosEntity for Patient {
    const COLLECTION: &'static str = "patients";

    fn document_id(&self) -> &str {
        self.patient_id.as_str()
    }
}

impl CosmosEntity for MedicalRecord {
    const COLLECTION: &'static str = "medical_records";

    fn document_id(&self) -> &str {
        self.record_id.as_str()
    }
}

impl CosmosEntity for HeartAttackTest {
    const COLLECTION: &'static str = "heart_attack_tests";

    fn document_id(&self) -> &str {
        self.test_id.as_str()
    }

    // Zero-padded millis (sign bit flipped) then test_id: one string ORDER BY
    // sorts by date and breaks ties by id without a composite index
    fn sort_key(&self) -> Option<String> {
        let millis = (self.test_date.timestamp_millis() as u64) ^ (1 << 63);
        Some(format!("{millis:020}|{}", self.test_id.as_str()))
    }
}

/// Document envelope around an entity
///
/// Cosmos system properties (`_rid`, `_self`, `_etag`, `_attachments`,
/// `_ts`) are ignored on read; the envelope fields are dropped by
/// [`CosmosDocument::into_entity`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmosDocument<T> {
    pub id: String,

    pub collection: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,

    #[serde(flatten)]
    pub entity: T,
}

impl<T: CosmosEntity> CosmosDocument<T> {
    pub fn from_entity(entity: &T) -> Self {
        Self {
            id: entity.document_id().to_string(),
            collection: T::COLLECTION.to_string(),
            sort_key: entity.sort_key(),
            entity: entity.clone(),
        }
    }

    pub fn into_entity(self) -> T {
        self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordId, TestId, TestResult};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn heart_test() -> HeartAttackTest {
        HeartAttackTest {
            test_id: TestId::new("T0001").unwrap(),
            record_id: RecordId::new("R0001").unwrap(),
            ck_mb: 5.2,
            troponin: 0.03,
            result: TestResult::Negative,
            test_date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_document_envelope_fields() {
        let doc = CosmosDocument::from_entity(&heart_test());
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["id"], "T0001");
        assert_eq!(value["collection"], "heart_attack_tests");
        assert_eq!(value["test_id"], "T0001");
        assert_eq!(value["sort_key"], "09223373746149175808|T0001");
    }

    #[test]
    fn test_sort_key_orders_by_date_then_id() {
        let base = heart_test();
        let at = |id: &str, date| HeartAttackTest {
            test_id: TestId::new(id).unwrap(),
            test_date: date,
            ..base.clone()
        };
        let earlier = base.test_date - chrono::Duration::milliseconds(1);
        let before_epoch = Utc.with_ymd_and_hms(1969, 12, 31, 23, 0, 0).unwrap();

        let mut keys = vec![
            at("T0002", base.test_date).sort_key().unwrap(),
            at("T0009", earlier).sort_key().unwrap(),
            at("T0001", base.test_date).sort_key().unwrap(),
            at("T0100", before_epoch).sort_key().unwrap(),
        ];
        keys.sort();
        keys.reverse();

        let ids: Vec<&str> = keys
            .iter()
            .map(|k| k.rsplit('|').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["T0002", "T0001", "T0009", "T0100"]);
    }

    #[test]
    fn test_system_fields_are_stripped() {
        let stored = json!({
            "id": "T0001",
            "collection": "heart_attack_tests",
            "sort_key": "09223373746149175808|T0001",
            "test_id": "T0001",
            "record_id": "R0001",
            "ck_mb": 5.2,
            "troponin": 0.03,
            "result": "negative",
            "test_date": "2024-03-01T12:00:00Z",
            "_rid": "abc==",
            "_self": "dbs/abc/colls/def/docs/ghi/",
            "_etag": "\"0000\"",
            "_attachments": "attachments/",
            "_ts": 1709294400
        });

        let doc: CosmosDocument<HeartAttackTest> = serde_json::from_value(stored).unwrap();
        let entity = doc.into_entity();
        assert_eq!(entity, heart_test());

        let out = serde_json::to_value(&entity).unwrap();
        assert!(out.get("_rid").is_none());
        assert!(out.get("collection").is_none());
    }
}
