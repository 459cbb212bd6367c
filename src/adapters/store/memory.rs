//! In-memory record store
//!
//! Backs `database_target = "memory"` for local development and the test
//! suite. Data lives for the lifetime of the process.

use super::traits::{HeartAttackTestStore, MedicalRecordStore, PatientStore, RecordStore};
use crate::domain::{
    HeartAttackTest, MedicalRecord, Patient, PatientId, RecordId, Result, StoreError, TestId,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Record store held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    patients: RwLock<BTreeMap<PatientId, Patient>>,
    records: RwLock<BTreeMap<RecordId, MedicalRecord>>,
    tests: RwLock<BTreeMap<TestId, HeartAttackTest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert_unique<K: Ord + Clone + std::fmt::Display, V: Clone>(
    map: &mut BTreeMap<K, V>,
    key: &K,
    value: &V,
    kind: &str,
) -> Result<()> {
    if map.contains_key(key) {
        return Err(StoreError::Conflict(format!("{kind} {key} already exists")).into());
    }
    map.insert(key.clone(), value.clone());
    Ok(())
}

fn replace_existing<K: Ord, V: Clone>(map: &mut BTreeMap<K, V>, key: &K, value: &V) -> bool {
    match map.get_mut(key) {
        Some(slot) => {
            *slot = value.clone();
            true
        }
        None => false,
    }
}

#[async_trait]
impl PatientStore for MemoryStore {
    async fn insert_patient(&self, patient: &Patient) -> Result<()> {
        let mut patients = self.patients.write().await;
        insert_unique(&mut patients, &patient.patient_id, patient, "Patient")
    }

    async fn get_patient(&self, id: &PatientId) -> Result<Option<Patient>> {
        Ok(self.patients.read().await.get(id).cloned())
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        Ok(self.patients.read().await.values().cloned().collect())
    }

    async fn replace_patient(&self, patient: &Patient) -> Result<bool> {
        let mut patients = self.patients.write().await;
        Ok(replace_existing(&mut patients, &patient.patient_id, patient))
    }

    async fn delete_patient(&self, id: &PatientId) -> Result<bool> {
        Ok(self.patients.write().await.remove(id).is_some())
    }
}

#[async_trait]
impl MedicalRecordStore for MemoryStore {
    async fn insert_record(&self, record: &MedicalRecord) -> Result<()> {
        let mut records = self.records.write().await;
        insert_unique(&mut records, &record.record_id, record, "Medical record")
    }

    async fn get_record(&self, id: &RecordId) -> Result<Option<MedicalRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn list_records(&self) -> Result<Vec<MedicalRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn list_records_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<MedicalRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| &r.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn replace_record(&self, record: &MedicalRecord) -> Result<bool> {
        let mut records = self.records.write().await;
        Ok(replace_existing(&mut records, &record.record_id, record))
    }

    async fn delete_record(&self, id: &RecordId) -> Result<bool> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}

#[async_trait]
impl HeartAttackTestStore for MemoryStore {
    async fn insert_test(&self, test: &HeartAttackTest) -> Result<()> {
        let mut tests = self.tests.write().await;
        insert_unique(&mut tests, &test.test_id, test, "Heart attack test")
    }

    async fn get_test(&self, id: &TestId) -> Result<Option<HeartAttackTest>> {
        Ok(self.tests.read().await.get(id).cloned())
    }

    async fn list_tests(&self) -> Result<Vec<HeartAttackTest>> {
        Ok(self.tests.read().await.values().cloned().collect())
    }

    async fn list_tests_for_record(&self, record_id: &RecordId) -> Result<Vec<HeartAttackTest>> {
        Ok(self
            .tests
            .read()
            .await
            .values()
            .filter(|t| &t.record_id == record_id)
            .cloned()
            .collect())
    }

    async fn replace_test(&self, test: &HeartAttackTest) -> Result<bool> {
        let mut tests = self.tests.write().await;
        Ok(replace_existing(&mut tests, &test.test_id, test))
    }

    async fn delete_test(&self, id: &TestId) -> Result<bool> {
        Ok(self.tests.write().await.remove(id).is_some())
    }

    async fn latest_test(&self) -> Result<Option<HeartAttackTest>> {
        // Ties on test_date go to the greatest test_id
        Ok(self
            .tests
            .read()
            .await
            .values()
            .max_by(|a, b| {
                a.test_date
                    .cmp(&b.test_date)
                    .then_with(|| a.test_id.cmp(&b.test_id))
            })
            .cloned())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        self.tests.write().await.clear();
        self.records.write().await.clear();
        self.patients.write().await.clear();
        tracing::debug!("Cleared in-memory store");
        Ok(())
    }
}
