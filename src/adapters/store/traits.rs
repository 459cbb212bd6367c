//! Record store abstraction traits
//!
//! This module defines the traits that storage adapters must implement to
//! hold patients, medical records and heart-attack tests.

use crate::domain::{
    HeartAttackTest, MedicalRecord, Patient, PatientId, RecordId, Result, TestId,
};
use async_trait::async_trait;

/// Number of stored entities per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub patients: usize,
    pub medical_records: usize,
    pub heart_attack_tests: usize,
}

/// Patient persistence
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Insert a new patient
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if `patient_id` is already taken.
    async fn insert_patient(&self, patient: &Patient) -> Result<()>;

    /// Point lookup by `patient_id`
    async fn get_patient(&self, id: &PatientId) -> Result<Option<Patient>>;

    /// All patients, ordered by `patient_id`
    async fn list_patients(&self) -> Result<Vec<Patient>>;

    /// Replace the stored patient with the same id
    ///
    /// Returns `false` if no such patient exists.
    async fn replace_patient(&self, patient: &Patient) -> Result<bool>;

    /// Delete a patient; returns `false` if it did not exist
    async fn delete_patient(&self, id: &PatientId) -> Result<bool>;
}

/// Medical record persistence
#[async_trait]
pub trait MedicalRecordStore: Send + Sync {
    async fn insert_record(&self, record: &MedicalRecord) -> Result<()>;

    async fn get_record(&self, id: &RecordId) -> Result<Option<MedicalRecord>>;

    /// All records, ordered by `record_id`
    async fn list_records(&self) -> Result<Vec<MedicalRecord>>;

    /// Records whose `patient_id` matches
    async fn list_records_for_patient(&self, patient_id: &PatientId)
        -> Result<Vec<MedicalRecord>>;

    async fn replace_record(&self, record: &MedicalRecord) -> Result<bool>;

    async fn delete_record(&self, id: &RecordId) -> Result<bool>;
}

/// Heart-attack test persistence
#[async_trait]
pub trait HeartAttackTestStore: Send + Sync {
    async fn insert_test(&self, test: &HeartAttackTest) -> Result<()>;

    async fn get_test(&self, id: &TestId) -> Result<Option<HeartAttackTest>>;

    /// All tests, ordered by `test_id`
    async fn list_tests(&self) -> Result<Vec<HeartAttackTest>>;

    /// Tests whose `record_id` matches
    async fn list_tests_for_record(&self, record_id: &RecordId) -> Result<Vec<HeartAttackTest>>;

    async fn replace_test(&self, test: &HeartAttackTest) -> Result<bool>;

    async fn delete_test(&self, id: &TestId) -> Result<bool>;

    /// The test with the greatest `test_date`, or `None` when there are no tests
    async fn latest_test(&self) -> Result<Option<HeartAttackTest>>;
}

/// Complete record store used by the API, the loader and the aggregation read
///
/// Implementations are constructed once (see
/// [`create_record_store`](super::factory::create_record_store)) and shared
/// behind an `Arc`.
#[async_trait]
pub trait RecordStore: PatientStore + MedicalRecordStore + HeartAttackTestStore {
    /// Short backend name for logs and the health endpoint
    fn backend_name(&self) -> &'static str;

    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn test_connection(&self) -> Result<()>;

    /// Create the database, containers or tables if they don't exist
    async fn ensure_schema(&self) -> Result<()>;

    /// Remove every patient, record and test
    async fn clear_all(&self) -> Result<()>;

    /// Count entities per collection
    async fn counts(&self) -> Result<StoreCounts> {
        Ok(StoreCounts {
            patients: self.list_patients().await?.len(),
            medical_records: self.list_records().await?.len(),
            heart_attack_tests: self.list_tests().await?.len(),
        })
    }

    /// Release connections; the store must not be used afterwards
    async fn close(&self) {}
}
