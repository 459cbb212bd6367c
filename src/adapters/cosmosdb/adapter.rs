//! Cosmos DB adapter implementing the record store traits

use super::client::CosmosDbClient;
use crate::adapters::store::traits::{
    HeartAttackTestStore, MedicalRecordStore, PatientStore, RecordStore,
};
use crate::domain::{
    HeartAttackTest, MedicalRecord, Patient, PatientId, RecordId, Result, TestId,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Cosmos DB implementation of [`RecordStore`]
pub struct CosmosDbAdapter {
    client: Arc<CosmosDbClient>,
}

impl CosmosDbAdapter {
    pub fn new(client: CosmosDbClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &Arc<CosmosDbClient> {
        &self.client
    }
}

#[async_trait]
impl PatientStore for CosmosDbAdapter {
    async fn insert_patient(&self, patient: &Patient) -> Result<()> {
        self.client.create(patient).await
    }

    async fn get_patient(&self, id: &PatientId) -> Result<Option<Patient>> {
        self.client.read(id.as_str()).await
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        self.client
            .query("SELECT * FROM c ORDER BY c.id".to_string())
            .await
    }

    async fn replace_patient(&self, patient: &Patient) -> Result<bool> {
        self.client.replace(patient).await
    }

    async fn delete_patient(&self, id: &PatientId) -> Result<bool> {
        self.client.delete::<Patient>(id.as_str()).await
    }
}

#[async_trait]
impl MedicalRecordStore for CosmosDbAdapter {
    async fn insert_record(&self, record: &MedicalRecord) -> Result<()> {
        self.client.create(record).await
    }

    async fn get_record(&self, id: &RecordId) -> Result<Option<MedicalRecord>> {
        self.client.read(id.as_str()).await
    }

    async fn list_records(&self) -> Result<Vec<MedicalRecord>> {
        self.client
            .query("SELECT * FROM c ORDER BY c.id".to_string())
            .await
    }

    async fn list_records_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<MedicalRecord>> {
        self.client
            .query_by_field("patient_id", patient_id.as_str())
            .await
    }

    async fn replace_record(&self, record: &MedicalRecord) -> Result<bool> {
        self.client.replace(record).await
    }

    async fn delete_record(&self, id: &RecordId) -> Result<bool> {
        self.client.delete::<MedicalRecord>(id.as_str()).await
    }
}

#[async_trait]
impl HeartAttackTestStore for CosmosDbAdapter {
    async fn insert_test(&self, test: &HeartAttackTest) -> Result<()> {
        self.client.create(test).await
    }

    async fn get_test(&self, id: &TestId) -> Result<Option<HeartAttackTest>> {
        self.client.read(id.as_str()).await
    }

    async fn list_tests(&self) -> Result<Vec<HeartAttackTest>> {
        self.client
            .query("SELECT * FROM c ORDER BY c.id".to_string())
            .await
    }

    async fn list_tests_for_record(&self, record_id: &RecordId) -> Result<Vec<HeartAttackTest>> {
        self.client
            .query_by_field("record_id", record_id.as_str())
            .await
    }

    async fn replace_test(&self, test: &HeartAttackTest) -> Result<bool> {
        self.client.replace(test).await
    }

    async fn delete_test(&self, id: &TestId) -> Result<bool> {
        self.client.delete::<HeartAttackTest>(id.as_str()).await
    }

    async fn latest_test(&self) -> Result<Option<HeartAttackTest>> {
        let tests: Vec<HeartAttackTest> = self
            .client
            .query("SELECT TOP 1 * FROM c ORDER BY c.sort_key DESC".to_string())
            .await?;
        Ok(tests.into_iter().next())
    }
}

#[async_trait]
impl RecordStore for CosmosDbAdapter {
    fn backend_name(&self) -> &'static str {
        "cosmosdb"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_database_exists().await?;
        self.client.ensure_container_exists::<Patient>().await?;
        self.client.ensure_container_exists::<MedicalRecord>().await?;
        self.client.ensure_container_exists::<HeartAttackTest>().await?;
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        let tests = self.client.delete_all::<HeartAttackTest>().await?;
        let records = self.client.delete_all::<MedicalRecord>().await?;
        let patients = self.client.delete_all::<Patient>().await?;
        tracing::info!(
            database = %self.client.database_name(),
            patients,
            records,
            tests,
            "Cleared Cosmos DB containers"
        );
        Ok(())
    }
}
