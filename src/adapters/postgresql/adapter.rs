//! PostgreSQL adapter implementing the record store traits

use super::client::PostgreSQLClient;
use super::models::{
    map_rows, patient_from_row, record_from_row, test_from_row, PATIENT_COLUMNS, RECORD_COLUMNS,
    TEST_COLUMNS,
};
use crate::adapters::store::traits::{
    HeartAttackTestStore, MedicalRecordStore, PatientStore, RecordStore, StoreCounts,
};
use crate::domain::{
    HeartAttackTest, MedicalRecord, Patient, PatientId, RecordId, Result, StoreError, TestId,
};
use async_trait::async_trait;
use std::sync::Arc;

/// PostgreSQL implementation of [`RecordStore`]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    async fn count(&self, table: &str) -> Result<usize> {
        let rows = self
            .client
            .query(&format!("SELECT COUNT(*) FROM {table}"), &[])
            .await?;
        let count: i64 = rows
            .first()
            .map(|row| row.try_get(0))
            .transpose()
            .map_err(|e| StoreError::DeserializationFailed(format!("Invalid count: {e}")))?
            .unwrap_or(0);
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

#[async_trait]
impl PatientStore for PostgreSQLAdapter {
    async fn insert_patient(&self, patient: &Patient) -> Result<()> {
        self.client
            .execute(
                "INSERT INTO patients (patient_id, age, gender, created_at) \
                 VALUES ($1, $2, $3, $4)",
                &[
                    &patient.patient_id.as_str(),
                    &patient.age,
                    &patient.gender.code(),
                    &patient.created_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn get_patient(&self, id: &PatientId) -> Result<Option<Patient>> {
        let query = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = $1");
        let rows = self.client.query(&query, &[&id.as_str()]).await?;
        rows.first().map(patient_from_row).transpose()
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        let query = format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY patient_id");
        let rows = self.client.query(&query, &[]).await?;
        map_rows(&rows, patient_from_row)
    }

    async fn replace_patient(&self, patient: &Patient) -> Result<bool> {
        let affected = self
            .client
            .execute(
                "UPDATE patients SET age = $2, gender = $3, created_at = $4 \
                 WHERE patient_id = $1",
                &[
                    &patient.patient_id.as_str(),
                    &patient.age,
                    &patient.gender.code(),
                    &patient.created_at,
                ],
            )
            .await?;
        Ok(affected > 0)
    }

    async fn delete_patient(&self, id: &PatientId) -> Result<bool> {
        let affected = self
            .client
            .execute("DELETE FROM patients WHERE patient_id = $1", &[&id.as_str()])
            .await?;
        Ok(affected > 0)
    }
}

#[async_trait]
impl MedicalRecordStore for PostgreSQLAdapter {
    async fn insert_record(&self, record: &MedicalRecord) -> Result<()> {
        self.client
            .execute(
                "INSERT INTO medical_records (record_id, patient_id, heart_rate, \
                 systolic_blood_pressure, diastolic_blood_pressure, blood_sugar, recorded_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &[
                    &record.record_id.as_str(),
                    &record.patient_id.as_str(),
                    &record.heart_rate,
                    &record.systolic_blood_pressure,
                    &record.diastolic_blood_pressure,
                    &record.blood_sugar,
                    &record.recorded_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn get_record(&self, id: &RecordId) -> Result<Option<MedicalRecord>> {
        let query = format!("SELECT {RECORD_COLUMNS} FROM medical_records WHERE record_id = $1");
        let rows = self.client.query(&query, &[&id.as_str()]).await?;
        rows.first().map(record_from_row).transpose()
    }

    async fn list_records(&self) -> Result<Vec<MedicalRecord>> {
        let query = format!("SELECT {RECORD_COLUMNS} FROM medical_records ORDER BY record_id");
        let rows = self.client.query(&query, &[]).await?;
        map_rows(&rows, record_from_row)
    }

    async fn list_records_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<MedicalRecord>> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM medical_records WHERE patient_id = $1 ORDER BY record_id"
        );
        let rows = self.client.query(&query, &[&patient_id.as_str()]).await?;
        map_rows(&rows, record_from_row)
    }

    async fn replace_record(&self, record: &MedicalRecord) -> Result<bool> {
        let affected = self
            .client
            .execute(
                "UPDATE medical_records SET patient_id = $2, heart_rate = $3, \
                 systolic_blood_pressure = $4, diastolic_blood_pressure = $5, \
                 blood_sugar = $6, recorded_at = $7 WHERE record_id = $1",
                &[
                    &record.record_id.as_str(),
                    &record.patient_id.as_str(),
                    &record.heart_rate,
                    &record.systolic_blood_pressure,
                    &record.diastolic_blood_pressure,
                    &record.blood_sugar,
                    &record.recorded_at,
                ],
            )
            .await?;
        Ok(affected > 0)
    }

    async fn delete_record(&self, id: &RecordId) -> Result<bool> {
        let affected = self
            .client
            .execute(
                "DELETE FROM medical_records WHERE record_id = $1",
                &[&id.as_str()],
            )
            .await?;
        Ok(affected > 0)
    }
}

#[async_trait]
impl HeartAttackTestStore for PostgreSQLAdapter {
    async fn insert_test(&self, test: &HeartAttackTest) -> Result<()> {
        self.client
            .execute(
                "INSERT INTO heart_attack_tests (test_id, record_id, ck_mb, troponin, result, \
                 test_date) VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &test.test_id.as_str(),
                    &test.record_id.as_str(),
                    &test.ck_mb,
                    &test.troponin,
                    &test.result.as_str(),
                    &test.test_date,
                ],
            )
            .await?;
        Ok(())
    }

    async fn get_test(&self, id: &TestId) -> Result<Option<HeartAttackTest>> {
        let query = format!("SELECT {TEST_COLUMNS} FROM heart_attack_tests WHERE test_id = $1");
        let rows = self.client.query(&query, &[&id.as_str()]).await?;
        rows.first().map(test_from_row).transpose()
    }

    async fn list_tests(&self) -> Result<Vec<HeartAttackTest>> {
        let query = format!("SELECT {TEST_COLUMNS} FROM heart_attack_tests ORDER BY test_id");
        let rows = self.client.query(&query, &[]).await?;
        map_rows(&rows, test_from_row)
    }

    async fn list_tests_for_record(&self, record_id: &RecordId) -> Result<Vec<HeartAttackTest>> {
        let query = format!(
            "SELECT {TEST_COLUMNS} FROM heart_attack_tests WHERE record_id = $1 ORDER BY test_id"
        );
        let rows = self.client.query(&query, &[&record_id.as_str()]).await?;
        map_rows(&rows, test_from_row)
    }

    async fn replace_test(&self, test: &HeartAttackTest) -> Result<bool> {
        let affected = self
            .client
            .execute(
                "UPDATE heart_attack_tests SET record_id = $2, ck_mb = $3, troponin = $4, \
                 result = $5, test_date = $6 WHERE test_id = $1",
                &[
                    &test.test_id.as_str(),
                    &test.record_id.as_str(),
                    &test.ck_mb,
                    &test.troponin,
                    &test.result.as_str(),
                    &test.test_date,
                ],
            )
            .await?;
        Ok(affected > 0)
    }

    async fn delete_test(&self, id: &TestId) -> Result<bool> {
        let affected = self
            .client
            .execute(
                "DELETE FROM heart_attack_tests WHERE test_id = $1",
                &[&id.as_str()],
            )
            .await?;
        Ok(affected > 0)
    }

    async fn latest_test(&self) -> Result<Option<HeartAttackTest>> {
        let query = format!(
            "SELECT {TEST_COLUMNS} FROM heart_attack_tests \
             ORDER BY test_date DESC, test_id DESC LIMIT 1"
        );
        let rows = self.client.query(&query, &[]).await?;
        rows.first().map(test_from_row).transpose()
    }
}

#[async_trait]
impl RecordStore for PostgreSQLAdapter {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn clear_all(&self) -> Result<()> {
        self.client
            .batch_execute("TRUNCATE heart_attack_tests, medical_records, patients")
            .await?;
        tracing::info!("Truncated PostgreSQL tables");
        Ok(())
    }

    async fn counts(&self) -> Result<StoreCounts> {
        Ok(StoreCounts {
            patients: self.count("patients").await?,
            medical_records: self.count("medical_records").await?,
            heart_attack_tests: self.count("heart_attack_tests").await?,
        })
    }

    async fn close(&self) {
        self.client.close();
        tracing::debug!("PostgreSQL pool closed");
    }
}
