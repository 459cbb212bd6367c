//! Domain models and types for Heartwatch.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`], [`RecordId`], [`TestId`])
//! - **Entities** ([`Patient`], [`MedicalRecord`], [`HeartAttackTest`])
//! - **Request types** validated at the boundary ([`NewPatient`], [`PatientUpdate`], ...)
//! - **Error types** ([`HeartwatchError`], [`StoreError`], [`PredictionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes, so a record id can't be passed where a patient id
//! is expected:
//!
//! ```rust
//! use heartwatch::domain::{PatientId, RecordId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let patient_id = PatientId::new("P0001")?;
//! let record_id = RecordId::new("R0001")?;
//!
//! // let wrong: PatientId = record_id;  // Compile error!
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod errors;
pub mod heart_test;
pub mod ids;
pub mod medical_record;
pub mod patient;
pub mod result;
pub mod validation;

pub use entry::LatestEntry;
pub use errors::{HeartwatchError, PredictionError, StoreError};
pub use heart_test::{HeartAttackTest, HeartAttackTestUpdate, NewHeartAttackTest, TestResult};
pub use ids::{PatientId, RecordId, TestId};
pub use medical_record::{MedicalRecord, MedicalRecordUpdate, NewMedicalRecord};
pub use patient::{Gender, NewPatient, Patient, PatientUpdate};
pub use result::Result;
