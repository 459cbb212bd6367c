//! Record store abstraction
//!
//! Trait-based storage for patients, medical records and heart-attack tests,
//! with in-memory, Cosmos DB and PostgreSQL implementations.

pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::create_record_store;
pub use memory::MemoryStore;
pub use traits::{HeartAttackTestStore, MedicalRecordStore, PatientStore, RecordStore, StoreCounts};
