//! External system integrations for Heartwatch.
//!
//! - [`store`] - Record store abstraction (trait-based) and the in-memory backend
//! - [`cosmosdb`] - Azure Cosmos DB record store
//! - [`postgresql`] - PostgreSQL record store
//! - [`latest_entry`] - HTTP client for the latest-entry endpoint
//!
//! Adapters isolate third-party SDKs: their errors are converted into
//! [`StoreError`](crate::domain::StoreError) or
//! [`PredictionError`](crate::domain::PredictionError) before leaving the
//! adapter.

pub mod cosmosdb;
pub mod latest_entry;
pub mod postgresql;
pub mod store;
