//! PostgreSQL record store
//!
//! Relational backend: one table per entity type, created by the bundled
//! migration.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
