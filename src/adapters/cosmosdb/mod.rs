//! Azure Cosmos DB record store
//!
//! Document-store backend: one container per entity type, documents keyed by
//! the entity id.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::CosmosDbAdapter;
pub use client::CosmosDbClient;
pub use models::{CosmosDocument, CosmosEntity};
