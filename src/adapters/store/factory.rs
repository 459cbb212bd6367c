//! Record store factory
//!
//! Builds the backend selected by `database_target`.

use super::memory::MemoryStore;
use super::traits::RecordStore;
use crate::adapters::cosmosdb::{CosmosDbAdapter, CosmosDbClient};
use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::config::schema::{DatabaseTarget, HeartwatchConfig};
use crate::domain::{HeartwatchError, Result};
use std::sync::Arc;

fn missing_section(name: &str) -> HeartwatchError {
    HeartwatchError::Configuration(format!(
        "{name} configuration is required when database_target = '{name}'"
    ))
}

/// Create the record store selected by the configuration
///
/// The store is not contacted here; callers run
/// [`RecordStore::test_connection`] and [`RecordStore::ensure_schema`] as
/// needed.
///
/// # Errors
///
/// Returns an error if the backend section is missing or the client cannot
/// be created.
pub async fn create_record_store(config: &HeartwatchConfig) -> Result<Arc<dyn RecordStore>> {
    match config.database_target {
        DatabaseTarget::Memory => {
            tracing::info!("Creating in-memory record store");
            Ok(Arc::new(MemoryStore::new()))
        }
        DatabaseTarget::CosmosDB => {
            let cosmos_config = config
                .cosmosdb
                .as_ref()
                .ok_or_else(|| missing_section("cosmosdb"))?;

            tracing::info!(database = %cosmos_config.database_name, "Creating Cosmos DB record store");
            let client = CosmosDbClient::new(cosmos_config.clone()).await?;
            Ok(Arc::new(CosmosDbAdapter::new(client)))
        }
        DatabaseTarget::PostgreSQL => {
            let pg_config = config
                .postgresql
                .as_ref()
                .ok_or_else(|| missing_section("postgresql"))?;

            tracing::info!("Creating PostgreSQL record store");
            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            Ok(Arc::new(PostgreSQLAdapter::new(client)))
        }
    }
}
