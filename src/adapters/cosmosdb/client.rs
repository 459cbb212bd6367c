//! Cosmos DB client implementation
//!
//! Thin wrapper over the Azure SDK that knows the Heartwatch container layout
//! and converts SDK errors into [`StoreError`]s.

use super::models::{CosmosDocument, CosmosEntity, PARTITION_KEY_PATH};
use crate::config::CosmosDbConfig;
use crate::domain::{HeartwatchError, Result, StoreError};
use azure_core::credentials::Secret;
use azure_data_cosmos::clients::{ContainerClient, DatabaseClient};
use azure_data_cosmos::models::{ContainerProperties, IndexingPolicy, PartitionKeyDefinition};
use azure_data_cosmos::{CosmosClient, CosmosClientOptions, PartitionKey, Query};
use futures::stream::StreamExt;
use std::borrow::Cow;

/// Status codes the SDK reports through its error message
fn is_not_found(e: &azure_core::Error) -> bool {
    let msg = e.to_string();
    msg.contains("404") || msg.contains("NotFound")
}

fn is_conflict(e: &azure_core::Error) -> bool {
    let msg = e.to_string();
    msg.contains("409") || msg.contains("Conflict")
}

/// Cosmos DB client for Heartwatch
pub struct CosmosDbClient {
    client: CosmosClient,
    database: DatabaseClient,
    config: CosmosDbConfig,
}

impl CosmosDbClient {
    /// Create a new Cosmos DB client
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK client cannot be created.
    pub async fn new(config: CosmosDbConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        let key = Secret::new(config.key.expose_secret().as_str().to_string());
        let options = Some(CosmosClientOptions::default());

        let client = CosmosClient::with_key(&config.endpoint, key, options).map_err(|e| {
            StoreError::ConnectionFailed(format!("Failed to create Cosmos client: {e}"))
        })?;

        let database = client.database_client(&config.database_name);

        Ok(Self {
            client,
            database,
            config,
        })
    }

    /// Reads the database to verify connectivity
    pub async fn test_connection(&self) -> Result<()> {
        self.database.read(None).await.map_err(|e| {
            StoreError::ConnectionFailed(format!("Connection test failed: {e}"))
        })?;
        Ok(())
    }

    /// Ensure the database exists, creating it if necessary
    pub async fn ensure_database_exists(&self) -> Result<()> {
        match self.database.read(None).await {
            Ok(_) => {
                tracing::info!(database = %self.config.database_name, "Database already exists");
                Ok(())
            }
            Err(_) => {
                tracing::info!(database = %self.config.database_name, "Creating database");

                self.client
                    .create_database(&self.config.database_name, None)
                    .await
                    .map_err(|e| {
                        StoreError::SchemaFailed(format!("Failed to create database: {e}"))
                    })?;

                tracing::info!(database = %self.config.database_name, "Database created");
                Ok(())
            }
        }
    }

    /// Ensure the container for `T` exists, creating it if necessary
    ///
    /// Container name format: `{prefix}_{collection}`, partition key
    /// [`PARTITION_KEY_PATH`].
    pub async fn ensure_container_exists<T: CosmosEntity>(&self) -> Result<()> {
        let container_name = self.container_name::<T>();
        let container = self.database.container_client(&container_name);

        if container.read(None).await.is_ok() {
            tracing::debug!(container = %container_name, "Container already exists");
            return Ok(());
        }

        tracing::info!(container = %container_name, "Creating container");

        let properties = ContainerProperties {
            id: Cow::Owned(container_name.clone()),
            partition_key: PartitionKeyDefinition {
                paths: vec![PARTITION_KEY_PATH.to_string()],
                kind: azure_data_cosmos::models::PartitionKeyKind::Hash,
                version: None,
            },
            indexing_policy: Some(IndexingPolicy::default()),
            ..Default::default()
        };

        self.database
            .create_container(properties, None)
            .await
            .map_err(|e| {
                StoreError::SchemaFailed(format!(
                    "Failed to create container {container_name}: {e}"
                ))
            })?;

        tracing::info!(container = %container_name, "Container created");
        Ok(())
    }

    /// Container name for an entity type
    pub fn container_name<T: CosmosEntity>(&self) -> String {
        format!("{}_{}", self.config.container_prefix, T::COLLECTION)
    }

    fn container<T: CosmosEntity>(&self) -> ContainerClient {
        self.database.container_client(&self.container_name::<T>())
    }

    fn partition<T: CosmosEntity>() -> PartitionKey {
        PartitionKey::from(T::COLLECTION.to_string())
    }

    /// Create a document; an existing id is a conflict
    pub async fn create<T: CosmosEntity>(&self, entity: &T) -> Result<()> {
        let document = CosmosDocument::from_entity(entity);
        self.container::<T>()
            .create_item(Self::partition::<T>(), document, None)
            .await
            .map_err(|e| {
                if is_conflict(&e) {
                    HeartwatchError::from(StoreError::Conflict(format!(
                        "{} {} already exists",
                        T::COLLECTION,
                        entity.document_id()
                    )))
                } else {
                    StoreError::WriteFailed(format!(
                        "Failed to insert into {}: {e}",
                        T::COLLECTION
                    ))
                    .into()
                }
            })?;
        Ok(())
    }

    /// Point read by id
    pub async fn read<T: CosmosEntity>(&self, id: &str) -> Result<Option<T>> {
        match self
            .container::<T>()
            .read_item::<CosmosDocument<T>>(Self::partition::<T>(), id, None)
            .await
        {
            Ok(response) => {
                let document = response.into_body().map_err(|e| {
                    StoreError::DeserializationFailed(format!(
                        "Failed to deserialize {} document {id}: {e}",
                        T::COLLECTION
                    ))
                })?;
                Ok(Some(document.into_entity()))
            }
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(StoreError::QueryFailed(format!(
                "Failed to read {} document {id}: {e}",
                T::COLLECTION
            ))
            .into()),
        }
    }

    /// Replace an existing document; returns `false` when it does not exist
    pub async fn replace<T: CosmosEntity>(&self, entity: &T) -> Result<bool> {
        let document = CosmosDocument::from_entity(entity);
        match self
            .container::<T>()
            .replace_item(Self::partition::<T>(), entity.document_id(), document, None)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(StoreError::WriteFailed(format!(
                "Failed to replace {} document {}: {e}",
                T::COLLECTION,
                entity.document_id()
            ))
            .into()),
        }
    }

    /// Delete a document; returns `false` when it does not exist
    pub async fn delete<T: CosmosEntity>(&self, id: &str) -> Result<bool> {
        match self
            .container::<T>()
            .delete_item(Self::partition::<T>(), id, None)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(StoreError::WriteFailed(format!(
                "Failed to delete {} document {id}: {e}",
                T::COLLECTION
            ))
            .into()),
        }
    }

    /// Run a query against the container for `T` and collect the entities
    pub async fn query<T: CosmosEntity>(&self, query: impl Into<Query>) -> Result<Vec<T>> {
        tracing::debug!(collection = T::COLLECTION, "Querying Cosmos DB");

        let mut pager = self
            .container::<T>()
            .query_items::<CosmosDocument<T>>(query, Self::partition::<T>(), None)
            .map_err(|e| StoreError::QueryFailed(format!("Failed to create query: {e}")))?;

        let mut entities = Vec::new();
        while let Some(item) = pager.next().await {
            let document = item.map_err(|e| {
                StoreError::QueryFailed(format!("Failed to query {}: {e}", T::COLLECTION))
            })?;
            entities.push(document.into_entity());
        }
        Ok(entities)
    }

    /// Query every document whose `field` equals `value`
    pub async fn query_by_field<T: CosmosEntity>(&self, field: &str, value: &str) -> Result<Vec<T>> {
        self.query(field_query(field, value)?).await
    }

    /// Delete every document of type `T`
    pub async fn delete_all<T: CosmosEntity>(&self) -> Result<usize> {
        let entities: Vec<T> = self.query("SELECT * FROM c".to_string()).await?;
        let mut deleted = 0;
        for entity in &entities {
            if self.delete::<T>(entity.document_id()).await? {
                deleted += 1;
            }
        }
        tracing::debug!(collection = T::COLLECTION, deleted, "Cleared container");
        Ok(deleted)
    }

    pub fn database_name(&self) -> &str {
        &self.config.database_name
    }
}

/// Parameterized equality query on `field`, ordered by id
///
/// `field` is one of the fixed foreign-key names; only `value` comes from
/// the caller.
pub(crate) fn field_query(field: &str, value: &str) -> Result<Query> {
    Query::from(format!(
        "SELECT * FROM c WHERE c.{field} = @value ORDER BY c.id"
    ))
    .with_parameter("@value", value)
    .map_err(|e| {
        HeartwatchError::from(StoreError::QueryFailed(format!(
            "Failed to bind query parameter: {e}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::{HeartAttackTest, Patient};

    #[tokio::test]
    async fn test_container_names() {
        let config = CosmosDbConfig {
            endpoint: "https://test.documents.azure.com:443/".to_string(),
            key: secret_string("dGVzdC1rZXk=".to_string()),
            database_name: "heart_attack_db".to_string(),
            container_prefix: "heartwatch".to_string(),
        };

        let client = CosmosDbClient::new(config).await.unwrap();
        assert_eq!(client.container_name::<Patient>(), "heartwatch_patients");
        assert_eq!(
            client.container_name::<HeartAttackTest>(),
            "heartwatch_heart_attack_tests"
        );
        assert_eq!(client.database_name(), "heart_attack_db");
    }

    #[test]
    fn test_field_query_binds_value_as_parameter() {
        let query = field_query("patient_id", "P'1 OR 1=1").unwrap();
        let body = serde_json::to_value(&query).unwrap();

        assert_eq!(
            body["query"],
            "SELECT * FROM c WHERE c.patient_id = @value ORDER BY c.id"
        );
        assert_eq!(body["parameters"][0]["name"], "@value");
        assert_eq!(body["parameters"][0]["value"], "P'1 OR 1=1");
    }
}
