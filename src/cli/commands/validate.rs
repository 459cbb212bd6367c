//! Validate config command implementation

use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use crate::core::pipeline::{EXIT_CONFIG, EXIT_OK};
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also check that the model artifacts exist
    #[arg(long)]
    pub check_artifacts: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Server: {}", config.server.bind_address());
        println!("  Permissive CORS: {}", config.server.cors_permissive);
        println!("  Database Target: {}", config.database_target);

        match config.database_target {
            DatabaseTarget::Memory => {}
            DatabaseTarget::CosmosDB => {
                if let Some(ref cosmos_config) = config.cosmosdb {
                    println!("  Cosmos DB Endpoint: {}", cosmos_config.endpoint);
                    println!("  Cosmos DB Database: {}", cosmos_config.database_name);
                    println!("  Container Prefix: {}", cosmos_config.container_prefix);
                }
            }
            DatabaseTarget::PostgreSQL => {
                if let Some(ref pg_config) = config.postgresql {
                    use secrecy::ExposeSecret;
                    println!(
                        "  PostgreSQL Host: {}",
                        pg_config
                            .connection_string
                            .expose_secret()
                            .as_str()
                            .rsplit_once('@')
                            .map(|(_, host)| host)
                            .unwrap_or("***")
                    );
                    println!("  Max Connections: {}", pg_config.max_connections);
                }
            }
        }

        println!("  Prediction API: {}", config.prediction.api_url);
        println!("  Fetch Timeout: {}s", config.prediction.timeout_seconds);
        println!("  Model: {}", config.prediction.model_path);
        println!("  Feature Names: {}", config.prediction.feature_names_path);
        println!("  Prediction Log: {}", config.prediction.log_path);
        println!();

        if self.check_artifacts {
            let mut missing = false;
            for path in [
                &config.prediction.model_path,
                &config.prediction.feature_names_path,
            ] {
                if Path::new(path).exists() {
                    println!("✅ Found {path}");
                } else {
                    println!("❌ Missing {path}");
                    missing = true;
                }
            }
            println!();
            if missing {
                return Ok(EXIT_CONFIG);
            }
        }

        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_invalid_file_exits_with_config_code() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nport = \"eighty\"\n").unwrap();
        file.flush().unwrap();

        let args = ValidateArgs {
            check_artifacts: false,
        };
        let code = args
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_missing_artifacts_are_reported() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[prediction]\nmodel_path = \"no/such/model.json\"\n")
            .unwrap();
        file.flush().unwrap();

        let args = ValidateArgs {
            check_artifacts: true,
        };
        let code = args
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
