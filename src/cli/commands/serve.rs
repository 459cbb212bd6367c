//! Serve command implementation

use super::load::print_summary;
use super::load_settings;
use crate::adapters::store::{create_record_store, RecordStore};
use crate::api;
use crate::core::dataset::{load_dataset, LoadSummary};
use crate::core::pipeline::{exit_code, EXIT_OK};
use crate::domain::Result;
use crate::log_error_with_context;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind host, overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port, overrides `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Load this CSV dataset into the store before accepting requests
    ///
    /// Replaces existing data. This is how the in-memory store gets data.
    #[arg(long, value_name = "CSV")]
    pub seed: Option<String>,
}

/// Clears the store and loads `csv` into it
async fn seed_store(store: &dyn RecordStore, csv: &str) -> Result<LoadSummary> {
    println!("  Seeding from {csv}...");
    load_dataset(store, csv, false).await
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_settings(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        println!("HEART ATTACK PREDICTION API - STARTING");
        println!("  Database target: {}", config.database_target);

        let store = match create_record_store(&config).await {
            Ok(store) => store,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create record store");
                println!("❌ Could not connect to the {} store: {e}", config.database_target);
                return Ok(exit_code(&e));
            }
        };

        if let Err(e) = store.ensure_schema().await {
            log_error_with_context!(&e, "Failed to prepare store schema");
            println!("❌ Failed to prepare the store: {e}");
            store.close().await;
            return Ok(exit_code(&e));
        }

        if let Some(csv) = &self.seed {
            match seed_store(store.as_ref(), csv).await {
                Ok(summary) => print_summary(&summary, config.database_target),
                Err(e) => {
                    log_error_with_context!(&e, "Failed to seed the store");
                    println!("❌ Seeding failed: {e}");
                    store.close().await;
                    return Ok(exit_code(&e));
                }
            }
        }

        println!("  Listening on http://{}", config.server.bind_address());
        println!();

        if let Err(e) = api::serve(&config.server, store, shutdown_signal).await {
            log_error_with_context!(&e, "Server failed");
            println!("❌ Server error: {e}");
            return Ok(exit_code(&e));
        }

        println!("Shutting down...");
        Ok(EXIT_OK)
    }
}
