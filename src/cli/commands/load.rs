//! Load command implementation

use super::load_settings;
use crate::adapters::store::{create_record_store, RecordStore};
use crate::config::{DatabaseTarget, HeartwatchConfig};
use crate::core::dataset::{load_dataset, LoadSummary};
use crate::core::pipeline::{exit_code, EXIT_OK};
use crate::domain::{HeartwatchError, Result};
use crate::log_error_with_context;
use clap::Args;
use std::fmt::Display;

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// CSV file to load
    #[arg(default_value = "Medicaldataset.csv")]
    pub csv: String,

    /// Keep existing data instead of clearing the store first
    #[arg(long)]
    pub keep_existing: bool,
}

/// Rejects store targets that don't outlive the process
///
/// The in-memory store is dropped when `load` exits, so loading into it
/// would report success and keep nothing. Use `serve --seed` instead.
pub(crate) fn require_persistent_target(config: &HeartwatchConfig) -> Result<()> {
    match config.database_target {
        DatabaseTarget::Memory => Err(HeartwatchError::Configuration(
            "database_target = 'memory' does not persist between commands; \
             configure postgresql or cosmosdb, or use `heartwatch serve --seed <csv>`"
                .to_string(),
        )),
        DatabaseTarget::PostgreSQL | DatabaseTarget::CosmosDB => Ok(()),
    }
}

/// Prints the per-collection counts and any skipped rows
pub(crate) fn print_summary(summary: &LoadSummary, target: impl Display) {
    println!();
    println!("{}", "=".repeat(50));
    println!("✅ Data loaded into {target}");
    println!("{}", "=".repeat(50));
    println!("  Rows read: {}", summary.rows_read);
    println!("  Rows loaded: {}", summary.loaded);
    println!("  Patients collection: {} records", summary.counts.patients);
    println!(
        "  Medical records collection: {} records",
        summary.counts.medical_records
    );
    println!(
        "  Heart attack tests collection: {} records",
        summary.counts.heart_attack_tests
    );

    if !summary.skipped.is_empty() {
        println!();
        println!("⚠️  Skipped rows:");
        for row in &summary.skipped {
            println!("  - line {}: {}", row.line, row.reason);
        }
    }
    println!();
}

impl LoadArgs {
    async fn load_into(&self, store: &dyn RecordStore) -> Result<LoadSummary> {
        store.ensure_schema().await?;
        println!("Reading {}...", self.csv);
        if !self.keep_existing {
            println!("Clearing existing data...");
        }
        load_dataset(store, &self.csv, self.keep_existing).await
    }

    /// Execute the load command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_settings(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        if let Err(e) = require_persistent_target(&config) {
            log_error_with_context!(&e, "Refusing to load into a non-persistent store");
            println!("❌ {e}");
            return Ok(exit_code(&e));
        }

        println!("Connecting to {} store...", config.database_target);
        let store = match create_record_store(&config).await {
            Ok(store) => store,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create record store");
                println!("❌ Connection failed: {e}");
                return Ok(exit_code(&e));
            }
        };

        let result = self.load_into(store.as_ref()).await;
        store.close().await;

        match result {
            Ok(summary) => {
                print_summary(&summary, config.database_target);
                Ok(EXIT_OK)
            }
            Err(e) => {
                log_error_with_context!(&e, "Dataset load failed");
                println!("❌ Load failed: {e}");
                Ok(exit_code(&e))
            }
        }
    }
}
