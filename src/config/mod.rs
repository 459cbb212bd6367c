//! Configuration management for Heartwatch.
//!
//! # Overview
//!
//! Heartwatch uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `HEARTWATCH_<SECTION>_<KEY>` overrides
//! - Defaults for every section, so the file itself is optional
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! database_target = "postgresql"
//!
//! [application]
//! log_level = "info"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [postgresql]
//! connection_string = "${HEARTWATCH_PG_URL}"
//!
//! [prediction]
//! api_url = "http://127.0.0.1:8000/api/latest-entry"
//! timeout_seconds = 10
//! ```
//!
//! ```rust,no_run
//! use heartwatch::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("heartwatch.toml")?;
//! println!("Store: {}", config.database_target);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, CosmosDbConfig, DatabaseTarget, HeartwatchConfig, LoggingConfig,
    PostgreSQLConfig, PredictionConfig, ServerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
