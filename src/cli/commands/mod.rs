//! CLI command implementations
//!
//! Every command returns the process exit code; see
//! [`crate::core::pipeline::exit_code`] for the mapping from errors.

pub mod init;
pub mod load;
pub mod predict;
pub mod serve;
pub mod validate;

use crate::config::{load_config_or_default, HeartwatchConfig};
use crate::core::pipeline::exit_code;

/// Loads the configuration, falling back to defaults when the file is absent
///
/// On failure the error is printed and its exit code returned.
pub(crate) fn load_settings(config_path: &str) -> std::result::Result<HeartwatchConfig, i32> {
    match load_config_or_default(config_path) {
        Ok((config, true)) => {
            tracing::info!(config_path, "Configuration loaded");
            Ok(config)
        }
        Ok((config, false)) => {
            tracing::info!(
                config_path,
                "Configuration file not found, using built-in defaults"
            );
            Ok(config)
        }
        Err(e) => {
            println!("❌ Failed to load configuration: {e}");
            Err(exit_code(&e))
        }
    }
}
