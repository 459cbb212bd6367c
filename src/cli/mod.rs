//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Heartwatch using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Heartwatch - heart-attack records API and risk prediction
#[derive(Parser, Debug)]
#[command(name = "heartwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "heartwatch.toml", env = "HEARTWATCH_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HEARTWATCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the records API
    Serve(commands::serve::ServeArgs),

    /// Predict heart-attack risk for the latest entry
    Predict(commands::predict::PredictArgs),

    /// Load the CSV dataset into the configured store
    Load(commands::load::LoadArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["heartwatch", "serve"]);
        assert_eq!(cli.config, "heartwatch.toml");
        assert!(matches!(cli.command, Commands::Serve(_)));
    }

    #[test]
    fn test_cli_parse_serve_with_seed() {
        let cli = Cli::parse_from(["heartwatch", "serve", "--seed", "Medicaldataset.csv"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.seed.as_deref(), Some("Medicaldataset.csv"));
                assert!(args.port.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config_and_log_level() {
        let cli = Cli::parse_from([
            "heartwatch",
            "--config",
            "custom.toml",
            "--log-level",
            "debug",
            "validate-config",
        ]);
        assert_eq!(cli.config, "custom.toml");
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_predict_flags() {
        let cli = Cli::parse_from([
            "heartwatch",
            "predict",
            "--api-url",
            "http://localhost:9000/api/latest-entry",
            "--timeout",
            "3",
        ]);
        match cli.command {
            Commands::Predict(args) => {
                assert_eq!(
                    args.api_url.as_deref(),
                    Some("http://localhost:9000/api/latest-entry")
                );
                assert_eq!(args.timeout, Some(3));
                assert!(args.model.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_load() {
        let cli = Cli::parse_from(["heartwatch", "load", "Medicaldataset.csv", "--keep-existing"]);
        match cli.command {
            Commands::Load(args) => {
                assert_eq!(args.csv, "Medicaldataset.csv");
                assert!(args.keep_existing);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["heartwatch", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
