//! Predict command implementation

use super::load_settings;
use crate::adapters::latest_entry::LatestEntryClient;
use crate::config::PredictionConfig;
use crate::core::classifier::ClassifierAdapter;
use crate::core::pipeline::{exit_code, PredictionPipeline, EXIT_OK};
use crate::core::report::PredictionLog;
use crate::domain::{HeartwatchError, PredictionError};
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the predict command
#[derive(Args, Debug, Default)]
pub struct PredictArgs {
    /// Latest-entry endpoint, overrides `prediction.api_url`
    #[arg(long)]
    pub api_url: Option<String>,

    /// Model artifact, overrides `prediction.model_path`
    #[arg(long)]
    pub model: Option<String>,

    /// Feature-name artifact, overrides `prediction.feature_names_path`
    #[arg(long)]
    pub feature_names: Option<String>,

    /// Prediction log, overrides `prediction.log_path`
    #[arg(long)]
    pub log_file: Option<String>,

    /// Fetch timeout in seconds, overrides `prediction.timeout_seconds`
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl PredictArgs {
    /// Applies the flags on top of the configured values
    pub fn resolve(&self, config: &PredictionConfig) -> PredictionConfig {
        let mut resolved = config.clone();
        if let Some(url) = &self.api_url {
            resolved.api_url = url.clone();
        }
        if let Some(model) = &self.model {
            resolved.model_path = model.clone();
        }
        if let Some(names) = &self.feature_names {
            resolved.feature_names_path = names.clone();
        }
        if let Some(log) = &self.log_file {
            resolved.log_path = log.clone();
        }
        if let Some(timeout) = self.timeout {
            resolved.timeout_seconds = timeout;
        }
        resolved
    }

    /// Execute the predict command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_settings(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };
        let settings = self.resolve(&config.prediction);
        Ok(run(&settings).await)
    }
}

fn report_failure(err: &HeartwatchError, settings: &PredictionConfig) {
    log_error_with_context!(err, "Prediction failed");
    println!("❌ Error: {err}");
    match err {
        HeartwatchError::Prediction(PredictionError::ConnectionFailed { .. }) => {
            println!("   Make sure the API is running: heartwatch serve");
        }
        HeartwatchError::Prediction(e) if e.is_artifact() => {
            println!("   Looking for: {}", settings.model_path);
            println!("   and: {}", settings.feature_names_path);
        }
        _ => {}
    }
}

/// Runs one prediction and prints the report; returns the exit code
pub async fn run(settings: &PredictionConfig) -> i32 {
    println!("HEART ATTACK PREDICTION SYSTEM");
    println!();

    println!("Loading prediction model...");
    let classifier =
        match ClassifierAdapter::load(&settings.model_path, &settings.feature_names_path) {
            Ok(classifier) => classifier,
            Err(e) => {
                report_failure(&e, settings);
                println!("Cannot proceed without model");
                return exit_code(&e);
            }
        };
    println!(
        "  Model loaded: {} ({} features)",
        classifier.backend_name(),
        classifier.feature_order().len()
    );

    let source = match LatestEntryClient::new(&settings.api_url, settings.timeout_seconds) {
        Ok(source) => source,
        Err(e) => {
            report_failure(&e, settings);
            return exit_code(&e);
        }
    };

    println!("Fetching latest patient data from API...");
    println!("  API Endpoint: {}", settings.api_url);
    println!();

    let pipeline = PredictionPipeline::new(
        Box::new(source),
        classifier,
        PredictionLog::new(&settings.log_path),
    );

    let outcome = match pipeline.run().await {
        Ok(outcome) => outcome,
        Err(e) => {
            report_failure(&e, settings);
            println!("Cannot proceed without data");
            return exit_code(&e);
        }
    };

    println!("{}", outcome.patient_report);
    println!("{}", outcome.prediction_report);
    println!("PREDICTION COMPLETE");

    if pipeline.log(&outcome) {
        println!("Prediction logged to {}", pipeline.log_path().display());
    } else {
        println!(
            "⚠️  Could not write prediction log {}",
            pipeline.log_path().display()
        );
    }

    EXIT_OK
}
