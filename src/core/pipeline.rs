//! Prediction run: fetch, extract, classify, report, log
//!
//! Stages run strictly in order. The first failing stage ends the run and its
//! error is returned unchanged; nothing is retried. [`PredictionPipeline::run`]
//! stops after rendering the report; the caller shows it and only then calls
//! [`PredictionPipeline::log`], whose failure never fails the run.

use super::classifier::{ClassifierAdapter, Prediction};
use super::features::{extract_entry, ExtractedEntry};
use super::report::{render_patient, render_prediction, PredictionLog, RiskLevel};
use crate::adapters::latest_entry::EntrySource;
use crate::domain::{HeartwatchError, PredictionError, Result, StoreError};

/// Process exit code for a successful run
pub const EXIT_OK: i32 = 0;
/// Invalid or unreadable configuration
pub const EXIT_CONFIG: i32 = 2;
/// The fetched payload could not be turned into features
pub const EXIT_MALFORMED_PAYLOAD: i32 = 3;
/// The API or the store could not be reached
pub const EXIT_TRANSPORT: i32 = 4;
/// Artifact, classification or any other failure
pub const EXIT_FATAL: i32 = 5;

/// Maps an error to the process exit code reported to the operator
pub fn exit_code(err: &HeartwatchError) -> i32 {
    match err {
        HeartwatchError::Configuration(_) => EXIT_CONFIG,
        HeartwatchError::Prediction(PredictionError::MalformedPayload(_)) => {
            EXIT_MALFORMED_PAYLOAD
        }
        HeartwatchError::Prediction(e) if e.is_transport() => EXIT_TRANSPORT,
        HeartwatchError::Store(StoreError::ConnectionFailed(_) | StoreError::Timeout(_)) => {
            EXIT_TRANSPORT
        }
        _ => EXIT_FATAL,
    }
}

/// Everything one successful run produced
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub entry: ExtractedEntry,
    pub prediction: Prediction,
    pub risk: RiskLevel,
    /// Patient block of the console report
    pub patient_report: String,
    /// Prediction and comparison block of the console report
    pub prediction_report: String,
}

/// One prediction run wired to its source, model and log
pub struct PredictionPipeline {
    source: Box<dyn EntrySource>,
    classifier: ClassifierAdapter,
    log: PredictionLog,
}

impl PredictionPipeline {
    pub fn new(
        source: Box<dyn EntrySource>,
        classifier: ClassifierAdapter,
        log: PredictionLog,
    ) -> Self {
        Self {
            source,
            classifier,
            log,
        }
    }

    pub fn source(&self) -> String {
        self.source.describe()
    }

    pub fn log_path(&self) -> &std::path::Path {
        self.log.path()
    }

    /// Runs fetch, extract, classify and report once
    ///
    /// Nothing is written to the prediction log; see [`Self::log`].
    ///
    /// # Errors
    ///
    /// The first stage error: transport, `MalformedPayload`, or a
    /// classification error.
    pub async fn run(&self) -> Result<PredictionOutcome> {
        let payload = self.source.fetch_latest().await?;
        tracing::info!(source = %self.source.describe(), "Latest entry fetched");

        let entry = extract_entry(&payload)?;
        tracing::debug!(patient_id = %entry.patient_id, features = entry.features.len(), "Features extracted");

        let prediction = self.classifier.predict(&entry.features)?;
        let risk = RiskLevel::from_positive_probability(prediction.positive_probability());
        tracing::info!(
            patient_id = %entry.patient_id,
            label = prediction.label,
            confidence = prediction.confidence,
            risk = ?risk,
            backend = self.classifier.backend_name(),
            "Prediction complete"
        );

        let patient_report = render_patient(&entry);
        let prediction_report = render_prediction(&entry, &prediction);

        Ok(PredictionOutcome {
            entry,
            prediction,
            risk,
            patient_report,
            prediction_report,
        })
    }

    /// Appends the outcome to the prediction log
    ///
    /// Returns whether the line was written.
    pub fn log(&self, outcome: &PredictionOutcome) -> bool {
        self.log.append(&outcome.entry, &outcome.prediction)
    }
}
