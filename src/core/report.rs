//! Prediction report and prediction log

use super::classifier::Prediction;
use super::features::{
    ExtractedEntry, AGE, BLOOD_SUGAR, CK_MB, DIASTOLIC_BLOOD_PRESSURE, GENDER, HEART_RATE,
    SYSTOLIC_BLOOD_PRESSURE, TROPONIN,
};
use crate::domain::TestResult;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// Upper bound (exclusive) of the low band, as a positive-class probability
pub const LOW_RISK_LIMIT: f64 = 0.30;

/// Upper bound (exclusive) of the moderate band
pub const MODERATE_RISK_LIMIT: f64 = 0.70;

/// Risk band derived from the positive-class probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_positive_probability(p: f64) -> Self {
        if p < LOW_RISK_LIMIT {
            RiskLevel::Low
        } else if p < MODERATE_RISK_LIMIT {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    /// Traffic-light tag shown next to the level
    pub fn tag(self) -> &'static str {
        match self {
            RiskLevel::Low => "(G)",
            RiskLevel::Moderate => "(Y)",
            RiskLevel::High => "(R)",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW RISK",
            RiskLevel::Moderate => "MODERATE RISK",
            RiskLevel::High => "HIGH RISK",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tag(), self.label())
    }
}

/// Label text for a 0/1 prediction
pub fn predicted_result(prediction: &Prediction) -> TestResult {
    if prediction.is_positive() {
        TestResult::Positive
    } else {
        TestResult::Negative
    }
}

fn feature(entry: &ExtractedEntry, name: &str) -> String {
    entry
        .features
        .get(name)
        .map(|v| v.to_string())
        .unwrap_or_else(|| "?".to_string())
}

/// Renders the patient block shown before classification
pub fn render_patient(entry: &ExtractedEntry) -> String {
    let gender = match entry.features.get(GENDER) {
        Some(code) if code == 1.0 => "Male",
        Some(_) => "Female",
        None => "?",
    };

    let mut out = String::new();
    // Writing into a String can't fail
    let _ = writeln!(out, "PATIENT INFORMATION");
    let _ = writeln!(out, "  Patient ID: {}", entry.patient_id);
    let _ = writeln!(out, "  Age: {} years", feature(entry, AGE));
    let _ = writeln!(out, "  Gender: {gender}");
    let _ = writeln!(out);
    let _ = writeln!(out, "  Vital Signs:");
    let _ = writeln!(out, "    Heart Rate: {} bpm", feature(entry, HEART_RATE));
    let _ = writeln!(
        out,
        "    Blood Pressure: {}/{} mmHg",
        feature(entry, SYSTOLIC_BLOOD_PRESSURE),
        feature(entry, DIASTOLIC_BLOOD_PRESSURE)
    );
    let _ = writeln!(out, "    Blood Sugar: {} mg/dL", feature(entry, BLOOD_SUGAR));
    let _ = writeln!(out);
    let _ = writeln!(out, "  Cardiac Biomarkers:");
    let _ = writeln!(out, "    CK-MB: {}", feature(entry, CK_MB));
    let _ = writeln!(out, "    Troponin: {}", feature(entry, TROPONIN));
    let _ = writeln!(out);
    let actual = entry
        .actual
        .map(|r| r.as_str().to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let _ = writeln!(out, "  Actual Result: {actual}");
    out
}

/// Renders the prediction block and the predicted-vs-actual comparison
pub fn render_prediction(entry: &ExtractedEntry, prediction: &Prediction) -> String {
    let risk = RiskLevel::from_positive_probability(prediction.positive_probability());
    let predicted = predicted_result(prediction);

    let mut out = String::new();
    let _ = writeln!(out, "PREDICTION RESULTS");
    if prediction.is_positive() {
        let _ = writeln!(out, "  PREDICTION: POSITIVE");
        let _ = writeln!(out, "  Risk of heart attack detected");
    } else {
        let _ = writeln!(out, "  PREDICTION: NEGATIVE");
        let _ = writeln!(out, "  No immediate heart attack risk detected");
    }
    let _ = writeln!(out, "  Confidence: {:.1}%", prediction.confidence);
    let _ = writeln!(out);
    let _ = writeln!(out, "  Probability Breakdown:");
    let _ = writeln!(
        out,
        "    Negative (No risk): {:.1}%",
        prediction.probabilities[0] * 100.0
    );
    let _ = writeln!(
        out,
        "    Positive (At risk): {:.1}%",
        prediction.probabilities[1] * 100.0
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  {} Risk Level: {}", risk.tag(), risk.label());

    if let Some(actual) = entry.actual {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Comparison:");
        let _ = writeln!(out, "    Actual Result: {}", actual.as_str().to_uppercase());
        let _ = writeln!(
            out,
            "    Predicted Result: {}",
            predicted.as_str().to_uppercase()
        );
        if actual == predicted {
            let _ = writeln!(out, "    Prediction MATCHES actual result");
        } else {
            let _ = writeln!(out, "    Prediction DIFFERS from actual result");
        }
    }
    out
}

/// One line of the prediction log, without the trailing newline
pub fn format_log_line(
    timestamp: DateTime<Local>,
    entry: &ExtractedEntry,
    prediction: &Prediction,
) -> String {
    let actual = entry.actual.map(TestResult::as_str).unwrap_or("n/a");
    format!(
        "[{}] Patient: {}, Predicted: {}, Actual: {}, Confidence: {:.1}%",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.patient_id,
        predicted_result(prediction).as_str(),
        actual,
        prediction.confidence
    )
}

/// Append-only prediction log
#[derive(Debug, Clone)]
pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line for this run
    ///
    /// Failures are logged and reported through the return value; they never
    /// abort the run.
    pub fn append(&self, entry: &ExtractedEntry, prediction: &Prediction) -> bool {
        let line = format_log_line(Local::now(), entry, prediction);
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{line}"));

        match result {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Prediction logged");
                true
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to append to prediction log"
                );
                false
            }
        }
    }
}
