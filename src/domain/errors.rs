//! Domain error types
//!
//! This module defines the error hierarchy for Heartwatch. All errors are
//! domain-specific and don't expose third-party types: adapters convert SDK,
//! driver and HTTP client errors into strings before they cross the boundary.

use thiserror::Error;

/// Main Heartwatch error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum HeartwatchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Prediction pipeline errors
    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),

    /// Requested entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Request payload failed boundary validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Record store errors
///
/// Errors that occur when talking to Cosmos DB, PostgreSQL or the in-memory
/// store. These errors don't expose SDK or driver types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Failed to create the database, container or table
    #[error("Failed to prepare schema: {0}")]
    SchemaFailed(String),

    /// An entity with the same key already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Failed to query documents or rows
    #[error("Failed to query store: {0}")]
    QueryFailed(String),

    /// Failed to insert, replace or delete
    #[error("Failed to write to store: {0}")]
    WriteFailed(String),

    /// Stored data could not be mapped back to a domain type
    #[error("Failed to deserialize stored data: {0}")]
    DeserializationFailed(String),

    /// Operation timed out
    #[error("Store request timeout: {0}")]
    Timeout(String),
}

/// Prediction pipeline errors
///
/// Every variant aborts the run. None of them is retried.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Could not reach the latest-entry endpoint
    #[error("Cannot connect to API at {url}: {message}")]
    ConnectionFailed { url: String, message: String },

    /// The latest-entry request exceeded its timeout
    #[error("API request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The latest-entry endpoint answered with a non-2xx status
    #[error("API returned error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The fetched payload is missing a required key or has the wrong type
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A model artifact does not exist on disk
    #[error("Model artifact not found: {path}")]
    MissingArtifact { path: String },

    /// A model artifact exists but cannot be read or parsed
    #[error("Invalid model artifact {path}: {message}")]
    InvalidArtifact { path: String, message: String },

    /// The feature vector does not match what the model expects
    #[error("Feature shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// The model asked for a feature the extractor does not produce
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}

impl PredictionError {
    /// Whether this error belongs to the transport class (fetch stage)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PredictionError::ConnectionFailed { .. }
                | PredictionError::Timeout { .. }
                | PredictionError::HttpStatus { .. }
        )
    }

    /// Whether this error comes from loading the model artifacts
    pub fn is_artifact(&self) -> bool {
        matches!(
            self,
            PredictionError::MissingArtifact { .. } | PredictionError::InvalidArtifact { .. }
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for HeartwatchError {
    fn from(err: std::io::Error) -> Self {
        HeartwatchError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for HeartwatchError {
    fn from(err: serde_json::Error) -> Self {
        HeartwatchError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for HeartwatchError {
    fn from(err: toml::de::Error) -> Self {
        HeartwatchError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heartwatch_error_display() {
        let err = HeartwatchError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Conflict("patient P0001".to_string());
        let err: HeartwatchError = store_err.into();
        assert!(matches!(err, HeartwatchError::Store(StoreError::Conflict(_))));
    }

    #[test]
    fn test_prediction_error_conversion() {
        let err: HeartwatchError = PredictionError::Timeout { seconds: 10 }.into();
        assert!(matches!(err, HeartwatchError::Prediction(_)));
        assert_eq!(
            err.to_string(),
            "Prediction error: API request timed out after 10s"
        );
    }

    #[test]
    fn test_prediction_error_classes() {
        let transport = PredictionError::HttpStatus {
            status: 404,
            body: String::new(),
        };
        assert!(transport.is_transport());
        assert!(!transport.is_artifact());

        let artifact = PredictionError::MissingArtifact {
            path: "model.json".to_string(),
        };
        assert!(artifact.is_artifact());
        assert!(!artifact.is_transport());

        let malformed = PredictionError::MalformedPayload("patient.age".to_string());
        assert!(!malformed.is_transport());
        assert!(!malformed.is_artifact());
    }

    #[test]
    fn test_not_found_display_is_bare() {
        let err = HeartwatchError::NotFound("Patient not found".to_string());
        assert_eq!(err.to_string(), "Patient not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: HeartwatchError = io_err.into();
        assert!(matches!(err, HeartwatchError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: HeartwatchError = json_err.into();
        assert!(matches!(err, HeartwatchError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: HeartwatchError = toml_err.into();
        assert!(matches!(err, HeartwatchError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = HeartwatchError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
        let err = StoreError::QueryFailed("Test error".to_string());
        let _: &dyn std::error::Error = &err;
        let err = PredictionError::UnknownFeature("Test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
