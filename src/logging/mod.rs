//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output on stderr, so reports on stdout stay clean
//! - Optional JSON log files with daily or hourly rotation
//! - Filter from `RUST_LOG`, falling back to the configured level
//!
//! # Example
//!
//! ```no_run
//! use heartwatch::logging::init_logging;
//! use heartwatch::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log an error together with what was being attempted
///
/// # Example
///
/// ```no_run
/// use heartwatch::log_error_with_context;
/// use heartwatch::domain::HeartwatchError;
///
/// let error = HeartwatchError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
