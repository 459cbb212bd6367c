//! Core logic for Heartwatch.
//!
//! # Modules
//!
//! - [`aggregation`] - Latest-entry join over the record store
//! - [`features`] - Feature extraction from the latest-entry payload
//! - [`classifier`] - Model backend seam and the random-forest model
//! - [`report`] - Risk bands, console report and prediction log
//! - [`pipeline`] - The prediction run and its exit codes
//! - [`dataset`] - CSV dataset loader
//!
//! # Prediction Workflow
//!
//! 1. **Fetch**: GET the latest entry from the API
//! 2. **Extract**: Read the eight named features from the payload
//! 3. **Classify**: Order the features and run the model
//! 4. **Report**: Print patient, prediction, risk level and comparison
//! 5. **Log**: Append one line to the prediction log
//!
//! # Example
//!
//! ```rust,no_run
//! use heartwatch::adapters::latest_entry::LatestEntryClient;
//! use heartwatch::core::classifier::ClassifierAdapter;
//! use heartwatch::core::pipeline::PredictionPipeline;
//! use heartwatch::core::report::PredictionLog;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = ClassifierAdapter::load(
//!     "models/heart_attack_model.json",
//!     "models/feature_names.json",
//! )?;
//! let source = LatestEntryClient::new("http://127.0.0.1:8000/api/latest-entry", 10)?;
//! let pipeline = PredictionPipeline::new(
//!     Box::new(source),
//!     classifier,
//!     PredictionLog::new("prediction_log.txt"),
//! );
//!
//! let outcome = pipeline.run().await?;
//! println!("{}", outcome.prediction_report);
//! pipeline.log(&outcome);
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod classifier;
pub mod dataset;
pub mod features;
pub mod pipeline;
pub mod report;
