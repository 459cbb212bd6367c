// Heartwatch - Heart-attack records API and risk prediction
// Copyright (c) 2025 Heartwatch Contributors
// Licensed under the MIT License

//! # Heartwatch
//!
//! Heartwatch keeps patients, medical records and heart-attack lab tests in a
//! record store, serves them over a REST API, and predicts heart-attack risk
//! for the most recent test with a random-forest model.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`api`] - axum router over the record store
//! - [`core`] - Aggregation, feature extraction, classification, reporting
//! - [`adapters`] - Record stores (memory, PostgreSQL, Cosmos DB) and the HTTP fetch
//! - [`domain`] - Entities, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use heartwatch::adapters::store::MemoryStore;
//! use heartwatch::core::aggregation::latest_entry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! // ... insert a patient, record and test ...
//! let entry = latest_entry(&store).await?;
//! println!("{}", serde_json::to_string_pretty(&entry)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], whose error type is
//! [`domain::HeartwatchError`]. Store and prediction failures nest
//! [`domain::StoreError`] and [`domain::PredictionError`].

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
