//! Route handlers, one module per resource

pub mod health;
pub mod latest_entry;
pub mod medical_records;
pub mod patients;
