//! Response bodies for write operations

use serde::{Deserialize, Serialize};

/// Body of a successful create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertedResponse {
    pub inserted_id: String,
    pub message: String,
}

/// Body of a successful update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatedResponse {
    pub matched_count: u64,
    pub modified_count: u64,
    pub message: String,
}

/// Body of a successful delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted_count: u64,
    pub message: String,
}

impl InsertedResponse {
    pub fn new(entity: &str, id: impl Into<String>) -> Self {
        Self {
            inserted_id: id.into(),
            message: format!("{entity} created successfully"),
        }
    }
}

impl UpdatedResponse {
    /// `modified` is false when the update left the entity unchanged
    pub fn new(entity: &str, modified: bool) -> Self {
        Self {
            matched_count: 1,
            modified_count: u64::from(modified),
            message: format!("{entity} updated successfully"),
        }
    }
}

impl DeletedResponse {
    pub fn new(entity: &str) -> Self {
        Self {
            deleted_count: 1,
            message: format!("{entity} deleted successfully"),
        }
    }
}
