//! Domain identifier types with validation
//!
//! Newtype wrappers for the three entity keys. Each type is validated on
//! construction and on deserialization, so an empty key can never reach a
//! store adapter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Prefix used for generated and sequential identifiers
            pub const PREFIX: &'static str = $prefix;

            #[doc = concat!("Creates a new ", $label, " from a string")]
            ///
            /// Surrounding whitespace is trimmed. Returns `Err` if nothing is left.
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Generates a fresh random identifier, e.g. `P-1f0c9a2b`
            pub fn generate() -> Self {
                let uuid = uuid::Uuid::new_v4().simple().to_string();
                Self(format!("{}-{}", $prefix, &uuid[..8]))
            }

            /// Builds the sequential identifier used by the dataset loader
            ///
            /// `sequence(1)` is `P0001` for patients.
            pub fn sequence(n: usize) -> Self {
                Self(format!("{}{:04}", $prefix, n))
            }

            #[doc = concat!("Returns the ", $label, " as a string slice")]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(
    /// Patient identifier (`patient_id`)
    ///
    /// # Examples
    ///
    /// ```
    /// use heartwatch::domain::ids::PatientId;
    /// use std::str::FromStr;
    ///
    /// let id = PatientId::from_str("P0001").unwrap();
    /// assert_eq!(id.as_str(), "P0001");
    /// ```
    PatientId,
    "Patient ID",
    "P"
);

entity_id!(
    /// Medical record identifier (`record_id`)
    RecordId,
    "Record ID",
    "R"
);

entity_id!(
    /// Heart-attack test identifier (`test_id`)
    TestId,
    "Test ID",
    "T"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_id_creation() {
        let id = PatientId::new("P0042").unwrap();
        assert_eq!(id.as_str(), "P0042");
    }

    #[test]
    fn test_id_is_trimmed() {
        let id = RecordId::new("  R0001 ").unwrap();
        assert_eq!(id.as_str(), "R0001");
    }

    #[test]
    fn test_empty_id_fails() {
        assert!(PatientId::new("").is_err());
        assert!(TestId::new("   ").is_err());
    }

    #[test]
    fn test_sequence_ids() {
        assert_eq!(PatientId::sequence(1).as_str(), "P0001");
        assert_eq!(RecordId::sequence(42).as_str(), "R0042");
        assert_eq!(TestId::sequence(12345).as_str(), "T12345");
    }

    #[test]
    fn test_generated_ids_are_prefixed_and_distinct() {
        let a = TestId::generate();
        let b = TestId::generate();
        assert!(a.as_str().starts_with("T-"));
        assert_eq!(a.as_str().len(), 10);
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_serialization_is_transparent() {
        let id = PatientId::new("P0001").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"P0001\"");

        let back: PatientId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_deserialization_rejects_empty() {
        let result: Result<RecordId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
