//! Result type alias for Heartwatch
//!
//! This module provides a convenient Result type alias that uses
//! `HeartwatchError` as the error type.

use super::errors::HeartwatchError;

/// Result type alias for Heartwatch operations
///
/// # Examples
///
/// ```
/// use heartwatch::domain::result::Result;
/// use heartwatch::domain::errors::HeartwatchError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(HeartwatchError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HeartwatchError>;
