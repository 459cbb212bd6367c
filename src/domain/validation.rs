//! Boundary checks shared by the request types

/// Checks that `value` lies in `[min, max]` (`max` is optional)
///
/// Returns a message naming the field on failure. NaN is rejected.
pub fn check_range(field: &str, value: f64, min: f64, max: Option<f64>) -> Result<(), String> {
    if value.is_nan() {
        return Err(format!("{field} must be a number"));
    }
    if value < min {
        return Err(format!("{field} must be >= {min}, got {value}"));
    }
    if let Some(max) = max {
        if value > max {
            return Err(format!("{field} must be <= {max}, got {value}"));
        }
    }
    Ok(())
}

/// Checks that a measurement is non-negative
pub fn check_non_negative(field: &str, value: f64) -> Result<(), String> {
    check_range(field, value, 0.0, None)
}
