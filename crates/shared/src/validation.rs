//! Common validation utilities.

use validator::ValidationError;

/// Largest absolute value a single ledger entry may carry.
pub const MAX_POINTS_PER_ENTRY: i32 = 10_000;

/// Validates that a text field contains something other than whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a ledger points amount: non-zero and within the per-entry bound.
pub fn validate_points(points: i32) -> Result<(), ValidationError> {
    if points == 0 {
        let mut err = ValidationError::new("points_non_zero");
        err.message = Some("Points must not be zero".into());
        return Err(err);
    }

    if points.unsigned_abs() > MAX_POINTS_PER_ENTRY as u32 {
        let mut err = ValidationError::new("points_range");
        err.message = Some(
            format!(
                "Points must be between -{} and {}",
                MAX_POINTS_PER_ENTRY, MAX_POINTS_PER_ENTRY
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}
