// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{ScoreField, ScoreUpdate};

/// Validates that an identifier is a positive integer.
///
/// # Errors
///
/// Returns an error if `value` is zero or negative.
pub const fn validate_identifier(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::InvalidIdentifier { field, value });
    }
    Ok(())
}

/// Validates every supplied score component against its bounds.
///
/// Monthly scores must lie in `0..=20`, exam scores in `0..=80`.
/// Components that were not supplied are not checked.
///
/// # Errors
///
/// Returns an error for the first component that is not finite or is
/// out of range.
pub fn validate_scores(update: &ScoreUpdate) -> Result<(), DomainError> {
    for field in ScoreField::ALL {
        let Some(value) = update.get(field) else {
            continue;
        };

        if !value.is_finite() {
            return Err(DomainError::ScoreNotFinite { field });
        }

        let max: f64 = field.max();
        if !(0.0..=max).contains(&value) {
            return Err(DomainError::ScoreOutOfRange { field, value, max });
        }
    }

    Ok(())
}
