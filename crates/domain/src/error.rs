// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::ScoreField;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// An identifier was zero or negative.
    InvalidIdentifier {
        /// The name of the identifier field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// The academic year is empty or not of the form `YYYY-YYYY`.
    InvalidAcademicYear(String),
    /// A score component is outside its permitted range.
    ScoreOutOfRange {
        /// The offending component.
        field: ScoreField,
        /// The rejected value.
        value: f64,
        /// The inclusive upper bound for this component.
        max: f64,
    },
    /// A score component is NaN or infinite.
    ScoreNotFinite {
        /// The offending component.
        field: ScoreField,
    },
    /// Stored approval columns describe an impossible state.
    InconsistentApprovalState(String),
    /// An approval status string is not recognised.
    InvalidApprovalStatus(String),
    /// A role string is not recognised.
    InvalidRole(String),
    /// A timestamp could not be produced or parsed.
    InvalidTimestamp(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { field, value } => {
                write!(f, "Invalid {field}: {value}. Must be a positive integer")
            }
            Self::InvalidAcademicYear(year) => {
                write!(
                    f,
                    "Invalid academic year '{year}'. Expected the form YYYY-YYYY"
                )
            }
            Self::ScoreOutOfRange { field, value, max } => {
                write!(
                    f,
                    "{} must be between 0 and {max}, got {value}",
                    field.as_str()
                )
            }
            Self::ScoreNotFinite { field } => {
                write!(f, "{} must be a finite number", field.as_str())
            }
            Self::InconsistentApprovalState(msg) => {
                write!(f, "Inconsistent approval state: {msg}")
            }
            Self::InvalidApprovalStatus(status) => {
                write!(f, "Invalid approval status: {status}")
            }
            Self::InvalidRole(role) => write!(f, "Invalid role: {role}"),
            Self::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
