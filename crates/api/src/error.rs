// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use marksheet::CoreError;
use marksheet_domain::DomainError;
use marksheet_persistence::PersistenceError;
use thiserror::Error;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The account or session store could not be read or written.
    StorageFailure {
        /// The underlying storage error.
        message: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::StorageFailure { message } => write!(f, "Storage failure: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// The server maps each variant to exactly one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Missing, unknown or expired credentials.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor lacks the role or assignment scope for the action.
    #[error("Unauthorized: '{action}' requires {required_role}")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role or scope required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A write collided with a concurrent write to the same key.
    #[error("Conflict: {message}")]
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role: format!("{required_role} role"),
            },
            AuthError::StorageFailure { message } => Self::Internal { message },
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidIdentifier { field, .. } => ApiError::InvalidInput {
            field: field.to_string(),
            message: err.to_string(),
        },
        DomainError::InvalidAcademicYear(_) => ApiError::InvalidInput {
            field: String::from("academic_year"),
            message: err.to_string(),
        },
        DomainError::ScoreOutOfRange { field, .. } | DomainError::ScoreNotFinite { field } => {
            ApiError::InvalidInput {
                field: field.as_str().to_string(),
                message: err.to_string(),
            }
        }
        DomainError::InconsistentApprovalState(_)
        | DomainError::InvalidApprovalStatus(_)
        | DomainError::InvalidRole(_)
        | DomainError::InvalidTimestamp(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::KeyMismatch { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// `resource_type` names what a bare "not found" refers to.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError, resource_type: &str) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message,
        },
        PersistenceError::ReferenceInvalid(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Referenced record"),
            message,
        },
        PersistenceError::Conflict(message) => ApiError::Conflict { message },
        PersistenceError::CommandRejected(core_err) => translate_core_error(core_err),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
