// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication types and the session service.

use marksheet_domain::{AccountRole, format_timestamp, now_timestamp};
use marksheet_persistence::{AccountData, Persistence, PersistenceError, SessionData};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// The resolved role of an authenticated account.
///
/// Teacher and student roles carry the directory row they act as, so
/// handlers never need to look it up again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Reviews results and reads everything.
    Admin,
    /// Writes results within their assignments.
    Teacher {
        /// The teacher directory id.
        teacher_id: i64,
    },
    /// Reads their own approved results.
    Student {
        /// The student directory id.
        student_id: i64,
    },
}

impl Role {
    /// Resolves the role of a stored account.
    ///
    /// # Errors
    ///
    /// Returns an error if a teacher or student account is not linked to
    /// its directory row.
    pub fn from_account(account: &AccountData) -> Result<Self, AuthError> {
        match account.role {
            AccountRole::Admin => Ok(Self::Admin),
            AccountRole::Teacher => account
                .teacher_id
                .map(|teacher_id| Self::Teacher { teacher_id })
                .ok_or_else(|| AuthError::AuthenticationFailed {
                    reason: String::from("Teacher account is not linked to a teacher"),
                }),
            AccountRole::Student => account
                .student_id
                .map(|student_id| Self::Student { student_id })
                .ok_or_else(|| AuthError::AuthenticationFailed {
                    reason: String::from("Student account is not linked to a student"),
                }),
        }
    }

    /// The role name as stored and reported.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Admin => AccountRole::Admin.as_str(),
            Self::Teacher { .. } => AccountRole::Teacher.as_str(),
            Self::Student { .. } => AccountRole::Student.as_str(),
        }
    }
}

/// An authenticated account with its resolved role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The account id.
    pub account_id: i64,
    /// The normalized login name.
    pub login_name: String,
    /// The resolved role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(account_id: i64, login_name: String, role: Role) -> Self {
        Self {
            account_id,
            login_name,
            role,
        }
    }

    /// Builds the actor for a stored account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account's role cannot be resolved.
    pub fn from_account(account: &AccountData) -> Result<Self, AuthError> {
        Ok(Self::new(
            account.account_id,
            account.login_name.clone(),
            Role::from_account(account)?,
        ))
    }
}

/// Session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Sessions expire this long after login.
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates an account and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `login_name` - The login name (case-insensitive)
    /// * `password` - The plain text password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `account`, `expires_at`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong, the account is
    /// disabled, or the session cannot be created.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, AccountData, String), AuthError> {
        let account: AccountData = persistence
            .get_account_by_login(login_name)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                debug!(login_name = %login_name, "Login for unknown account");
                Self::invalid_credentials()
            })?;

        let password_matches: bool = Persistence::verify_password(&account, password)
            .map_err(Self::map_persistence_error)?;
        if !password_matches {
            warn!(login_name = %account.login_name, "Login with wrong password");
            return Err(Self::invalid_credentials());
        }

        if account.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_account(&account)?;

        let session_token: String = Self::generate_session_token();
        let expires_at: String =
            format_timestamp(OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION)
                .map_err(|e| AuthError::AuthenticationFailed {
                    reason: format!("Failed to format expiration time: {e}"),
                })?;

        persistence
            .create_session(&session_token, account.account_id, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(account.account_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        info!(
            account_id = account.account_id,
            role = actor.role.name(),
            "Account logged in"
        );

        Ok((session_token, actor, account, expires_at))
    }

    /// Validates a session token.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `account`)
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or the account
    /// is missing or disabled.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, AccountData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        // Stored timestamps are fixed-width UTC, so string order is time order.
        let now: String = now_timestamp().map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to read the clock: {e}"),
        })?;
        if session.expires_at < now {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_id(session.account_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        if account.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_account(&account)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok((actor, account))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    /// 128 random bits, hex encoded.
    fn generate_session_token() -> String {
        format!("{:032x}", rand::random::<u128>())
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid login name or password"),
        }
    }

    pub(crate) fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::StorageFailure {
            message: err.to_string(),
        }
    }
}
