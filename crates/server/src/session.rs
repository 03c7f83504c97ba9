// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and authentication at the server boundary.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use marksheet_api::{ApiError, AuthError, AuthenticatedActor, AuthenticationService};
use marksheet_persistence::AccountData;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Extractor for authenticated accounts.
///
/// Validates the `Authorization: Bearer <token>` header and yields the
/// resolved actor, the stored account, and the raw token.
///
/// # Errors
///
/// Rejects with HTTP 401 if the header is missing or malformed, the token
/// is unknown or expired, or the account is disabled. A failing session
/// store rejects with HTTP 500.
pub struct SessionActor {
    pub actor: AuthenticatedActor,
    pub account: AccountData,
    pub token: String,
}

/// Reads the bearer token from request headers.
///
/// # Errors
///
/// Returns an error if the header is missing, not ASCII, or not a bearer
/// credential.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, SessionError> {
    let auth_header: &str = headers
        .get("Authorization")
        .ok_or_else(|| {
            debug!("Missing Authorization header");
            SessionError::MissingAuthorizationHeader
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid Authorization header encoding");
            SessionError::InvalidAuthorizationHeader
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("Authorization header is not a bearer credential");
            SessionError::InvalidAuthorizationHeader
        })
}

impl FromRequestParts<AppState> for SessionActor {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: String = bearer_token(&parts.headers)?.to_string();

        let mut persistence = state.persistence.lock().await;
        let (actor, account) = AuthenticationService::validate_session(&mut persistence, &token)
            .map_err(|e| match e {
                AuthError::StorageFailure { .. } => SessionError::Storage(ApiError::from(e)),
                AuthError::AuthenticationFailed { .. } | AuthError::Unauthorized { .. } => {
                    warn!(error = %e, "Session validation failed");
                    SessionError::InvalidSession(e.to_string())
                }
            })?;
        drop(persistence);

        debug!(
            account_id = actor.account_id,
            role = actor.role.name(),
            "Session validated"
        );

        Ok(Self {
            actor,
            account,
            token,
        })
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
    /// The session store failed.
    Storage(ApiError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingAuthorizationHeader => String::from("Missing Authorization header"),
            Self::InvalidAuthorizationHeader => String::from(
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(reason) => reason,
            Self::Storage(err) => return HttpError::from(err).into_response(),
        };

        HttpError {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
        .into_response()
    }
}
