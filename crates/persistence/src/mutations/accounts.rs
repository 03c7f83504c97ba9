// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use marksheet_domain::{AccountRole, now_timestamp};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{accounts, sessions};
use crate::error::PersistenceError;

/// A new login account.
#[derive(Debug, Clone, Copy)]
pub struct NewAccount<'a> {
    pub login_name: &'a str,
    pub display_name: &'a str,
    pub password: &'a str,
    pub role: AccountRole,
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
}

/// Creates a new account.
///
/// The `login_name` is normalized to lowercase for case-insensitive
/// uniqueness and the password is hashed with bcrypt.
///
/// # Errors
///
/// Returns an error if the login name already exists, a linked teacher or
/// student does not exist, or the insert fails.
pub fn create_account(
    conn: &mut SqliteConnection,
    account: NewAccount<'_>,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = account.login_name.to_lowercase();

    info!(
        login_name = %normalized_login,
        role = account.role.as_str(),
        "Creating account"
    );

    let password_hash: String = bcrypt::hash(account.password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(accounts::table)
        .values((
            accounts::login_name.eq(&normalized_login),
            accounts::display_name.eq(account.display_name),
            accounts::password_hash.eq(&password_hash),
            accounts::role.eq(account.role.as_str()),
            accounts::teacher_id.eq(account.teacher_id),
            accounts::student_id.eq(account.student_id),
        ))
        .execute(conn)?;

    let account_id: i64 = get_last_insert_rowid(conn)?;
    info!(account_id, "Account created");
    Ok(account_id)
}

/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_last_login(conn: &mut SqliteConnection, account_id: i64) -> Result<(), PersistenceError> {
    let now: String = now_timestamp()?;
    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::last_login_at.eq(Some(now)))
        .execute(conn)?;
    Ok(())
}

/// Creates a session and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    account_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    let now: String = now_timestamp()?;

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::account_id.eq(account_id),
            sessions::created_at.eq(&now),
            sessions::last_activity_at.eq(&now),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;
    debug!(session_id, account_id, "Session created");
    Ok(session_id)
}

/// Touches a session's last activity timestamp.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    let now: String = now_timestamp()?;
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(&now))
        .execute(conn)?;
    Ok(())
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(conn: &mut SqliteConnection, session_token: &str) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;
    Ok(())
}

/// Deletes every session whose expiry has passed and returns how many
/// were removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(conn: &mut SqliteConnection) -> Result<usize, PersistenceError> {
    let now: String = now_timestamp()?;
    let removed: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(&now))
        .execute(conn)?;
    if removed > 0 {
        info!(removed, "Deleted expired sessions");
    }
    Ok(removed)
}
