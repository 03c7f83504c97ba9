// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use marksheet_domain::AccountRole;
use tracing::debug;

use crate::data_models::{AccountData, SessionData};
use crate::diesel_schema::{accounts, sessions};
use crate::error::PersistenceError;

/// Diesel Queryable struct for account rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = accounts)]
struct AccountRow {
    account_id: i64,
    login_name: String,
    display_name: String,
    password_hash: String,
    role: String,
    teacher_id: Option<i64>,
    student_id: Option<i64>,
    is_disabled: i32,
    created_at: String,
    last_login_at: Option<String>,
}

impl TryFrom<AccountRow> for AccountData {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role: AccountRole = row.role.parse()?;
        Ok(Self {
            account_id: row.account_id,
            login_name: row.login_name,
            display_name: row.display_name,
            password_hash: row.password_hash,
            role,
            teacher_id: row.teacher_id,
            student_id: row.student_id,
            is_disabled: row.is_disabled != 0,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        })
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    account_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

/// Retrieves an account by login name.
///
/// The `login_name` is normalized to lowercase for case-insensitive lookup.
///
/// # Errors
///
/// Returns an error if the query fails or the stored role is unknown.
/// Returns `Ok(None)` if the account is not found.
pub fn get_account_by_login(
    conn: &mut SqliteConnection,
    login_name: &str,
) -> Result<Option<AccountData>, PersistenceError> {
    let normalized_login: String = login_name.to_lowercase();

    debug!("Looking up account by login_name: {}", normalized_login);

    accounts::table
        .filter(accounts::login_name.eq(&normalized_login))
        .select(AccountRow::as_select())
        .first(conn)
        .optional()?
        .map(AccountData::try_from)
        .transpose()
}

/// Retrieves an account by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored role is unknown.
/// Returns `Ok(None)` if the account is not found.
pub fn get_account_by_id(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<Option<AccountData>, PersistenceError> {
    debug!(account_id, "Looking up account by id");

    accounts::table
        .filter(accounts::account_id.eq(account_id))
        .select(AccountRow::as_select())
        .first(conn)
        .optional()?
        .map(AccountData::try_from)
        .transpose()
}

/// Counts enabled admin accounts.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_admin_accounts(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(accounts::table
        .filter(accounts::role.eq(AccountRole::Admin.as_str()))
        .filter(accounts::is_disabled.eq(0))
        .count()
        .get_result(conn)?)
}

/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    Ok(sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?
        .map(|row| SessionData {
            session_id: row.session_id,
            session_token: row.session_token,
            account_id: row.account_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }))
}
