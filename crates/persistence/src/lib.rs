// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Marksheet results engine.
//!
//! Storage is `SQLite` through Diesel, with the schema embedded as
//! migrations. A [`Persistence`] value owns one connection; callers hold it
//! and pass `&mut Persistence` to whatever needs the store. There is no
//! process-wide connection.
//!
//! ## Layout
//!
//! - `backend`: connection setup, PRAGMAs, migrations
//! - `queries`: read-only queries
//! - `mutations`: writes; the result upsert and review transitions run
//!   inside `IMMEDIATE` transactions
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives every caller its own shared-cache
//! in-memory database, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use marksheet::{ReviewCommand, UpsertResult};
use marksheet_domain::{ResultRecord, SubjectResult};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    AccountData, PendingResult, RosterEntry, SessionData, StudentData, UpsertOutcome,
};
pub use error::PersistenceError;
pub use mutations::accounts::NewAccount;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Storage handle for results, directory tables, accounts and sessions.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:marksheet_mem_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Creates or replaces the result stored under the command's key.
    ///
    /// Any existing approval is cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, a reference is unknown, the
    /// write conflicts, or the database operation fails.
    pub fn upsert_result(
        &mut self,
        command: UpsertResult,
        teacher_id: i64,
    ) -> Result<UpsertOutcome, PersistenceError> {
        mutations::results::upsert_result(&mut self.conn, command, teacher_id)
    }

    /// Applies an admin review decision to a result.
    ///
    /// # Errors
    ///
    /// Returns an error if the result does not exist or the write fails.
    pub fn review_result(
        &mut self,
        result_id: i64,
        command: ReviewCommand,
        admin_id: i64,
    ) -> Result<ResultRecord, PersistenceError> {
        mutations::results::review_result(&mut self.conn, result_id, command, admin_id)
    }

    /// Retrieves a result by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_result(&mut self, result_id: i64) -> Result<Option<ResultRecord>, PersistenceError> {
        queries::results::get_result(&mut self.conn, result_id)
    }

    /// Retrieves the result stored under a `(student, subject, year)` key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_result_by_key(
        &mut self,
        student_id: i64,
        subject_id: i64,
        academic_year: &str,
    ) -> Result<Option<ResultRecord>, PersistenceError> {
        queries::results::find_result_by_key(&mut self.conn, student_id, subject_id, academic_year)
    }

    /// Lists every result, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_results(&mut self) -> Result<Vec<ResultRecord>, PersistenceError> {
        queries::results::list_results(&mut self.conn)
    }

    /// Lists unapproved results with display fields, newest-created first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pending_results(&mut self) -> Result<Vec<PendingResult>, PersistenceError> {
        queries::results::list_pending_results(&mut self.conn)
    }

    /// Lists a student's results for a year in every approval state.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_student_results(
        &mut self,
        student_id: i64,
        academic_year: &str,
    ) -> Result<Vec<ResultRecord>, PersistenceError> {
        queries::results::list_student_results(&mut self.conn, student_id, academic_year)
    }

    /// Lists a student's approved results for a year, ordered by subject name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_approved_subject_results(
        &mut self,
        student_id: i64,
        academic_year: &str,
    ) -> Result<Vec<SubjectResult>, PersistenceError> {
        queries::results::list_approved_subject_results(&mut self.conn, student_id, academic_year)
    }

    /// Returns the most recent year with an approved result for the student.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn latest_approved_year(
        &mut self,
        student_id: i64,
    ) -> Result<Option<String>, PersistenceError> {
        queries::results::latest_approved_year(&mut self.conn, student_id)
    }

    /// Lists years with at least one approved result, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_approved_years(&mut self, student_id: i64) -> Result<Vec<String>, PersistenceError> {
        queries::results::list_approved_years(&mut self.conn, student_id)
    }

    /// Lists a class roster with each student's result for a subject and year.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_class_roster(
        &mut self,
        class_id: i64,
        subject_id: i64,
        academic_year: &str,
    ) -> Result<Vec<RosterEntry>, PersistenceError> {
        queries::results::list_class_roster(&mut self.conn, class_id, subject_id, academic_year)
    }

    // ========================================================================
    // Directory
    // ========================================================================

    /// Creates a class.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_class(&mut self, class_name: &str) -> Result<i64, PersistenceError> {
        mutations::directory::create_class(&mut self.conn, class_name)
    }

    /// Creates a subject.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_subject(
        &mut self,
        subject_name: &str,
        subject_code: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::directory::create_subject(&mut self.conn, subject_name, subject_code)
    }

    /// Creates a teacher.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_teacher(
        &mut self,
        full_name: &str,
        email: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::directory::create_teacher(&mut self.conn, full_name, email)
    }

    /// Creates a student in a class.
    ///
    /// # Errors
    ///
    /// Returns an error if the class does not exist or the insert fails.
    pub fn create_student(
        &mut self,
        full_name: &str,
        roll_number: Option<&str>,
        class_id: i64,
    ) -> Result<i64, PersistenceError> {
        mutations::directory::create_student(&mut self.conn, full_name, roll_number, class_id)
    }

    /// Assigns a teacher to a subject and class for an academic year.
    ///
    /// # Errors
    ///
    /// Returns an error if a reference is unknown or the assignment exists.
    pub fn create_assignment(
        &mut self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
        academic_year: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::directory::create_assignment(
            &mut self.conn,
            teacher_id,
            subject_id,
            class_id,
            academic_year,
        )
    }

    /// Retrieves a student by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_student(&mut self, student_id: i64) -> Result<Option<StudentData>, PersistenceError> {
        queries::directory::get_student(&mut self.conn, student_id)
    }

    /// Returns true if the subject exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn subject_exists(&mut self, subject_id: i64) -> Result<bool, PersistenceError> {
        queries::directory::subject_exists(&mut self.conn, subject_id)
    }

    /// Returns true if the class exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn class_exists(&mut self, class_id: i64) -> Result<bool, PersistenceError> {
        queries::directory::class_exists(&mut self.conn, class_id)
    }

    /// Returns true if the teacher teaches the subject to the class.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn assignment_exists(
        &mut self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<bool, PersistenceError> {
        queries::directory::assignment_exists(&mut self.conn, teacher_id, subject_id, class_id)
    }

    // ========================================================================
    // Accounts & Sessions
    // ========================================================================

    /// Creates a login account.
    ///
    /// # Errors
    ///
    /// Returns an error if the login exists or the insert fails.
    pub fn create_account(&mut self, account: NewAccount<'_>) -> Result<i64, PersistenceError> {
        mutations::accounts::create_account(&mut self.conn, account)
    }

    /// Retrieves an account by login name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_login(&mut self.conn, login_name)
    }

    /// Retrieves an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_by_id(
        &mut self,
        account_id: i64,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_id(&mut self.conn, account_id)
    }

    /// Counts enabled admin accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_admin_accounts(&mut self) -> Result<i64, PersistenceError> {
        queries::accounts::count_active_admin_accounts(&mut self.conn)
    }

    /// Verifies a password against an account's stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored hash is malformed.
    pub fn verify_password(
        account: &AccountData,
        password: &str,
    ) -> Result<bool, PersistenceError> {
        bcrypt::verify(password, &account.password_hash)
            .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, account_id: i64) -> Result<(), PersistenceError> {
        mutations::accounts::update_last_login(&mut self.conn, account_id)
    }

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        account_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::accounts::create_session(&mut self.conn, session_token, account_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::accounts::get_session_by_token(&mut self.conn, session_token)
    }

    /// Touches a session's last activity timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::accounts::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::accounts::delete_session(&mut self.conn, session_token)
    }

    /// Deletes expired sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::accounts::delete_expired_sessions(&mut self.conn)
    }
}
