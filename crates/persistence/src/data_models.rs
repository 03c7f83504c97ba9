// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use marksheet_domain::{AccountRole, ResultRecord};
use serde::{Deserialize, Serialize};

/// A login account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountData {
    pub account_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: AccountRole,
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub is_disabled: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// A login session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub account_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// A student as the results engine sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentData {
    pub student_id: i64,
    pub full_name: String,
    pub roll_number: Option<String>,
    pub class_id: i64,
}

/// A result awaiting review, with the display fields reviewers need.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingResult {
    pub record: ResultRecord,
    pub student_name: String,
    pub class_name: String,
    pub subject_name: String,
    pub teacher_name: String,
}

/// One student of a class roster and their result for a subject, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub student: StudentData,
    pub result: Option<ResultRecord>,
}

/// The outcome of an upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    /// The row as stored after the write.
    pub record: ResultRecord,
    /// True when the row did not exist before.
    pub created: bool,
}
