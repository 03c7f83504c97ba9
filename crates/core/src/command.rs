// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use marksheet_domain::{AcademicYear, ScoreUpdate};

/// A teacher's request to create or replace the scores of one result.
///
/// The key is `(student_id, subject_id, academic_year)`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertResult {
    pub student_id: i64,
    pub subject_id: i64,
    pub academic_year: AcademicYear,
    /// Components that were not supplied are left unchanged on update.
    pub scores: ScoreUpdate,
}

impl UpsertResult {
    /// Renders the key for logs and error messages.
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "student={} subject={} year={}",
            self.student_id, self.subject_id, self.academic_year
        )
    }
}

/// An admin review decision on a stored result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommand {
    /// Make the result visible to its student.
    Approve {
        /// Optional review notes.
        notes: Option<String>,
    },
    /// Send the result back.
    Reject {
        /// Review notes. A default note is recorded when absent.
        notes: Option<String>,
    },
}

impl ReviewCommand {
    /// The name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::Reject { .. } => "reject",
        }
    }
}
