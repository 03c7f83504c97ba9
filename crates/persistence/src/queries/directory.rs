// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directory queries: the lookups the authorizer depends on.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::StudentData;
use crate::diesel_schema::{classes, students, subjects, teacher_assignments};
use crate::error::PersistenceError;

/// Diesel Queryable struct for student rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = students)]
pub struct StudentRow {
    pub(crate) student_id: i64,
    full_name: String,
    roll_number: Option<String>,
    class_id: i64,
}

impl From<StudentRow> for StudentData {
    fn from(row: StudentRow) -> Self {
        Self {
            student_id: row.student_id,
            full_name: row.full_name,
            roll_number: row.roll_number,
            class_id: row.class_id,
        }
    }
}

/// Retrieves a student by id.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if the student is not found.
pub fn get_student(
    conn: &mut SqliteConnection,
    student_id: i64,
) -> Result<Option<StudentData>, PersistenceError> {
    debug!(student_id, "Looking up student");

    Ok(students::table
        .filter(students::student_id.eq(student_id))
        .select(StudentRow::as_select())
        .first(conn)
        .optional()?
        .map(StudentData::from))
}

/// Returns true if the subject exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn subject_exists(conn: &mut SqliteConnection, subject_id: i64) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        subjects::table.filter(subjects::subject_id.eq(subject_id)),
    ))
    .get_result(conn)?)
}

/// Returns true if the class exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn class_exists(conn: &mut SqliteConnection, class_id: i64) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        classes::table.filter(classes::class_id.eq(class_id)),
    ))
    .get_result(conn)?)
}

/// Returns true if the teacher is assigned to teach the subject to the class.
///
/// The assignment's academic year is not part of the match.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn assignment_exists(
    conn: &mut SqliteConnection,
    teacher_id: i64,
    subject_id: i64,
    class_id: i64,
) -> Result<bool, PersistenceError> {
    let exists: bool = diesel::select(diesel::dsl::exists(
        teacher_assignments::table
            .filter(teacher_assignments::teacher_id.eq(teacher_id))
            .filter(teacher_assignments::subject_id.eq(subject_id))
            .filter(teacher_assignments::class_id.eq(class_id)),
    ))
    .get_result(conn)?;

    debug!(teacher_id, subject_id, class_id, exists, "Checked teaching assignment");
    Ok(exists)
}
