// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directory mutations.
//!
//! Classes, subjects, teachers, students and assignments are managed
//! outside the results engine. These inserts exist so a deployment can be
//! seeded and so the engine can be exercised end to end.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{classes, students, subjects, teacher_assignments, teachers};
use crate::error::PersistenceError;

/// Creates a class and returns its id.
///
/// # Errors
///
/// Returns an error if the name is taken or the insert fails.
pub fn create_class(conn: &mut SqliteConnection, class_name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(classes::table)
        .values(classes::class_name.eq(class_name))
        .execute(conn)?;
    let class_id: i64 = get_last_insert_rowid(conn)?;
    info!(class_id, class_name, "Class created");
    Ok(class_id)
}

/// Creates a subject and returns its id.
///
/// # Errors
///
/// Returns an error if the code is taken or the insert fails.
pub fn create_subject(
    conn: &mut SqliteConnection,
    subject_name: &str,
    subject_code: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(subjects::table)
        .values((
            subjects::subject_name.eq(subject_name),
            subjects::subject_code.eq(subject_code),
        ))
        .execute(conn)?;
    let subject_id: i64 = get_last_insert_rowid(conn)?;
    info!(subject_id, subject_name, "Subject created");
    Ok(subject_id)
}

/// Creates a teacher and returns their id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_teacher(
    conn: &mut SqliteConnection,
    full_name: &str,
    email: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(teachers::table)
        .values((teachers::full_name.eq(full_name), teachers::email.eq(email)))
        .execute(conn)?;
    let teacher_id: i64 = get_last_insert_rowid(conn)?;
    info!(teacher_id, "Teacher created");
    Ok(teacher_id)
}

/// Creates a student in a class and returns their id.
///
/// # Errors
///
/// Returns an error if the class does not exist or the insert fails.
pub fn create_student(
    conn: &mut SqliteConnection,
    full_name: &str,
    roll_number: Option<&str>,
    class_id: i64,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(students::table)
        .values((
            students::full_name.eq(full_name),
            students::roll_number.eq(roll_number),
            students::class_id.eq(class_id),
        ))
        .execute(conn)?;
    let student_id: i64 = get_last_insert_rowid(conn)?;
    info!(student_id, class_id, "Student created");
    Ok(student_id)
}

/// Assigns a teacher to teach a subject to a class and returns the
/// assignment id.
///
/// # Errors
///
/// Returns an error if a referenced row does not exist, the assignment
/// already exists, or the insert fails.
pub fn create_assignment(
    conn: &mut SqliteConnection,
    teacher_id: i64,
    subject_id: i64,
    class_id: i64,
    academic_year: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(teacher_assignments::table)
        .values((
            teacher_assignments::teacher_id.eq(teacher_id),
            teacher_assignments::subject_id.eq(subject_id),
            teacher_assignments::class_id.eq(class_id),
            teacher_assignments::academic_year.eq(academic_year),
        ))
        .execute(conn)?;
    let assignment_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        assignment_id,
        teacher_id, subject_id, class_id, academic_year, "Teaching assignment created"
    );
    Ok(assignment_id)
}
