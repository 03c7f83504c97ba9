// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Result queries.
//!
//! Every row read here passes through [`ResultRow::into_record`], which
//! rebuilds the tagged approval state and refuses rows whose flat approval
//! columns contradict each other.

use std::collections::HashMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use marksheet_domain::{
    ApprovalColumns, ApprovalState, ResultRecord, ScoreComponents, SubjectResult,
};
use tracing::debug;

use crate::data_models::{PendingResult, RosterEntry, StudentData};
use crate::diesel_schema::{classes, results, students, subjects, teachers};
use crate::error::PersistenceError;
use crate::queries::directory::StudentRow;

/// Diesel Queryable struct for result rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = results)]
pub struct ResultRow {
    result_id: i64,
    student_id: i64,
    subject_id: i64,
    teacher_id: i64,
    academic_year: String,
    first_monthly_score: Option<f64>,
    second_monthly_score: Option<f64>,
    midterm_exam_score: Option<f64>,
    third_monthly_score: Option<f64>,
    fourth_monthly_score: Option<f64>,
    final_exam_score: Option<f64>,
    term_1_total: f64,
    term_2_total: f64,
    approval_status: String,
    is_approved: i32,
    approved_by: Option<i64>,
    approved_at: Option<String>,
    approval_notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ResultRow {
    /// Converts the stored row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns an error if the approval columns describe an impossible state.
    pub fn into_record(self) -> Result<ResultRecord, PersistenceError> {
        let approval: ApprovalState = ApprovalState::try_from(ApprovalColumns {
            approval_status: self.approval_status,
            is_approved: self.is_approved != 0,
            approved_by: self.approved_by,
            approved_at: self.approved_at,
            approval_notes: self.approval_notes,
        })
        .map_err(|e| {
            PersistenceError::ReconstructionError(format!("result {}: {e}", self.result_id))
        })?;

        Ok(ResultRecord {
            result_id: self.result_id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            academic_year: self.academic_year,
            scores: ScoreComponents {
                first_monthly_score: self.first_monthly_score,
                second_monthly_score: self.second_monthly_score,
                midterm_exam_score: self.midterm_exam_score,
                third_monthly_score: self.third_monthly_score,
                fourth_monthly_score: self.fourth_monthly_score,
                final_exam_score: self.final_exam_score,
            },
            term_1_total: self.term_1_total,
            term_2_total: self.term_2_total,
            approval,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn into_records(rows: Vec<ResultRow>) -> Result<Vec<ResultRecord>, PersistenceError> {
    rows.into_iter().map(ResultRow::into_record).collect()
}

/// Retrieves a result by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be reconstructed.
/// Returns `Ok(None)` if no such result exists.
pub fn get_result(
    conn: &mut SqliteConnection,
    result_id: i64,
) -> Result<Option<ResultRecord>, PersistenceError> {
    debug!(result_id, "Looking up result");

    results::table
        .filter(results::result_id.eq(result_id))
        .select(ResultRow::as_select())
        .first(conn)
        .optional()?
        .map(ResultRow::into_record)
        .transpose()
}

/// Retrieves the result stored under a `(student, subject, academic year)` key.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be reconstructed.
pub fn find_result_by_key(
    conn: &mut SqliteConnection,
    student_id: i64,
    subject_id: i64,
    academic_year: &str,
) -> Result<Option<ResultRecord>, PersistenceError> {
    results::table
        .filter(results::student_id.eq(student_id))
        .filter(results::subject_id.eq(subject_id))
        .filter(results::academic_year.eq(academic_year))
        .select(ResultRow::as_select())
        .first(conn)
        .optional()?
        .map(ResultRow::into_record)
        .transpose()
}

/// Lists every result, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_results(conn: &mut SqliteConnection) -> Result<Vec<ResultRecord>, PersistenceError> {
    let rows: Vec<ResultRow> = results::table
        .order((results::created_at.desc(), results::result_id.desc()))
        .select(ResultRow::as_select())
        .load(conn)?;
    into_records(rows)
}

/// Lists every result that is not approved, newest-created first, with
/// student, class, subject and teacher display names.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_pending_results(
    conn: &mut SqliteConnection,
) -> Result<Vec<PendingResult>, PersistenceError> {
    let rows: Vec<(ResultRow, String, String, String, String)> = results::table
        .inner_join(students::table.inner_join(classes::table))
        .inner_join(subjects::table)
        .inner_join(teachers::table)
        .filter(results::is_approved.eq(0))
        .order((results::created_at.desc(), results::result_id.desc()))
        .select((
            ResultRow::as_select(),
            students::full_name,
            classes::class_name,
            subjects::subject_name,
            teachers::full_name,
        ))
        .load(conn)?;

    debug!(count = rows.len(), "Loaded pending results");

    rows.into_iter()
        .map(
            |(row, student_name, class_name, subject_name, teacher_name)| {
                Ok(PendingResult {
                    record: row.into_record()?,
                    student_name,
                    class_name,
                    subject_name,
                    teacher_name,
                })
            },
        )
        .collect()
}

/// Lists a student's results for one academic year, in every approval state.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_student_results(
    conn: &mut SqliteConnection,
    student_id: i64,
    academic_year: &str,
) -> Result<Vec<ResultRecord>, PersistenceError> {
    let rows: Vec<ResultRow> = results::table
        .filter(results::student_id.eq(student_id))
        .filter(results::academic_year.eq(academic_year))
        .order(results::result_id.asc())
        .select(ResultRow::as_select())
        .load(conn)?;
    into_records(rows)
}

/// Lists a student's approved results for one academic year, ordered by
/// subject name, joined with the subject display fields.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_approved_subject_results(
    conn: &mut SqliteConnection,
    student_id: i64,
    academic_year: &str,
) -> Result<Vec<SubjectResult>, PersistenceError> {
    let rows: Vec<(ResultRow, String, Option<String>)> = results::table
        .inner_join(subjects::table)
        .filter(results::student_id.eq(student_id))
        .filter(results::academic_year.eq(academic_year))
        .filter(results::is_approved.eq(1))
        .order((subjects::subject_name.asc(), results::result_id.asc()))
        .select((
            ResultRow::as_select(),
            subjects::subject_name,
            subjects::subject_code,
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(row, subject_name, subject_code)| {
            Ok(SubjectResult {
                record: row.into_record()?,
                subject_name,
                subject_code,
            })
        })
        .collect()
}

/// Returns the most recent academic year in which the student has at least
/// one approved result.
///
/// Years are `YYYY-YYYY`, so the lexical maximum is the most recent.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn latest_approved_year(
    conn: &mut SqliteConnection,
    student_id: i64,
) -> Result<Option<String>, PersistenceError> {
    Ok(results::table
        .filter(results::student_id.eq(student_id))
        .filter(results::is_approved.eq(1))
        .select(diesel::dsl::max(results::academic_year))
        .first::<Option<String>>(conn)?)
}

/// Lists the distinct academic years with at least one approved result for
/// the student, most recent first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_approved_years(
    conn: &mut SqliteConnection,
    student_id: i64,
) -> Result<Vec<String>, PersistenceError> {
    Ok(results::table
        .filter(results::student_id.eq(student_id))
        .filter(results::is_approved.eq(1))
        .select(results::academic_year)
        .distinct()
        .order(results::academic_year.desc())
        .load::<String>(conn)?)
}

/// Lists every student of a class with their result for one subject and
/// academic year, if any. Students are ordered by name.
///
/// # Errors
///
/// Returns an error if a query fails or a row cannot be reconstructed.
pub fn list_class_roster(
    conn: &mut SqliteConnection,
    class_id: i64,
    subject_id: i64,
    academic_year: &str,
) -> Result<Vec<RosterEntry>, PersistenceError> {
    let roster: Vec<StudentRow> = students::table
        .filter(students::class_id.eq(class_id))
        .order((students::full_name.asc(), students::student_id.asc()))
        .select(StudentRow::as_select())
        .load(conn)?;

    let student_ids: Vec<i64> = roster.iter().map(|s| s.student_id).collect();

    let rows: Vec<ResultRow> = results::table
        .filter(results::student_id.eq_any(&student_ids))
        .filter(results::subject_id.eq(subject_id))
        .filter(results::academic_year.eq(academic_year))
        .select(ResultRow::as_select())
        .load(conn)?;

    let mut by_student: HashMap<i64, ResultRecord> = HashMap::new();
    for row in rows {
        let record: ResultRecord = row.into_record()?;
        by_student.insert(record.student_id, record);
    }

    Ok(roster
        .into_iter()
        .map(|row| {
            let student: StudentData = row.into();
            let result: Option<ResultRecord> = by_student.remove(&student.student_id);
            RosterEntry { student, result }
        })
        .collect())
}
