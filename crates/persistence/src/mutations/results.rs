// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Result mutations.
//!
//! Both entry points read the current row, let the core decide what the
//! row must become, and write it back inside a single `IMMEDIATE`
//! transaction. The write lock is taken before the read, so two upserts
//! for the same key serialize and the later one updates the row the
//! earlier one inserted. If the insert still trips the unique constraint
//! the transaction is rolled back and the caller sees a conflict.

use diesel::SqliteConnection;
use diesel::prelude::*;
use marksheet::{ReviewCommand, UpsertPlan, UpsertResult, apply_review, apply_upsert};
use marksheet_domain::{ApprovalColumns, ResultRecord, now_timestamp};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::UpsertOutcome;
use crate::diesel_schema::results;
use crate::error::PersistenceError;
use crate::queries::results::{find_result_by_key, get_result};

/// Creates or replaces the result stored under the command's key.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `command` - The upsert command
/// * `teacher_id` - The teacher performing the write
///
/// # Errors
///
/// Returns an error if:
/// - The command fails validation
/// - The student, subject or teacher does not exist
/// - The write conflicts with a concurrent insert
/// - The database operation fails
pub fn upsert_result(
    conn: &mut SqliteConnection,
    command: UpsertResult,
    teacher_id: i64,
) -> Result<UpsertOutcome, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let existing: Option<ResultRecord> = find_result_by_key(
            conn,
            command.student_id,
            command.subject_id,
            command.academic_year.value(),
        )?;
        let now: String = now_timestamp()?;

        match apply_upsert(existing.as_ref(), command, teacher_id, &now)? {
            UpsertPlan::Insert(new) => {
                let approval: ApprovalColumns = ApprovalColumns::from(&new.approval);

                diesel::insert_into(results::table)
                    .values((
                        results::student_id.eq(new.student_id),
                        results::subject_id.eq(new.subject_id),
                        results::teacher_id.eq(new.teacher_id),
                        results::academic_year.eq(&new.academic_year),
                        results::first_monthly_score.eq(new.scores.first_monthly_score),
                        results::second_monthly_score.eq(new.scores.second_monthly_score),
                        results::midterm_exam_score.eq(new.scores.midterm_exam_score),
                        results::third_monthly_score.eq(new.scores.third_monthly_score),
                        results::fourth_monthly_score.eq(new.scores.fourth_monthly_score),
                        results::final_exam_score.eq(new.scores.final_exam_score),
                        results::term_1_total.eq(new.totals.term_1_total),
                        results::term_2_total.eq(new.totals.term_2_total),
                        results::approval_status.eq(&approval.approval_status),
                        results::is_approved.eq(i32::from(approval.is_approved)),
                        results::approved_by.eq(approval.approved_by),
                        results::approved_at.eq(approval.approved_at.as_deref()),
                        results::approval_notes.eq(approval.approval_notes.as_deref()),
                        results::created_at.eq(&new.created_at),
                        results::updated_at.eq(&new.created_at),
                    ))
                    .execute(conn)?;

                let result_id: i64 = get_last_insert_rowid(conn)?;
                info!(
                    result_id,
                    student_id = new.student_id,
                    subject_id = new.subject_id,
                    teacher_id,
                    "Result created"
                );

                let record: ResultRecord = get_result(conn, result_id)?.ok_or_else(|| {
                    PersistenceError::NotFound(format!("Result {result_id} vanished after insert"))
                })?;
                Ok(UpsertOutcome {
                    record,
                    created: true,
                })
            }
            UpsertPlan::Update(record) => {
                write_scores(conn, &record)?;
                info!(
                    result_id = record.result_id,
                    teacher_id, "Result updated and returned to pending"
                );
                Ok(UpsertOutcome {
                    record,
                    created: false,
                })
            }
        }
    })
}

/// Applies an admin review decision to a stored result.
///
/// # Errors
///
/// Returns an error if the result does not exist or the write fails.
pub fn review_result(
    conn: &mut SqliteConnection,
    result_id: i64,
    command: ReviewCommand,
    admin_id: i64,
) -> Result<ResultRecord, PersistenceError> {
    let decision: &'static str = command.name();

    conn.immediate_transaction(|conn| {
        let current: ResultRecord = get_result(conn, result_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Result {result_id}")))?;
        let now: String = now_timestamp()?;

        let next: ResultRecord = apply_review(&current, command, admin_id, &now)?;
        write_approval(conn, &next)?;

        info!(result_id, admin_id, decision, "Result reviewed");
        Ok(next)
    })
}

/// Overwrites the scores, totals, writer and approval of an existing row.
fn write_scores(conn: &mut SqliteConnection, record: &ResultRecord) -> Result<(), PersistenceError> {
    let approval: ApprovalColumns = ApprovalColumns::from(&record.approval);

    let rows_affected: usize = diesel::update(results::table)
        .filter(results::result_id.eq(record.result_id))
        .set((
            results::teacher_id.eq(record.teacher_id),
            results::first_monthly_score.eq(record.scores.first_monthly_score),
            results::second_monthly_score.eq(record.scores.second_monthly_score),
            results::midterm_exam_score.eq(record.scores.midterm_exam_score),
            results::third_monthly_score.eq(record.scores.third_monthly_score),
            results::fourth_monthly_score.eq(record.scores.fourth_monthly_score),
            results::final_exam_score.eq(record.scores.final_exam_score),
            results::term_1_total.eq(record.term_1_total),
            results::term_2_total.eq(record.term_2_total),
            results::approval_status.eq(&approval.approval_status),
            results::is_approved.eq(i32::from(approval.is_approved)),
            results::approved_by.eq(approval.approved_by),
            results::approved_at.eq(approval.approved_at.as_deref()),
            results::approval_notes.eq(approval.approval_notes.as_deref()),
            results::updated_at.eq(&record.updated_at),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Result {}",
            record.result_id
        )));
    }
    Ok(())
}

/// Overwrites only the approval columns of an existing row.
fn write_approval(
    conn: &mut SqliteConnection,
    record: &ResultRecord,
) -> Result<(), PersistenceError> {
    let approval: ApprovalColumns = ApprovalColumns::from(&record.approval);
    debug!(
        result_id = record.result_id,
        status = %approval.approval_status,
        "Writing approval columns"
    );

    diesel::update(results::table)
        .filter(results::result_id.eq(record.result_id))
        .set((
            results::approval_status.eq(&approval.approval_status),
            results::is_approved.eq(i32::from(approval.is_approved)),
            results::approved_by.eq(approval.approved_by),
            results::approved_at.eq(approval.approved_at.as_deref()),
            results::approval_notes.eq(approval.approval_notes.as_deref()),
            results::updated_at.eq(&record.updated_at),
        ))
        .execute(conn)?;
    Ok(())
}
