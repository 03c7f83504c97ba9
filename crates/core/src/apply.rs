// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{ReviewCommand, UpsertResult};
use crate::error::CoreError;
use crate::state::{NewResult, UpsertPlan};
use marksheet_domain::{
    ApprovalState, ApprovalTransition, ResultRecord, ScoreComponents, TermTotals,
    validate_identifier, validate_scores,
};

/// Applies a teacher upsert to the currently stored row, if any.
///
/// # Arguments
///
/// * `existing` - The row stored under the command's key, if one exists
/// * `command` - The upsert command
/// * `teacher_id` - The teacher performing the write
/// * `now` - Storage-format timestamp of the write
///
/// # Returns
///
/// An [`UpsertPlan`]: a new row when nothing is stored, otherwise the
/// stored row with the supplied components overlaid, totals recomputed,
/// approval reset to pending and `teacher_id` set to the writer.
///
/// # Errors
///
/// Returns an error if:
/// - An identifier is not positive
/// - A supplied score is out of range
/// - `existing` does not belong to the command's key
pub fn apply_upsert(
    existing: Option<&ResultRecord>,
    command: UpsertResult,
    teacher_id: i64,
    now: &str,
) -> Result<UpsertPlan, CoreError> {
    validate_identifier("student_id", command.student_id)?;
    validate_identifier("subject_id", command.subject_id)?;
    validate_identifier("teacher_id", teacher_id)?;
    validate_scores(&command.scores)?;

    let Some(current) = existing else {
        let scores: ScoreComponents = command.scores.into_components();
        return Ok(UpsertPlan::Insert(NewResult {
            student_id: command.student_id,
            subject_id: command.subject_id,
            teacher_id,
            academic_year: command.academic_year.value().to_string(),
            scores,
            totals: TermTotals::compute(&scores),
            approval: ApprovalState::default(),
            created_at: now.to_string(),
        }));
    };

    if current.student_id != command.student_id
        || current.subject_id != command.subject_id
        || current.academic_year != command.academic_year.value()
    {
        return Err(CoreError::KeyMismatch {
            expected: command.key(),
            found: format!(
                "student={} subject={} year={}",
                current.student_id, current.subject_id, current.academic_year
            ),
        });
    }

    let scores: ScoreComponents = command.scores.apply_to(&current.scores);
    let totals: TermTotals = TermTotals::compute(&scores);

    Ok(UpsertPlan::Update(ResultRecord {
        result_id: current.result_id,
        student_id: current.student_id,
        subject_id: current.subject_id,
        teacher_id,
        academic_year: current.academic_year.clone(),
        scores,
        term_1_total: totals.term_1_total,
        term_2_total: totals.term_2_total,
        approval: current.approval.clone().reset_for_edit(),
        created_at: current.created_at.clone(),
        updated_at: now.to_string(),
    }))
}

/// Applies an admin review decision to a stored row.
///
/// Scores and totals are never touched. Both decisions are legal from
/// any current state.
///
/// # Errors
///
/// Returns an error if `admin_id` is not positive.
pub fn apply_review(
    current: &ResultRecord,
    command: ReviewCommand,
    admin_id: i64,
    now: &str,
) -> Result<ResultRecord, CoreError> {
    validate_identifier("admin_id", admin_id)?;

    let transition: ApprovalTransition = match command {
        ReviewCommand::Approve { notes } => ApprovalTransition::Approve {
            admin_id,
            at: now.to_string(),
            notes,
        },
        ReviewCommand::Reject { notes } => ApprovalTransition::Reject { notes },
    };

    let mut next: ResultRecord = current.clone();
    next.approval = current.approval.clone().apply(transition);
    next.updated_at = now.to_string();
    Ok(next)
}
