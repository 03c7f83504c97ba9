// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{UpsertPlan, UpsertResult, apply_upsert};
use marksheet_domain::{AcademicYear, ResultRecord, ScoreUpdate};

pub const EARLIER: &str = "2025-01-05T08:00:00.000000Z";
pub const LATER: &str = "2025-01-20T08:00:00.000000Z";

pub fn create_test_scores() -> ScoreUpdate {
    ScoreUpdate {
        first_monthly_score: Some(18.0),
        second_monthly_score: Some(19.0),
        midterm_exam_score: Some(35.0),
        final_exam_score: Some(32.0),
        ..ScoreUpdate::default()
    }
}

pub fn create_test_command(scores: ScoreUpdate) -> UpsertResult {
    UpsertResult {
        student_id: 1,
        subject_id: 2,
        academic_year: AcademicYear::new("2024-2025").unwrap(),
        scores,
    }
}

/// Builds the row storage would hold after a first upsert.
pub fn create_stored_record() -> ResultRecord {
    let UpsertPlan::Insert(new) =
        apply_upsert(None, create_test_command(create_test_scores()), 5, EARLIER).unwrap()
    else {
        panic!("expected an insert plan");
    };
    ResultRecord {
        result_id: 11,
        student_id: new.student_id,
        subject_id: new.subject_id,
        teacher_id: new.teacher_id,
        academic_year: new.academic_year,
        scores: new.scores,
        term_1_total: new.totals.term_1_total,
        term_2_total: new.totals.term_2_total,
        approval: new.approval,
        created_at: new.created_at.clone(),
        updated_at: new.created_at,
    }
}
