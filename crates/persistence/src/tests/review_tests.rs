// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::PersistenceError;
use crate::tests::{Fixture, YEAR, create_approved, create_fixture, scenario_scores, upsert_command};
use marksheet::ReviewCommand;
use marksheet_domain::{ApprovalStatus, DEFAULT_REJECTION_NOTE};

fn create_pending(fixture: &mut Fixture) -> i64 {
    fixture
        .persistence
        .upsert_result(
            upsert_command(fixture.student_a, fixture.math, YEAR, scenario_scores()),
            fixture.teacher,
        )
        .unwrap()
        .record
        .result_id
}

#[test]
fn test_approve_persists_stamp() {
    let mut fixture: Fixture = create_fixture();
    let result_id: i64 = create_pending(&mut fixture);

    fixture
        .persistence
        .review_result(
            result_id,
            ReviewCommand::Approve {
                notes: Some(String::from("verified")),
            },
            7,
        )
        .unwrap();

    let stored = fixture.persistence.get_result(result_id).unwrap().unwrap();
    assert!(stored.is_approved());
    assert_eq!(stored.approval.stamp().unwrap().approved_by, 7);
    assert_eq!(stored.approval.notes(), Some("verified"));
}

#[test]
fn test_reject_pending_with_notes() {
    let mut fixture: Fixture = create_fixture();
    let result_id: i64 = create_pending(&mut fixture);

    let rejected = fixture
        .persistence
        .review_result(
            result_id,
            ReviewCommand::Reject {
                notes: Some(String::from("missing final exam")),
            },
            7,
        )
        .unwrap();

    let stored = fixture.persistence.get_result(result_id).unwrap().unwrap();
    assert_eq!(stored, rejected);
    assert!(!stored.is_approved());
    assert_eq!(stored.approval.notes(), Some("missing final exam"));
}

#[test]
fn test_reject_without_notes_uses_default() {
    let mut fixture: Fixture = create_fixture();
    let result_id: i64 = create_pending(&mut fixture);

    fixture
        .persistence
        .review_result(result_id, ReviewCommand::Reject { notes: None }, 7)
        .unwrap();

    let stored = fixture.persistence.get_result(result_id).unwrap().unwrap();
    assert_eq!(stored.approval.notes(), Some(DEFAULT_REJECTION_NOTE));
}

#[test]
fn test_reject_approved_keeps_previous_stamp() {
    let mut fixture: Fixture = create_fixture();
    let (student, math) = (fixture.student_a, fixture.math);
    let approved = create_approved(&mut fixture, student, math, YEAR);

    fixture
        .persistence
        .review_result(approved.result_id, ReviewCommand::Reject { notes: None }, 7)
        .unwrap();

    let stored = fixture
        .persistence
        .get_result(approved.result_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.approval.status(), ApprovalStatus::Rejected);
    assert_eq!(stored.approval.stamp(), approved.approval.stamp());
}

#[test]
fn test_review_never_changes_scores() {
    let mut fixture: Fixture = create_fixture();
    let result_id: i64 = create_pending(&mut fixture);
    let before = fixture.persistence.get_result(result_id).unwrap().unwrap();

    fixture
        .persistence
        .review_result(result_id, ReviewCommand::Approve { notes: None }, 7)
        .unwrap();

    let after = fixture.persistence.get_result(result_id).unwrap().unwrap();
    assert_eq!(before.scores, after.scores);
    assert_eq!(before.term_1_total, after.term_1_total);
    assert_eq!(before.term_2_total, after.term_2_total);
}

#[test]
fn test_review_unknown_result_is_not_found() {
    let mut fixture: Fixture = create_fixture();

    let result = fixture
        .persistence
        .review_result(4_242, ReviewCommand::Approve { notes: None }, 7);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}
