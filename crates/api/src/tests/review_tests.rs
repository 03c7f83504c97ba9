// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use marksheet_domain::DEFAULT_REJECTION_NOTE;

use super::helpers::{YEAR, create_school, record_and_approve, scenario_request};
use crate::{
    ApiError, ReviewResultRequest, approve_result, get_student_results, list_pending_results,
    list_results, reject_result, upsert_result,
};

#[test]
fn test_approve_stamps_the_admin_and_notes() {
    let mut school = create_school();
    let request = scenario_request(school.student_a, school.math, YEAR);
    let stored = upsert_result(&mut school.persistence, &request, &school.teacher).unwrap();

    let response = approve_result(
        &mut school.persistence,
        stored.result.result_id,
        &ReviewResultRequest {
            notes: Some(String::from("looks good")),
        },
        &school.admin,
    )
    .unwrap();

    assert_eq!(response.message, "Result approved successfully");
    assert!(response.result.is_approved);
    assert_eq!(response.result.approval_status, "approved");
    assert_eq!(response.result.approved_by, Some(school.admin.account_id));
    assert!(response.result.approved_at.is_some());
    assert_eq!(response.result.approval_notes.as_deref(), Some("looks good"));
}

#[test]
fn test_reject_pending_result_records_notes() {
    let mut school = create_school();
    let request = scenario_request(school.student_a, school.math, YEAR);
    let stored = upsert_result(&mut school.persistence, &request, &school.teacher).unwrap();

    let response = reject_result(
        &mut school.persistence,
        stored.result.result_id,
        &ReviewResultRequest {
            notes: Some(String::from("missing final exam")),
        },
        &school.admin,
    )
    .unwrap();

    assert!(!response.result.is_approved);
    assert_eq!(response.result.approval_status, "rejected");
    assert_eq!(
        response.result.approval_notes.as_deref(),
        Some("missing final exam")
    );
}

#[test]
fn test_reject_without_notes_uses_default_note() {
    let mut school = create_school();
    let request = scenario_request(school.student_a, school.math, YEAR);
    let stored = upsert_result(&mut school.persistence, &request, &school.teacher).unwrap();

    let response = reject_result(
        &mut school.persistence,
        stored.result.result_id,
        &ReviewResultRequest::default(),
        &school.admin,
    )
    .unwrap();

    assert_eq!(
        response.result.approval_notes.as_deref(),
        Some(DEFAULT_REJECTION_NOTE)
    );
}

#[test]
fn test_reject_after_approval_keeps_the_approval_stamp() {
    let mut school = create_school();
    let request = scenario_request(school.student_a, school.math, YEAR);
    let approved = record_and_approve(
        &mut school.persistence,
        &school.teacher,
        &school.admin,
        &request,
    );

    let rejected = reject_result(
        &mut school.persistence,
        approved.result_id,
        &ReviewResultRequest::default(),
        &school.admin,
    )
    .unwrap()
    .result;

    assert!(!rejected.is_approved);
    assert_eq!(rejected.approved_by, approved.approved_by);
    assert_eq!(rejected.approved_at, approved.approved_at);
}

#[test]
fn test_review_of_unknown_result_is_not_found() {
    let mut school = create_school();

    let approve = approve_result(
        &mut school.persistence,
        42,
        &ReviewResultRequest::default(),
        &school.admin,
    );
    let reject = reject_result(
        &mut school.persistence,
        42,
        &ReviewResultRequest::default(),
        &school.admin,
    );

    assert!(matches!(approve, Err(ApiError::ResourceNotFound { .. })));
    assert!(matches!(reject, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_only_admins_review() {
    let mut school = create_school();
    let request = scenario_request(school.student_a, school.math, YEAR);
    let stored = upsert_result(&mut school.persistence, &request, &school.teacher).unwrap();
    let result_id: i64 = stored.result.result_id;

    let by_teacher = approve_result(
        &mut school.persistence,
        result_id,
        &ReviewResultRequest::default(),
        &school.teacher,
    );
    let by_student = reject_result(
        &mut school.persistence,
        result_id,
        &ReviewResultRequest::default(),
        &school.student,
    );
    let pending = list_pending_results(&mut school.persistence, &school.teacher);

    assert!(matches!(by_teacher, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(by_student, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(pending, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_pending_list_has_display_names_and_skips_approved_rows() {
    let mut school = create_school();
    let first = scenario_request(school.student_a, school.math, YEAR);
    record_and_approve(
        &mut school.persistence,
        &school.teacher,
        &school.admin,
        &first,
    );
    let second = scenario_request(school.student_a, school.math, "2025-2026");
    let waiting = upsert_result(&mut school.persistence, &second, &school.teacher).unwrap();

    let pending = list_pending_results(&mut school.persistence, &school.admin).unwrap();

    assert_eq!(pending.results.len(), 1);
    let entry = &pending.results[0];
    assert_eq!(entry.result.result_id, waiting.result.result_id);
    assert_eq!(entry.student_name, "Sam Student");
    assert_eq!(entry.class_name, "Class-10A");
    assert_eq!(entry.subject_name, "Math");
    assert_eq!(entry.teacher_name, "Ada Teacher");
}

#[test]
fn test_rejected_rows_stay_in_the_pending_list() {
    let mut school = create_school();
    let request = scenario_request(school.student_a, school.math, YEAR);
    let stored = upsert_result(&mut school.persistence, &request, &school.teacher).unwrap();
    reject_result(
        &mut school.persistence,
        stored.result.result_id,
        &ReviewResultRequest::default(),
        &school.admin,
    )
    .unwrap();

    let pending = list_pending_results(&mut school.persistence, &school.admin).unwrap();

    assert_eq!(pending.results.len(), 1);
    assert_eq!(pending.results[0].result.approval_status, "rejected");
}

#[test]
fn test_admin_lists_all_rows_and_student_raw_rows() {
    let mut school = create_school();
    let request = scenario_request(school.student_a, school.math, YEAR);
    record_and_approve(
        &mut school.persistence,
        &school.teacher,
        &school.admin,
        &request,
    );
    let other_year = scenario_request(school.student_a, school.math, "2025-2026");
    upsert_result(&mut school.persistence, &other_year, &school.teacher).unwrap();

    let all = list_results(&mut school.persistence, &school.admin).unwrap();
    assert_eq!(all.results.len(), 2);

    let raw = get_student_results(
        &mut school.persistence,
        school.student_a,
        "2025-2026",
        &school.admin,
    )
    .unwrap();
    assert_eq!(raw.results.len(), 1);
    assert!(!raw.results[0].is_approved);

    let denied = list_results(&mut school.persistence, &school.teacher);
    assert!(matches!(denied, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_student_results_for_unknown_student_is_not_found() {
    let mut school = create_school();

    let result = get_student_results(&mut school.persistence, 999, YEAR, &school.admin);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
