// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end result lifecycles through the router.

use axum::http::StatusCode;
use serde_json::json;

use super::helpers::{
    PREVIOUS_YEAR, YEAR, create_school, login_as, record_and_approve, scenario_body, send,
};

#[tokio::test]
async fn test_recorded_and_approved_result_reaches_the_student() {
    let school = create_school();
    let ada: String = login_as(&school.app, "ada").await;
    let admin: String = login_as(&school.app, "admin").await;
    let sam: String = login_as(&school.app, "sam").await;

    let (status, body) = send(
        &school.app,
        "POST",
        "/results",
        Some(&ada),
        Some(scenario_body(school.sam, school.math, YEAR)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Result created successfully");
    assert_eq!(body["data"]["result"]["term_1_total"], 72.0);
    assert_eq!(body["data"]["result"]["term_2_total"], 32.0);
    assert_eq!(body["data"]["result"]["is_approved"], false);
    let result_id: i64 = body["data"]["result"]["result_id"].as_i64().unwrap();

    let (status, before) = send(
        &school.app,
        "GET",
        &format!("/results/student/me/{YEAR}"),
        Some(&sam),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["data"]["subjects"], json!([]));

    let (status, approved) = send(
        &school.app,
        "PUT",
        &format!("/results/approve/{result_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["data"]["result"]["is_approved"], true);

    let (status, report) = send(
        &school.app,
        "GET",
        &format!("/results/student/me/{YEAR}"),
        Some(&sam),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &report["data"];
    assert_eq!(data["academic_year"], YEAR);
    assert_eq!(data["subject_count"], 1);
    assert_eq!(data["subjects"][0]["subject_name"], "Math");
    assert_eq!(data["subjects"][0]["term_1_total"], 72.0);
    assert_eq!(data["subjects"][0]["term_2_total"], 32.0);
    assert_eq!(data["subjects"][0]["annual_total"], 104.0);
    assert_eq!(data["annual_average"], 104.0);
}

#[tokio::test]
async fn test_edit_after_approval_withdraws_the_result() {
    let school = create_school();
    let ada: String = login_as(&school.app, "ada").await;
    let admin: String = login_as(&school.app, "admin").await;
    let sam: String = login_as(&school.app, "sam").await;
    let result_id: i64 = record_and_approve(&school, &ada, &admin, YEAR).await;

    let mut edit = scenario_body(school.sam, school.math, YEAR);
    edit["midterm_exam_score"] = json!(36);
    let (status, body) = send(&school.app, "PUT", "/results", Some(&ada), Some(edit)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Result updated successfully");
    assert_eq!(body["data"]["created"], false);
    assert_eq!(body["data"]["result"]["result_id"], result_id);
    assert_eq!(body["data"]["result"]["is_approved"], false);
    assert_eq!(body["data"]["result"]["term_1_total"], 73.0);
    assert!(body["data"]["result"]["approved_by"].is_null());
    assert!(body["data"]["result"]["approved_at"].is_null());

    let (_, report) = send(
        &school.app,
        "GET",
        &format!("/results/student/me/{YEAR}"),
        Some(&sam),
        None,
    )
    .await;
    assert_eq!(report["data"]["subjects"], json!([]));
}

#[tokio::test]
async fn test_rejected_result_carries_notes() {
    let school = create_school();
    let ada: String = login_as(&school.app, "ada").await;
    let admin: String = login_as(&school.app, "admin").await;
    let (_, created) = send(
        &school.app,
        "POST",
        "/results",
        Some(&ada),
        Some(scenario_body(school.sam, school.math, YEAR)),
    )
    .await;
    let result_id: i64 = created["data"]["result"]["result_id"].as_i64().unwrap();

    let (status, body) = send(
        &school.app,
        "PUT",
        &format!("/results/reject/{result_id}"),
        Some(&admin),
        Some(json!({ "notes": "missing final exam" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"]["is_approved"], false);
    assert_eq!(body["data"]["result"]["approval_status"], "rejected");
    assert_eq!(body["data"]["result"]["approval_notes"], "missing final exam");
}

#[tokio::test]
async fn test_teacher_outside_class_is_refused_and_nothing_is_written() {
    let school = create_school();
    let ada: String = login_as(&school.app, "ada").await;
    let admin: String = login_as(&school.app, "admin").await;

    let (status, body) = send(
        &school.app,
        "POST",
        "/results",
        Some(&ada),
        Some(scenario_body(school.bea, school.math, YEAR)),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("write_result"));

    let (_, all) = send(&school.app, "GET", "/results", Some(&admin), None).await;
    assert_eq!(all["data"]["results"], json!([]));
}

#[tokio::test]
async fn test_report_without_year_uses_latest_approved_year() {
    let school = create_school();
    let ada: String = login_as(&school.app, "ada").await;
    let admin: String = login_as(&school.app, "admin").await;
    let sam: String = login_as(&school.app, "sam").await;
    let bea: String = login_as(&school.app, "bea").await;
    record_and_approve(&school, &ada, &admin, PREVIOUS_YEAR).await;

    let (status, report) = send(&school.app, "GET", "/results/student/me", Some(&sam), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["data"]["academic_year"], PREVIOUS_YEAR);
    assert_eq!(report["data"]["subjects"][0]["subject_name"], "Math");

    let (status, empty) = send(&school.app, "GET", "/results/student/me", Some(&bea), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["data"]["subjects"], json!([]));
    assert_eq!(empty["data"]["annual_average"], 0.0);
    assert!(empty["data"]["academic_year"].is_null());
}
