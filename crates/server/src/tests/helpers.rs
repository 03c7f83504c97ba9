// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use marksheet_domain::AccountRole;
use marksheet_persistence::{NewAccount, Persistence};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const YEAR: &str = "2024-2025";
pub const PREVIOUS_YEAR: &str = "2023-2024";
pub const PASSWORD: &str = "correct-horse-battery";

/// A seeded school behind a router.
///
/// `ada` teaches Math to Class-10A. `bob` has no assignments. `sam` is in
/// Class-10A and `bea` in Class-10B.
pub struct TestSchool {
    pub app: Router,
    pub class_a: i64,
    pub math: i64,
    pub sam: i64,
    pub bea: i64,
}

fn account(
    persistence: &mut Persistence,
    login_name: &str,
    role: AccountRole,
    teacher_id: Option<i64>,
    student_id: Option<i64>,
) {
    persistence
        .create_account(NewAccount {
            login_name,
            display_name: login_name,
            password: PASSWORD,
            role,
            teacher_id,
            student_id,
        })
        .unwrap();
}

pub fn create_school() -> TestSchool {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let class_a: i64 = persistence.create_class("Class-10A").unwrap();
    let class_b: i64 = persistence.create_class("Class-10B").unwrap();
    let math: i64 = persistence.create_subject("Math", Some("MATH")).unwrap();
    let ada: i64 = persistence.create_teacher("Ada Teacher", None).unwrap();
    let bob: i64 = persistence.create_teacher("Bob Teacher", None).unwrap();
    let sam: i64 = persistence
        .create_student("Sam Student", Some("A-01"), class_a)
        .unwrap();
    let bea: i64 = persistence
        .create_student("Bea Student", Some("B-01"), class_b)
        .unwrap();
    persistence
        .create_assignment(ada, math, class_a, YEAR)
        .unwrap();

    account(&mut persistence, "admin", AccountRole::Admin, None, None);
    account(&mut persistence, "ada", AccountRole::Teacher, Some(ada), None);
    account(&mut persistence, "bob", AccountRole::Teacher, Some(bob), None);
    account(&mut persistence, "sam", AccountRole::Student, None, Some(sam));
    account(&mut persistence, "bea", AccountRole::Student, None, Some(bea));

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    TestSchool {
        app: build_router(app_state),
        class_a,
        math,
        sam,
        bea,
    }
}

/// Sends a request and decodes the JSON envelope.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

/// Logs in and returns the session token.
pub async fn login_as(app: &Router, login_name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "login_name": login_name, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["session_token"].as_str().unwrap().to_string()
}

/// 18 + 19 + 35 in term one, 32 in term two.
pub fn scenario_body(student_id: i64, subject_id: i64, academic_year: &str) -> Value {
    json!({
        "student_id": student_id,
        "subject_id": subject_id,
        "academic_year": academic_year,
        "first_monthly_score": 18,
        "second_monthly_score": 19,
        "midterm_exam_score": 35,
        "final_exam_score": 32
    })
}

/// Records the scenario scores for `sam` with the `teacher` token, approves
/// them with the `admin` token, and returns the result id.
pub async fn record_and_approve(
    school: &TestSchool,
    teacher: &str,
    admin: &str,
    academic_year: &str,
) -> i64 {
    let (status, body) = send(
        &school.app,
        "POST",
        "/results",
        Some(teacher),
        Some(scenario_body(school.sam, school.math, academic_year)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "upsert failed: {body}");
    let result_id: i64 = body["data"]["result"]["result_id"].as_i64().unwrap();

    let (status, body) = send(
        &school.app,
        "PUT",
        &format!("/results/approve/{result_id}"),
        Some(admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "approve failed: {body}");
    result_id
}
