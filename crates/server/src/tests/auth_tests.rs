// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use marksheet_api::ApiError;
use serde_json::{Value, json};

use crate::session::SessionError;

use super::helpers::{create_school, login_as, send};

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let school = create_school();

    let (status, body) = send(&school.app, "GET", "/results", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing Authorization header");

    let (status, _) = send(&school.app, "GET", "/results", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let school = create_school();

    let (status, body) = send(
        &school.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "login_name": "admin", "password": "wrong" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_whoami_and_logout() {
    let school = create_school();
    let token: String = login_as(&school.app, "sam").await;

    let (status, me) = send(&school.app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["login_name"], "sam");
    assert_eq!(me["data"]["role"], "student");
    assert_eq!(me["data"]["student_id"], school.sam);

    let (status, _) = send(&school.app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&school.app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_store_failure_is_internal_server_error() {
    let response = SessionError::Storage(ApiError::Internal {
        message: String::from("disk I/O error"),
    })
    .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);

    let rejected = SessionError::InvalidSession(String::from("Session expired")).into_response();
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
}
