// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helpers for API tests.

use marksheet_domain::AccountRole;
use marksheet_persistence::{NewAccount, Persistence};

use crate::{
    AuthenticatedActor, ResultInfo, ReviewResultRequest, Role, UpsertResultRequest,
    approve_result, upsert_result,
};

pub const YEAR: &str = "2024-2025";
pub const PREVIOUS_YEAR: &str = "2023-2024";
pub const PASSWORD: &str = "correct-horse-battery";

/// A seeded school with one actor per role.
///
/// `teacher` is assigned to Math for Class-10A only. `other_teacher` has
/// no assignments.
pub struct School {
    pub persistence: Persistence,
    pub class_a: i64,
    pub class_b: i64,
    pub math: i64,
    pub physics: i64,
    pub student_a: i64,
    pub student_b: i64,
    pub teacher_id: i64,
    pub admin: AuthenticatedActor,
    pub teacher: AuthenticatedActor,
    pub other_teacher: AuthenticatedActor,
    pub student: AuthenticatedActor,
    pub other_student: AuthenticatedActor,
}

pub fn create_school() -> School {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let class_a: i64 = persistence.create_class("Class-10A").unwrap();
    let class_b: i64 = persistence.create_class("Class-10B").unwrap();
    let math: i64 = persistence.create_subject("Math", Some("MATH")).unwrap();
    let physics: i64 = persistence.create_subject("Physics", Some("PHY")).unwrap();
    let teacher_id: i64 = persistence.create_teacher("Ada Teacher", None).unwrap();
    let other_teacher_id: i64 = persistence.create_teacher("Bob Teacher", None).unwrap();
    let student_a: i64 = persistence
        .create_student("Sam Student", Some("A-01"), class_a)
        .unwrap();
    let student_b: i64 = persistence
        .create_student("Bea Student", Some("B-01"), class_b)
        .unwrap();
    persistence
        .create_assignment(teacher_id, math, class_a, YEAR)
        .unwrap();

    School {
        persistence,
        class_a,
        class_b,
        math,
        physics,
        student_a,
        student_b,
        teacher_id,
        admin: AuthenticatedActor::new(1, String::from("admin"), Role::Admin),
        teacher: AuthenticatedActor::new(
            2,
            String::from("ada"),
            Role::Teacher { teacher_id },
        ),
        other_teacher: AuthenticatedActor::new(
            3,
            String::from("bob"),
            Role::Teacher {
                teacher_id: other_teacher_id,
            },
        ),
        student: AuthenticatedActor::new(
            4,
            String::from("sam"),
            Role::Student {
                student_id: student_a,
            },
        ),
        other_student: AuthenticatedActor::new(
            5,
            String::from("bea"),
            Role::Student {
                student_id: student_b,
            },
        ),
    }
}

/// Creates a stored account for a role and returns its id.
pub fn create_account(
    persistence: &mut Persistence,
    login_name: &str,
    role: AccountRole,
    teacher_id: Option<i64>,
    student_id: Option<i64>,
) -> i64 {
    persistence
        .create_account(NewAccount {
            login_name,
            display_name: login_name,
            password: PASSWORD,
            role,
            teacher_id,
            student_id,
        })
        .unwrap()
}

/// 18 + 19 + 35 in term one, 32 in term two.
pub fn scenario_request(student_id: i64, subject_id: i64, academic_year: &str) -> UpsertResultRequest {
    UpsertResultRequest {
        student_id,
        subject_id,
        academic_year: academic_year.to_string(),
        first_monthly_score: Some(18.0),
        second_monthly_score: Some(19.0),
        midterm_exam_score: Some(35.0),
        third_monthly_score: None,
        fourth_monthly_score: None,
        final_exam_score: Some(32.0),
    }
}

/// Records scores as `teacher` and approves them as `admin`.
pub fn record_and_approve(
    persistence: &mut Persistence,
    teacher: &AuthenticatedActor,
    admin: &AuthenticatedActor,
    request: &UpsertResultRequest,
) -> ResultInfo {
    let stored = upsert_result(persistence, request, teacher).unwrap();
    approve_result(
        persistence,
        stored.result.result_id,
        &ReviewResultRequest::default(),
        admin,
    )
    .unwrap()
    .result
}
