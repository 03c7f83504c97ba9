// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]

mod review_tests;

use crate::Persistence;
use marksheet::{ReviewCommand, UpsertResult};
use marksheet_domain::{AcademicYear, ResultRecord, ScoreUpdate};

pub const YEAR: &str = "2024-2025";

/// A seeded school: one teacher assigned to Math for Class-10A, a second
/// class the teacher does not teach, and one student in each class.
pub struct Fixture {
    pub persistence: Persistence,
    pub class_a: i64,
    pub class_b: i64,
    pub math: i64,
    pub physics: i64,
    pub teacher: i64,
    pub student_a: i64,
    pub student_b: i64,
}

pub fn create_fixture() -> Fixture {
    seed_fixture(Persistence::new_in_memory().unwrap())
}

/// Seeds the school into an already opened database.
pub fn seed_fixture(mut persistence: Persistence) -> Fixture {
    let class_a: i64 = persistence.create_class("Class-10A").unwrap();
    let class_b: i64 = persistence.create_class("Class-10B").unwrap();
    let math: i64 = persistence.create_subject("Math", Some("MATH")).unwrap();
    let physics: i64 = persistence.create_subject("Physics", Some("PHY")).unwrap();
    let teacher: i64 = persistence
        .create_teacher("Ada Teacher", Some("ada@example.org"))
        .unwrap();
    let student_a: i64 = persistence
        .create_student("Sam Student", Some("A-01"), class_a)
        .unwrap();
    let student_b: i64 = persistence
        .create_student("Bea Student", Some("B-01"), class_b)
        .unwrap();
    persistence
        .create_assignment(teacher, math, class_a, YEAR)
        .unwrap();

    Fixture {
        persistence,
        class_a,
        class_b,
        math,
        physics,
        teacher,
        student_a,
        student_b,
    }
}

pub fn scenario_scores() -> ScoreUpdate {
    ScoreUpdate {
        first_monthly_score: Some(18.0),
        second_monthly_score: Some(19.0),
        midterm_exam_score: Some(35.0),
        final_exam_score: Some(32.0),
        ..ScoreUpdate::default()
    }
}

pub fn upsert_command(student_id: i64, subject_id: i64, year: &str, scores: ScoreUpdate) -> UpsertResult {
    UpsertResult {
        student_id,
        subject_id,
        academic_year: AcademicYear::new(year).unwrap(),
        scores,
    }
}

/// Upserts the scenario scores and approves the row.
pub fn create_approved(fixture: &mut Fixture, student_id: i64, subject_id: i64, year: &str) -> ResultRecord {
    let teacher: i64 = fixture.teacher;
    let outcome = fixture
        .persistence
        .upsert_result(
            upsert_command(student_id, subject_id, year, scenario_scores()),
            teacher,
        )
        .unwrap();
    fixture
        .persistence
        .review_result(
            outcome.record.result_id,
            ReviewCommand::Approve { notes: None },
            1,
        )
        .unwrap()
}
