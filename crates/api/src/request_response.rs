// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use marksheet_domain::{
    ApprovalStamp, ResultRecord, ScoreComponents, ScoreUpdate, annual_from_terms,
};
use marksheet_persistence::{PendingResult, RosterEntry};

/// API request to create or replace a result.
///
/// Score fields that are absent or `null` leave the stored value unchanged.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UpsertResultRequest {
    pub student_id: i64,
    pub subject_id: i64,
    pub academic_year: String,
    #[serde(default)]
    pub first_monthly_score: Option<f64>,
    #[serde(default)]
    pub second_monthly_score: Option<f64>,
    #[serde(default)]
    pub midterm_exam_score: Option<f64>,
    #[serde(default)]
    pub third_monthly_score: Option<f64>,
    #[serde(default)]
    pub fourth_monthly_score: Option<f64>,
    #[serde(default)]
    pub final_exam_score: Option<f64>,
}

impl UpsertResultRequest {
    /// The supplied score components.
    #[must_use]
    pub const fn scores(&self) -> ScoreUpdate {
        ScoreUpdate {
            first_monthly_score: self.first_monthly_score,
            second_monthly_score: self.second_monthly_score,
            midterm_exam_score: self.midterm_exam_score,
            third_monthly_score: self.third_monthly_score,
            fourth_monthly_score: self.fourth_monthly_score,
            final_exam_score: self.final_exam_score,
        }
    }
}

/// A stored result as the API exposes it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResultInfo {
    pub result_id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub academic_year: String,
    #[serde(flatten)]
    pub scores: ScoreComponents,
    pub term_1_total: f64,
    pub term_2_total: f64,
    pub annual_total: f64,
    /// `pending`, `approved` or `rejected`.
    pub approval_status: String,
    pub is_approved: bool,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>,
    pub approval_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ResultRecord> for ResultInfo {
    fn from(record: &ResultRecord) -> Self {
        let stamp: Option<&ApprovalStamp> = record.approval.stamp();
        Self {
            result_id: record.result_id,
            student_id: record.student_id,
            subject_id: record.subject_id,
            teacher_id: record.teacher_id,
            academic_year: record.academic_year.clone(),
            scores: record.scores,
            term_1_total: record.term_1_total,
            term_2_total: record.term_2_total,
            annual_total: annual_from_terms(record.term_1_total, record.term_2_total),
            approval_status: record.approval.status().as_str().to_string(),
            is_approved: record.is_approved(),
            approved_by: stamp.map(|s| s.approved_by),
            approved_at: stamp.map(|s| s.approved_at.clone()),
            approval_notes: record.approval.notes().map(ToString::to_string),
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
        }
    }
}

/// API response for a create-or-replace.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UpsertResultResponse {
    pub result: ResultInfo,
    /// True when a new row was inserted.
    pub created: bool,
    pub message: String,
}

/// API response listing results.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListResultsResponse {
    pub results: Vec<ResultInfo>,
}

/// A result awaiting review, with display names.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PendingResultInfo {
    #[serde(flatten)]
    pub result: ResultInfo,
    pub student_name: String,
    pub class_name: String,
    pub subject_name: String,
    pub teacher_name: String,
}

impl From<&PendingResult> for PendingResultInfo {
    fn from(pending: &PendingResult) -> Self {
        Self {
            result: ResultInfo::from(&pending.record),
            student_name: pending.student_name.clone(),
            class_name: pending.class_name.clone(),
            subject_name: pending.subject_name.clone(),
            teacher_name: pending.teacher_name.clone(),
        }
    }
}

/// API response listing results awaiting review.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListPendingResultsResponse {
    pub results: Vec<PendingResultInfo>,
}

/// API request body for approve and reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReviewResultRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// API response for approve and reject.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReviewResultResponse {
    pub result: ResultInfo,
    pub message: String,
}

/// API response with a student's raw rows for one year.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StudentResultsResponse {
    pub student_id: i64,
    pub academic_year: String,
    pub results: Vec<ResultInfo>,
}

/// One roster line.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RosterEntryInfo {
    pub student_id: i64,
    pub full_name: String,
    pub roll_number: Option<String>,
    /// `None` when nothing has been recorded yet.
    pub result: Option<ResultInfo>,
}

impl From<&RosterEntry> for RosterEntryInfo {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            student_id: entry.student.student_id,
            full_name: entry.student.full_name.clone(),
            roll_number: entry.student.roll_number.clone(),
            result: entry.result.as_ref().map(ResultInfo::from),
        }
    }
}

/// API response with a class roster for one subject and year.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassRosterResponse {
    pub class_id: i64,
    pub subject_id: i64,
    pub academic_year: String,
    pub students: Vec<RosterEntryInfo>,
}

/// API response listing the years a student has approved results in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AcademicYearsResponse {
    pub student_id: i64,
    /// Most recent first.
    pub academic_years: Vec<String>,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    pub login_name: String,
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub account_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub role: String,
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub expires_at: String,
}

/// API response describing the current account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhoAmIResponse {
    pub account_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub role: String,
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub last_login_at: Option<String>,
}
