// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Student-facing report projection.

use crate::aggregation::{annual_from_terms, average, round2};
use crate::types::{ResultRecord, ScoreComponents};
use serde::{Deserialize, Serialize};

/// An approved result joined with its subject's display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectResult {
    pub record: ResultRecord,
    pub subject_name: String,
    pub subject_code: Option<String>,
}

/// One subject line of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub result_id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub subject_code: Option<String>,
    #[serde(flatten)]
    pub scores: ScoreComponents,
    pub term_1_total: f64,
    pub term_2_total: f64,
    pub annual_total: f64,
}

/// A student's approved results for one academic year, with grand totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentReport {
    pub student_id: i64,
    /// `None` when the student has no approved results in any year.
    pub academic_year: Option<String>,
    pub subjects: Vec<ReportLine>,
    pub total_term_1: f64,
    pub total_term_2: f64,
    pub total_annual: f64,
    pub annual_average: f64,
    pub subject_count: usize,
}

impl StudentReport {
    /// A zeroed report with no subjects.
    #[must_use]
    pub const fn empty(student_id: i64, academic_year: Option<String>) -> Self {
        Self {
            student_id,
            academic_year,
            subjects: Vec::new(),
            total_term_1: 0.0,
            total_term_2: 0.0,
            total_annual: 0.0,
            annual_average: 0.0,
            subject_count: 0,
        }
    }
}

/// Builds a report from a student's results for one academic year.
///
/// Rows that are not approved are skipped, whatever the caller passed in.
/// Line order follows the input order.
#[must_use]
pub fn build_report(student_id: i64, academic_year: &str, rows: &[SubjectResult]) -> StudentReport {
    let subjects: Vec<ReportLine> = rows
        .iter()
        .filter(|row| row.record.is_approved())
        .map(|row| ReportLine {
            result_id: row.record.result_id,
            subject_id: row.record.subject_id,
            subject_name: row.subject_name.clone(),
            subject_code: row.subject_code.clone(),
            scores: row.record.scores,
            term_1_total: row.record.term_1_total,
            term_2_total: row.record.term_2_total,
            annual_total: annual_from_terms(row.record.term_1_total, row.record.term_2_total),
        })
        .collect();

    let annual_totals: Vec<f64> = subjects.iter().map(|line| line.annual_total).collect();

    StudentReport {
        student_id,
        academic_year: Some(academic_year.to_string()),
        total_term_1: round2(subjects.iter().map(|line| line.term_1_total).sum()),
        total_term_2: round2(subjects.iter().map(|line| line.term_2_total).sum()),
        total_annual: round2(annual_totals.iter().sum()),
        annual_average: average(&annual_totals),
        subject_count: subjects.len(),
        subjects,
    }
}
