// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::approval::ApprovalState;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use time::macros::format_description;

/// One of the six raw score components recorded per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    /// First monthly assessment (term 1).
    FirstMonthly,
    /// Second monthly assessment (term 1).
    SecondMonthly,
    /// Midterm examination (term 1).
    MidtermExam,
    /// Third monthly assessment (term 2).
    ThirdMonthly,
    /// Fourth monthly assessment (term 2).
    FourthMonthly,
    /// Final examination (term 2).
    FinalExam,
}

impl ScoreField {
    /// All components in storage order.
    pub const ALL: [Self; 6] = [
        Self::FirstMonthly,
        Self::SecondMonthly,
        Self::MidtermExam,
        Self::ThirdMonthly,
        Self::FourthMonthly,
        Self::FinalExam,
    ];

    /// Returns the column / wire name of this component.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstMonthly => "first_monthly_score",
            Self::SecondMonthly => "second_monthly_score",
            Self::MidtermExam => "midterm_exam_score",
            Self::ThirdMonthly => "third_monthly_score",
            Self::FourthMonthly => "fourth_monthly_score",
            Self::FinalExam => "final_exam_score",
        }
    }

    /// Returns the inclusive upper bound for this component.
    ///
    /// Monthly assessments are marked out of 20, examinations out of 80.
    #[must_use]
    pub const fn max(&self) -> f64 {
        match self {
            Self::FirstMonthly | Self::SecondMonthly | Self::ThirdMonthly | Self::FourthMonthly => {
                20.0
            }
            Self::MidtermExam | Self::FinalExam => 80.0,
        }
    }
}

impl std::fmt::Display for ScoreField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The six raw score components of a result. Missing values are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub first_monthly_score: Option<f64>,
    pub second_monthly_score: Option<f64>,
    pub midterm_exam_score: Option<f64>,
    pub third_monthly_score: Option<f64>,
    pub fourth_monthly_score: Option<f64>,
    pub final_exam_score: Option<f64>,
}

impl ScoreComponents {
    /// Returns the value recorded for a component.
    #[must_use]
    pub const fn get(&self, field: ScoreField) -> Option<f64> {
        match field {
            ScoreField::FirstMonthly => self.first_monthly_score,
            ScoreField::SecondMonthly => self.second_monthly_score,
            ScoreField::MidtermExam => self.midterm_exam_score,
            ScoreField::ThirdMonthly => self.third_monthly_score,
            ScoreField::FourthMonthly => self.fourth_monthly_score,
            ScoreField::FinalExam => self.final_exam_score,
        }
    }

    const fn slot(&mut self, field: ScoreField) -> &mut Option<f64> {
        match field {
            ScoreField::FirstMonthly => &mut self.first_monthly_score,
            ScoreField::SecondMonthly => &mut self.second_monthly_score,
            ScoreField::MidtermExam => &mut self.midterm_exam_score,
            ScoreField::ThirdMonthly => &mut self.third_monthly_score,
            ScoreField::FourthMonthly => &mut self.fourth_monthly_score,
            ScoreField::FinalExam => &mut self.final_exam_score,
        }
    }
}

/// A partial set of score components supplied by a teacher.
///
/// A `None` field means "not supplied": the stored value is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub first_monthly_score: Option<f64>,
    pub second_monthly_score: Option<f64>,
    pub midterm_exam_score: Option<f64>,
    pub third_monthly_score: Option<f64>,
    pub fourth_monthly_score: Option<f64>,
    pub final_exam_score: Option<f64>,
}

impl ScoreUpdate {
    /// Returns the supplied value for a component, if any.
    #[must_use]
    pub const fn get(&self, field: ScoreField) -> Option<f64> {
        match field {
            ScoreField::FirstMonthly => self.first_monthly_score,
            ScoreField::SecondMonthly => self.second_monthly_score,
            ScoreField::MidtermExam => self.midterm_exam_score,
            ScoreField::ThirdMonthly => self.third_monthly_score,
            ScoreField::FourthMonthly => self.fourth_monthly_score,
            ScoreField::FinalExam => self.final_exam_score,
        }
    }

    /// Overlays the supplied components onto `current`.
    #[must_use]
    pub fn apply_to(&self, current: &ScoreComponents) -> ScoreComponents {
        let mut merged: ScoreComponents = *current;
        for field in ScoreField::ALL {
            if let Some(value) = self.get(field) {
                *merged.slot(field) = Some(value);
            }
        }
        merged
    }

    /// Converts the update into the components of a brand new row.
    #[must_use]
    pub fn into_components(self) -> ScoreComponents {
        self.apply_to(&ScoreComponents::default())
    }
}

/// A school year key such as `2024-2025`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AcademicYear(String);

impl AcademicYear {
    /// The separator between the two calendar years.
    pub const SEPARATOR: char = '-';

    /// Parses and validates an academic year.
    ///
    /// # Errors
    ///
    /// Returns an error unless the value is two four-digit years joined by `-`.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        let valid: bool = trimmed
            .split_once(Self::SEPARATOR)
            .is_some_and(|(start, end)| is_four_digits(start) && is_four_digits(end));

        if !valid {
            return Err(DomainError::InvalidAcademicYear(value.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns true when the value at least looks like a year range.
    ///
    /// Report requests use this lenient check to decide whether to fall
    /// back to the most recent approved year.
    #[must_use]
    pub fn looks_like_range(value: &str) -> bool {
        value.contains(Self::SEPARATOR)
    }

    /// Returns the academic year string.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

fn is_four_digits(part: &str) -> bool {
    part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit())
}

impl std::fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role attached to a login account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Admin,
    Teacher,
    Student,
}

impl AccountRole {
    /// Returns the stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

impl FromStr for AccountRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored result: one row per (student, subject, academic year).
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub result_id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    /// The teacher who last wrote the scores.
    pub teacher_id: i64,
    pub academic_year: String,
    pub scores: ScoreComponents,
    pub term_1_total: f64,
    pub term_2_total: f64,
    pub approval: ApprovalState,
    pub created_at: String,
    pub updated_at: String,
}

impl ResultRecord {
    /// Returns true if this row is visible to its student.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        self.approval.is_approved()
    }
}

/// Formats a timestamp the way it is stored.
///
/// The fixed-width format keeps lexical order equal to chronological order.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, DomainError> {
    at.to_offset(time::UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
        ))
        .map_err(|e| DomainError::InvalidTimestamp(e.to_string()))
}

/// Returns the current time in storage format.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn now_timestamp() -> Result<String, DomainError> {
    format_timestamp(OffsetDateTime::now_utc())
}
