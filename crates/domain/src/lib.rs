// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod aggregation;
mod approval;
mod error;
mod report;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use aggregation::{TermTotals, annual, annual_from_terms, average, round2, term1, term2};
pub use approval::{
    ApprovalColumns, ApprovalStamp, ApprovalState, ApprovalStatus, ApprovalTransition,
    DEFAULT_REJECTION_NOTE,
};
pub use error::DomainError;
pub use report::{ReportLine, StudentReport, SubjectResult, build_report};
pub use types::{
    AcademicYear, AccountRole, ResultRecord, ScoreComponents, ScoreField, ScoreUpdate,
    format_timestamp, now_timestamp,
};
pub use validation::{validate_identifier, validate_scores};
