// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Term, annual and average aggregation.
//!
//! All functions are pure. Missing components count as zero, and every
//! aggregation boundary (term, annual, average) rounds half-up to two
//! decimal places before the value is used by the next boundary.

use crate::types::ScoreComponents;

/// Rounds half-up to two decimal places.
///
/// Scores are non-negative, so rounding half away from zero is the
/// same as rounding half-up. The value is first snapped to nine decimal
/// places so binary artefacts such as `1.005 * 100 = 100.49999…` do
/// not drop a cent.
#[must_use]
pub fn round2(value: f64) -> f64 {
    let scaled: f64 = (value * 100.0 * 1e7).round() / 1e7;
    scaled.round() / 100.0
}

/// Term 1 total: first monthly + second monthly + midterm exam.
#[must_use]
pub fn term1(scores: &ScoreComponents) -> f64 {
    round2(
        scores.first_monthly_score.unwrap_or(0.0)
            + scores.second_monthly_score.unwrap_or(0.0)
            + scores.midterm_exam_score.unwrap_or(0.0),
    )
}

/// Term 2 total: third monthly + fourth monthly + final exam.
#[must_use]
pub fn term2(scores: &ScoreComponents) -> f64 {
    round2(
        scores.third_monthly_score.unwrap_or(0.0)
            + scores.fourth_monthly_score.unwrap_or(0.0)
            + scores.final_exam_score.unwrap_or(0.0),
    )
}

/// Annual total from already-rounded term totals.
#[must_use]
pub fn annual_from_terms(term_1_total: f64, term_2_total: f64) -> f64 {
    round2(term_1_total + term_2_total)
}

/// Annual total computed from the raw components.
#[must_use]
pub fn annual(scores: &ScoreComponents) -> f64 {
    annual_from_terms(term1(scores), term2(scores))
}

/// Average of annual totals.
///
/// The divisor is at least one so an empty set averages to zero.
#[must_use]
pub fn average(annual_totals: &[f64]) -> f64 {
    let sum: f64 = annual_totals.iter().sum();
    let count: u32 = u32::try_from(annual_totals.len().max(1)).unwrap_or(u32::MAX);
    round2(sum / f64::from(count))
}

/// The persisted totals derived from a set of components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermTotals {
    pub term_1_total: f64,
    pub term_2_total: f64,
}

impl TermTotals {
    /// Computes both term totals from the raw components.
    #[must_use]
    pub fn compute(scores: &ScoreComponents) -> Self {
        Self {
            term_1_total: term1(scores),
            term_2_total: term2(scores),
        }
    }

    /// The annual total for these terms.
    #[must_use]
    pub fn annual(&self) -> f64 {
        annual_from_terms(self.term_1_total, self.term_2_total)
    }
}
