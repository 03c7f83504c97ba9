// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use marksheet_domain::{ApprovalState, ResultRecord, ScoreComponents, TermTotals};

/// A result row that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResult {
    pub student_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub academic_year: String,
    pub scores: ScoreComponents,
    pub totals: TermTotals,
    pub approval: ApprovalState,
    pub created_at: String,
}

/// What storage must do to carry out an upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertPlan {
    /// No row exists for the key; insert this one.
    Insert(NewResult),
    /// A row exists; overwrite it with this one.
    Update(ResultRecord),
}

impl UpsertPlan {
    /// Returns true when the plan creates a new row.
    #[must_use]
    pub const fn is_insert(&self) -> bool {
        matches!(self, Self::Insert(_))
    }
}
