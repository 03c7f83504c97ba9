// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Result approval state machine.
//!
//! A result is `Pending`, `Approved` or `Rejected`. Admins may approve or
//! reject from any state. A teacher edit returns any state to `Pending`.
//! There is no admin transition back to `Pending`.
//!
//! Storage keeps a flat set of columns; [`ApprovalColumns`] is the only
//! place the two representations meet.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The note recorded when an admin rejects without giving one.
pub const DEFAULT_REJECTION_NOTE: &str = "Rejected by admin";

/// Who approved a result and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStamp {
    /// Account id of the approving admin.
    pub approved_by: i64,
    /// Storage-format timestamp of the approval.
    pub approved_at: String,
}

/// The approval sub-state of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApprovalState {
    /// Awaiting review. Notes from an earlier review are kept.
    Pending { notes: Option<String> },
    /// Visible to the student.
    Approved {
        stamp: ApprovalStamp,
        notes: Option<String>,
    },
    /// Sent back by an admin.
    ///
    /// `previous` keeps the stamp of an earlier approval, if there was one.
    Rejected {
        notes: String,
        previous: Option<ApprovalStamp>,
    },
}

impl Default for ApprovalState {
    fn default() -> Self {
        Self::Pending { notes: None }
    }
}

/// An admin-initiated approval transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalTransition {
    Approve {
        admin_id: i64,
        at: String,
        notes: Option<String>,
    },
    Reject {
        notes: Option<String>,
    },
}

impl ApprovalState {
    /// Returns true only in the `Approved` state.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved { .. })
    }

    /// Returns the status discriminator.
    #[must_use]
    pub const fn status(&self) -> ApprovalStatus {
        match self {
            Self::Pending { .. } => ApprovalStatus::Pending,
            Self::Approved { .. } => ApprovalStatus::Approved,
            Self::Rejected { .. } => ApprovalStatus::Rejected,
        }
    }

    /// Returns the review notes, whatever the state.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        match self {
            Self::Pending { notes } | Self::Approved { notes, .. } => notes.as_deref(),
            Self::Rejected { notes, .. } => Some(notes.as_str()),
        }
    }

    /// Returns the current or retained approval stamp.
    #[must_use]
    pub const fn stamp(&self) -> Option<&ApprovalStamp> {
        match self {
            Self::Pending { .. } => None,
            Self::Approved { stamp, .. } => Some(stamp),
            Self::Rejected { previous, .. } => previous.as_ref(),
        }
    }

    /// Applies an admin transition. Both transitions are legal from any state.
    #[must_use]
    pub fn apply(self, transition: ApprovalTransition) -> Self {
        match transition {
            ApprovalTransition::Approve {
                admin_id,
                at,
                notes,
            } => Self::Approved {
                stamp: ApprovalStamp {
                    approved_by: admin_id,
                    approved_at: at,
                },
                notes,
            },
            ApprovalTransition::Reject { notes } => {
                let previous: Option<ApprovalStamp> = self.stamp().cloned();
                Self::Rejected {
                    notes: notes.unwrap_or_else(|| DEFAULT_REJECTION_NOTE.to_string()),
                    previous,
                }
            }
        }
    }

    /// The state after a teacher rewrites the scores.
    ///
    /// Approval metadata is cleared; notes are left as they were.
    #[must_use]
    pub fn reset_for_edit(self) -> Self {
        let notes: Option<String> = self.notes().map(ToString::to_string);
        Self::Pending { notes }
    }
}

/// Discriminator stored alongside the flat approval columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Returns the stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidApprovalStatus(s.to_string())),
        }
    }
}

/// The flat storage representation of an [`ApprovalState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalColumns {
    pub approval_status: String,
    pub is_approved: bool,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>,
    pub approval_notes: Option<String>,
}

impl From<&ApprovalState> for ApprovalColumns {
    fn from(state: &ApprovalState) -> Self {
        let stamp: Option<&ApprovalStamp> = state.stamp();
        Self {
            approval_status: state.status().as_str().to_string(),
            is_approved: state.is_approved(),
            approved_by: stamp.map(|s| s.approved_by),
            approved_at: stamp.map(|s| s.approved_at.clone()),
            approval_notes: state.notes().map(ToString::to_string),
        }
    }
}

impl TryFrom<ApprovalColumns> for ApprovalState {
    type Error = DomainError;

    fn try_from(columns: ApprovalColumns) -> Result<Self, Self::Error> {
        let status: ApprovalStatus = columns.approval_status.parse()?;

        if columns.is_approved != (status == ApprovalStatus::Approved) {
            return Err(DomainError::InconsistentApprovalState(format!(
                "is_approved={} disagrees with status '{}'",
                columns.is_approved, columns.approval_status
            )));
        }

        let stamp: Option<ApprovalStamp> = match (columns.approved_by, columns.approved_at) {
            (Some(approved_by), Some(approved_at)) => Some(ApprovalStamp {
                approved_by,
                approved_at,
            }),
            (None, None) => None,
            _ => {
                return Err(DomainError::InconsistentApprovalState(String::from(
                    "approved_by and approved_at must be set together",
                )));
            }
        };

        match status {
            ApprovalStatus::Pending => {
                if stamp.is_some() {
                    return Err(DomainError::InconsistentApprovalState(String::from(
                        "pending result carries approval metadata",
                    )));
                }
                Ok(Self::Pending {
                    notes: columns.approval_notes,
                })
            }
            ApprovalStatus::Approved => {
                let stamp: ApprovalStamp = stamp.ok_or_else(|| {
                    DomainError::InconsistentApprovalState(String::from(
                        "approved result is missing approved_by/approved_at",
                    ))
                })?;
                Ok(Self::Approved {
                    stamp,
                    notes: columns.approval_notes,
                })
            }
            ApprovalStatus::Rejected => Ok(Self::Rejected {
                notes: columns
                    .approval_notes
                    .unwrap_or_else(|| DEFAULT_REJECTION_NOTE.to_string()),
                previous: stamp,
            }),
        }
    }
}
