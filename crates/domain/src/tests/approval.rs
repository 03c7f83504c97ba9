// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApprovalColumns, ApprovalStamp, ApprovalState, ApprovalStatus, ApprovalTransition,
    DEFAULT_REJECTION_NOTE, DomainError,
};

fn approve(admin_id: i64, notes: Option<&str>) -> ApprovalTransition {
    ApprovalTransition::Approve {
        admin_id,
        at: String::from("2025-01-10T09:00:00.000000Z"),
        notes: notes.map(ToString::to_string),
    }
}

fn approved_state() -> ApprovalState {
    ApprovalState::default().apply(approve(7, Some("looks good")))
}

#[test]
fn test_default_state_is_pending_without_notes() {
    let state = ApprovalState::default();
    assert_eq!(state, ApprovalState::Pending { notes: None });
    assert!(!state.is_approved());
}

#[test]
fn test_approve_sets_stamp_and_notes() {
    let state = approved_state();
    assert!(state.is_approved());
    assert_eq!(state.stamp().unwrap().approved_by, 7);
    assert_eq!(state.notes(), Some("looks good"));
}

#[test]
fn test_reject_without_notes_uses_default_note() {
    let state = ApprovalState::default().apply(ApprovalTransition::Reject { notes: None });
    assert_eq!(state.status(), ApprovalStatus::Rejected);
    assert_eq!(state.notes(), Some(DEFAULT_REJECTION_NOTE));
}

#[test]
fn test_reject_after_approval_keeps_previous_stamp() {
    let state = approved_state().apply(ApprovalTransition::Reject {
        notes: Some(String::from("missing final exam")),
    });
    assert!(!state.is_approved());
    assert_eq!(state.notes(), Some("missing final exam"));
    assert_eq!(state.stamp().unwrap().approved_by, 7);
}

#[test]
fn test_approve_is_allowed_from_rejected() {
    let state = ApprovalState::default()
        .apply(ApprovalTransition::Reject { notes: None })
        .apply(approve(3, None));
    assert!(state.is_approved());
    assert_eq!(state.notes(), None);
}

#[test]
fn test_reset_for_edit_clears_stamp_and_keeps_notes() {
    let state = approved_state()
        .apply(ApprovalTransition::Reject {
            notes: Some(String::from("recheck midterm")),
        })
        .reset_for_edit();
    assert_eq!(
        state,
        ApprovalState::Pending {
            notes: Some(String::from("recheck midterm"))
        }
    );
    assert!(state.stamp().is_none());
}

#[test]
fn test_columns_round_trip_for_every_state() {
    let states = [
        ApprovalState::default(),
        approved_state(),
        approved_state().apply(ApprovalTransition::Reject { notes: None }),
        ApprovalState::default().apply(ApprovalTransition::Reject { notes: None }),
    ];
    for state in states {
        let columns = ApprovalColumns::from(&state);
        assert_eq!(columns.is_approved, state.is_approved());
        assert_eq!(ApprovalState::try_from(columns).unwrap(), state);
    }
}

#[test]
fn test_approved_columns_carry_stamp() {
    let columns = ApprovalColumns::from(&approved_state());
    assert_eq!(columns.approval_status, "approved");
    assert_eq!(columns.approved_by, Some(7));
    assert!(columns.approved_at.is_some());
}

#[test]
fn test_approved_columns_without_stamp_are_rejected() {
    let columns = ApprovalColumns {
        approval_status: String::from("approved"),
        is_approved: true,
        approved_by: None,
        approved_at: None,
        approval_notes: None,
    };
    assert!(matches!(
        ApprovalState::try_from(columns),
        Err(DomainError::InconsistentApprovalState(_))
    ));
}

#[test]
fn test_flag_disagreeing_with_status_is_rejected() {
    let columns = ApprovalColumns {
        approval_status: String::from("pending"),
        is_approved: true,
        approved_by: Some(1),
        approved_at: Some(String::from("2025-01-10T09:00:00.000000Z")),
        approval_notes: None,
    };
    assert!(ApprovalState::try_from(columns).is_err());
}

#[test]
fn test_half_stamp_is_rejected() {
    let columns = ApprovalColumns {
        approval_status: String::from("rejected"),
        is_approved: false,
        approved_by: Some(1),
        approved_at: None,
        approval_notes: Some(String::from("x")),
    };
    assert!(ApprovalState::try_from(columns).is_err());
}

#[test]
fn test_unknown_status_is_rejected() {
    assert!(matches!(
        "archived".parse::<ApprovalStatus>(),
        Err(DomainError::InvalidApprovalStatus(_))
    ));
}

#[test]
fn test_stamp_equality() {
    let stamp = ApprovalStamp {
        approved_by: 7,
        approved_at: String::from("2025-01-10T09:00:00.000000Z"),
    };
    assert_eq!(approved_state().stamp(), Some(&stamp));
}
