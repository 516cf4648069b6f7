//! Property-based tests for the approval chain.
//!
//! Walks generated management hierarchies from the bottom to the top and
//! checks how many sign-offs and status changes each walk produces.

use chrono::Utc;
use paybook_shared::types::UserId;
use proptest::prelude::*;

use super::approval::{ApprovalChain, ApprovalOutcome, ApprovalState, OrgChart};
use super::error::PayrollError;
use super::types::CycleStatus;

/// Builds a linear hierarchy of `depth` users; index 0 reports to 1, and so on.
fn linear_chart(depth: usize) -> (Vec<UserId>, OrgChart) {
    let users: Vec<UserId> = (0..depth).map(|_| UserId::new()).collect();
    let mut chart = OrgChart::new();
    for (i, user) in users.iter().enumerate() {
        chart.insert(*user, format!("User {i}"), users.get(i + 1).copied());
    }
    (users, chart)
}

fn apply(state: &mut ApprovalState, outcome: &ApprovalOutcome) {
    state.status = outcome.new_status();
    state.current_approver = outcome.current_approver();
    if let Some(entry) = outcome.trail_entry() {
        state.trail.push(entry.clone());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* hierarchy depth, a walk started by the bottom user ends
    /// approved after one sign-off per manager above the creator, and only
    /// the final step completes.
    #[test]
    fn prop_walk_completes_exactly_once(depth in 1usize..8) {
        let (users, chart) = linear_chart(depth);
        let mut state = ApprovalState {
            status: CycleStatus::Draft,
            created_by: users[0],
            current_approver: None,
            trail: vec![],
        };

        let mut completions = 0;
        for acting in &users {
            let outcome = ApprovalChain::approve(&state, *acting, &chart, Utc::now()).unwrap();
            if matches!(outcome, ApprovalOutcome::Completed { .. }) {
                completions += 1;
            }
            apply(&mut state, &outcome);
        }

        prop_assert_eq!(completions, 1);
        prop_assert_eq!(state.status, CycleStatus::Approved);
        prop_assert_eq!(state.current_approver, None);
        let expected_signoffs = if depth == 1 { 1 } else { depth - 1 };
        prop_assert_eq!(state.trail.len(), expected_signoffs);
    }

    /// *For any* pending step, every user other than the current approver
    /// is rejected and the state is left untouched.
    #[test]
    fn prop_only_current_approver_may_act(depth in 2usize..8, step in 0usize..8) {
        let (users, chart) = linear_chart(depth);
        let current = users[(step % (depth - 1)) + 1];
        let state = ApprovalState {
            status: CycleStatus::PendingApproval,
            created_by: users[0],
            current_approver: Some(current),
            trail: vec![],
        };

        for acting in users.iter().filter(|u| **u != current) {
            let result = ApprovalChain::approve(&state, *acting, &chart, Utc::now());
            let is_auth_error = matches!(result, Err(PayrollError::NotCurrentApprover { .. }));
            prop_assert!(is_auth_error);
        }
        prop_assert!(ApprovalChain::approve(&state, current, &chart, Utc::now()).is_ok());
    }
}
