//! Sequential manager-based approval chain.
//!
//! The state machine only knows users; who manages whom comes from an
//! [`ApproverResolver`], so any organisation chart can drive it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use paybook_shared::types::UserId;

use super::error::PayrollError;
use super::types::{ApprovalTrailEntry, CycleStatus};

/// Capability to walk the management hierarchy.
pub trait ApproverResolver {
    /// The user who approves after `user`, or `None` at the top of the hierarchy.
    fn next_approver(&self, user: UserId) -> Option<UserId>;

    /// Name recorded in the approval trail.
    fn display_name(&self, user: UserId) -> String;
}

#[derive(Debug, Clone)]
struct OrgNode {
    name: String,
    manager: Option<UserId>,
}

/// In-memory organisation chart keyed by user.
#[derive(Debug, Clone, Default)]
pub struct OrgChart {
    nodes: HashMap<UserId, OrgNode>,
}

impl OrgChart {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user and their manager.
    pub fn insert(&mut self, user: UserId, name: impl Into<String>, manager: Option<UserId>) {
        self.nodes.insert(
            user,
            OrgNode {
                name: name.into(),
                manager,
            },
        );
    }

    /// Builder-style [`Self::insert`].
    #[must_use]
    pub fn with(mut self, user: UserId, name: impl Into<String>, manager: Option<UserId>) -> Self {
        self.insert(user, name, manager);
        self
    }
}

impl ApproverResolver for OrgChart {
    fn next_approver(&self, user: UserId) -> Option<UserId> {
        self.nodes
            .get(&user)
            .and_then(|node| node.manager)
            .filter(|manager| *manager != user)
    }

    fn display_name(&self, user: UserId) -> String {
        self.nodes
            .get(&user)
            .map_or_else(|| user.to_string(), |node| node.name.clone())
    }
}

/// Approval-relevant slice of a cycle.
#[derive(Debug, Clone)]
pub struct ApprovalState {
    /// Current status.
    pub status: CycleStatus,
    /// User who generated the cycle.
    pub created_by: UserId,
    /// Only this user may act, when set.
    pub current_approver: Option<UserId>,
    /// Sign-offs so far, oldest first.
    pub trail: Vec<ApprovalTrailEntry>,
}

/// Result of one approval action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The creator started the chain. No trail entry is written.
    Submitted {
        /// First approver in the chain.
        next_approver: UserId,
    },
    /// A sign-off was recorded and the cycle moves up the chain.
    Forwarded {
        /// The recorded sign-off.
        entry: ApprovalTrailEntry,
        /// Next approver in the chain.
        next_approver: UserId,
    },
    /// The last sign-off was recorded; the cycle is approved and must be accrued.
    Completed {
        /// The recorded sign-off.
        entry: ApprovalTrailEntry,
        /// Final approver.
        approved_by: UserId,
        /// Time of the final approval.
        approved_at: DateTime<Utc>,
    },
}

impl ApprovalOutcome {
    /// Returns the status the cycle moves to.
    #[must_use]
    pub const fn new_status(&self) -> CycleStatus {
        match self {
            Self::Submitted { .. } | Self::Forwarded { .. } => CycleStatus::PendingApproval,
            Self::Completed { .. } => CycleStatus::Approved,
        }
    }

    /// Returns the approver assigned after this action.
    #[must_use]
    pub const fn current_approver(&self) -> Option<UserId> {
        match self {
            Self::Submitted { next_approver } | Self::Forwarded { next_approver, .. } => {
                Some(*next_approver)
            }
            Self::Completed { .. } => None,
        }
    }

    /// Returns the trail entry to append, if any.
    #[must_use]
    pub const fn trail_entry(&self) -> Option<&ApprovalTrailEntry> {
        match self {
            Self::Submitted { .. } => None,
            Self::Forwarded { entry, .. } | Self::Completed { entry, .. } => Some(entry),
        }
    }
}

/// Stateless approval state machine.
pub struct ApprovalChain;

impl ApprovalChain {
    /// Applies one approval by `acting` to `state`.
    ///
    /// A next approver who already signed, or who is the acting user, ends
    /// the chain so a looping hierarchy cannot stall a cycle.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the cycle is already approved or paid
    /// - `NotCurrentApprover` if an approver is assigned and `acting` is someone else
    pub fn approve<R: ApproverResolver + ?Sized>(
        state: &ApprovalState,
        acting: UserId,
        resolver: &R,
        now: DateTime<Utc>,
    ) -> Result<ApprovalOutcome, PayrollError> {
        if state.status.is_approved() {
            return Err(PayrollError::InvalidTransition {
                from: state.status,
                action: "approve",
            });
        }

        if let Some(expected) = state.current_approver
            && expected != acting
        {
            return Err(PayrollError::NotCurrentApprover {
                expected,
                actual: acting,
            });
        }

        let next = resolver
            .next_approver(acting)
            .filter(|next| *next != acting && !state.trail.iter().any(|e| e.approver == *next));

        if state.status == CycleStatus::Draft
            && acting == state.created_by
            && let Some(next_approver) = next
        {
            return Ok(ApprovalOutcome::Submitted { next_approver });
        }

        let entry = ApprovalTrailEntry::approved(acting, resolver.display_name(acting), now);
        Ok(match next {
            Some(next_approver) => ApprovalOutcome::Forwarded {
                entry,
                next_approver,
            },
            None => ApprovalOutcome::Completed {
                entry,
                approved_by: acting,
                approved_at: now,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Chain {
        clerk: UserId,
        manager: UserId,
        director: UserId,
        chart: OrgChart,
    }

    fn chain() -> Chain {
        let (clerk, manager, director) = (UserId::new(), UserId::new(), UserId::new());
        let chart = OrgChart::new()
            .with(clerk, "Clerk", Some(manager))
            .with(manager, "Manager", Some(director))
            .with(director, "Director", None);
        Chain {
            clerk,
            manager,
            director,
            chart,
        }
    }

    fn draft(created_by: UserId) -> ApprovalState {
        ApprovalState {
            status: CycleStatus::Draft,
            created_by,
            current_approver: None,
            trail: vec![],
        }
    }

    fn apply(state: &mut ApprovalState, outcome: &ApprovalOutcome) {
        state.status = outcome.new_status();
        state.current_approver = outcome.current_approver();
        if let Some(entry) = outcome.trail_entry() {
            state.trail.push(entry.clone());
        }
    }

    #[test]
    fn test_creator_bootstraps_without_trail() {
        let c = chain();
        let outcome = ApprovalChain::approve(&draft(c.clerk), c.clerk, &c.chart, Utc::now()).unwrap();
        assert_eq!(outcome, ApprovalOutcome::Submitted { next_approver: c.manager });
        assert_eq!(outcome.new_status(), CycleStatus::PendingApproval);
        assert!(outcome.trail_entry().is_none());
    }

    #[test]
    fn test_full_walk_to_approved() {
        let c = chain();
        let mut state = draft(c.clerk);

        for acting in [c.clerk, c.manager, c.director] {
            let outcome = ApprovalChain::approve(&state, acting, &c.chart, Utc::now()).unwrap();
            apply(&mut state, &outcome);
        }

        assert_eq!(state.status, CycleStatus::Approved);
        assert_eq!(state.current_approver, None);
        let names: Vec<&str> = state.trail.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Manager", "Director"]);
        assert!(state.trail.iter().all(|e| e.action == "approved"));
    }

    #[test]
    fn test_wrong_approver_rejected() {
        let c = chain();
        let state = ApprovalState {
            status: CycleStatus::PendingApproval,
            created_by: c.clerk,
            current_approver: Some(c.manager),
            trail: vec![],
        };
        let result = ApprovalChain::approve(&state, c.director, &c.chart, Utc::now());
        assert!(matches!(
            result,
            Err(PayrollError::NotCurrentApprover { expected, actual })
                if expected == c.manager && actual == c.director
        ));
    }

    #[test]
    fn test_top_of_hierarchy_creator_approves_directly() {
        let c = chain();
        let outcome =
            ApprovalChain::approve(&draft(c.director), c.director, &c.chart, Utc::now()).unwrap();
        assert!(matches!(outcome, ApprovalOutcome::Completed { approved_by, .. } if approved_by == c.director));
    }

    #[test]
    fn test_approved_cycle_cannot_be_approved_again() {
        let c = chain();
        let mut state = draft(c.clerk);
        state.status = CycleStatus::Paid;
        assert!(matches!(
            ApprovalChain::approve(&state, c.clerk, &c.chart, Utc::now()),
            Err(PayrollError::InvalidTransition { from: CycleStatus::Paid, .. })
        ));
    }

    #[test]
    fn test_loop_in_hierarchy_ends_chain() {
        let (a, b) = (UserId::new(), UserId::new());
        let chart = OrgChart::new().with(a, "A", Some(b)).with(b, "B", Some(a));
        let mut state = draft(a);

        let outcome = ApprovalChain::approve(&state, a, &chart, Utc::now()).unwrap();
        apply(&mut state, &outcome);
        let outcome = ApprovalChain::approve(&state, b, &chart, Utc::now()).unwrap();
        apply(&mut state, &outcome);
        assert_eq!(state.status, CycleStatus::PendingApproval);
        assert_eq!(state.current_approver, Some(a));

        let outcome = ApprovalChain::approve(&state, a, &chart, Utc::now()).unwrap();
        assert_eq!(outcome.new_status(), CycleStatus::Approved);
    }

    #[test]
    fn test_unknown_user_display_name_falls_back_to_id() {
        let user = UserId::new();
        assert_eq!(OrgChart::new().display_name(user), user.to_string());
    }
}
