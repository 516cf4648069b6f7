//! Payroll accrual, approval and settlement logic.
//!
//! This module implements the payroll workflow on top of the ledger:
//! - Cycle building from the employee directory
//! - The manager-based approval chain
//! - Accrual and settlement vouchers
//! - Settlement planning and derived `paid` status

pub mod approval;
pub mod builder;
pub mod error;
pub mod postings;
pub mod reconciliation;
pub mod settlement;
pub mod types;

#[cfg(test)]
mod approval_props;
#[cfg(test)]
mod settlement_props;

pub use approval::{ApprovalChain, ApprovalOutcome, ApprovalState, ApproverResolver, OrgChart};
pub use builder::{
    CycleBuilder, CycleSpec, DraftCycle, DraftItem, EmployeeProfile, PayComponent, TargetSelection,
};
pub use error::PayrollError;
pub use postings::{PayrollPostings, SettlementScope};
pub use reconciliation::reconcile_status;
pub use settlement::{ItemPaymentState, PlannedPayment, SettlementPlan, SettlementService};
pub use types::{
    ApprovalTrailEntry, CycleStatus, CycleTotals, CycleType, EmploymentStatus, ItemAmounts,
    ItemStatus, PayrollTransactionType,
};
