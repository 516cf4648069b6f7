//! Payroll domain types.
//!
//! Cycle and item statuses, the approval trail, and the amount arithmetic
//! shared by the builder, settlement and item updates.

use chrono::{DateTime, Utc};
use paybook_shared::types::{EmployeeId, UserId, checked_sum, within_amount_range};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::PayrollError;

/// Nature of a payroll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleType {
    /// Regular salary run, amounts taken from employee records.
    Salary,
    /// One-off bonus.
    Bonus,
    /// Incentive payout.
    Incentive,
    /// Anything else.
    Other,
}

impl CycleType {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Bonus => "bonus",
            Self::Incentive => "incentive",
            Self::Other => "other",
        }
    }
}

/// Payroll cycle status.
///
/// The valid transitions are:
/// - Draft → PendingApproval (creator starts the chain)
/// - Draft/PendingApproval → Approved (chain exhausted)
/// - Approved ↔ Paid (derived by reconciliation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// Created by the builder, no approver assigned.
    Draft,
    /// Waiting on `current_approver`.
    PendingApproval,
    /// Accrued, awaiting settlement.
    Approved,
    /// Every active item settled.
    Paid,
}

impl CycleStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Paid => "paid",
        }
    }

    /// Whether the approval chain is finished.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved | Self::Paid)
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payroll item status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Included in settlement and in the fully-paid check.
    Active,
    /// Skipped by settlement and by the fully-paid check.
    OnHold,
}

impl ItemStatus {
    /// The other status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::OnHold,
            Self::OnHold => Self::Active,
        }
    }
}

/// Kind of disbursement recorded against an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollTransactionType {
    /// Settles the item's net salary.
    Payment,
    /// Advance paid ahead of the cycle. Not counted as settlement.
    Advance,
}

/// Employment status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Working.
    Active,
    /// On leave.
    OnLeave,
    /// Suspended.
    Suspended,
    /// No longer employed.
    Terminated,
}

/// One sign-off in a cycle's approval trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalTrailEntry {
    /// The approving user.
    pub approver: UserId,
    /// Display name at the time of approval.
    pub name: String,
    /// Recorded action, always "approved".
    pub action: String,
    /// When the approval happened.
    pub timestamp: DateTime<Utc>,
}

impl ApprovalTrailEntry {
    /// Action recorded for a sign-off.
    pub const APPROVED: &'static str = "approved";

    /// Creates an "approved" trail entry.
    #[must_use]
    pub fn approved(approver: UserId, name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            approver,
            name: name.into(),
            action: Self::APPROVED.to_string(),
            timestamp,
        }
    }
}

/// Amount components of one payroll item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAmounts {
    /// Base amount.
    pub base_salary: Decimal,
    /// Sum of allowances.
    pub allowances: Decimal,
    /// Sum of deductions.
    pub deductions: Decimal,
}

impl ItemAmounts {
    /// Creates item amounts.
    #[must_use]
    pub const fn new(base_salary: Decimal, allowances: Decimal, deductions: Decimal) -> Self {
        Self {
            base_salary,
            allowances,
            deductions,
        }
    }

    /// Gross = base + allowances.
    #[must_use]
    pub fn gross(&self) -> Decimal {
        self.base_salary + self.allowances
    }

    /// Net = gross - deductions.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.gross() - self.deductions
    }

    /// Checks the amounts of `employee`'s item.
    ///
    /// Range is checked before gross and net are computed.
    ///
    /// # Errors
    ///
    /// - `NegativeAmount` for a negative component
    /// - `AmountOutOfRange` when a component or the gross does not fit the amount columns
    /// - `NegativeNetPay` when deductions exceed gross
    pub fn check(&self, employee: EmployeeId) -> Result<(), PayrollError> {
        let components = [self.base_salary, self.allowances, self.deductions];
        if components.iter().any(|amount| *amount < Decimal::ZERO) {
            return Err(PayrollError::NegativeAmount);
        }
        if !components.into_iter().all(within_amount_range) || !within_amount_range(self.gross()) {
            return Err(PayrollError::AmountOutOfRange);
        }
        if self.net() < Decimal::ZERO {
            return Err(PayrollError::NegativeNetPay(employee));
        }
        Ok(())
    }
}

/// Cycle totals, always recomputed from the full item set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleTotals {
    /// Sum of item gross amounts.
    pub total_gross: Decimal,
    /// Sum of item deductions.
    pub total_deductions: Decimal,
    /// Sum of item net amounts.
    pub total_net: Decimal,
}

impl CycleTotals {
    /// Sums the amounts of every item.
    ///
    /// # Errors
    ///
    /// `AmountOutOfRange` if a sum overflows.
    pub fn from_items<'a>(
        items: impl IntoIterator<Item = &'a ItemAmounts>,
    ) -> Result<Self, PayrollError> {
        let items: Vec<&ItemAmounts> = items.into_iter().collect();
        Ok(Self {
            total_gross: total(items.iter().map(|item| item.gross()))?,
            total_deductions: total(items.iter().map(|item| item.deductions))?,
            total_net: total(items.iter().map(|item| item.net()))?,
        })
    }
}

fn total(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, PayrollError> {
    checked_sum(amounts).ok_or(PayrollError::AmountOutOfRange)
}
