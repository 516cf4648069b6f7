//! Payroll error types for cycle building, approval and settlement.

use paybook_shared::AppError;
use paybook_shared::types::{EmployeeId, MAX_AMOUNT, PayrollCycleId, PayrollItemId, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::CycleStatus;
use crate::ledger::{ErrorCategory, LedgerError};

/// Errors that can occur during payroll operations.
#[derive(Debug, Error)]
pub enum PayrollError {
    // ========== Builder Errors ==========
    /// Cycle name is blank.
    #[error("Cycle name is required")]
    EmptyName,

    /// Period end precedes period start.
    #[error("Period end {end} is before period start {start}")]
    InvalidPeriod {
        /// Period start.
        start: chrono::NaiveDate,
        /// Period end.
        end: chrono::NaiveDate,
    },

    /// Target selection matched no employee.
    #[error("No employees selected for the cycle")]
    NoEmployeesSelected,

    /// An amount component is negative.
    #[error("Amounts must not be negative")]
    NegativeAmount,

    /// An amount, or a total built from it, exceeds the amount column range.
    #[error("Amounts must not exceed {max}", max = MAX_AMOUNT)]
    AmountOutOfRange,

    /// Deductions exceed gross for an employee.
    #[error("Net pay for employee {0} would be negative")]
    NegativeNetPay(EmployeeId),

    // ========== Approval Errors ==========
    /// Someone other than the current approver acted.
    #[error("User {actual} is not the current approver (expected {expected})")]
    NotCurrentApprover {
        /// The assigned approver.
        expected: UserId,
        /// The user who attempted to act.
        actual: UserId,
    },

    /// The operation is not valid in the cycle's status.
    #[error("Cannot {action} a cycle in status {from}")]
    InvalidTransition {
        /// Current cycle status.
        from: CycleStatus,
        /// Attempted action.
        action: &'static str,
    },

    // ========== Settlement Errors ==========
    /// Payments need an approved cycle.
    #[error("Cycle must be approved before payment, current status is {0}")]
    CycleNotApproved(CycleStatus),

    /// Payment amount is zero or negative.
    #[error("Payment amount must be positive, got {0}")]
    NonPositivePayment(Decimal),

    /// Payment exceeds the item's remaining balance.
    #[error("Payment of {requested} exceeds remaining balance {remaining}")]
    Overpayment {
        /// Unpaid net salary.
        remaining: Decimal,
        /// Requested amount.
        requested: Decimal,
    },

    /// Item is on hold.
    #[error("Payroll item {0} is on hold")]
    ItemOnHold(PayrollItemId),

    // ========== Lookup Errors ==========
    /// Cycle does not exist.
    #[error("Payroll cycle {0} not found")]
    CycleNotFound(PayrollCycleId),

    /// Item does not exist.
    #[error("Payroll item {0} not found")]
    ItemNotFound(PayrollItemId),

    // ========== Wrapped / Infrastructure ==========
    /// Failure from the ledger poster.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PayrollError {
    /// Returns the failure category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyName
            | Self::InvalidPeriod { .. }
            | Self::NoEmployeesSelected
            | Self::NegativeAmount
            | Self::AmountOutOfRange
            | Self::NegativeNetPay(_)
            | Self::NonPositivePayment(_)
            | Self::Overpayment { .. } => ErrorCategory::Validation,
            Self::NotCurrentApprover { .. } => ErrorCategory::Authorization,
            Self::InvalidTransition { .. } | Self::CycleNotApproved(_) | Self::ItemOnHold(_) => {
                ErrorCategory::Conflict
            }
            Self::CycleNotFound(_) | Self::ItemNotFound(_) => ErrorCategory::NotFound,
            Self::Ledger(err) => err.category(),
            Self::Database(_) | Self::Internal(_) => ErrorCategory::Infrastructure,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "EMPTY_NAME",
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::NoEmployeesSelected => "NO_EMPLOYEES_SELECTED",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
            Self::NegativeNetPay(_) => "NEGATIVE_NET_PAY",
            Self::NotCurrentApprover { .. } => "NOT_CURRENT_APPROVER",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CycleNotApproved(_) => "CYCLE_NOT_APPROVED",
            Self::NonPositivePayment(_) => "NON_POSITIVE_PAYMENT",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::ItemOnHold(_) => "ITEM_ON_HOLD",
            Self::CycleNotFound(_) => "CYCLE_NOT_FOUND",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::Ledger(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if a caller may retry the same request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Infrastructure
    }
}

impl From<PayrollError> for AppError {
    fn from(err: PayrollError) -> Self {
        err.category().into_app_error(err.to_string())
    }
}
