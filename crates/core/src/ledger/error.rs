//! Ledger error types for validation, policy and lookup failures.
//!
//! Every variant belongs to exactly one [`ErrorCategory`]. None of the
//! deterministic categories are retried: the same input fails the same way.

use chrono::NaiveDate;
use paybook_shared::AppError;
use paybook_shared::types::MAX_AMOUNT;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failure taxonomy shared by the ledger and payroll modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or unbalanced input, detected before any write.
    Validation,
    /// Unknown account code.
    AccountNotFound,
    /// Locked/closed period, summary or inactive account.
    PolicyViolation,
    /// Wrong approver acting.
    Authorization,
    /// Missing voucher, cycle or item.
    NotFound,
    /// Request conflicts with current state.
    Conflict,
    /// Storage unavailable, lock timeout, corrupt record.
    Infrastructure,
}

impl ErrorCategory {
    /// Converts a categorized message into an application error.
    #[must_use]
    pub fn into_app_error(self, message: String) -> AppError {
        match self {
            Self::Validation => AppError::Validation(message),
            Self::AccountNotFound | Self::NotFound => AppError::NotFound(message),
            Self::PolicyViolation => AppError::BusinessRule(message),
            Self::Authorization => AppError::Forbidden(message),
            Self::Conflict => AppError::Conflict(message),
            Self::Infrastructure => AppError::Database(message),
        }
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Voucher must have at least 2 entries.
    #[error("Voucher must have at least 2 entries")]
    InsufficientEntries,

    /// Entry has no account code.
    #[error("Entry {line} has no account code")]
    MissingAccountCode {
        /// Zero-based entry index.
        line: usize,
    },

    /// Entry amount is zero or negative.
    #[error("Entry {line} amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// Zero-based entry index.
        line: usize,
        /// The rejected amount.
        amount: Decimal,
    },

    /// Entry amount does not fit the ledger amount column.
    #[error("Entry {line} amount {amount} exceeds the maximum of {max}", max = MAX_AMOUNT)]
    AmountOutOfRange {
        /// Zero-based entry index.
        line: usize,
        /// The rejected amount.
        amount: Decimal,
    },

    /// Debits and credits differ by more than the tolerance.
    #[error("Voucher is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedVoucher {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Account Errors ==========
    /// Account code does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    // ========== Policy Errors ==========
    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(String),

    /// Account has child accounts and summary posting is prevented.
    #[error("Account {0} is a summary account and cannot receive postings")]
    SummaryAccount(String),

    /// No fiscal period covers the gate date.
    #[error("No fiscal period found for date {0}")]
    NoFiscalPeriod(NaiveDate),

    /// The covering fiscal period is locked or closed.
    #[error("Fiscal period covering {0} is locked or closed, no posting allowed")]
    PeriodClosed(NaiveDate),

    // ========== Lookup / State Errors ==========
    /// Voucher has no ledger entries.
    #[error("Voucher not found: {0}")]
    VoucherNotFound(String),

    /// Caller-supplied voucher number is already in use.
    #[error("Voucher number {0} is already in use")]
    DuplicateVoucher(String),

    // ========== Infrastructure Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the failure category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InsufficientEntries
            | Self::MissingAccountCode { .. }
            | Self::NonPositiveAmount { .. }
            | Self::AmountOutOfRange { .. }
            | Self::UnbalancedVoucher { .. } => ErrorCategory::Validation,
            Self::AccountNotFound(_) => ErrorCategory::AccountNotFound,
            Self::AccountInactive(_)
            | Self::SummaryAccount(_)
            | Self::NoFiscalPeriod(_)
            | Self::PeriodClosed(_) => ErrorCategory::PolicyViolation,
            Self::VoucherNotFound(_) => ErrorCategory::NotFound,
            Self::DuplicateVoucher(_) => ErrorCategory::Conflict,
            Self::Database(_) | Self::Internal(_) => ErrorCategory::Infrastructure,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientEntries => "INSUFFICIENT_ENTRIES",
            Self::MissingAccountCode { .. } => "MISSING_ACCOUNT_CODE",
            Self::NonPositiveAmount { .. } => "NON_POSITIVE_AMOUNT",
            Self::AmountOutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
            Self::UnbalancedVoucher { .. } => "UNBALANCED_VOUCHER",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::SummaryAccount(_) => "SUMMARY_ACCOUNT",
            Self::NoFiscalPeriod(_) => "NO_FISCAL_PERIOD",
            Self::PeriodClosed(_) => "PERIOD_CLOSED",
            Self::VoucherNotFound(_) => "VOUCHER_NOT_FOUND",
            Self::DuplicateVoucher(_) => "DUPLICATE_VOUCHER",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            ErrorCategory::Authorization => 403,
            ErrorCategory::AccountNotFound | ErrorCategory::NotFound => 404,
            ErrorCategory::Conflict => 409,
            ErrorCategory::PolicyViolation => 422,
            ErrorCategory::Infrastructure => 500,
        }
    }

    /// Returns true if a caller may retry the same request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Infrastructure
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        err.category().into_app_error(err.to_string())
    }
}
