//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Voucher line validation and posting policy
//! - Fiscal period gating
//! - Balance and trial balance calculations
//! - Reversal voucher generation
//! - Voucher number formatting

pub mod account;
pub mod balance;
pub mod error;
pub mod fiscal;
pub mod reversal;
pub mod sequence;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use account::{AccountInfo, AccountType};
pub use balance::{AccountActivity, NormalBalance, TrialBalance, TrialBalanceLine};
pub use error::{ErrorCategory, LedgerError};
pub use fiscal::FiscalPeriodInfo;
pub use reversal::{PostedEntry, ReversalService};
pub use sequence::{VOUCHER_DOCUMENT_TYPE, format_document_number};
pub use service::LedgerService;
pub use types::{
    EntryType, LedgerLine, LedgerReference, PostingContext, PostingPolicy, PostingRequest,
    PreparedVoucher, ResolvedLine, VoucherTotals, reference_types,
};
