//! Business rule validation for ledger lines.
//!
//! Runs once at the posting boundary, before any storage is touched.

use paybook_shared::types::within_amount_range;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{LedgerLine, VoucherTotals};

/// Minimum number of lines in a voucher.
pub const MIN_LINES: usize = 2;

/// Validates voucher lines and returns their totals.
///
/// Checks, in order: at least [`MIN_LINES`] lines, every line has an account
/// code, every amount is positive and within the amount column range,
/// debits equal credits within 0.01.
///
/// # Errors
///
/// Returns the first validation failure found.
pub fn validate_lines(lines: &[LedgerLine]) -> Result<VoucherTotals, LedgerError> {
    if lines.len() < MIN_LINES {
        return Err(LedgerError::InsufficientEntries);
    }

    for (line, entry) in lines.iter().enumerate() {
        if entry.account_code.trim().is_empty() {
            return Err(LedgerError::MissingAccountCode { line });
        }
        if entry.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount {
                line,
                amount: entry.amount,
            });
        }
        if !within_amount_range(entry.amount) {
            return Err(LedgerError::AmountOutOfRange {
                line,
                amount: entry.amount,
            });
        }
    }

    // Bounded lines cannot overflow short of billions of rows.
    let totals = VoucherTotals::from_lines(lines).ok_or(LedgerError::AmountOutOfRange {
        line: lines.len() - 1,
        amount: Decimal::MAX,
    })?;
    if !totals.is_balanced() {
        return Err(LedgerError::UnbalancedVoucher {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}
