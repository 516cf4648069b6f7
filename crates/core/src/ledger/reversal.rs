//! Reversal of posted vouchers.
//!
//! A reversal never touches the original rows. It builds a new voucher with
//! every line on the opposite side, referenced back to the original.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryType, LedgerLine, LedgerReference, PostingRequest, reference_types};

/// A posted ledger row as needed for reversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedEntry {
    /// Position within the voucher.
    pub line_number: i32,
    /// Account code of the row.
    pub account_code: String,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Positive amount.
    pub amount: Decimal,
    /// Row description.
    pub description: Option<String>,
}

/// Stateless service for creating reversing vouchers.
pub struct ReversalService;

impl ReversalService {
    /// Prefix of generated reversal descriptions.
    pub const DESCRIPTION_PREFIX: &'static str = "Reversal: ";

    /// Builds the posting request that reverses `voucher_number`.
    ///
    /// For each original entry, in line order:
    /// - Debits become credits and credits become debits
    /// - Account and amount are preserved
    /// - Description is `description` if given, else the original prefixed
    ///   with "Reversal: "
    ///
    /// # Errors
    ///
    /// `VoucherNotFound` when `entries` is empty.
    pub fn create_reversing_entries(
        voucher_number: &str,
        entries: &[PostedEntry],
        description: Option<&str>,
        voucher_date: NaiveDate,
    ) -> Result<PostingRequest, LedgerError> {
        if entries.is_empty() {
            return Err(LedgerError::VoucherNotFound(voucher_number.to_string()));
        }

        let mut ordered: Vec<&PostedEntry> = entries.iter().collect();
        ordered.sort_by_key(|e| e.line_number);

        let lines = ordered
            .into_iter()
            .map(|entry| {
                let text = description.map_or_else(
                    || {
                        format!(
                            "{}{}",
                            Self::DESCRIPTION_PREFIX,
                            entry.description.as_deref().unwrap_or(voucher_number)
                        )
                    },
                    str::to_string,
                );
                LedgerLine {
                    account_code: entry.account_code.clone(),
                    entry_type: entry.entry_type.flip(),
                    amount: entry.amount,
                    description: Some(text),
                }
            })
            .collect();

        Ok(PostingRequest::new(lines)
            .with_reference(LedgerReference::new(
                reference_types::GENERAL_LEDGER,
                voucher_number,
            ))
            .with_voucher_date(voucher_date))
    }
}
