//! Ledger domain types for posting and validation.
//!
//! This module defines the core types used for posting balanced vouchers
//! to the general ledger.

use chrono::{NaiveDate, Utc};
use paybook_shared::config::{LedgerConfig, PeriodGate};
use paybook_shared::types::{AccountId, FiscalPeriodId, UserId, amounts_match};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Entry type: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntryType {
    /// Returns the opposite side.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }
}

/// Reference types tagged onto vouchers posted by this crate.
pub mod reference_types {
    /// Reversal vouchers, referencing the reversed voucher number.
    pub const GENERAL_LEDGER: &str = "general_ledger";
    /// Payroll accrual and bulk settlement vouchers.
    pub const PAYROLL_CYCLE: &str = "payroll_cycle";
    /// Per-item payroll payment vouchers.
    pub const PAYROLL_ITEM: &str = "payroll_item";
}

/// Links a voucher to the document that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReference {
    /// Kind of source document (see [`reference_types`]).
    pub reference_type: String,
    /// Identifier of the source document.
    pub reference_id: String,
}

impl LedgerReference {
    /// Creates a reference.
    #[must_use]
    pub fn new(reference_type: &str, reference_id: impl ToString) -> Self {
        Self {
            reference_type: reference_type.to_string(),
            reference_id: reference_id.to_string(),
        }
    }
}

/// One validated-at-the-boundary ledger line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Account code to post to.
    pub account_code: String,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Positive amount.
    pub amount: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

impl LedgerLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            entry_type: EntryType::Debit,
            amount,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            entry_type: EntryType::Credit,
            amount,
            description: None,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A request to post one voucher.
#[derive(Debug, Clone, Default)]
pub struct PostingRequest {
    /// The voucher lines (at least 2, balanced).
    pub lines: Vec<LedgerLine>,
    /// Optional source document reference.
    pub reference: Option<LedgerReference>,
    /// Caller-supplied voucher number; allocated from the sequence when absent.
    pub voucher_number: Option<String>,
    /// Voucher date; defaults to the posting date.
    pub voucher_date: Option<NaiveDate>,
}

impl PostingRequest {
    /// Creates a request from lines.
    #[must_use]
    pub fn new(lines: Vec<LedgerLine>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    /// Tags the voucher with a source reference.
    #[must_use]
    pub fn with_reference(mut self, reference: LedgerReference) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Uses a caller-supplied voucher number.
    #[must_use]
    pub fn with_voucher_number(mut self, voucher_number: impl Into<String>) -> Self {
        self.voucher_number = Some(voucher_number.into());
        self
    }

    /// Uses an explicit voucher date.
    #[must_use]
    pub fn with_voucher_date(mut self, voucher_date: NaiveDate) -> Self {
        self.voucher_date = Some(voucher_date);
        self
    }
}

/// Posting rules passed explicitly into every posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingPolicy {
    /// Reject postings to accounts with children.
    pub prevent_summary_posting: bool,
    /// Date used to resolve the fiscal period.
    pub period_gate: PeriodGate,
}

impl Default for PostingPolicy {
    fn default() -> Self {
        Self {
            prevent_summary_posting: true,
            period_gate: PeriodGate::PostingDate,
        }
    }
}

impl From<&LedgerConfig> for PostingPolicy {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            prevent_summary_posting: config.prevent_summary_posting,
            period_gate: config.period_gate,
        }
    }
}

/// Call-boundary context of a posting: who posts, on which real date, under which rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingContext {
    /// Real date of the posting.
    pub posting_date: NaiveDate,
    /// User recorded as creator of the ledger rows.
    pub posted_by: UserId,
    /// Posting rules.
    pub policy: PostingPolicy,
}

impl PostingContext {
    /// Creates a context for an explicit posting date.
    #[must_use]
    pub const fn new(posting_date: NaiveDate, posted_by: UserId, policy: PostingPolicy) -> Self {
        Self {
            posting_date,
            posted_by,
            policy,
        }
    }

    /// Creates a context dated today (UTC).
    #[must_use]
    pub fn today(posted_by: UserId, policy: PostingPolicy) -> Self {
        Self::new(Utc::now().date_naive(), posted_by, policy)
    }
}

/// Debit and credit sums of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoucherTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
}

impl VoucherTotals {
    /// Sums the lines by side, or `None` if a side overflows.
    #[must_use]
    pub fn from_lines(lines: &[LedgerLine]) -> Option<Self> {
        lines.iter().try_fold(
            Self {
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
            },
            |mut totals, line| {
                match line.entry_type {
                    EntryType::Debit => totals.debit = totals.debit.checked_add(line.amount)?,
                    EntryType::Credit => totals.credit = totals.credit.checked_add(line.amount)?,
                }
                Some(totals)
            },
        )
    }

    /// Whether debits equal credits within the money tolerance.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        amounts_match(self.debit, self.credit)
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A ledger line with its account resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    /// Resolved account.
    pub account_id: AccountId,
    /// The code the line was posted with.
    pub account_code: String,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Positive amount.
    pub amount: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

/// A voucher that passed every check and is ready to be written.
#[derive(Debug, Clone)]
pub struct PreparedVoucher {
    /// Voucher date written on every row.
    pub voucher_date: NaiveDate,
    /// Fiscal period the rows belong to.
    pub fiscal_period_id: FiscalPeriodId,
    /// Resolved lines in request order.
    pub lines: Vec<ResolvedLine>,
    /// Debit and credit sums.
    pub totals: VoucherTotals,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_type_flip() {
        assert_eq!(EntryType::Debit.flip(), EntryType::Credit);
        assert_eq!(EntryType::Credit.flip(), EntryType::Debit);
        assert_eq!(EntryType::Debit.flip().flip(), EntryType::Debit);
    }

    #[test]
    fn test_entry_type_serde_uppercase() {
        assert_eq!(
            serde_json::to_string(&EntryType::Debit).unwrap(),
            "\"DEBIT\""
        );
        let parsed: EntryType = serde_json::from_str("\"CREDIT\"").unwrap();
        assert_eq!(parsed, EntryType::Credit);
    }

    #[test]
    fn test_voucher_totals_balanced() {
        let lines = vec![
            LedgerLine::debit("5100", dec!(100)),
            LedgerLine::credit("2100", dec!(60)),
            LedgerLine::credit("2110", dec!(40)),
        ];
        let totals = VoucherTotals::from_lines(&lines).unwrap();
        assert_eq!(totals.debit, dec!(100));
        assert_eq!(totals.credit, dec!(100));
        assert!(totals.is_balanced());
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_voucher_totals_within_tolerance() {
        let lines = vec![
            LedgerLine::debit("5100", dec!(100.00)),
            LedgerLine::credit("2100", dec!(99.99)),
        ];
        assert!(VoucherTotals::from_lines(&lines).unwrap().is_balanced());
    }

    #[test]
    fn test_voucher_totals_unbalanced() {
        let lines = vec![
            LedgerLine::debit("5100", dec!(100)),
            LedgerLine::credit("2100", dec!(90)),
        ];
        let totals = VoucherTotals::from_lines(&lines).unwrap();
        assert!(!totals.is_balanced());
        assert_eq!(totals.difference(), dec!(10));
    }

    #[test]
    fn test_voucher_totals_overflow_is_none() {
        let lines = vec![
            LedgerLine::debit("5100", Decimal::MAX),
            LedgerLine::debit("5100", Decimal::MAX),
            LedgerLine::credit("1010", dec!(1)),
        ];
        assert!(VoucherTotals::from_lines(&lines).is_none());
    }

    #[test]
    fn test_policy_from_config() {
        let config = LedgerConfig {
            prevent_summary_posting: false,
            period_gate: PeriodGate::VoucherDate,
            voucher_document_type: "VOU".into(),
        };
        let policy = PostingPolicy::from(&config);
        assert!(!policy.prevent_summary_posting);
        assert_eq!(policy.period_gate, PeriodGate::VoucherDate);
    }
}
