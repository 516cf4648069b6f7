//! Property-based tests for ledger line validation.
//!
//! Covers the double-entry invariant: every accepted voucher balances within
//! 0.01, and malformed lines are rejected before totals are considered.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryType, LedgerLine};
use super::validation::validate_lines;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a non-positive amount (<= 0).
fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

fn entry_type_strategy() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Debit), Just(EntryType::Credit)]
}

fn line(entry_type: EntryType, amount: Decimal) -> LedgerLine {
    LedgerLine {
        account_code: "1010".to_string(),
        entry_type,
        amount,
        description: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* accepted set of lines, debits equal credits within 0.01.
    #[test]
    fn prop_accepted_vouchers_balance(
        lines in prop::collection::vec((entry_type_strategy(), positive_amount()), 2..10)
    ) {
        let lines: Vec<LedgerLine> = lines.into_iter().map(|(t, a)| line(t, a)).collect();
        if let Ok(totals) = validate_lines(&lines) {
            prop_assert!((totals.debit - totals.credit).abs() <= Decimal::new(1, 2));
        }
    }

    /// *For any* split of a debit total across several credits, the voucher is accepted.
    #[test]
    fn prop_split_credits_accepted(
        parts in prop::collection::vec(positive_amount(), 1..8)
    ) {
        let total: Decimal = parts.iter().copied().sum();
        let mut lines = vec![line(EntryType::Debit, total)];
        lines.extend(parts.into_iter().map(|p| line(EntryType::Credit, p)));

        let result = validate_lines(&lines);
        prop_assert!(result.is_ok(), "Balanced voucher rejected: {:?}", result);
    }

    /// *For any* imbalance above the tolerance, the voucher is rejected.
    #[test]
    fn prop_imbalance_rejected(
        amount in positive_amount(),
        gap_cents in 2i64..1_000_000i64,
    ) {
        let lines = vec![
            line(EntryType::Debit, amount + Decimal::new(gap_cents, 2)),
            line(EntryType::Credit, amount),
        ];
        prop_assert!(
            matches!(validate_lines(&lines), Err(LedgerError::UnbalancedVoucher { .. })),
            "imbalance of {} cents accepted",
            gap_cents
        );
    }

    /// *For any* line with amount <= 0, validation rejects it.
    #[test]
    fn prop_non_positive_amount_rejected(
        entry_type in entry_type_strategy(),
        bad in non_positive_amount(),
        other in positive_amount(),
    ) {
        let lines = vec![line(entry_type, bad), line(entry_type.flip(), other)];
        prop_assert!(
            matches!(validate_lines(&lines), Err(LedgerError::NonPositiveAmount { line: 0, .. })),
            "non-positive amount accepted"
        );
    }

    /// *For any* single line, validation rejects it.
    #[test]
    fn prop_single_line_rejected(
        entry_type in entry_type_strategy(),
        amount in positive_amount(),
    ) {
        prop_assert!(matches!(
            validate_lines(&[line(entry_type, amount)]),
            Err(LedgerError::InsufficientEntries)
        ));
    }
}
