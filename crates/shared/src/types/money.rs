//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`; comparisons between computed
//! totals go through [`amounts_match`] so that sub-cent residue from
//! storage round-trips never flips an invariant.

use rust_decimal::Decimal;

/// Largest difference at which two amounts are still considered equal (0.01).
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns true if `a` and `b` differ by no more than [`MONEY_TOLERANCE`].
#[must_use]
pub fn amounts_match(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= MONEY_TOLERANCE
}

/// Returns true if `amount` is strictly greater than [`MONEY_TOLERANCE`].
///
/// Used for "is anything still outstanding" checks.
#[must_use]
pub fn exceeds_tolerance(amount: Decimal) -> bool {
    amount > MONEY_TOLERANCE
}

/// Largest amount a single ledger row or payroll component may carry.
///
/// Matches the `DECIMAL(16, 4)` amount columns: 999,999,999,999.9999.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_874_919_423, 2_328_306, 0, false, 4);

/// Returns true if `amount` fits the amount columns.
#[must_use]
pub fn within_amount_range(amount: Decimal) -> bool {
    amount.abs() <= MAX_AMOUNT
}

/// Sums amounts, returning `None` instead of overflowing.
#[must_use]
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
}
