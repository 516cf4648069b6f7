//! Ledger lines produced by payroll: accrual on approval, settlement on payment.

use paybook_shared::config::PayrollAccounts;
use paybook_shared::types::{PayrollCycleId, PayrollItemId};
use rust_decimal::Decimal;

use super::types::CycleTotals;
use crate::ledger::{LedgerLine, LedgerReference, PostingRequest, reference_types};

/// What a settlement voucher pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementScope {
    /// Bulk run over the remaining balances of a cycle.
    Cycle(PayrollCycleId),
    /// One payment against one item.
    Item(PayrollItemId),
}

impl SettlementScope {
    /// Ledger reference of the settlement voucher.
    #[must_use]
    pub fn reference(self) -> LedgerReference {
        match self {
            Self::Cycle(id) => LedgerReference::new(reference_types::PAYROLL_CYCLE, id),
            Self::Item(id) => LedgerReference::new(reference_types::PAYROLL_ITEM, id),
        }
    }

    fn description(self, cycle_name: &str) -> String {
        match self {
            Self::Cycle(_) => format!("Payroll settlement: {cycle_name}"),
            Self::Item(_) => format!("Payroll payment: {cycle_name}"),
        }
    }
}

/// Builds payroll vouchers from the configured account codes.
pub struct PayrollPostings;

impl PayrollPostings {
    /// Accrual voucher for an approved cycle.
    ///
    /// DEBIT salaries expense for gross, CREDIT salaries payable for net and,
    /// when deductions are positive, CREDIT deductions payable for deductions.
    /// Returns `None` for a cycle with nothing to accrue.
    #[must_use]
    pub fn accrual(
        cycle_id: PayrollCycleId,
        cycle_name: &str,
        totals: &CycleTotals,
        accounts: &PayrollAccounts,
    ) -> Option<PostingRequest> {
        if totals.total_gross <= Decimal::ZERO {
            return None;
        }

        let description = format!("Payroll accrual: {cycle_name}");
        let mut lines = vec![
            LedgerLine::debit(&accounts.salaries_expense, totals.total_gross)
                .with_description(&description),
        ];
        if totals.total_net > Decimal::ZERO {
            lines.push(
                LedgerLine::credit(&accounts.salaries_payable, totals.total_net)
                    .with_description(&description),
            );
        }
        if totals.total_deductions > Decimal::ZERO {
            lines.push(
                LedgerLine::credit(&accounts.deductions_payable, totals.total_deductions)
                    .with_description(&description),
            );
        }

        Some(
            PostingRequest::new(lines)
                .with_reference(LedgerReference::new(reference_types::PAYROLL_CYCLE, cycle_id)),
        )
    }

    /// Settlement voucher: DEBIT salaries payable, CREDIT the cash account.
    ///
    /// `cash_account` falls back to the configured default.
    #[must_use]
    pub fn settlement(
        scope: SettlementScope,
        cycle_name: &str,
        amount: Decimal,
        accounts: &PayrollAccounts,
        cash_account: Option<&str>,
    ) -> PostingRequest {
        let description = scope.description(cycle_name);
        let cash = cash_account.unwrap_or(&accounts.default_cash);
        PostingRequest::new(vec![
            LedgerLine::debit(&accounts.salaries_payable, amount).with_description(&description),
            LedgerLine::credit(cash, amount).with_description(&description),
        ])
        .with_reference(scope.reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{EntryType, VoucherTotals};
    use rust_decimal_macros::dec;

    fn totals(gross: Decimal, deductions: Decimal) -> CycleTotals {
        CycleTotals {
            total_gross: gross,
            total_deductions: deductions,
            total_net: gross - deductions,
        }
    }

    #[test]
    fn test_accrual_with_deductions() {
        let accounts = PayrollAccounts::default();
        let id = PayrollCycleId::new();
        let request =
            PayrollPostings::accrual(id, "October", &totals(dec!(10000), dec!(500)), &accounts).unwrap();

        assert_eq!(request.lines.len(), 3);
        assert_eq!(request.lines[0].account_code, "5100");
        assert_eq!(request.lines[0].entry_type, EntryType::Debit);
        assert_eq!(request.lines[0].amount, dec!(10000));
        assert_eq!(request.lines[1].account_code, "2100");
        assert_eq!(request.lines[1].amount, dec!(9500));
        assert_eq!(request.lines[2].account_code, "2110");
        assert_eq!(request.lines[2].amount, dec!(500));

        let sums = VoucherTotals::from_lines(&request.lines).unwrap();
        assert_eq!(sums.debit, dec!(10000));
        assert_eq!(sums.credit, dec!(10000));

        let reference = request.reference.unwrap();
        assert_eq!(reference.reference_type, "payroll_cycle");
        assert_eq!(reference.reference_id, id.to_string());
    }

    #[test]
    fn test_accrual_without_deductions_has_two_lines() {
        let request = PayrollPostings::accrual(
            PayrollCycleId::new(),
            "Bonus",
            &totals(dec!(1500), dec!(0)),
            &PayrollAccounts::default(),
        )
        .unwrap();
        assert_eq!(request.lines.len(), 2);
    }

    #[test]
    fn test_accrual_of_empty_cycle_is_skipped() {
        assert!(
            PayrollPostings::accrual(
                PayrollCycleId::new(),
                "Empty",
                &CycleTotals::default(),
                &PayrollAccounts::default(),
            )
            .is_none()
        );
    }

    #[test]
    fn test_settlement_uses_default_cash() {
        let item = PayrollItemId::new();
        let request = PayrollPostings::settlement(
            SettlementScope::Item(item),
            "October",
            dec!(4000),
            &PayrollAccounts::default(),
            None,
        );
        assert_eq!(request.lines[0].account_code, "2100");
        assert_eq!(request.lines[0].entry_type, EntryType::Debit);
        assert_eq!(request.lines[1].account_code, "1010");
        assert_eq!(request.lines[1].entry_type, EntryType::Credit);
        assert_eq!(request.reference.unwrap().reference_type, "payroll_item");
    }

    #[test]
    fn test_settlement_custom_cash_account() {
        let request = PayrollPostings::settlement(
            SettlementScope::Cycle(PayrollCycleId::new()),
            "October",
            dec!(9000),
            &PayrollAccounts::default(),
            Some("1020"),
        );
        assert_eq!(request.lines[1].account_code, "1020");
        assert_eq!(
            request.lines[0].description.as_deref(),
            Some("Payroll settlement: October")
        );
    }
}
