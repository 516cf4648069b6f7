//! Settlement planning for payroll items.
//!
//! Bulk and per-item payments share the same notion of "remaining": net
//! salary minus the payment transactions already recorded.

use paybook_shared::types::{
    EmployeeId, MONEY_TOLERANCE, PayrollItemId, checked_sum, exceeds_tolerance,
};
use rust_decimal::Decimal;

use super::error::PayrollError;
use super::types::{CycleStatus, ItemStatus};

/// Payment position of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPaymentState {
    /// The item.
    pub item_id: PayrollItemId,
    /// Employee paid by the item.
    pub employee_id: EmployeeId,
    /// Active or on hold.
    pub status: ItemStatus,
    /// Net salary owed.
    pub net_salary: Decimal,
    /// Sum of recorded payment transactions (advances excluded).
    pub paid_total: Decimal,
}

impl ItemPaymentState {
    /// Net salary not yet covered by payments.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.net_salary - self.paid_total
    }

    /// Whether payments cover the net salary within 0.01.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !exceeds_tolerance(self.remaining())
    }
}

/// One payment a bulk settlement run records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPayment {
    /// Item being paid.
    pub item_id: PayrollItemId,
    /// Employee being paid.
    pub employee_id: EmployeeId,
    /// Remaining balance being paid.
    pub amount: Decimal,
}

/// Payments of a bulk settlement run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettlementPlan {
    /// One payment per outstanding active item.
    pub payments: Vec<PlannedPayment>,
}

impl SettlementPlan {
    /// Amount of the settlement voucher.
    ///
    /// # Errors
    ///
    /// `AmountOutOfRange` if the sum overflows.
    pub fn total(&self) -> Result<Decimal, PayrollError> {
        checked_sum(self.payments.iter().map(|p| p.amount)).ok_or(PayrollError::AmountOutOfRange)
    }

    /// Whether there is nothing to pay.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}

/// Stateless settlement rules.
pub struct SettlementService;

impl SettlementService {
    /// Checks that a cycle may receive payments.
    ///
    /// Bulk settlement needs `approved`; single payments also accept `paid`
    /// so an item reactivated after the cycle was paid can still be settled.
    ///
    /// # Errors
    ///
    /// `CycleNotApproved` otherwise.
    pub fn ensure_payable(status: CycleStatus, bulk: bool) -> Result<(), PayrollError> {
        let allowed = if bulk {
            status == CycleStatus::Approved
        } else {
            status.is_approved()
        };
        if allowed {
            Ok(())
        } else {
            Err(PayrollError::CycleNotApproved(status))
        }
    }

    /// Plans a bulk run: every active item whose remaining exceeds 0.01 is
    /// paid its remaining balance. On-hold items are skipped.
    #[must_use]
    pub fn plan_bulk_settlement(items: &[ItemPaymentState]) -> SettlementPlan {
        let payments = items
            .iter()
            .filter(|item| item.status == ItemStatus::Active)
            .filter(|item| exceeds_tolerance(item.remaining()))
            .map(|item| PlannedPayment {
                item_id: item.item_id,
                employee_id: item.employee_id,
                amount: item.remaining(),
            })
            .collect();
        SettlementPlan { payments }
    }

    /// Checks a single payment against an item.
    ///
    /// # Errors
    ///
    /// - `NonPositivePayment` for amounts <= 0
    /// - `ItemOnHold` for items on hold
    /// - `Overpayment` when the amount exceeds remaining by more than 0.01
    pub fn check_item_payment(item: &ItemPaymentState, amount: Decimal) -> Result<(), PayrollError> {
        if amount <= Decimal::ZERO {
            return Err(PayrollError::NonPositivePayment(amount));
        }
        if item.status == ItemStatus::OnHold {
            return Err(PayrollError::ItemOnHold(item.item_id));
        }
        let remaining = item.remaining();
        if amount > remaining + MONEY_TOLERANCE {
            return Err(PayrollError::Overpayment {
                remaining,
                requested: amount,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(net: Decimal, paid: Decimal, status: ItemStatus) -> ItemPaymentState {
        ItemPaymentState {
            item_id: PayrollItemId::new(),
            employee_id: EmployeeId::new(),
            status,
            net_salary: net,
            paid_total: paid,
        }
    }

    #[test]
    fn test_bulk_plan_skips_on_hold() {
        let items = vec![
            item(dec!(4000), dec!(0), ItemStatus::Active),
            item(dec!(5000), dec!(0), ItemStatus::Active),
            item(dec!(1000), dec!(0), ItemStatus::OnHold),
        ];
        let plan = SettlementService::plan_bulk_settlement(&items);
        assert_eq!(plan.payments.len(), 2);
        assert_eq!(plan.total().unwrap(), dec!(9000));
    }

    #[test]
    fn test_bulk_plan_pays_only_remaining() {
        let items = vec![
            item(dec!(4000), dec!(1500), ItemStatus::Active),
            item(dec!(5000), dec!(5000), ItemStatus::Active),
            item(dec!(100), dec!(99.995), ItemStatus::Active),
        ];
        let plan = SettlementService::plan_bulk_settlement(&items);
        assert_eq!(plan.payments.len(), 1);
        assert_eq!(plan.payments[0].amount, dec!(2500));
    }

    #[test]
    fn test_bulk_plan_empty_when_settled() {
        let items = vec![item(dec!(4000), dec!(4000), ItemStatus::Active)];
        assert!(SettlementService::plan_bulk_settlement(&items).is_empty());
    }

    #[test]
    fn test_item_payment_rules() {
        let active = item(dec!(4000), dec!(1000), ItemStatus::Active);
        assert!(SettlementService::check_item_payment(&active, dec!(3000)).is_ok());
        assert!(SettlementService::check_item_payment(&active, dec!(3000.01)).is_ok());
        assert!(matches!(
            SettlementService::check_item_payment(&active, dec!(3000.02)),
            Err(PayrollError::Overpayment { .. })
        ));
        assert!(matches!(
            SettlementService::check_item_payment(&active, dec!(0)),
            Err(PayrollError::NonPositivePayment(_))
        ));

        let held = item(dec!(4000), dec!(0), ItemStatus::OnHold);
        assert!(matches!(
            SettlementService::check_item_payment(&held, dec!(10)),
            Err(PayrollError::ItemOnHold(_))
        ));
    }

    #[test]
    fn test_ensure_payable() {
        assert!(SettlementService::ensure_payable(CycleStatus::Approved, true).is_ok());
        assert!(SettlementService::ensure_payable(CycleStatus::Paid, true).is_err());
        assert!(SettlementService::ensure_payable(CycleStatus::Paid, false).is_ok());
        assert!(matches!(
            SettlementService::ensure_payable(CycleStatus::PendingApproval, false),
            Err(PayrollError::CycleNotApproved(CycleStatus::PendingApproval))
        ));
    }
}
