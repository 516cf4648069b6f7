//! Property-based tests for settlement and reconciliation.

use paybook_shared::types::{EmployeeId, PayrollItemId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::reconciliation::reconcile_status;
use super::settlement::{ItemPaymentState, SettlementService};
use super::types::{CycleStatus, ItemStatus};

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn item_strategy() -> impl Strategy<Value = ItemPaymentState> {
    (amount(), 0u32..=100, any::<bool>()).prop_map(|(net, paid_pct, on_hold)| ItemPaymentState {
        item_id: PayrollItemId::new(),
        employee_id: EmployeeId::new(),
        status: if on_hold { ItemStatus::OnHold } else { ItemStatus::Active },
        net_salary: net,
        paid_total: (net * Decimal::from(paid_pct) / Decimal::from(100)).round_dp(2),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* item set, recording every planned payment of a bulk run
    /// leaves all active items settled, and reconciliation then marks an
    /// approved cycle paid.
    #[test]
    fn prop_bulk_settlement_then_paid(
        mut items in prop::collection::vec(item_strategy(), 1..12)
    ) {
        let plan = SettlementService::plan_bulk_settlement(&items);
        for payment in &plan.payments {
            if let Some(item) = items.iter_mut().find(|i| i.item_id == payment.item_id) {
                item.paid_total += payment.amount;
            }
        }

        prop_assert!(items
            .iter()
            .filter(|i| i.status == ItemStatus::Active)
            .all(ItemPaymentState::is_settled));
        prop_assert_eq!(
            reconcile_status(CycleStatus::Approved, &items),
            Some(CycleStatus::Paid)
        );
        prop_assert!(SettlementService::plan_bulk_settlement(&items).is_empty());
    }

    /// *For any* item set, the bulk voucher equals the sum of planned payments
    /// and never includes an on-hold item.
    #[test]
    fn prop_plan_total_matches_payments(
        items in prop::collection::vec(item_strategy(), 0..12)
    ) {
        let plan = SettlementService::plan_bulk_settlement(&items);
        let expected: Decimal = items
            .iter()
            .filter(|i| i.status == ItemStatus::Active && i.remaining() > Decimal::new(1, 2))
            .map(ItemPaymentState::remaining)
            .sum();
        prop_assert_eq!(plan.total().unwrap(), expected);
        for payment in &plan.payments {
            let source = items.iter().find(|i| i.item_id == payment.item_id).unwrap();
            prop_assert_eq!(source.status, ItemStatus::Active);
        }
    }

    /// *For any* remaining balance, paying it exactly is accepted and paying
    /// more than 0.01 over is rejected.
    #[test]
    fn prop_overpayment_boundary(item in item_strategy(), extra_cents in 2i64..100_000) {
        let item = ItemPaymentState { status: ItemStatus::Active, ..item };
        let remaining = item.remaining();
        if remaining > Decimal::ZERO {
            prop_assert!(SettlementService::check_item_payment(&item, remaining).is_ok());
        }
        let over = remaining + Decimal::new(extra_cents, 2);
        prop_assert!(SettlementService::check_item_payment(&item, over).is_err());
    }
}
