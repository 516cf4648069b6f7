//! Derived `paid` status of a cycle.
//!
//! `paid` is recomputed from payment totals every time, never set as a
//! one-way flag.

use super::settlement::ItemPaymentState;
use super::types::{CycleStatus, ItemStatus};

/// Returns the status the cycle should move to, or `None` to keep it.
///
/// Only `approved` and `paid` cycles are considered. On-hold items are
/// ignored; a cycle whose every other item is settled is `paid`.
#[must_use]
pub fn reconcile_status(current: CycleStatus, items: &[ItemPaymentState]) -> Option<CycleStatus> {
    if !current.is_approved() {
        return None;
    }

    let all_settled = items
        .iter()
        .filter(|item| item.status != ItemStatus::OnHold)
        .all(ItemPaymentState::is_settled);

    match (current, all_settled) {
        (CycleStatus::Approved, true) => Some(CycleStatus::Paid),
        (CycleStatus::Paid, false) => Some(CycleStatus::Approved),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paybook_shared::types::{EmployeeId, PayrollItemId};
    use rust_decimal::Decimal;
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
    fn test_promotes_despite_on_hold_item() {
        let items = vec![
            item(dec!(4000), dec!(4000), ItemStatus::Active),
            item(dec!(5000), dec!(5000), ItemStatus::Active),
            item(dec!(1000), dec!(0), ItemStatus::OnHold),
        ];
        assert_eq!(
            reconcile_status(CycleStatus::Approved, &items),
            Some(CycleStatus::Paid)
        );
    }

    #[test]
    fn test_demotes_after_reactivation() {
        let items = vec![
            item(dec!(4000), dec!(4000), ItemStatus::Active),
            item(dec!(1000), dec!(0), ItemStatus::Active),
        ];
        assert_eq!(
            reconcile_status(CycleStatus::Paid, &items),
            Some(CycleStatus::Approved)
        );
    }

    #[test]
    fn test_tolerance_counts_as_settled() {
        let items = vec![item(dec!(100), dec!(99.99), ItemStatus::Active)];
        assert_eq!(
            reconcile_status(CycleStatus::Approved, &items),
            Some(CycleStatus::Paid)
        );
    }

    #[test]
    fn test_stable_states_unchanged() {
        let paid = vec![item(dec!(100), dec!(100), ItemStatus::Active)];
        assert_eq!(reconcile_status(CycleStatus::Paid, &paid), None);
        let unpaid = vec![item(dec!(100), dec!(0), ItemStatus::Active)];
        assert_eq!(reconcile_status(CycleStatus::Approved, &unpaid), None);
    }

    #[test]
    fn test_unapproved_cycles_ignored() {
        let paid = vec![item(dec!(100), dec!(100), ItemStatus::Active)];
        assert_eq!(reconcile_status(CycleStatus::Draft, &paid), None);
        assert_eq!(reconcile_status(CycleStatus::PendingApproval, &paid), None);
    }
}
