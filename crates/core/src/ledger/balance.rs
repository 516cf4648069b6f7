//! Account balance and trial balance calculations.
//!
//! Balances are always derived by aggregating committed, non-closed ledger
//! rows; nothing here is stored.

use paybook_shared::types::amounts_match;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountType;

/// Side on which an account's balance grows.
///
/// - Asset/Expense: balance = debit - credit (debit-normal)
/// - Liability/Equity/Revenue: balance = credit - debit (credit-normal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Debit-normal accounts (Asset, Expense)
    DebitNormal,
    /// Credit-normal accounts (Liability, Equity, Revenue)
    CreditNormal,
}

impl NormalBalance {
    /// Calculates the signed balance from debit and credit totals.
    #[must_use]
    pub fn calculate_balance(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::DebitNormal => debit - credit,
            Self::CreditNormal => credit - debit,
        }
    }

    /// Splits a signed balance into (debit column, credit column).
    ///
    /// A positive balance sits on the account's normal side; a negative one
    /// is shown on the opposite side as a positive figure.
    #[must_use]
    pub fn columns(self, balance: Decimal) -> (Decimal, Decimal) {
        let on_normal_side = balance >= Decimal::ZERO;
        match (self, on_normal_side) {
            (Self::DebitNormal, true) => (balance, Decimal::ZERO),
            (Self::DebitNormal, false) => (Decimal::ZERO, -balance),
            (Self::CreditNormal, true) => (Decimal::ZERO, balance),
            (Self::CreditNormal, false) => (-balance, Decimal::ZERO),
        }
    }
}

/// Aggregated debit/credit activity of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountActivity {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Sum of debit amounts.
    pub debit_total: Decimal,
    /// Sum of credit amounts.
    pub credit_total: Decimal,
    /// Number of ledger rows aggregated.
    pub entry_count: usize,
}

impl AccountActivity {
    /// Creates empty activity for an account.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            entry_count: 0,
        }
    }

    /// Adds a debit amount.
    pub fn add_debit(&mut self, amount: Decimal) {
        self.debit_total += amount;
        self.entry_count += 1;
    }

    /// Adds a credit amount.
    pub fn add_credit(&mut self, amount: Decimal) {
        self.credit_total += amount;
        self.entry_count += 1;
    }

    /// Signed balance according to the account type.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.account_type
            .normal_balance()
            .calculate_balance(self.debit_total, self.credit_total)
    }
}

/// One row of the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceLine {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Signed balance.
    pub balance: Decimal,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

/// Trial balance over every active account with activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Rows ordered by account code.
    pub accounts: Vec<TrialBalanceLine>,
    /// Sum of the debit column.
    pub total_debits: Decimal,
    /// Sum of the credit column.
    pub total_credits: Decimal,
    /// Whether the columns agree within the money tolerance.
    pub is_balanced: bool,
}

impl TrialBalance {
    /// Builds the trial balance from per-account activity.
    ///
    /// Accounts without any ledger rows are left out.
    #[must_use]
    pub fn build(activity: impl IntoIterator<Item = AccountActivity>) -> Self {
        let mut accounts: Vec<TrialBalanceLine> = activity
            .into_iter()
            .filter(|a| a.entry_count > 0)
            .map(|a| {
                let balance = a.balance();
                let (debit, credit) = a.account_type.normal_balance().columns(balance);
                TrialBalanceLine {
                    code: a.code,
                    name: a.name,
                    account_type: a.account_type,
                    balance,
                    debit,
                    credit,
                }
            })
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debits: Decimal = accounts.iter().map(|l| l.debit).sum();
        let total_credits: Decimal = accounts.iter().map(|l| l.credit).sum();

        Self {
            accounts,
            total_debits,
            total_credits,
            is_balanced: amounts_match(total_debits, total_credits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_normal_balance() {
        assert_eq!(
            NormalBalance::DebitNormal.calculate_balance(dec!(100), dec!(30)),
            dec!(70)
        );
    }

    #[test]
    fn test_credit_normal_balance() {
        assert_eq!(
            NormalBalance::CreditNormal.calculate_balance(dec!(100), dec!(30)),
            dec!(-70)
        );
    }

    #[test]
    fn test_columns_negative_balance_flips_side() {
        assert_eq!(
            NormalBalance::DebitNormal.columns(dec!(-25)),
            (dec!(0), dec!(25))
        );
        assert_eq!(
            NormalBalance::CreditNormal.columns(dec!(-25)),
            (dec!(25), dec!(0))
        );
    }

    #[test]
    fn test_trial_balance_payroll_accrual() {
        let mut expense = AccountActivity::new("5100", "Salaries Expense", AccountType::Expense);
        expense.add_debit(dec!(10000));
        let mut payable = AccountActivity::new("2100", "Salaries Payable", AccountType::Liability);
        payable.add_credit(dec!(9500));
        let mut deductions = AccountActivity::new("2110", "Deductions Payable", AccountType::Liability);
        deductions.add_credit(dec!(500));
        let idle = AccountActivity::new("1010", "Cash", AccountType::Asset);

        let tb = TrialBalance::build(vec![expense, payable, deductions, idle]);

        assert_eq!(tb.accounts.len(), 3);
        assert_eq!(tb.accounts[0].code, "2100");
        assert_eq!(tb.total_debits, dec!(10000));
        assert_eq!(tb.total_credits, dec!(10000));
        assert!(tb.is_balanced);
    }

    #[test]
    fn test_trial_balance_keeps_zero_net_accounts_with_activity() {
        let mut cash = AccountActivity::new("1010", "Cash", AccountType::Asset);
        cash.add_debit(dec!(50));
        cash.add_credit(dec!(50));
        let tb = TrialBalance::build(vec![cash]);
        assert_eq!(tb.accounts.len(), 1);
        assert_eq!(tb.accounts[0].balance, Decimal::ZERO);
        assert!(tb.is_balanced);
    }

    fn account_type_strategy() -> impl Strategy<Value = AccountType> {
        prop_oneof![
            Just(AccountType::Asset),
            Just(AccountType::Liability),
            Just(AccountType::Equity),
            Just(AccountType::Revenue),
            Just(AccountType::Expense),
        ]
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Balanced vouchers spread over arbitrary account types always
        /// produce a balanced trial balance.
        #[test]
        fn prop_balanced_vouchers_give_balanced_trial_balance(
            vouchers in prop::collection::vec(
                (account_type_strategy(), account_type_strategy(), amount_strategy()),
                1..20,
            )
        ) {
            let mut activity: Vec<AccountActivity> = Vec::new();
            for (i, (debit_type, credit_type, amount)) in vouchers.into_iter().enumerate() {
                let mut debit = AccountActivity::new(format!("D{i:03}"), "debit", debit_type);
                debit.add_debit(amount);
                let mut credit = AccountActivity::new(format!("C{i:03}"), "credit", credit_type);
                credit.add_credit(amount);
                activity.push(debit);
                activity.push(credit);
            }

            let tb = TrialBalance::build(activity);
            prop_assert!(tb.is_balanced);
            prop_assert_eq!(tb.total_debits, tb.total_credits);
        }

        /// The columns of a balance always net back to the balance.
        #[test]
        fn prop_columns_preserve_balance(
            account_type in account_type_strategy(),
            debit in amount_strategy(),
            credit in amount_strategy(),
        ) {
            let normal = account_type.normal_balance();
            let balance = normal.calculate_balance(debit, credit);
            let (dr, cr) = normal.columns(balance);
            prop_assert!(dr >= Decimal::ZERO && cr >= Decimal::ZERO);
            prop_assert_eq!(normal.calculate_balance(dr, cr), balance);
        }
    }
}
