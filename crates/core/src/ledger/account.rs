//! Chart-of-accounts rules that apply at posting time.

use paybook_shared::types::AccountId;
use serde::{Deserialize, Serialize};

use super::balance::NormalBalance;
use super::error::LedgerError;
use super::types::PostingPolicy;

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account.
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Revenue account.
    Revenue,
    /// Expense account.
    Expense,
}

impl AccountType {
    /// Returns the side on which this account type grows.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::DebitNormal,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::CreditNormal,
        }
    }
}

/// Information about an account needed for posting and balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// Unique account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether any account names this one as parent.
    pub has_children: bool,
}

impl AccountInfo {
    /// Checks that this account may receive a posting under `policy`.
    ///
    /// # Errors
    ///
    /// `AccountInactive` for inactive accounts, `SummaryAccount` for accounts
    /// with children when summary posting is prevented.
    pub fn ensure_postable(&self, policy: &PostingPolicy) -> Result<(), LedgerError> {
        if !self.is_active {
            return Err(LedgerError::AccountInactive(self.code.clone()));
        }
        if policy.prevent_summary_posting && self.has_children {
            return Err(LedgerError::SummaryAccount(self.code.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account(is_active: bool, has_children: bool) -> AccountInfo {
        AccountInfo {
            id: AccountId::new(),
            code: "1000".to_string(),
            name: "Current Assets".to_string(),
            account_type: AccountType::Asset,
            is_active,
            has_children,
        }
    }

    #[rstest]
    #[case(AccountType::Asset, NormalBalance::DebitNormal)]
    #[case(AccountType::Expense, NormalBalance::DebitNormal)]
    #[case(AccountType::Liability, NormalBalance::CreditNormal)]
    #[case(AccountType::Equity, NormalBalance::CreditNormal)]
    #[case(AccountType::Revenue, NormalBalance::CreditNormal)]
    fn test_normal_balance(#[case] account_type: AccountType, #[case] expected: NormalBalance) {
        assert_eq!(account_type.normal_balance(), expected);
    }

    #[test]
    fn test_leaf_account_is_postable() {
        assert!(account(true, false).ensure_postable(&PostingPolicy::default()).is_ok());
    }

    #[test]
    fn test_summary_account_rejected_when_prevented() {
        let result = account(true, true).ensure_postable(&PostingPolicy::default());
        assert!(matches!(result, Err(LedgerError::SummaryAccount(code)) if code == "1000"));
    }

    #[test]
    fn test_summary_account_allowed_when_not_prevented() {
        let policy = PostingPolicy {
            prevent_summary_posting: false,
            ..PostingPolicy::default()
        };
        assert!(account(true, true).ensure_postable(&policy).is_ok());
    }

    #[test]
    fn test_inactive_account_rejected() {
        let result = account(false, false).ensure_postable(&PostingPolicy::default());
        assert!(matches!(result, Err(LedgerError::AccountInactive(_))));
    }
}
