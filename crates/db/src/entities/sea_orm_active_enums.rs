//! `SeaORM` active enums, stored as strings, and their core counterparts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use paybook_core::ledger::{AccountType as CoreAccountType, EntryType as CoreEntryType};
use paybook_core::payroll::{
    CycleStatus as CoreCycleStatus, CycleType as CoreCycleType,
    EmploymentStatus as CoreEmploymentStatus, ItemStatus as CoreItemStatus,
    PayrollTransactionType as CorePayrollTransactionType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EntryType {
    #[sea_orm(string_value = "DEBIT")]
    Debit,
    #[sea_orm(string_value = "CREDIT")]
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum CycleType {
    #[sea_orm(string_value = "salary")]
    Salary,
    #[sea_orm(string_value = "bonus")]
    Bonus,
    #[sea_orm(string_value = "incentive")]
    Incentive,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum CycleStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending_approval")]
    PendingApproval,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "paid")]
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ItemStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "on_hold")]
    OnHold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PayrollTransactionType {
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "advance")]
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EmploymentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "on_leave")]
    OnLeave,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "terminated")]
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PayComponentKind {
    #[sea_orm(string_value = "allowance")]
    Allowance,
    #[sea_orm(string_value = "deduction")]
    Deduction,
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Maps a db enum onto its core twin, in both directions.
macro_rules! mirror_enum {
    ($db:ident <=> $core:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(AccountType <=> CoreAccountType { Asset, Liability, Equity, Revenue, Expense });
mirror_enum!(EntryType <=> CoreEntryType { Debit, Credit });
mirror_enum!(CycleType <=> CoreCycleType { Salary, Bonus, Incentive, Other });
mirror_enum!(CycleStatus <=> CoreCycleStatus { Draft, PendingApproval, Approved, Paid });
mirror_enum!(ItemStatus <=> CoreItemStatus { Active, OnHold });
mirror_enum!(PayrollTransactionType <=> CorePayrollTransactionType { Payment, Advance });
mirror_enum!(EmploymentStatus <=> CoreEmploymentStatus { Active, OnLeave, Suspended, Terminated });

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_status_roundtrip_through_core() {
        for status in CycleStatus::iter() {
            let core: CoreCycleStatus = status.into();
            assert_eq!(CycleStatus::from(core), status);
        }
    }

    #[test]
    fn test_stored_values_match_core_serde() {
        for status in CycleStatus::iter() {
            let core: CoreCycleStatus = status.into();
            assert_eq!(status.to_value(), core.as_str());
        }
        assert_eq!(EntryType::Debit.to_value(), CoreEntryType::Debit.as_str());
    }
}
