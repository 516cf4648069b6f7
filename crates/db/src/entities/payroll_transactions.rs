//! `SeaORM` Entity for payroll disbursements.
//!
//! Append-only sub-ledger of what was actually paid against an item.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PayrollTransactionType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payroll_item_id: Uuid,
    pub employee_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub transaction_type: PayrollTransactionType,
    pub transaction_date: Date,
    /// Settlement voucher the payment was posted under.
    pub voucher_number: Option<String>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll_items::Entity",
        from = "Column::PayrollItemId",
        to = "super::payroll_items::Column::Id"
    )]
    PayrollItems,
}

impl Related<super::payroll_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
