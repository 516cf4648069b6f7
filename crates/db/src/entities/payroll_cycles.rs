//! `SeaORM` Entity for payroll cycles.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CycleStatus, CycleType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_cycles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub cycle_type: CycleType,
    pub period_start: Date,
    pub period_end: Date,
    pub payment_date: Option<Date>,
    pub status: CycleStatus,
    pub current_approver_id: Option<Uuid>,
    /// Ordered list of `ApprovalTrailEntry`.
    pub approval_trail: Json,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub total_gross: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub total_deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub total_net: Decimal,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub accrual_voucher: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payroll_items::Entity")]
    PayrollItems,
}

impl Related<super::payroll_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
