//! `SeaORM` Entity for per-employee payroll items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ItemStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cycle_id: Uuid,
    pub employee_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub base_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub allowances: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub gross_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub net_salary: Decimal,
    pub status: ItemStatus,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll_cycles::Entity",
        from = "Column::CycleId",
        to = "super::payroll_cycles::Column::Id"
    )]
    PayrollCycles,
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id"
    )]
    Employees,
    #[sea_orm(has_many = "super::payroll_transactions::Entity")]
    PayrollTransactions,
}

impl Related<super::payroll_cycles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollCycles.def()
    }
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl Related<super::payroll_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
