//! `SeaORM` Entity for the employee directory.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EmploymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Login of the employee, when they act in the approval chain.
    pub user_id: Option<Uuid>,
    pub full_name: String,
    pub manager_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub base_salary: Decimal,
    pub is_active: bool,
    pub employment_status: EmploymentStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ManagerId",
        to = "Column::Id"
    )]
    Manager,
    #[sea_orm(has_many = "super::employee_pay_components::Entity")]
    EmployeePayComponents,
    #[sea_orm(has_many = "super::payroll_items::Entity")]
    PayrollItems,
}

impl Related<super::employee_pay_components::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeePayComponents.def()
    }
}

impl Related<super::payroll_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
