//! `SeaORM` Entity for fiscal periods.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fiscal_periods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub is_locked: bool,
    pub is_closed: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::general_ledger::Entity")]
    GeneralLedger,
}

impl Related<super::general_ledger::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralLedger.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
