//! `SeaORM` entities for the ledger and payroll tables.

pub mod accounts;
pub mod document_sequences;
pub mod employee_pay_components;
pub mod employees;
pub mod fiscal_periods;
pub mod general_ledger;
pub mod payroll_cycles;
pub mod payroll_items;
pub mod payroll_transactions;
pub mod sea_orm_active_enums;
