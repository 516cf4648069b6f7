//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every multi-step mutation opens its own database transaction; the
//! `*_in` variants run on a caller's connection or transaction instead.

pub mod account;
pub mod employee;
pub mod fiscal;
pub mod ledger;
pub mod payroll;
pub mod sequence;

pub use account::{AccountRepository, CreateAccountInput};
pub use employee::{CreateEmployeeInput, EmployeeRepository};
pub use fiscal::FiscalRepository;
pub use ledger::LedgerRepository;
pub use payroll::{ItemUpdate, PayrollCycleDetail, PayrollRepository};
pub use sequence::SequenceRepository;

use paybook_core::ledger::LedgerError;
use paybook_core::payroll::PayrollError;
use sea_orm::DbErr;

pub(crate) fn ledger_db_error(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}

pub(crate) fn payroll_db_error(err: DbErr) -> PayrollError {
    PayrollError::Database(err.to_string())
}
