//! Core business logic for Paybook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry posting rules, balances, reversals, voucher numbering
//! - `payroll` - Payroll cycle building, approval chain, accrual and settlement

pub mod ledger;
pub mod payroll;
