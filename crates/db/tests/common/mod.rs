//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database with the full schema,
//! the 2026 monthly fiscal periods and a small chart of accounts.
//!
//! SQLite runs on a single pooled connection and ignores `FOR UPDATE`, so
//! tests about concurrent writers also have a Postgres variant built by
//! [`setup_postgres`]. It runs when `DATABASE_URL` points at Postgres and is
//! skipped otherwise.

#![allow(dead_code)]

use chrono::NaiveDate;
use paybook_core::ledger::{AccountType, PostingContext, PostingPolicy};
use paybook_db::migration::{Migrator, MigratorTrait};
use paybook_db::{AccountRepository, CreateAccountInput, CreateEmployeeInput, EmployeeRepository, FiscalRepository};
use paybook_shared::config::DatabaseConfig;
use paybook_shared::types::{EmployeeId, UserId};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::env;
use uuid::Uuid;

pub const CASH_AND_BANK: &str = "1000";
pub const CASH: &str = "1010";
pub const BANK: &str = "1020";
pub const SALARIES_PAYABLE: &str = "2100";
pub const DEDUCTIONS_PAYABLE: &str = "2110";
pub const CAPITAL: &str = "3000";
pub const SALES: &str = "4000";
pub const SALARIES_EXPENSE: &str = "5100";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Wall-clock date all tests post on.
pub fn posting_date() -> NaiveDate {
    date(2026, 10, 16)
}

pub fn ctx(user: UserId) -> PostingContext {
    PostingContext::new(posting_date(), user, PostingPolicy::default())
}

pub fn ctx_with(user: UserId, policy: PostingPolicy) -> PostingContext {
    PostingContext::new(posting_date(), user, policy)
}

/// Fresh database with schema, periods and chart of accounts.
pub async fn setup_db() -> DatabaseConnection {
    // One pooled connection: every connection to `:memory:` is its own database.
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = paybook_db::connect_with(&config).await.unwrap();
    prepare(&db).await;
    db
}

/// Fresh Postgres schema with the same fixtures, or `None` when no Postgres
/// server is configured.
///
/// Each call creates its own `paybook_test_*` schema and pins the pool's
/// search path to it, so tests never see each other's rows.
pub async fn setup_postgres() -> Option<DatabaseConnection> {
    let url = match env::var("DATABASE_URL") {
        Ok(url) if url.starts_with("postgres") => url,
        _ => {
            eprintln!("Skipping test - DATABASE_URL is not a Postgres URL");
            return None;
        }
    };
    let admin = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Skipping test - database not available: {e}");
            return None;
        }
    };

    let schema = format!("paybook_test_{}", Uuid::new_v4().simple());
    admin
        .execute_unprepared(&format!("CREATE SCHEMA {schema}"))
        .await
        .unwrap();
    admin.close().await.unwrap();

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(8)
        .min_connections(1)
        .set_schema_search_path(schema)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    prepare(&db).await;
    Some(db)
}

async fn prepare(db: &DatabaseConnection) {
    Migrator::up(db, None).await.unwrap();
    FiscalRepository::new(db.clone())
        .create_monthly_periods(2026)
        .await
        .unwrap();
    seed_chart(db).await;
}

async fn seed_chart(db: &DatabaseConnection) {
    let repo = AccountRepository::new(db.clone());
    let accounts = [
        CreateAccountInput::new(CASH_AND_BANK, "Cash and Bank", AccountType::Asset),
        CreateAccountInput::new(CASH, "Cash", AccountType::Asset).under(CASH_AND_BANK),
        CreateAccountInput::new(BANK, "Bank", AccountType::Asset).under(CASH_AND_BANK),
        CreateAccountInput::new(SALARIES_PAYABLE, "Salaries Payable", AccountType::Liability),
        CreateAccountInput::new(DEDUCTIONS_PAYABLE, "Withholdings Payable", AccountType::Liability),
        CreateAccountInput::new(CAPITAL, "Owner Capital", AccountType::Equity),
        CreateAccountInput::new(SALES, "Sales", AccountType::Revenue),
        CreateAccountInput::new(SALARIES_EXPENSE, "Salaries Expense", AccountType::Expense),
    ];
    for input in accounts {
        repo.create_account(input).await.unwrap();
    }
}

/// Creates an active employee and returns its id.
pub async fn hire(
    db: &DatabaseConnection,
    name: &str,
    base_salary: Decimal,
    user: Option<UserId>,
    manager: Option<EmployeeId>,
) -> EmployeeId {
    let mut input = CreateEmployeeInput::new(name, base_salary);
    if let Some(user) = user {
        input = input.with_user(user);
    }
    if let Some(manager) = manager {
        input = input.reporting_to(manager);
    }
    let model = EmployeeRepository::new(db.clone())
        .create_employee(input)
        .await
        .unwrap();
    EmployeeId::from_uuid(model.id)
}
