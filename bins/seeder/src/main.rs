//! Database seeder for Paybook development and testing.
//!
//! Runs pending migrations, then seeds a small chart of accounts, the
//! monthly fiscal periods of the current year, the voucher sequence and an
//! employee hierarchy with login users, so a payroll cycle can be generated
//! and approved straight away. Every step is skipped when its data already exists.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use paybook_core::ledger::AccountType;
use paybook_db::entities::employees;
use paybook_db::migration::{Migrator, MigratorTrait};
use paybook_db::{
    AccountRepository, CreateAccountInput, CreateEmployeeInput, EmployeeRepository,
    FiscalRepository, SequenceRepository,
};
use paybook_shared::AppConfig;
use paybook_shared::telemetry::init_tracing;
use paybook_shared::types::{EmployeeId, UserId};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

/// Login of the seeded finance director (top of the approval chain).
const DIRECTOR_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Login of the seeded payroll manager.
const MANAGER_USER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Login of the seeded payroll clerk, who prepares cycles.
const CLERK_USER_ID: &str = "00000000-0000-0000-0000-000000000003";

/// (code, name, type, parent code)
const CHART: &[(&str, &str, AccountType, Option<&str>)] = &[
    ("1000", "Cash and Bank", AccountType::Asset, None),
    ("1010", "Cash on Hand", AccountType::Asset, Some("1000")),
    ("1020", "Operating Bank Account", AccountType::Asset, Some("1000")),
    ("2000", "Current Liabilities", AccountType::Liability, None),
    ("2100", "Salaries Payable", AccountType::Liability, Some("2000")),
    ("2110", "Withholdings Payable", AccountType::Liability, Some("2000")),
    ("3000", "Owner Capital", AccountType::Equity, None),
    ("4000", "Sales", AccountType::Revenue, None),
    ("5000", "Operating Expenses", AccountType::Expense, None),
    ("5100", "Salaries Expense", AccountType::Expense, Some("5000")),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let db = paybook_db::connect_with(&config.database)
        .await
        .context("failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    seed_accounts(&db, &config).await?;
    seed_fiscal_periods(&db).await?;
    SequenceRepository::new(db.clone())
        .ensure(&config.ledger.voucher_document_type)
        .await?;
    seed_employees(&db).await?;

    tracing::info!("seeding complete");
    Ok(())
}

async fn seed_accounts(db: &DatabaseConnection, config: &AppConfig) -> anyhow::Result<()> {
    let repo = AccountRepository::new(db.clone());

    let mut created = 0_usize;
    for (code, name, account_type, parent) in CHART {
        if repo.find_by_code(code).await?.is_some() {
            continue;
        }
        let mut input = CreateAccountInput::new(*code, *name, *account_type);
        if let Some(parent) = parent {
            input = input.under(*parent);
        }
        repo.create_account(input).await?;
        created += 1;
    }
    tracing::info!(created, "chart of accounts seeded");

    // Configured payroll accounts may point outside the seeded chart.
    let accounts = &config.payroll.accounts;
    for code in [
        &accounts.salaries_expense,
        &accounts.salaries_payable,
        &accounts.deductions_payable,
        &accounts.default_cash,
    ] {
        if repo.find_by_code(code).await?.is_none() {
            tracing::warn!(code = %code, "configured payroll account does not exist");
        }
    }
    Ok(())
}

async fn seed_fiscal_periods(db: &DatabaseConnection) -> anyhow::Result<()> {
    let year = Utc::now().year();
    let first_day =
        NaiveDate::from_ymd_opt(year, 1, 1).context("current year is out of range")?;

    if FiscalRepository::find_period_on(db, first_day).await?.is_some() {
        tracing::info!(year, "fiscal periods already exist, skipping");
        return Ok(());
    }
    FiscalRepository::new(db.clone())
        .create_monthly_periods(year)
        .await?;
    Ok(())
}

async fn seed_employees(db: &DatabaseConnection) -> anyhow::Result<()> {
    if employees::Entity::find().count(db).await? > 0 {
        tracing::info!("employees already exist, skipping");
        return Ok(());
    }
    let repo = EmployeeRepository::new(db.clone());

    let director = hire(&repo, "Dana Director", 9000, Some(DIRECTOR_USER_ID), None).await?;
    let manager = hire(&repo, "Max Manager", 6500, Some(MANAGER_USER_ID), Some(director)).await?;
    hire(&repo, "Cory Clerk", 4200, Some(CLERK_USER_ID), Some(manager)).await?;

    let engineer = hire(&repo, "Erin Engineer", 5800, None, Some(manager)).await?;
    repo.add_allowance(engineer, "Transport", Decimal::from(300))
        .await?;
    repo.add_deduction(engineer, "Pension", Decimal::from(290))
        .await?;

    let analyst = hire(&repo, "Ari Analyst", 4800, None, Some(manager)).await?;
    repo.add_deduction(analyst, "Pension", Decimal::from(240))
        .await?;

    tracing::info!(
        director = DIRECTOR_USER_ID,
        manager = MANAGER_USER_ID,
        clerk = CLERK_USER_ID,
        "employees seeded"
    );
    Ok(())
}

async fn hire(
    repo: &EmployeeRepository,
    name: &str,
    base_salary: i64,
    user: Option<&str>,
    manager: Option<EmployeeId>,
) -> anyhow::Result<EmployeeId> {
    let mut input = CreateEmployeeInput::new(name, Decimal::from(base_salary));
    if let Some(user) = user {
        input = input.with_user(user.parse::<UserId>()?);
    }
    if let Some(manager) = manager {
        input = input.reporting_to(manager);
    }
    let employee = repo.create_employee(input).await?;
    Ok(EmployeeId::from_uuid(employee.id))
}
